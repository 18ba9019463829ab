/// Rows and columns of a near-square grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridShape {
    pub rows: usize,
    pub columns: usize,
}

/// One grid position
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell<T> {
    Image(T),
    Blank,
}

impl<T> Cell<T> {
    pub const fn is_blank(&self) -> bool {
        matches!(self, Cell::Blank)
    }
}

impl GridShape {
    /// Grid for `n` items: `columns = ceil(sqrt(n))`, `rows = ceil(n / columns)`.
    ///
    /// Returns `None` when there is nothing to lay out.
    pub fn for_count(n: usize) -> Option<Self> {
        if n == 0 {
            return None;
        }
        let columns = ceil_sqrt(n);
        let rows = n.div_ceil(columns);
        Some(Self { rows, columns })
    }

    pub const fn cell_count(&self) -> usize {
        self.rows * self.columns
    }

    /// Number of trailing cells left empty when `n` items are placed
    pub const fn blank_cells(&self, n: usize) -> usize {
        self.cell_count().saturating_sub(n)
    }

    /// Row-major `(row, column)` of a cell index
    pub const fn position(&self, index: usize) -> (usize, usize) {
        (index / self.columns, index % self.columns)
    }

    /// Assign items to cells in row-major order, padding with blank cells.
    pub fn assign<T, I>(&self, items: I) -> Vec<Cell<T>>
    where
        I: IntoIterator<Item = T>,
    {
        let mut cells: Vec<Cell<T>> = items
            .into_iter()
            .take(self.cell_count())
            .map(Cell::Image)
            .collect();
        cells.resize_with(self.cell_count(), || Cell::Blank);
        cells
    }
}

/// Smallest `b` with `b * b >= n`
fn ceil_sqrt(n: usize) -> usize {
    let mut b = (n as f64).sqrt().ceil() as usize;
    // float rounding can be off by one for large n
    while b * b < n {
        b += 1;
    }
    while b > 1 && (b - 1) * (b - 1) >= n {
        b -= 1;
    }
    b
}
