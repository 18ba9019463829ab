// -- submodules
mod caption;
mod font;

pub use caption::draw_caption;
pub use font::load_font;

// -- external imports
use ab_glyph::FontRef;
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};
use serde::Deserialize;
use std::path::PathBuf;

use crate::error::{AppError, Result};
use crate::grid::{Cell, GridShape};
use crate::source::SourceMeta;

/// Largest accepted cell edge, in pixels
pub const MAX_CELL_PX: u32 = 4096;

/// Largest accepted canvas area, in pixels
pub const MAX_CANVAS_PIXELS: u64 = 1 << 28;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderConfigs {
    /// Cell edge length in size units
    pub cell_units: f32,

    /// Pixels per size unit
    pub dpi: f32,

    /// Gap between an image and its cell border, in pixels
    pub padding: u32,

    /// Canvas color behind images and in blank cells
    pub background: [u8; 3],

    /// Font file for file-name captions; captions are off when unset
    pub label_font: Option<PathBuf>,

    /// Caption height in pixels
    pub label_size: f32,
}

impl Default for RenderConfigs {
    fn default() -> Self {
        Self {
            cell_units: 2.0,
            dpi: 100.0,
            padding: 8,
            background: [255, 255, 255],
            label_font: None,
            label_size: 14.0,
        }
    }
}

/// Pixel geometry shared by every cell of the composite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellLayout {
    /// Cell edge length
    pub cell_px: u32,
    pub padding: u32,
    /// Height reserved at the bottom of each cell for a caption
    pub caption_band: u32,
}

impl CellLayout {
    pub fn new(configs: &RenderConfigs, captions: bool) -> Result<Self> {
        let cell_px = (configs.cell_units * configs.dpi).round();
        if !cell_px.is_finite() || cell_px < 1.0 || cell_px > MAX_CELL_PX as f32 {
            return Err(AppError::Config(format!(
                "Cell size must be between 1 and {}px, got {} units at {} dpi",
                MAX_CELL_PX, configs.cell_units, configs.dpi
            )));
        }
        let cell_px = cell_px as u32;

        let caption_band = if captions {
            if configs.label_size.is_nan() || configs.label_size <= 0.0 {
                return Err(AppError::Config(format!(
                    "Caption size must be positive, got {}",
                    configs.label_size
                )));
            }
            (configs.label_size * 1.2).ceil() as u32
        } else {
            0
        };

        let layout = Self {
            cell_px,
            padding: configs.padding,
            caption_band,
        };
        if layout.inner_size().0 == 0 || layout.inner_size().1 == 0 {
            return Err(AppError::Config(format!(
                "Cell of {}px leaves no room for an image (padding {}px, caption {}px)",
                cell_px, configs.padding, caption_band
            )));
        }
        Ok(layout)
    }

    /// Area available to the image inside one cell
    pub fn inner_size(&self) -> (u32, u32) {
        let width = self.cell_px.saturating_sub(self.padding.saturating_mul(2));
        let height = width.saturating_sub(self.caption_band);
        (width, height)
    }

    /// Canvas dimensions for a grid
    pub fn canvas_size(&self, grid: &GridShape) -> Result<(u32, u32)> {
        let span = |cells: usize| {
            u32::try_from(cells)
                .ok()
                .and_then(|cells| self.cell_px.checked_mul(cells))
        };
        match (span(grid.columns), span(grid.rows)) {
            (Some(width), Some(height))
                if u64::from(width) * u64::from(height) <= MAX_CANVAS_PIXELS =>
            {
                Ok((width, height))
            }
            _ => Err(AppError::Config(format!(
                "Canvas for {} rows x {} columns of {}px cells is too large",
                grid.rows, grid.columns, self.cell_px
            ))),
        }
    }

    /// Top-left pixel of a cell
    pub fn cell_origin(&self, row: usize, column: usize) -> (u32, u32) {
        (self.cell_px * column as u32, self.cell_px * row as u32)
    }

    /// Scale an image to fit the cell's inner area, keeping its aspect ratio.
    pub fn fit(&self, image: &DynamicImage) -> RgbaImage {
        let (width, height) = self.inner_size();
        image.resize(width, height, FilterType::Triangle).to_rgba8()
    }
}

/// Render the composite canvas.
///
/// `cells` must come from `grid.assign`, images already fitted with `layout.fit`.
/// Blank cells are left as plain background.
pub fn render_grid(
    grid: &GridShape,
    cells: &[Cell<(RgbaImage, SourceMeta)>],
    layout: &CellLayout,
    configs: &RenderConfigs,
    font: Option<&FontRef>,
) -> Result<RgbaImage> {
    let (canvas_w, canvas_h) = layout.canvas_size(grid)?;
    let [r, g, b] = configs.background;
    let mut canvas = RgbaImage::from_pixel(canvas_w, canvas_h, Rgba([r, g, b, 255]));

    let (inner_w, inner_h) = layout.inner_size();

    for (idx, cell) in cells.iter().enumerate() {
        let Cell::Image((image, meta)) = cell else {
            continue;
        };

        let (row, column) = grid.position(idx);
        let (cell_x, cell_y) = layout.cell_origin(row, column);

        // centre inside the inner area
        let x = cell_x + layout.padding + inner_w.saturating_sub(image.width()) / 2;
        let y = cell_y + layout.padding + inner_h.saturating_sub(image.height()) / 2;
        imageops::overlay(&mut canvas, image, i64::from(x), i64::from(y));

        if let Some(font) = font {
            draw_caption(&mut canvas, layout, cell_x, cell_y, &meta.label(), configs, font);
        }
    }

    Ok(canvas)
}
