use std::path::Path;

use crate::error::{AppError, Result};

/// Read a font file into memory.
///
/// The bytes must outlive any `FontRef` built from them.
pub fn load_font(font_path: &Path) -> Result<Vec<u8>> {
    std::fs::read(font_path)
        .map_err(|e| AppError::FontLoad(format!("{:?}: {}", font_path, e)))
}
