mod compose;
mod error;
mod grid;
mod logging;
mod progress_bar;
mod render;
mod source;
mod toml_utils;

pub use error::{AppError, Result};
pub use grid::{Cell, GridShape};
pub use logging::init_logger;
pub use progress_bar::progress_bar_style;
pub use render::{CellLayout, RenderConfigs, render_grid};
pub use source::{DecodePolicy, SourceLoader, SourceMeta, SourceOrder, discover_sources};
pub use toml_utils::parse_toml;

// Core composition function
pub use compose::{ComposeArgs, ComposeOutcome, run_composition};
