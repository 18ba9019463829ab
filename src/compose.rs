use ab_glyph::FontRef;
use image::{DynamicImage, RgbaImage};
use indicatif::{ProgressBar, ProgressFinish, ProgressIterator};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::error::{AppError, Result};
use crate::grid::GridShape;
use crate::progress_bar::progress_bar_style;
use crate::render::{CellLayout, RenderConfigs, load_font, render_grid};
use crate::source::{
    DecodePolicy, SourceLoader, SourceMeta, SourceOrder, deserialize_decode_policy,
    deserialize_order, discover_sources,
};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ComposeArgs {
    /// Directory searched for images (not recursive)
    pub source_dir: PathBuf,

    /// File name pattern, `*` and `?` wildcards
    pub pattern: String,

    /// Composite image path; format follows the extension
    pub output: PathBuf,

    /// Placement order of discovered images
    #[serde(default, deserialize_with = "deserialize_order")]
    pub order: SourceOrder,

    /// Behaviour on images that fail to decode
    #[serde(default, deserialize_with = "deserialize_decode_policy")]
    pub on_decode_error: DecodePolicy,

    /// Render configurations (read from the `[render]` table)
    #[serde(skip)]
    pub render_cfg: RenderConfigs,

    /// Show verbose output
    pub verbose: bool,
}

impl Default for ComposeArgs {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("png"),
            pattern: "*.png".to_string(),
            output: PathBuf::from("multi_graph.png"),
            order: Default::default(),
            on_decode_error: Default::default(),
            render_cfg: Default::default(),
            verbose: false,
        }
    }
}

/// How a composition run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposeOutcome {
    /// Nothing to lay out; no file was written
    EmptyInput,

    /// The composite was saved
    Written {
        output: PathBuf,
        grid: GridShape,
        /// Images placed into cells
        placed: usize,
        /// Sources dropped under `DecodePolicy::SkipAndWarn`
        skipped: usize,
    },
}

/// Core composition API: discover sources, lay them out on a grid, save the composite.
///
/// Either the full composite is written or nothing is.
pub fn run_composition(args: &ComposeArgs) -> Result<ComposeOutcome> {
    let start_time = Instant::now();

    // Validate render settings before touching any image
    let font_data = match &args.render_cfg.label_font {
        Some(path) => Some(load_font(path)?),
        None => None,
    };
    let font = match &font_data {
        Some(data) => Some(
            FontRef::try_from_slice(data)
                .map_err(|e| AppError::FontLoad(format!("{:?}: {}", args.render_cfg.label_font, e)))?,
        ),
        None => None,
    };
    let layout = CellLayout::new(&args.render_cfg, font.is_some())?;

    tracing::info!("[Source]: {:?} ({})", args.source_dir, args.pattern);
    let paths = discover_sources(&args.source_dir, &args.pattern, args.order)?;
    if paths.is_empty() {
        tracing::warn!("No images found in {:?}", args.source_dir);
        return Ok(ComposeOutcome::EmptyInput);
    }
    tracing::info!("Total images found: {}", paths.len());

    let progress = ProgressBar::new(paths.len() as u64)
        .with_style(progress_bar_style())
        .with_message("Loading images")
        .with_finish(ProgressFinish::WithMessage("Finished".into()));
    let (thumbnails, skipped) = load_thumbnails(paths, args, &layout, progress)?;

    let Some(grid) = GridShape::for_count(thumbnails.len()) else {
        tracing::warn!("None of the discovered images could be decoded");
        return Ok(ComposeOutcome::EmptyInput);
    };
    let placed = thumbnails.len();
    tracing::info!(
        "Grid: {} rows x {} columns ({} blank cells)",
        grid.rows,
        grid.columns,
        grid.blank_cells(placed)
    );

    let cells = grid.assign(thumbnails);
    let canvas = render_grid(&grid, &cells, &layout, &args.render_cfg, font.as_ref())?;
    drop(cells);

    save_composite(canvas, &args.output)?;
    tracing::info!("Composite saved to: {:?}", args.output);

    let duration = start_time.elapsed();
    tracing::info!("Total composition time: {:.3?}", duration);

    Ok(ComposeOutcome::Written {
        output: args.output.clone(),
        grid,
        placed,
        skipped,
    })
}

/// Decode every source in order and shrink it to cell size right away,
/// so full-size images never pile up in memory.
///
/// The progress bar is abandoned, not finished, when a source aborts the run.
fn load_thumbnails(
    paths: Vec<PathBuf>,
    args: &ComposeArgs,
    layout: &CellLayout,
    progress: ProgressBar,
) -> Result<(Vec<(RgbaImage, SourceMeta)>, usize)> {
    let mut loader = SourceLoader::new(paths, args.on_decode_error);

    let mut thumbnails = Vec::with_capacity(loader.len());
    for item in loader.by_ref().progress_with(progress.clone()) {
        let (image, meta) = match item {
            Ok(item) => item,
            Err(e) => {
                progress.abandon_with_message("Aborted");
                return Err(e);
            }
        };
        if args.verbose {
            tracing::debug!(
                "Placing {:?} ({}/{}, {}x{}) at index {}",
                meta.path.file_name().unwrap_or_default(),
                meta.index + 1,
                meta.total,
                image.width(),
                image.height(),
                thumbnails.len()
            );
        }
        thumbnails.push((layout.fit(&image), meta));
    }

    Ok((thumbnails, loader.skipped()))
}

/// Write the canvas, replacing any existing file
fn save_composite(canvas: RgbaImage, output: &Path) -> Result<()> {
    DynamicImage::ImageRgba8(canvas)
        .into_rgb8()
        .save(output)
        .map_err(|e| AppError::ImageWrite(format!("{:?}: {}", output, e)))
}
