//! Lay out the images of a directory on a near-square grid and save the composite.
//!
//! Without arguments this composes `./png/*.png` into `multi_graph.png`.
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use image_grid::{
    ComposeArgs, ComposeOutcome, DecodePolicy, SourceOrder, init_logger, parse_toml,
    run_composition,
};

#[derive(Parser, Debug)]
#[command(version, about = "Compose a directory of images into one grid image")]
struct Cli {
    /// TOML config file; relative paths inside it resolve against its directory
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory searched for images
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// File name pattern (`*` and `?` wildcards)
    #[arg(short, long)]
    pattern: Option<String>,

    /// Output image path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Place images in path order instead of directory listing order
    #[arg(long)]
    sort: bool,

    /// Skip images that fail to decode instead of aborting
    #[arg(long)]
    skip_invalid: bool,

    /// Log every placed image
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn into_args(self) -> Result<ComposeArgs> {
        let mut args = match &self.config {
            Some(toml_path) => {
                let base_dir = toml_path.parent().map(PathBuf::from).unwrap_or_default();
                parse_toml(toml_path, &base_dir)
                    .with_context(|| format!("Failed to parse TOML config: {:?}", toml_path))?
            }
            None => ComposeArgs::default(),
        };

        if let Some(source_dir) = self.source_dir {
            args.source_dir = source_dir;
        }
        if let Some(pattern) = self.pattern {
            args.pattern = pattern;
        }
        if let Some(output) = self.output {
            args.output = output;
        }
        if self.sort {
            args.order = SourceOrder::Lexicographic;
        }
        if self.skip_invalid {
            args.on_decode_error = DecodePolicy::SkipAndWarn;
        }
        args.verbose |= self.verbose;

        Ok(args)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let args = cli.into_args()?;
    init_logger(args.verbose);

    match run_composition(&args).with_context(|| "Failed to compose images".to_string())? {
        ComposeOutcome::EmptyInput => println!("No images found in the directory."),
        ComposeOutcome::Written { output, grid, placed, skipped } => {
            tracing::info!(
                "Placed {} images on a {}x{} grid in {:?} ({} skipped)",
                placed,
                grid.rows,
                grid.columns,
                output,
                skipped
            );
        }
    }

    Ok(())
}
