// -- submodules
mod loader;
mod source_utils;

pub use loader::SourceLoader;
use source_utils::collect_images_from_dir;

// -- external imports
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use strum::{Display, EnumString, VariantNames};

use crate::error::Result;

// -- enums

/// Order in which discovered sources are placed into the grid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EnumString, Display, VariantNames)]
pub enum SourceOrder {
    /// Whatever the directory listing returns. Not guaranteed to be sorted or stable.
    #[default]
    #[strum(serialize = "Filesystem")]
    Filesystem,

    /// Sorted by path
    #[strum(serialize = "Lexicographic")]
    Lexicographic,
}

/// What to do with a source that cannot be decoded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EnumString, Display, VariantNames)]
pub enum DecodePolicy {
    /// Fail the whole run on the first bad source
    #[default]
    #[strum(serialize = "Abort")]
    Abort,

    /// Log a warning and leave the source out of the grid
    #[strum(serialize = "SkipAndWarn")]
    SkipAndWarn,
}

fn deserialize_variant<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: FromStr + VariantNames,
{
    let value = String::deserialize(deserializer)?;
    T::from_str(&value).map_err(|_| {
        serde::de::Error::invalid_value(
            serde::de::Unexpected::Str(&value),
            &format!("one of {}", T::VARIANTS.join(", ")).as_str(),
        )
    })
}

/// Custom deserializer with helpful error message
pub fn deserialize_order<'de, D>(deserializer: D) -> Result<SourceOrder, D::Error>
where
    D: serde::Deserializer<'de>,
{
    deserialize_variant(deserializer)
}

/// Custom deserializer with helpful error message
pub fn deserialize_decode_policy<'de, D>(deserializer: D) -> Result<DecodePolicy, D::Error>
where
    D: serde::Deserializer<'de>,
{
    deserialize_variant(deserializer)
}

// -- structs

#[derive(Debug, Clone)]
pub struct SourceMeta {
    /// Position in discovery order (0-based).
    pub index: usize,
    /// Number of discovered sources.
    pub total: usize,
    /// Path the image was decoded from.
    pub path: PathBuf,
}

impl SourceMeta {
    /// File stem of the source, used for captions
    pub fn label(&self) -> String {
        match self.path.file_stem() {
            Some(stem) => stem.to_string_lossy().into_owned(),
            None => format!("image_{}", self.index),
        }
    }
}

// -- public API

/// Enumerate the image sources for a run.
///
/// A missing `dir` yields no sources rather than an error.
pub fn discover_sources(dir: &Path, pattern: &str, order: SourceOrder) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        tracing::warn!("Source directory does not exist: {:?}", dir);
        return Ok(vec![]);
    }

    let mut paths = collect_images_from_dir(dir, pattern)?;
    if order == SourceOrder::Lexicographic {
        paths.sort();
    }
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_discover_filters_by_pattern() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["b.png", "a.png", "c.jpg", "notes.txt"] {
            fs::write(temp_dir.path().join(name), b"").unwrap();
        }
        fs::create_dir(temp_dir.path().join("nested.png")).unwrap();

        let paths = discover_sources(temp_dir.path(), "*.png", SourceOrder::Lexicographic).unwrap();
        let names: Vec<_> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, vec!["a.png", "b.png"]);
    }

    #[test]
    fn test_discover_filesystem_order_keeps_every_match() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["3.png", "1.png", "2.png"] {
            fs::write(temp_dir.path().join(name), b"").unwrap();
        }

        let mut paths = discover_sources(temp_dir.path(), "*.png", SourceOrder::Filesystem).unwrap();
        assert_eq!(paths.len(), 3);

        paths.sort();
        assert_eq!(paths[0], temp_dir.path().join("1.png"));
    }

    #[test]
    fn test_discover_skips_hidden_files() {
        let temp_dir = TempDir::new().unwrap();
        RgbImage::from_pixel(4, 4, Rgb([255, 0, 0]))
            .save(temp_dir.path().join("a.png"))
            .unwrap();
        // AppleDouble sidecar: not an image
        fs::write(temp_dir.path().join("._a.png"), b"\x00\x05\x16\x07junk").unwrap();
        fs::write(temp_dir.path().join(".png"), b"").unwrap();

        let paths = discover_sources(temp_dir.path(), "*.png", SourceOrder::Filesystem).unwrap();
        assert_eq!(paths, vec![temp_dir.path().join("a.png")]);

        let hidden = discover_sources(temp_dir.path(), ".*.png", SourceOrder::Lexicographic).unwrap();
        assert_eq!(hidden, vec![temp_dir.path().join("._a.png")]);
    }

    #[test]
    fn test_discover_missing_dir_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("png");
        let paths = discover_sources(&missing, "*.png", SourceOrder::Filesystem).unwrap();
        assert!(paths.is_empty());
    }

    #[test]
    fn test_discover_rejects_pattern_with_separator() {
        let temp_dir = TempDir::new().unwrap();
        assert!(discover_sources(temp_dir.path(), "sub/*.png", SourceOrder::Filesystem).is_err());
    }

    #[test]
    fn test_meta_label_uses_file_stem() {
        let meta = SourceMeta {
            index: 2,
            total: 3,
            path: PathBuf::from("png/graph_07.png"),
        };
        assert_eq!(meta.label(), "graph_07");
    }

    #[test]
    fn test_enum_from_str() {
        assert_eq!(
            SourceOrder::from_str("Lexicographic").unwrap(),
            SourceOrder::Lexicographic
        );
        assert_eq!(
            DecodePolicy::from_str("SkipAndWarn").unwrap(),
            DecodePolicy::SkipAndWarn
        );
        assert!(DecodePolicy::from_str("skip").is_err());
    }
}
