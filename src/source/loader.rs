use image::DynamicImage;
use std::path::PathBuf;

use crate::error::{AppError, Result};

use super::{DecodePolicy, SourceMeta};

/// Lazily decodes discovered sources in order.
///
/// Under `DecodePolicy::Abort` a bad source is yielded as an error; under
/// `DecodePolicy::SkipAndWarn` it is logged, counted and passed over.
#[derive(Debug)]
pub struct SourceLoader {
    current_idx: usize,
    paths: Vec<PathBuf>,
    policy: DecodePolicy,
    skipped: usize,
}

impl SourceLoader {
    pub fn new(paths: Vec<PathBuf>, policy: DecodePolicy) -> Self {
        Self {
            current_idx: 0,
            paths,
            policy,
            skipped: 0,
        }
    }

    /// Number of sources, decodable or not
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Number of sources skipped so far
    pub const fn skipped(&self) -> usize {
        self.skipped
    }
}

impl Iterator for SourceLoader {
    type Item = Result<(DynamicImage, SourceMeta)>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.current_idx < self.paths.len() {
            let index = self.current_idx;
            self.current_idx += 1;
            let path = &self.paths[index];

            match image::open(path) {
                Ok(image) => {
                    let meta = SourceMeta {
                        index,
                        total: self.paths.len(),
                        path: path.clone(),
                    };
                    return Some(Ok((image, meta)));
                }
                Err(e) => match self.policy {
                    DecodePolicy::Abort => {
                        return Some(Err(AppError::ImageLoad(format!("{:?}: {}", path, e))));
                    }
                    DecodePolicy::SkipAndWarn => {
                        tracing::warn!("Failed to open image: {:?}, skipping. Error: {}", path, e);
                        self.skipped += 1;
                    }
                },
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        // any remaining source may fail to decode
        (0, Some(self.paths.len() - self.current_idx))
    }
}
