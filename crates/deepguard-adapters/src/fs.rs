//! Filesystem adapter for reading images from a folder.

use anyhow::{Context, Result};
use deepguard_core::{DetectError, ImageEntry, ImageSource};
use image::{DynamicImage, GenericImageView};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Image source backed by the regular files of one folder.
///
/// Subfolders are never entered, so the annotated output folder living
/// inside the input folder is not picked up again.
#[derive(Debug, Clone)]
pub struct FsImageFolder {
    folder: PathBuf,
}

impl FsImageFolder {
    /// Creates a source for `folder`.
    #[must_use]
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
        }
    }

    /// Returns the folder this source reads from.
    #[must_use]
    pub fn folder(&self) -> &Path {
        &self.folder
    }
}

impl ImageSource for FsImageFolder {
    fn entries(&self) -> Result<Vec<ImageEntry>> {
        let dir = std::fs::read_dir(&self.folder)
            .with_context(|| format!("Failed to read directory {}", self.folder.display()))?;

        let mut entries = Vec::new();
        for entry in dir {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!("Skipping unreadable entry in {}: {e}", self.folder.display());
                    continue;
                }
            };
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            entries.push(ImageEntry::new(name, path));
        }

        debug!("Listed {} files in {}", entries.len(), self.folder.display());
        Ok(entries)
    }

    fn load(&self, entry: &ImageEntry) -> Result<DynamicImage> {
        Ok(load_image(&entry.path)?)
    }

    fn describe(&self) -> String {
        self.folder.display().to_string()
    }
}

/// Decodes an image file, rejecting images without pixels.
///
/// # Errors
///
/// Returns [`DetectError::Load`] if the file cannot be read or decoded and
/// [`DetectError::EmptyImage`] if it has zero width or height.
pub fn load_image(path: &Path) -> Result<DynamicImage, DetectError> {
    let image = image::open(path).map_err(|source| DetectError::Load {
        path: path.to_path_buf(),
        source,
    })?;

    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(DetectError::EmptyImage {
            path: path.to_path_buf(),
        });
    }
    Ok(image)
}
