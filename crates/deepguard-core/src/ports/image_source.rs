//! Image source port for enumerating and loading images.

use std::path::PathBuf;

use image::DynamicImage;

/// One candidate image in a source.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ImageEntry {
    /// File name (basename) used as the result key.
    pub name: String,
    /// Location of the image.
    pub path: PathBuf,
}

impl ImageEntry {
    /// Creates a new entry.
    #[must_use]
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// Port for listing and loading images.
pub trait ImageSource: Send + Sync {
    /// Returns every candidate file of this source, unfiltered and unsorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be enumerated.
    fn entries(&self) -> anyhow::Result<Vec<ImageEntry>>;

    /// Decodes one image.
    ///
    /// # Errors
    ///
    /// Returns an error if the image cannot be read or decoded.
    fn load(&self, entry: &ImageEntry) -> anyhow::Result<DynamicImage>;

    /// Human-readable location of the source, for messages.
    fn describe(&self) -> String;
}
