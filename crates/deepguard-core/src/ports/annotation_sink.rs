//! Destination port for annotated images.

use image::RgbImage;

use super::ImageEntry;

/// Port for storing annotated copies of source images.
pub trait AnnotationSink {
    /// Prepares the destination (for example by creating a folder).
    ///
    /// # Errors
    ///
    /// Returns an error if the destination cannot be prepared.
    fn prepare(&self) -> anyhow::Result<()>;

    /// Stores the annotated image for `entry` under the entry's file name.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or writing fails.
    fn save(&self, entry: &ImageEntry, image: &RgbImage) -> anyhow::Result<()>;

    /// Human-readable location of the destination, for messages.
    fn describe(&self) -> String;
}
