//! Header rendering and annotated copies of classified images.

// Image dimensions are far below i32::MAX
#![allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]

use image::{imageops, RgbImage};
use tracing::{info, warn};

use super::detector::sorted_entries;
use crate::config::{AnnotationConfig, DetectionConfig};
use crate::domain::{Annotation, InferenceResults};
use crate::error::DetectError;
use crate::ports::{AnnotationSink, ImageSource, TextRenderer};

/// Outcome counts of an annotation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnnotationSummary {
    /// Images written with a header.
    pub annotated: usize,
    /// Images without a prediction or that could not be decoded.
    pub skipped: usize,
    /// Images whose annotated copy could not be written.
    pub failed: usize,
}

/// Draws confidence headers above images.
#[derive(Debug, Clone, Default)]
pub struct Annotator {
    detection: DetectionConfig,
    config: AnnotationConfig,
}

impl Annotator {
    /// Creates an annotator.
    #[must_use]
    pub const fn new(detection: DetectionConfig, config: AnnotationConfig) -> Self {
        Self { detection, config }
    }

    /// Writes an annotated copy of every image of `source` that has a result.
    ///
    /// Sample indices follow sorted file name order and count every listed
    /// image, including skipped ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the destination cannot be prepared or the source
    /// cannot be listed. Per-image problems are logged and counted.
    pub fn annotate(
        &self,
        source: &dyn ImageSource,
        results: &InferenceResults,
        renderer: &dyn TextRenderer,
        sink: &dyn AnnotationSink,
    ) -> Result<AnnotationSummary, DetectError> {
        sink.prepare().map_err(DetectError::Output)?;

        let entries = sorted_entries(source, &self.detection)?;
        let mut summary = AnnotationSummary::default();
        if entries.is_empty() {
            warn!("No valid image files found in: {}", source.describe());
            return Ok(summary);
        }

        for (position, entry) in entries.iter().enumerate() {
            let Some(prediction) = results.get(&entry.name) else {
                warn!("No prediction for {}, skipping", entry.name);
                summary.skipped += 1;
                continue;
            };

            let image = match source.load(entry) {
                Ok(image) => image.to_rgb8(),
                Err(e) => {
                    warn!("Could not read {}: {e:#}", entry.name);
                    summary.skipped += 1;
                    continue;
                }
            };

            let annotation = Annotation::new(position + 1, prediction, &self.detection);
            let composite = self.render(&image, &annotation, renderer);

            match sink.save(entry, &composite) {
                Ok(()) => summary.annotated += 1,
                Err(e) => {
                    warn!("Could not save annotated {}: {e:#}", entry.name);
                    summary.failed += 1;
                }
            }
        }

        info!(
            "Annotated {} images with {} saved to: {}",
            summary.annotated,
            renderer.describe(),
            sink.describe()
        );
        Ok(summary)
    }

    /// Returns `image` with the annotation header stacked on top.
    #[must_use]
    pub fn render(
        &self,
        image: &RgbImage,
        annotation: &Annotation,
        renderer: &dyn TextRenderer,
    ) -> RgbImage {
        let layout = &self.config.header;
        let width = image.width();

        let mut header = RgbImage::from_pixel(width, layout.height, layout.background);
        let center_x = (width / 2) as i32;
        for (line, text) in annotation.lines().iter().enumerate() {
            let (text_width, _) = renderer.text_size(text);
            let x = center_x - (text_width / 2) as i32;
            let y = layout.first_line_y + layout.line_spacing * line as i32;
            renderer.draw_text(&mut header, x, y, text, annotation.color);
        }

        let mut combined = RgbImage::new(width, layout.height + image.height());
        imageops::replace(&mut combined, &header, 0, 0);
        imageops::replace(&mut combined, image, 0, i64::from(layout.height));
        combined
    }
}
