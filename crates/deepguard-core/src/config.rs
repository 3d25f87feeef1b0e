//! Configuration values passed into the detection and annotation stages.

use std::path::Path;

use image::Rgb;

use crate::domain::BandThresholds;

/// Image extensions accepted by both stages.
pub const DEFAULT_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp"];

/// Default decision boundary between `Real` and `Fake`.
pub const DEFAULT_FAKE_THRESHOLD: f32 = 0.5;

/// Default name of the annotated output subfolder.
pub const DEFAULT_OUTPUT_DIR: &str = "annotated_results";

/// Settings shared by inference and annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionConfig {
    /// Confidence at or above which an image is labelled `Fake`.
    pub fake_threshold: f32,
    /// Colour band boundaries.
    pub bands: BandThresholds,
    /// Lower-case file extensions (without dot) that are treated as images.
    pub extensions: Vec<String>,
}

impl DetectionConfig {
    /// Returns true if the path has an allow-listed extension (case-insensitive).
    #[must_use]
    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .is_some_and(|e| self.extensions.iter().any(|allowed| *allowed == e))
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            fake_threshold: DEFAULT_FAKE_THRESHOLD,
            bands: BandThresholds::default(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| (*e).to_string()).collect(),
        }
    }
}

/// Geometry of the header strip drawn above each image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderLayout {
    /// Header height in pixels.
    pub height: u32,
    /// Top offset of the first text line.
    pub first_line_y: i32,
    /// Vertical distance between consecutive lines.
    pub line_spacing: i32,
    /// Header fill colour.
    pub background: Rgb<u8>,
}

impl Default for HeaderLayout {
    fn default() -> Self {
        Self {
            height: 85,
            first_line_y: 10,
            line_spacing: 26,
            background: Rgb([255, 255, 255]),
        }
    }
}

/// Settings for the annotation stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationConfig {
    /// Header geometry.
    pub header: HeaderLayout,
    /// Name of the output subfolder inside the input folder.
    pub output_dir: String,
    /// JPEG encode quality (1-100) for `.jpg`/`.jpeg` outputs.
    pub jpeg_quality: u8,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            header: HeaderLayout::default(),
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
            jpeg_quality: 95,
        }
    }
}
