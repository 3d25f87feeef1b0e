//! Header text for annotated images.

use image::Rgb;

use super::{Prediction, Verdict, UNKNOWN_COLOR};
use crate::config::DetectionConfig;

/// What gets written into the header of one annotated image.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    /// 1-based position of the file in sorted order.
    pub index: usize,
    /// Predicted label, `None` when inference failed.
    pub verdict: Option<Verdict>,
    /// Confidence, `None` when inference failed.
    pub confidence: Option<f32>,
    /// Colour used for every line.
    pub color: Rgb<u8>,
}

impl Annotation {
    /// Builds the annotation for the file at `index`.
    #[must_use]
    pub fn new(index: usize, prediction: &Prediction, config: &DetectionConfig) -> Self {
        Self {
            index,
            verdict: prediction.verdict(config.fake_threshold),
            confidence: prediction.confidence(),
            color: prediction
                .band(&config.bands)
                .map_or(UNKNOWN_COLOR, |band| band.color()),
        }
    }

    /// The three header lines: sample index, label and confidence.
    #[must_use]
    pub fn lines(&self) -> [String; 3] {
        let label = self
            .verdict
            .map_or_else(|| "Unknown".to_string(), |v| v.to_string());
        let confidence = self
            .confidence
            .map_or_else(|| "n/a".to_string(), |c| format!("{c:.3}"));
        [
            format!("Sample #{}", self.index),
            format!("Pred: {label}"),
            format!("Conf: {confidence}"),
        ]
    }
}
