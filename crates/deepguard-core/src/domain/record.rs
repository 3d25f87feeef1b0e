//! Serialisable per-file records and batch reports.

use serde::{Deserialize, Serialize};

use super::{ConfidenceBand, InferenceResults, Prediction, Verdict};
use crate::config::DetectionConfig;

/// Flat view of one file's outcome, as written to JSON outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionRecord {
    /// File name inside the scanned folder.
    pub file: String,
    /// Fake probability, absent when inference failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    /// Predicted label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict: Option<Verdict>,
    /// Display band.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub band: Option<ConfidenceBand>,
    /// Raw model output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<Vec<f32>>,
    /// Error description when inference failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DetectionRecord {
    /// Builds a record from a prediction.
    #[must_use]
    pub fn new(file: impl Into<String>, prediction: &Prediction, config: &DetectionConfig) -> Self {
        let file = file.into();
        match prediction {
            Prediction::Scored { confidence, raw } => Self {
                file,
                confidence: Some(*confidence),
                verdict: Some(Verdict::from_confidence(*confidence, config.fake_threshold)),
                band: Some(ConfidenceBand::classify(*confidence, &config.bands)),
                raw: Some(raw.clone()),
                error: None,
            },
            Prediction::Failed { error } => Self {
                file,
                confidence: None,
                verdict: None,
                band: None,
                raw: None,
                error: Some(error.clone()),
            },
        }
    }

    /// Returns true if this record carries a `Fake` verdict.
    #[must_use]
    pub fn is_fake(&self) -> bool {
        self.verdict == Some(Verdict::Fake)
    }
}

/// Summary of a whole run, written next to the annotated images.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    /// Identifier of this run.
    pub batch_id: String,
    /// Creation time (RFC 3339).
    pub created_at: String,
    /// Model file used.
    pub model: String,
    /// Files processed.
    pub total: usize,
    /// Files that produced a confidence.
    pub scored: usize,
    /// Files that failed.
    pub failed: usize,
    /// Mean confidence over scored files.
    pub average_confidence: Option<f32>,
    /// Fake threshold the verdicts were computed with.
    pub fake_threshold: f32,
    /// Whether the batch as a whole is judged fake.
    pub is_deepfake: bool,
    /// Per-file records in file name order.
    pub results: Vec<DetectionRecord>,
}

impl BatchReport {
    /// Builds a report for the given results.
    ///
    /// The batch counts as a deepfake when the average confidence reaches the
    /// fake threshold.
    #[must_use]
    pub fn new(
        batch_id: impl Into<String>,
        created_at: impl Into<String>,
        model: impl Into<String>,
        results: &InferenceResults,
        config: &DetectionConfig,
    ) -> Self {
        let average_confidence = results.average_confidence();
        Self {
            batch_id: batch_id.into(),
            created_at: created_at.into(),
            model: model.into(),
            total: results.len(),
            scored: results.scored_count(),
            failed: results.failed_count(),
            average_confidence,
            fake_threshold: config.fake_threshold,
            is_deepfake: average_confidence.is_some_and(|avg| avg >= config.fake_threshold),
            results: results
                .iter()
                .map(|(file, prediction)| DetectionRecord::new(file, prediction, config))
                .collect(),
        }
    }
}
