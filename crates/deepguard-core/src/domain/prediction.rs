//! Per-file inference outcomes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{BandThresholds, ConfidenceBand, Verdict};

/// Normalised outcome of running the classifier on one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Prediction {
    /// The model produced a confidence.
    Scored {
        /// Estimated probability that the image is fake, in `[0, 1]`.
        confidence: f32,
        /// Flattened raw model output.
        raw: Vec<f32>,
    },
    /// Loading, preprocessing or inference failed for this image.
    Failed {
        /// Error description.
        error: String,
    },
}

impl Prediction {
    /// Creates a scored prediction.
    #[must_use]
    pub const fn scored(confidence: f32, raw: Vec<f32>) -> Self {
        Self::Scored { confidence, raw }
    }

    /// Creates a failed prediction.
    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        Self::Failed {
            error: error.into(),
        }
    }

    /// Returns the confidence, if the prediction succeeded.
    #[must_use]
    pub const fn confidence(&self) -> Option<f32> {
        match self {
            Self::Scored { confidence, .. } => Some(*confidence),
            Self::Failed { .. } => None,
        }
    }

    /// Returns the error message, if the prediction failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Scored { .. } => None,
            Self::Failed { error } => Some(error),
        }
    }

    /// Returns the verdict for the given fake threshold.
    #[must_use]
    pub fn verdict(&self, fake_threshold: f32) -> Option<Verdict> {
        self.confidence()
            .map(|c| Verdict::from_confidence(c, fake_threshold))
    }

    /// Returns the display band for the given thresholds.
    #[must_use]
    pub fn band(&self, thresholds: &BandThresholds) -> Option<ConfidenceBand> {
        self.confidence()
            .map(|c| ConfidenceBand::classify(c, thresholds))
    }
}

/// Results of one inference run, keyed by file name.
///
/// Iterates in sorted file name order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InferenceResults {
    entries: BTreeMap<String, Prediction>,
}

impl InferenceResults {
    /// Creates an empty result set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the prediction for a file, replacing any previous one.
    pub fn insert(&mut self, file: impl Into<String>, prediction: Prediction) {
        self.entries.insert(file.into(), prediction);
    }

    /// Returns the prediction for a file.
    #[must_use]
    pub fn get(&self, file: &str) -> Option<&Prediction> {
        self.entries.get(file)
    }

    /// Number of files with a recorded outcome.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no outcome was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(file, prediction)` pairs in file name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Prediction)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterates over file names in order.
    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of files that produced a confidence.
    #[must_use]
    pub fn scored_count(&self) -> usize {
        self.entries
            .values()
            .filter(|p| p.confidence().is_some())
            .count()
    }

    /// Number of files that failed.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.len() - self.scored_count()
    }

    /// Mean confidence over scored files, or `None` if nothing was scored.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn average_confidence(&self) -> Option<f32> {
        let scores: Vec<f32> = self
            .entries
            .values()
            .filter_map(Prediction::confidence)
            .collect();
        if scores.is_empty() {
            None
        } else {
            Some(scores.iter().sum::<f32>() / scores.len() as f32)
        }
    }
}

impl<'a> IntoIterator for &'a InferenceResults {
    type Item = (&'a String, &'a Prediction);
    type IntoIter = std::collections::btree_map::Iter<'a, String, Prediction>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_iteration_is_sorted() {
        let mut results = InferenceResults::new();
        results.insert("c.jpg", Prediction::scored(0.1, vec![0.1]));
        results.insert("a.jpg", Prediction::scored(0.2, vec![0.2]));
        results.insert("b.png", Prediction::failed("boom"));

        let files: Vec<_> = results.files().collect();
        assert_eq!(files, vec!["a.jpg", "b.png", "c.jpg"]);
    }

    #[test]
    fn test_counts_and_average() {
        let mut results = InferenceResults::new();
        results.insert("a.jpg", Prediction::scored(0.2, vec![0.2]));
        results.insert("b.jpg", Prediction::scored(0.6, vec![0.6]));
        results.insert("c.jpg", Prediction::failed("decode"));

        assert_eq!(results.len(), 3);
        assert_eq!(results.scored_count(), 2);
        assert_eq!(results.failed_count(), 1);
        let avg = results.average_confidence().unwrap();
        assert!((avg - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_average_of_nothing_scored() {
        let mut results = InferenceResults::new();
        results.insert("a.jpg", Prediction::failed("decode"));
        assert!(results.average_confidence().is_none());
    }

    #[test]
    fn test_failed_prediction_has_no_verdict() {
        let failed = Prediction::failed("bad");
        assert!(failed.verdict(0.5).is_none());
        assert!(failed.band(&BandThresholds::default()).is_none());
        assert_eq!(failed.error(), Some("bad"));
    }

    #[test]
    fn test_serialized_shapes() {
        let scored = serde_json::to_value(Prediction::scored(0.5, vec![0.5])).unwrap();
        assert_eq!(scored["confidence"], 0.5);
        let failed = serde_json::to_value(Prediction::failed("x")).unwrap();
        assert_eq!(failed["error"], "x");
    }
}
