//! Core domain types for deepfake detection.

mod annotation;
mod band;
mod prediction;
mod record;

pub use annotation::Annotation;
pub use band::{BandThresholds, ConfidenceBand, Verdict, UNKNOWN_COLOR};
pub use prediction::{InferenceResults, Prediction};
pub use record::{BatchReport, DetectionRecord};
