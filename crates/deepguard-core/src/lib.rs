//! DeepGuard Core - Domain logic for deepfake detection
//!
//! This crate contains the domain types, the ports adapters plug into, image
//! preprocessing, and the two processing stages: batch inference and
//! confidence annotation.

pub mod config;
pub mod domain;
pub mod error;
pub mod inference;
pub mod ports;
pub mod stages;

pub use config::{AnnotationConfig, DetectionConfig, HeaderLayout};
pub use domain::{
    Annotation, BandThresholds, BatchReport, ConfidenceBand, DetectionRecord, InferenceResults,
    Prediction, Verdict,
};
pub use error::DetectError;
pub use inference::{InputShape, ModelOutput, TensorLayout};
pub use ports::{
    AnnotationSink, Classifier, ImageEntry, ImageSource, NoProgress, ProgressEvent, ProgressSink,
    ResultOutput, TextRenderer,
};
pub use stages::{AnnotationSummary, Annotator, Detector};
