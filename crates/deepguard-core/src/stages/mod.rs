//! The two processing stages: inference and annotation.

mod annotator;
mod detector;

pub use annotator::{AnnotationSummary, Annotator};
pub use detector::Detector;
