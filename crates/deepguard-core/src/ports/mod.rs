//! Port definitions for hexagonal architecture.
//!
//! These traits define the boundaries between the domain core and external adapters.

mod annotation_sink;
mod classifier;
mod image_source;
mod progress;
mod result_output;
mod text_renderer;

pub use annotation_sink::AnnotationSink;
pub use classifier::Classifier;
pub use image_source::{ImageEntry, ImageSource};
pub use progress::{NoProgress, ProgressEvent, ProgressSink};
pub use result_output::ResultOutput;
pub use text_renderer::TextRenderer;
