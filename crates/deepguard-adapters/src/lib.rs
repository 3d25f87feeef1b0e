//! DeepGuard Adapters - External adapters for deepguard.
//!
//! This crate provides adapters for:
//! - Filesystem image folders and annotated output
//! - The TFLite classifier runtime
//! - Font loading with a built-in fallback
//! - Model file discovery

pub mod builtin_font;
pub mod fonts;
pub mod fs;
pub mod models;
pub mod output;
pub mod tflite;

pub use builtin_font::BitmapTextRenderer;
pub use fonts::{load_text_renderer, FontConfig, GlyphTextRenderer};
pub use fs::{load_image, FsImageFolder};
pub use models::{list_models, models_dir, resolve_model_path, DEFAULT_MODEL_FILE};
pub use output::{write_report, BatchStamp, FsAnnotationWriter, REPORT_FILE};
pub use tflite::TfliteClassifier;
