//! Error types for the detection and annotation stages.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while detecting deepfakes in a folder of images.
///
/// `NoImages`, `Model`, `UnsupportedInput`, `Source` and `Output` abort a
/// whole run.
/// `Load`, `EmptyImage` and `Inference` only ever concern a single file and
/// are recorded in the results instead of being propagated.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DetectError {
    /// The image file could not be read or decoded.
    #[error("failed to load image: {}", path.display())]
    Load {
        /// Path to the image.
        path: PathBuf,
        /// Underlying decoder error.
        #[source]
        source: image::ImageError,
    },

    /// The image decoded to zero pixels.
    #[error("image has no pixel data: {}", path.display())]
    EmptyImage {
        /// Path to the image.
        path: PathBuf,
    },

    /// The folder holds no file with an allow-listed extension.
    #[error("no valid images found in folder: {}", folder.display())]
    NoImages {
        /// Folder that was scanned.
        folder: PathBuf,
    },

    /// The model file could not be loaded into the runtime.
    #[error("failed to load model: {}", path.display())]
    Model {
        /// Path to the model file.
        path: PathBuf,
        /// Underlying runtime error.
        #[source]
        source: anyhow::Error,
    },

    /// The model declares an input tensor this crate cannot feed.
    #[error("unsupported model input shape {shape:?}: {reason}")]
    UnsupportedInput {
        /// Declared input dimensions.
        shape: Vec<usize>,
        /// Why the shape was rejected.
        reason: String,
    },

    /// Preprocessing or the forward pass failed for one file.
    #[error("inference failed for {file}")]
    Inference {
        /// File name the failure belongs to.
        file: String,
        /// Underlying error.
        #[source]
        source: anyhow::Error,
    },

    /// The image source itself could not be enumerated.
    #[error("failed to list images")]
    Source(#[source] anyhow::Error),

    /// The annotation destination could not be prepared.
    #[error("failed to prepare annotation output")]
    Output(#[source] anyhow::Error),
}

impl DetectError {
    /// Returns true if the error concerns a single file and must not abort a run.
    #[must_use]
    pub const fn is_per_item(&self) -> bool {
        matches!(
            self,
            Self::Load { .. } | Self::EmptyImage { .. } | Self::Inference { .. }
        )
    }
}
