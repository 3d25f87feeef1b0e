//! Classifier port wrapping the ML runtime.

use ndarray::Array4;

use crate::inference::{InputShape, ModelOutput};

/// A loaded, shape-bound deepfake classifier.
pub trait Classifier {
    /// Input geometry the model expects.
    fn input_shape(&self) -> InputShape;

    /// Runs one forward pass on a preprocessed batch-1 tensor.
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime rejects the input or fails to run.
    fn classify(&self, input: &Array4<f32>) -> anyhow::Result<ModelOutput>;
}
