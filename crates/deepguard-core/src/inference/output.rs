//! Normalisation of raw model outputs.

use anyhow::{bail, Result};
use tracing::warn;

use crate::domain::Prediction;

/// Raw output tensor of a forward pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelOutput {
    /// Output dimensions as reported by the runtime.
    pub shape: Vec<usize>,
    /// Output values in row-major order.
    pub values: Vec<f32>,
}

impl ModelOutput {
    /// Creates an output from its shape and flattened values.
    #[must_use]
    pub const fn new(shape: Vec<usize>, values: Vec<f32>) -> Self {
        Self { shape, values }
    }

    /// Extracts the single confidence carried by this output.
    ///
    /// Scalars, `[1]` and `[1, 1]` outputs all reduce to their first value.
    ///
    /// # Errors
    ///
    /// Returns an error if the output is empty or not finite.
    pub fn confidence(&self) -> Result<f32> {
        let Some(&value) = self.values.first() else {
            bail!("model produced an empty output (shape {:?})", self.shape);
        };
        if !value.is_finite() {
            bail!("model produced a non-finite confidence: {value}");
        }
        if self.values.len() > 1 {
            warn!(
                "Model output has {} values (shape {:?}), using the first",
                self.values.len(),
                self.shape
            );
        }
        if !(0.0..=1.0).contains(&value) {
            warn!("Model confidence {value} is outside [0, 1]");
        }
        Ok(value)
    }

    /// Converts the output into a scored prediction.
    ///
    /// # Errors
    ///
    /// Returns an error if no confidence can be extracted.
    pub fn into_prediction(self) -> Result<Prediction> {
        let confidence = self.confidence()?;
        Ok(Prediction::scored(confidence, self.values))
    }
}
