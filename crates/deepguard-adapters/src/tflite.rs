//! TFLite runtime adapter backed by tract.

use anyhow::{anyhow, Context, Result};
use deepguard_core::{Classifier, DetectError, InputShape, ModelOutput};
use ndarray::Array4;
use std::path::{Path, PathBuf};
use tract_core::prelude::{tvec, Datum, Framework, Tensor, TypedModel, TypedRunnableModel};
use tracing::{debug, info};

/// A loaded, shape-bound TFLite classifier.
///
/// The model is optimised once at load time; every [`Classifier::classify`]
/// call reuses the same plan.
pub struct TfliteClassifier {
    path: PathBuf,
    shape: InputShape,
    plan: TypedRunnableModel<TypedModel>,
}

impl std::fmt::Debug for TfliteClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TfliteClassifier")
            .field("path", &self.path)
            .field("shape", &self.shape)
            .finish_non_exhaustive()
    }
}

impl TfliteClassifier {
    /// Loads and optimises the model at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`DetectError::Model`] if the file cannot be parsed or
    /// optimised, and [`DetectError::UnsupportedInput`] if its input is not a
    /// fully known `[1, H, W, 3]` or `[1, 3, H, W]` tensor.
    pub fn load(path: &Path) -> Result<Self, DetectError> {
        let model_error = |source: anyhow::Error| DetectError::Model {
            path: path.to_path_buf(),
            source,
        };

        if !path.is_file() {
            return Err(model_error(anyhow!("model file not found")));
        }

        debug!("Loading TFLite model from {}", path.display());
        let model = tract_tflite::tflite()
            .model_for_path(path)
            .map_err(model_error)?;

        let shape = read_input_shape(&model)?;
        let plan = model
            .into_optimized()
            .and_then(TypedModel::into_runnable)
            .map_err(model_error)?;

        info!(
            "Loaded model {} with input {:?}",
            path.display(),
            shape.dims()
        );
        Ok(Self {
            path: path.to_path_buf(),
            shape,
            plan,
        })
    }

    /// Returns the path the model was loaded from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn read_input_shape(model: &TypedModel) -> Result<InputShape, DetectError> {
    let fact = model
        .input_fact(0)
        .map_err(|e| DetectError::UnsupportedInput {
            shape: Vec::new(),
            reason: format!("{e:#}"),
        })?;

    let Some(dims) = fact.shape.as_concrete() else {
        return Err(DetectError::UnsupportedInput {
            shape: Vec::new(),
            reason: format!("input shape {:?} is not fully known", fact.shape),
        });
    };

    if fact.datum_type != f32::datum_type() {
        return Err(DetectError::UnsupportedInput {
            shape: dims.to_vec(),
            reason: format!("expected f32 input, model wants {:?}", fact.datum_type),
        });
    }

    InputShape::from_dims(dims)
}

impl Classifier for TfliteClassifier {
    fn input_shape(&self) -> InputShape {
        self.shape
    }

    fn classify(&self, input: &Array4<f32>) -> Result<ModelOutput> {
        let expected = self.shape.dims();
        if input.shape() != expected.as_slice() {
            anyhow::bail!(
                "input tensor shape {:?} does not match model input {:?}",
                input.shape(),
                expected
            );
        }

        let data: Vec<f32> = input.iter().copied().collect();
        let tensor = Tensor::from_shape::<f32>(&expected, &data)
            .context("Failed to build input tensor")?;

        let outputs = self
            .plan
            .run(tvec!(tensor.into()))
            .context("Forward pass failed")?;

        let output = outputs
            .first()
            .ok_or_else(|| anyhow!("model produced no outputs"))?;
        let values = output
            .cast_to::<f32>()
            .context("Model output is not numeric")?;

        Ok(ModelOutput::new(
            output.shape().to_vec(),
            values.as_slice::<f32>()?.to_vec(),
        ))
    }
}
