//! Model file discovery.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name of the detector model.
pub const DEFAULT_MODEL_FILE: &str = "deepfake_detector.tflite";

/// Model extension recognised by [`list_models`].
const MODEL_EXTENSION: &str = "tflite";

/// Returns the models directory path.
///
/// Uses `XDG_DATA_HOME/deepguard/models` or `~/.local/share/deepguard/models`.
#[must_use]
pub fn models_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("deepguard")
        .join("models")
}

/// Picks the model file to load.
///
/// An explicit path always wins. Otherwise `./models/deepfake_detector.tflite`
/// is used when it exists, then the same file in [`models_dir`].
#[must_use]
pub fn resolve_model_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }

    let local = Path::new("models").join(DEFAULT_MODEL_FILE);
    if local.is_file() {
        debug!("Using model from working directory: {}", local.display());
        return local;
    }

    models_dir().join(DEFAULT_MODEL_FILE)
}

/// Lists installed `.tflite` models, sorted by name.
///
/// A missing models directory yields an empty list.
///
/// # Errors
///
/// Returns an error if the directory exists but cannot be read.
pub fn list_models() -> Result<Vec<PathBuf>> {
    list_models_in(&models_dir())
}

fn list_models_in(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut models: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("Failed to read models directory {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case(MODEL_EXTENSION))
        })
        .collect();
    models.sort();
    Ok(models)
}
