//! Batch inference over an image source.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::DetectionConfig;
use crate::domain::{DetectionRecord, InferenceResults, Prediction};
use crate::error::DetectError;
use crate::inference::{preprocess, InputShape};
use crate::ports::{Classifier, ImageEntry, ImageSource, ProgressEvent, ProgressSink};

/// Runs the classifier over every allow-listed image of a source.
#[derive(Debug, Clone, Default)]
pub struct Detector {
    config: DetectionConfig,
}

impl Detector {
    /// Creates a detector with the given configuration.
    #[must_use]
    pub const fn new(config: DetectionConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration in use.
    #[must_use]
    pub const fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Lists the allow-listed images of `source` in file name order.
    ///
    /// # Errors
    ///
    /// Returns [`DetectError::Source`] if the source cannot be listed and
    /// [`DetectError::NoImages`] if nothing matches the allow-list.
    pub fn catalog(&self, source: &dyn ImageSource) -> Result<Vec<ImageEntry>, DetectError> {
        let entries = sorted_entries(source, &self.config)?;
        if entries.is_empty() {
            return Err(DetectError::NoImages {
                folder: PathBuf::from(source.describe()),
            });
        }
        debug!("Found {} images in {}", entries.len(), source.describe());
        Ok(entries)
    }

    /// Classifies `entries` one at a time.
    ///
    /// A failure on one entry is recorded as [`Prediction::Failed`] for that
    /// entry and never stops the remaining ones.
    pub fn run(
        &self,
        source: &dyn ImageSource,
        entries: &[ImageEntry],
        classifier: &dyn Classifier,
        progress: &dyn ProgressSink,
    ) -> InferenceResults {
        let shape = classifier.input_shape();
        let total = entries.len();
        let mut results = InferenceResults::new();

        for (index, entry) in entries.iter().enumerate() {
            progress.on_event(ProgressEvent::Started {
                file: entry.name.clone(),
                index,
                total,
            });

            let prediction = match classify_entry(source, entry, &shape, classifier) {
                Ok(prediction) => {
                    progress.on_event(ProgressEvent::Completed {
                        record: DetectionRecord::new(&entry.name, &prediction, &self.config),
                    });
                    prediction
                }
                Err(e) => {
                    let reason = match &e {
                        DetectError::Inference { source, .. } => format!("{source:#}"),
                        other => other.to_string(),
                    };
                    warn!("{e}: {reason}");
                    progress.on_event(ProgressEvent::Failed {
                        file: entry.name.clone(),
                        reason: reason.clone(),
                    });
                    Prediction::failed(reason)
                }
            };

            results.insert(entry.name.clone(), prediction);
        }

        let (scored, failed) = (results.scored_count(), results.failed_count());
        info!("Classified {scored} images, {failed} failed");
        progress.on_event(ProgressEvent::Finished { scored, failed });
        results
    }

    /// Lists `source` and classifies every image in it.
    ///
    /// # Errors
    ///
    /// Returns an error only for whole-run failures (see [`Self::catalog`]).
    pub fn detect(
        &self,
        source: &dyn ImageSource,
        classifier: &dyn Classifier,
        progress: &dyn ProgressSink,
    ) -> Result<InferenceResults, DetectError> {
        let entries = self.catalog(source)?;
        Ok(self.run(source, &entries, classifier, progress))
    }
}

/// Lists the entries of `source` that pass the allow-list, sorted by name.
pub(crate) fn sorted_entries(
    source: &dyn ImageSource,
    config: &DetectionConfig,
) -> Result<Vec<ImageEntry>, DetectError> {
    let mut entries = source.entries().map_err(DetectError::Source)?;
    entries.retain(|entry| config.accepts(Path::new(&entry.name)));
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

fn classify_entry(
    source: &dyn ImageSource,
    entry: &ImageEntry,
    shape: &InputShape,
    classifier: &dyn Classifier,
) -> Result<Prediction, DetectError> {
    let attempt = || -> anyhow::Result<Prediction> {
        let image = source.load(entry)?;
        let input = preprocess(&image, shape)?;
        classifier.classify(&input)?.into_prediction()
    };
    attempt().map_err(|source| DetectError::Inference {
        file: entry.name.clone(),
        source,
    })
}
