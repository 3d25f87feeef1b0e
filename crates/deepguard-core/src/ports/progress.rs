//! Progress reporting port for UI integration.

use crate::domain::DetectionRecord;

/// Events emitted during inference for progress tracking.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Inference started for an image.
    Started {
        /// File name.
        file: String,
        /// Index in the batch (0-based).
        index: usize,
        /// Total images in batch.
        total: usize,
    },
    /// An image was classified.
    Completed {
        /// The resulting record.
        record: DetectionRecord,
    },
    /// An image could not be classified.
    Failed {
        /// File name.
        file: String,
        /// Reason for the failure.
        reason: String,
    },
    /// All images have been processed.
    Finished {
        /// Images that produced a confidence.
        scored: usize,
        /// Images that failed.
        failed: usize,
    },
}

/// Port for receiving progress events.
pub trait ProgressSink: Send + Sync {
    /// Called when a progress event occurs.
    fn on_event(&self, event: ProgressEvent);
}

/// Progress sink that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_event(&self, _event: ProgressEvent) {}
}
