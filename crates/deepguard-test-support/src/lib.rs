//! Test support utilities for deepguard.
//!
//! Provides mocks of every port and synthetic image builders for testing the
//! detection and annotation stages without a model file or host fonts.
//!
//! # Example
//!
//! ```
//! use deepguard_test_support::{MockImageSource, StubClassifier, SyntheticImageBuilder};
//!
//! let source = MockImageSource::new(vec![
//!     ("a.jpg", SyntheticImageBuilder::uniform_gray(8, 8, 128)),
//!     ("b.png", SyntheticImageBuilder::checkerboard(8, 8, 2)),
//! ]);
//! let classifier = StubClassifier::new(&[0.1, 0.9]);
//! ```

mod builders;
mod mocks;

pub use builders::SyntheticImageBuilder;
pub use mocks::{
    DrawCall, MockAnnotationSink, MockImageSource, MockProgressSink, RecordingRenderer,
    StubClassifier,
};
