//! Model-facing glue: input shapes, preprocessing and output normalisation.
//!
//! The forward pass itself is delegated to a [`Classifier`](crate::ports::Classifier)
//! implementation.

mod output;
mod preprocess;
mod shape;

pub use output::ModelOutput;
pub use preprocess::{preprocess, xception_normalize};
pub use shape::{InputShape, TensorLayout};
