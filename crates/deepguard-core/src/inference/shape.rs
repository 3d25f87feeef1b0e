//! Model input shape handling.

use crate::error::DetectError;

/// Axis order of the model's input tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TensorLayout {
    /// `(batch, height, width, channels)`, the TFLite default.
    Nhwc,
    /// `(batch, channels, height, width)`.
    Nchw,
}

/// Input tensor geometry declared by a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputShape {
    /// Target image height.
    pub height: usize,
    /// Target image width.
    pub width: usize,
    /// Axis order.
    pub layout: TensorLayout,
}

impl InputShape {
    /// Number of colour channels fed to the model.
    pub const CHANNELS: usize = 3;

    /// Creates an NHWC shape for the given spatial size.
    #[must_use]
    pub const fn nhwc(height: usize, width: usize) -> Self {
        Self {
            height,
            width,
            layout: TensorLayout::Nhwc,
        }
    }

    /// Interprets the dimensions a model declares for its input.
    ///
    /// Accepts `[1, H, W, 3]` (NHWC) and `[1, 3, H, W]` (NCHW). NHWC wins when
    /// both readings are possible.
    ///
    /// # Errors
    ///
    /// Returns [`DetectError::UnsupportedInput`] for any other shape.
    pub fn from_dims(dims: &[usize]) -> Result<Self, DetectError> {
        let unsupported = |reason: &str| DetectError::UnsupportedInput {
            shape: dims.to_vec(),
            reason: reason.to_string(),
        };

        let [batch, d1, d2, d3] = dims else {
            return Err(unsupported("expected 4 dimensions"));
        };
        if *batch != 1 {
            return Err(unsupported("batch dimension must be 1"));
        }

        let shape = if *d3 == Self::CHANNELS {
            Self::nhwc(*d1, *d2)
        } else if *d1 == Self::CHANNELS {
            Self {
                height: *d2,
                width: *d3,
                layout: TensorLayout::Nchw,
            }
        } else {
            return Err(unsupported("expected 3 colour channels"));
        };

        if shape.height == 0 || shape.width == 0 {
            return Err(unsupported("spatial dimensions must be non-zero"));
        }
        Ok(shape)
    }

    /// Full tensor dimensions including the batch axis.
    #[must_use]
    pub const fn dims(&self) -> [usize; 4] {
        match self.layout {
            TensorLayout::Nhwc => [1, self.height, self.width, Self::CHANNELS],
            TensorLayout::Nchw => [1, Self::CHANNELS, self.height, self.width],
        }
    }
}
