//! Image preprocessing for the Xception-based classifier.

// Tensor sizes are far below u32::MAX
#![allow(clippy::cast_possible_truncation)]

use anyhow::{ensure, Result};
use image::imageops::{self, FilterType};
use image::DynamicImage;
use ndarray::Array4;

use super::{InputShape, TensorLayout};

/// Maps a `[0, 255]` channel value to `[-1, 1]`.
///
/// Matches the Keras Xception `preprocess_input` ("tf" mode) in `f32`.
#[inline]
#[must_use]
pub fn xception_normalize(value: u8) -> f32 {
    f32::from(value) / 127.5 - 1.0
}

/// Converts a decoded image into a normalised model input tensor.
///
/// The image is converted to RGB, resized (bilinear) to the model's spatial
/// size, normalised with [`xception_normalize`] and laid out with a leading
/// batch axis of 1 in the model's axis order.
///
/// # Errors
///
/// Returns an error if the image has no pixels.
pub fn preprocess(image: &DynamicImage, shape: &InputShape) -> Result<Array4<f32>> {
    ensure!(
        image.width() > 0 && image.height() > 0,
        "image has no pixel data"
    );

    let rgb = image.to_rgb8();
    let resized = imageops::resize(
        &rgb,
        shape.width as u32,
        shape.height as u32,
        FilterType::Triangle,
    );
    let value = |x: usize, y: usize, c: usize| {
        xception_normalize(resized.get_pixel(x as u32, y as u32)[c])
    };

    let tensor = match shape.layout {
        TensorLayout::Nhwc => Array4::from_shape_fn(
            (1, shape.height, shape.width, InputShape::CHANNELS),
            |(_, y, x, c)| value(x, y, c),
        ),
        TensorLayout::Nchw => Array4::from_shape_fn(
            (1, InputShape::CHANNELS, shape.height, shape.width),
            |(_, c, y, x)| value(x, y, c),
        ),
    };
    Ok(tensor)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_normalize_endpoints() {
        assert_eq!(xception_normalize(0), -1.0);
        assert_eq!(xception_normalize(255), 1.0);
        assert!(xception_normalize(128).abs() < 0.01);
    }

    #[test]
    fn test_nhwc_output_shape_and_values() {
        let img = RgbImage::from_pixel(40, 20, Rgb([255, 0, 255]));
        let shape = InputShape::nhwc(8, 6);
        let tensor = preprocess(&DynamicImage::ImageRgb8(img), &shape).unwrap();

        assert_eq!(tensor.shape(), &[1, 8, 6, 3]);
        assert_eq!(tensor[[0, 0, 0, 0]], 1.0);
        assert_eq!(tensor[[0, 0, 0, 1]], -1.0);
        assert_eq!(tensor[[0, 7, 5, 2]], 1.0);
    }

    #[test]
    fn test_nchw_keeps_channel_order() {
        let img = RgbImage::from_pixel(10, 10, Rgb([255, 0, 0]));
        let shape = InputShape::from_dims(&[1, 3, 4, 5]).unwrap();
        let tensor = preprocess(&DynamicImage::ImageRgb8(img), &shape).unwrap();

        assert_eq!(tensor.shape(), &[1, 3, 4, 5]);
        assert_eq!(tensor[[0, 0, 2, 3]], 1.0);
        assert_eq!(tensor[[0, 1, 2, 3]], -1.0);
        assert_eq!(tensor[[0, 2, 2, 3]], -1.0);
    }

    #[test]
    fn test_grayscale_is_expanded_to_rgb() {
        let img = image::GrayImage::from_pixel(4, 4, image::Luma([255]));
        let tensor = preprocess(&DynamicImage::ImageLuma8(img), &InputShape::nhwc(2, 2)).unwrap();
        assert!(tensor.iter().all(|v| *v == 1.0));
    }

    #[test]
    fn test_empty_image_rejected() {
        let img = DynamicImage::new_rgb8(0, 0);
        assert!(preprocess(&img, &InputShape::nhwc(2, 2)).is_err());
    }
}
