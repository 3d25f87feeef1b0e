//! Synthetic images and image folders for testing.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::{DynamicImage, Rgb, RgbImage};

/// Builder for creating synthetic test images and folders.
pub struct SyntheticImageBuilder;

impl SyntheticImageBuilder {
    /// Creates an image filled with one colour.
    #[must_use]
    pub fn rgb_uniform(width: u32, height: u32, r: u8, g: u8, b: u8) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([r, g, b])))
    }

    /// Creates a mid-grey image.
    #[must_use]
    pub fn uniform_gray(width: u32, height: u32, value: u8) -> DynamicImage {
        Self::rgb_uniform(width, height, value, value, value)
    }

    /// Creates a left-to-right gradient from black to white in every channel.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn horizontal_gradient(width: u32, height: u32) -> DynamicImage {
        let span = width.saturating_sub(1).max(1);
        let img = RgbImage::from_fn(width, height, |x, _| {
            let v = (x * 255 / span) as u8;
            Rgb([v, v, v])
        });
        DynamicImage::ImageRgb8(img)
    }

    /// Creates an image whose red, green and blue channels differ per pixel.
    ///
    /// Useful to catch channel order mistakes.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn channel_ramp(width: u32, height: u32) -> DynamicImage {
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 255 - (x % 256) as u8])
        });
        DynamicImage::ImageRgb8(img)
    }

    /// Creates a black and white checkerboard.
    #[must_use]
    pub fn checkerboard(width: u32, height: u32, cell: u32) -> DynamicImage {
        let cell = cell.max(1);
        let img = RgbImage::from_fn(width, height, |x, y| {
            if ((x / cell) + (y / cell)) % 2 == 0 {
                Rgb([0, 0, 0])
            } else {
                Rgb([255, 255, 255])
            }
        });
        DynamicImage::ImageRgb8(img)
    }

    /// Writes `images` into `dir`, encoding each by its file extension.
    ///
    /// # Errors
    ///
    /// Returns an error if any image cannot be written.
    pub fn write_folder(dir: &Path, images: &[(&str, DynamicImage)]) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        images
            .iter()
            .map(|(name, image)| {
                let path = dir.join(name);
                image
                    .save(&path)
                    .with_context(|| format!("writing {}", path.display()))?;
                Ok(path)
            })
            .collect()
    }

    /// Writes a file with an image extension but undecodable content.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write_corrupt(dir: &Path, name: &str) -> Result<PathBuf> {
        let path = dir.join(name);
        fs::write(&path, b"\xff\xd8\xff\xe0 definitely not a jpeg")
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(path)
    }
}
