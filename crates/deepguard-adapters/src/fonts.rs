//! TrueType text rendering and the font fallback chain.

use ab_glyph::{FontVec, PxScale};
use anyhow::{anyhow, Context, Result};
use deepguard_core::TextRenderer;
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::builtin_font::BitmapTextRenderer;

/// Default font file tried first.
pub const DEFAULT_FONT_PATH: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf";

/// Font file name looked up in the search directories.
pub const DEFAULT_FONT_NAME: &str = "DejaVuSans-Bold.ttf";

/// Default text height in pixels.
pub const DEFAULT_FONT_SIZE: f32 = 18.0;

/// Where to look for the header font.
#[derive(Debug, Clone, PartialEq)]
pub struct FontConfig {
    /// Font file tried first.
    pub path: PathBuf,
    /// File name searched in the working directory and the font directories.
    pub name: String,
    /// Text height in pixels.
    pub size: f32,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_FONT_PATH),
            name: DEFAULT_FONT_NAME.to_string(),
            size: DEFAULT_FONT_SIZE,
        }
    }
}

/// Renders text with a TrueType/OpenType font.
pub struct GlyphTextRenderer {
    font: FontVec,
    scale: PxScale,
    source: PathBuf,
}

impl std::fmt::Debug for GlyphTextRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlyphTextRenderer")
            .field("source", &self.source)
            .field("scale", &self.scale)
            .finish_non_exhaustive()
    }
}

impl GlyphTextRenderer {
    /// Loads a font file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: &Path, size: f32) -> Result<Self> {
        let data =
            std::fs::read(path).with_context(|| format!("Failed to read font {}", path.display()))?;
        let font = FontVec::try_from_vec(data)
            .map_err(|_| anyhow!("Failed to parse font file: {}", path.display()))?;
        Ok(Self {
            font,
            scale: PxScale::from(size),
            source: path.to_path_buf(),
        })
    }
}

impl TextRenderer for GlyphTextRenderer {
    fn text_size(&self, text: &str) -> (u32, u32) {
        text_size(self.scale, &self.font, text)
    }

    fn draw_text(&self, canvas: &mut RgbImage, x: i32, y: i32, text: &str, color: Rgb<u8>) {
        draw_text_mut(canvas, color, x, y, self.scale, &self.font, text);
    }

    fn describe(&self) -> String {
        format!("font {}", self.source.display())
    }
}

/// Directories searched for [`FontConfig::name`], in order.
#[must_use]
pub fn font_search_dirs() -> Vec<PathBuf> {
    let mut dirs_list = vec![PathBuf::from(".")];
    if let Some(dir) = dirs::font_dir() {
        dirs_list.push(dir);
    }
    if let Some(dir) = dirs::data_dir() {
        dirs_list.push(dir.join("deepguard").join("fonts"));
    }
    dirs_list
}

/// Builds the header text renderer.
///
/// Tries the configured path, then the configured name in each of
/// [`font_search_dirs`], and falls back to the built-in bitmap font.
#[must_use]
pub fn load_text_renderer(config: &FontConfig) -> Box<dyn TextRenderer> {
    let candidates = std::iter::once(config.path.clone())
        .chain(font_search_dirs().into_iter().map(|d| d.join(&config.name)));

    for candidate in candidates {
        if !candidate.is_file() {
            debug!("Font not found at {}", candidate.display());
            continue;
        }
        match GlyphTextRenderer::from_path(&candidate, config.size) {
            Ok(renderer) => {
                info!("Loaded font: {}", candidate.display());
                return Box::new(renderer);
            }
            Err(e) => warn!("{e:#}"),
        }
    }

    warn!("No usable font found, using built-in bitmap font");
    Box::new(BitmapTextRenderer::new(config.size))
}
