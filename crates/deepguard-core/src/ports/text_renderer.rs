//! Text rendering capability used for image headers.

use image::{Rgb, RgbImage};

/// Draws single lines of text onto RGB images.
///
/// Implementations decide the font; callers only measure and place text.
pub trait TextRenderer {
    /// Width and height in pixels of `text` when drawn.
    fn text_size(&self, text: &str) -> (u32, u32);

    /// Draws `text` with its top-left corner at `(x, y)`, clipped to the canvas.
    fn draw_text(&self, canvas: &mut RgbImage, x: i32, y: i32, text: &str, color: Rgb<u8>);

    /// Short description of the font in use.
    fn describe(&self) -> String;
}
