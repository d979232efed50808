//! The boundary between the layout engine and the host renderer.

use glam::Vec2;

use crate::types::{Bounds, Color, ImageId};

/// An opaque 2D drawing target.
///
/// The layout engine never rasterizes anything itself; it computes geometry
/// and asks the surface to draw rectangles, text runs, and images at
/// absolute positions.
pub trait Surface {
    /// Fill a rectangle with a solid color (alpha blended).
    fn fill_rect(&mut self, bounds: Bounds, color: Color);

    /// Draw a single line of text with its top-left corner at `origin`.
    fn draw_text(&mut self, origin: Vec2, text: &str, font_size: f32, color: Color);

    /// Draw an image scaled to `bounds`.
    fn draw_image(&mut self, image: ImageId, bounds: Bounds);

    /// Additively brighten a rectangle, used for hover and press highlights.
    fn blend_add(&mut self, bounds: Bounds, color: Color);
}
