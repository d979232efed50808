//! Render primitives recorded by a [`Scene`](crate::Scene).

use glam::Vec2;
use trellis_core::{Bounds, Color, ImageId};

/// A render command representing something to draw.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// Draw a filled rectangle
    Rect(RectPrimitive),
    /// Draw a line of text
    Text(TextPrimitive),
    /// Draw an image scaled to a rectangle
    Image(ImagePrimitive),
    /// Additively brighten a rectangle
    BlendAdd(RectPrimitive),
}

impl RenderCommand {
    /// The area touched by this command, if known.
    pub fn bounds(&self) -> Option<Bounds> {
        match self {
            RenderCommand::Rect(rect) | RenderCommand::BlendAdd(rect) => Some(rect.bounds),
            RenderCommand::Image(image) => Some(image.bounds),
            RenderCommand::Text(_) => None,
        }
    }
}

/// A solid rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct RectPrimitive {
    pub bounds: Bounds,
    pub color: Color,
}

/// A single line of text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPrimitive {
    pub origin: Vec2,
    pub text: String,
    pub font_size: f32,
    pub color: Color,
}

/// An image blit.
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePrimitive {
    pub image: ImageId,
    pub bounds: Bounds,
}
