//! A display list that records draw calls instead of rasterizing them.

use glam::Vec2;
use trellis_core::{Bounds, Color, ImageId, Surface};

use crate::primitives::{ImagePrimitive, RectPrimitive, RenderCommand, TextPrimitive};

/// Recorded draw calls for one frame.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub commands: Vec<RenderCommand>,
    pub width: f32,
    pub height: f32,
}

impl Scene {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            commands: Vec::new(),
            width,
            height,
        }
    }

    pub fn push(&mut self, command: RenderCommand) {
        self.commands.push(command);
    }

    /// Drop all recorded commands, keeping the allocation.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Text runs in draw order.
    pub fn texts(&self) -> impl Iterator<Item = &TextPrimitive> {
        self.commands.iter().filter_map(|command| match command {
            RenderCommand::Text(text) => Some(text),
            _ => None,
        })
    }

    /// Solid rectangles in draw order.
    pub fn rects(&self) -> impl Iterator<Item = &RectPrimitive> {
        self.commands.iter().filter_map(|command| match command {
            RenderCommand::Rect(rect) => Some(rect),
            _ => None,
        })
    }

    /// Bounding box of every command with a known area.
    pub fn content_bounds(&self) -> Option<Bounds> {
        self.commands
            .iter()
            .filter_map(RenderCommand::bounds)
            .reduce(|acc, bounds| acc.union(&bounds))
    }
}

impl Surface for Scene {
    fn fill_rect(&mut self, bounds: Bounds, color: Color) {
        self.push(RenderCommand::Rect(RectPrimitive { bounds, color }));
    }

    fn draw_text(&mut self, origin: Vec2, text: &str, font_size: f32, color: Color) {
        self.push(RenderCommand::Text(TextPrimitive {
            origin,
            text: text.to_string(),
            font_size,
            color,
        }));
    }

    fn draw_image(&mut self, image: ImageId, bounds: Bounds) {
        self.push(RenderCommand::Image(ImagePrimitive { image, bounds }));
    }

    fn blend_add(&mut self, bounds: Bounds, color: Color) {
        self.push(RenderCommand::BlendAdd(RectPrimitive { bounds, color }));
    }
}
