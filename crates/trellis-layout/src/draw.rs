//! Drawing through a host [`Surface`].

use glam::Vec2;
use trellis_core::{Bounds, Color, Surface};

use crate::content::NodeContent;
use crate::tree::{LayoutNode, LayoutNodeId, LayoutTree};

/// Added on top of a hovered button, and once more while it is pressed.
const HIGHLIGHT: Color = Color::rgb(20.0 / 255.0, 20.0 / 255.0, 20.0 / 255.0);

impl LayoutTree {
    /// Draw every visible node: background, own content, children, overlay.
    pub fn draw(&self, surface: &mut dyn Surface) {
        self.draw_node(LayoutNodeId::ROOT, surface);
    }

    fn draw_node(&self, id: LayoutNodeId, surface: &mut dyn Surface) {
        let node = &self.nodes[id.index()];
        if !node.visible {
            return;
        }

        let bounds = node.bounds();
        if node.style.background.is_visible() {
            surface.fill_rect(bounds, node.style.background);
        }
        draw_self(node, surface);

        for &child in &node.children {
            self.draw_node(child, surface);
        }

        draw_overlay(node, surface);
    }
}

fn draw_self(node: &LayoutNode, surface: &mut dyn Surface) {
    let inner = node.inner_bounds();

    match &node.content {
        NodeContent::Text(text) => {
            let line_height = text.line_height();
            for (i, line) in text.lines().iter().enumerate() {
                if line.text.is_empty() {
                    continue;
                }
                let origin = Vec2::new(inner.x, inner.y + i as f32 * line_height);
                surface.draw_text(origin, &line.text, text.font_size(), text.color());
            }
        }
        NodeContent::Image(image) => surface.draw_image(image.image(), inner),
        NodeContent::ProgressBar(bar) => {
            if bar.fill() > 0.0 {
                let filled = Bounds::new(inner.x, inner.y, inner.width * bar.fill(), inner.height);
                surface.fill_rect(filled, bar.color());
            }
        }
        NodeContent::Frame | NodeContent::Button => {}
    }
}

fn draw_overlay(node: &LayoutNode, surface: &mut dyn Surface) {
    if !matches!(node.content, NodeContent::Button) {
        return;
    }
    let bounds = node.bounds();
    if node.interaction.hovered {
        surface.blend_add(bounds, HIGHLIGHT);
    }
    if node.interaction.clicked {
        surface.blend_add(bounds, HIGHLIGHT);
    }
}
