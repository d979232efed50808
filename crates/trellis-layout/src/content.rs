//! Leaf content carried by layout nodes.
//!
//! A node is a frame by default. Text, images and progress bars add an
//! intrinsic size that feeds the sizing passes; buttons only change how the
//! node reacts to the pointer and how it is drawn.

use std::rc::Rc;

use glam::Vec2;
use trellis_core::{Color, ConfigError, ImageId, SizePolicy};

use crate::text::{measure_text, widest_word, wrap_text, FontMetrics, WrappedLine};

/// Intrinsic size of a node's content, padding excluded.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ContentSize {
    /// Smallest size the content can be squeezed to
    pub min: Vec2,
    /// Size the content would like to have
    pub preferred: Vec2,
}

/// What a node displays.
#[derive(Debug, Clone)]
pub enum NodeContent {
    /// Plain container
    Frame,
    Text(TextContent),
    Image(ImageContent),
    /// Interactive container with hover and press highlights
    Button,
    ProgressBar(ProgressBar),
}

impl NodeContent {
    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            NodeContent::Frame => "frame",
            NodeContent::Text(_) => "text",
            NodeContent::Image(_) => "image",
            NodeContent::Button => "button",
            NodeContent::ProgressBar(_) => "progress bar",
        }
    }

    /// Intrinsic size given the node's policies on each axis.
    pub fn compute_min_size(&self, width: SizePolicy, height: SizePolicy) -> ContentSize {
        match self {
            NodeContent::Text(text) => text.content_size(),
            NodeContent::Image(image) => image.content_size(width, height),
            _ => ContentSize::default(),
        }
    }

    /// Called once the inner width is known. Returns the height the content
    /// needs at that width, or `None` if width does not affect height.
    pub fn on_width_resolved(&mut self, inner_width: f32) -> Option<f32> {
        match self {
            NodeContent::Text(text) => Some(text.wrap(inner_width)),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextContent> {
        match self {
            NodeContent::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageContent> {
        match self {
            NodeContent::Image(image) => Some(image),
            _ => None,
        }
    }

    pub fn as_progress_bar(&self) -> Option<&ProgressBar> {
        match self {
            NodeContent::ProgressBar(bar) => Some(bar),
            _ => None,
        }
    }
}

/// A run of wrapped text.
#[derive(Debug, Clone)]
pub struct TextContent {
    text: String,
    font_size: f32,
    color: Color,
    metrics: Rc<dyn FontMetrics>,
    lines: Vec<WrappedLine>,
    unwrapped: Vec2,
    widest_word: f32,
}

impl TextContent {
    pub fn new(
        text: impl Into<String>,
        font_size: f32,
        color: Color,
        metrics: Rc<dyn FontMetrics>,
    ) -> Result<Self, ConfigError> {
        if !font_size.is_finite() || font_size <= 0.0 {
            return Err(ConfigError::InvalidFontSize { size: font_size });
        }

        let mut content = Self {
            text: String::new(),
            font_size,
            color,
            metrics,
            lines: Vec::new(),
            unwrapped: Vec2::ZERO,
            widest_word: 0.0,
        };
        content.set_text(text);
        Ok(content)
    }

    /// Replace the text and re-measure it. Wrapping is redone on the next resolve.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        let measured = measure_text(&self.text, self.font_size, None, self.metrics.as_ref());
        self.unwrapped = Vec2::new(measured.width, measured.height);
        self.widest_word = widest_word(&self.text, self.font_size, self.metrics.as_ref());
        self.lines = wrap_text(&self.text, self.font_size, None, self.metrics.as_ref());
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn line_height(&self) -> f32 {
        self.metrics.line_height(self.font_size)
    }

    /// Lines produced by the most recent wrap.
    pub fn lines(&self) -> &[WrappedLine] {
        &self.lines
    }

    /// Narrowest width is the widest word; preferred is the text on one line.
    pub fn content_size(&self) -> ContentSize {
        ContentSize {
            min: Vec2::new(self.widest_word, self.line_height()),
            preferred: self.unwrapped,
        }
    }

    /// Wrap at `width` and return the resulting height.
    pub fn wrap(&mut self, width: f32) -> f32 {
        self.lines = wrap_text(
            &self.text,
            self.font_size,
            Some(width.max(0.0)),
            self.metrics.as_ref(),
        );
        self.lines.len().max(1) as f32 * self.line_height()
    }
}

/// An image with a fixed aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageContent {
    image: ImageId,
    pixel_size: Vec2,
}

impl ImageContent {
    /// Both dimensions must be finite and positive so the aspect ratio exists.
    pub fn new(image: ImageId, width: f32, height: f32) -> Result<Self, ConfigError> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !valid(width) || !valid(height) {
            return Err(ConfigError::InvalidImageSize { width, height });
        }
        Ok(Self {
            image,
            pixel_size: Vec2::new(width, height),
        })
    }

    pub fn image(&self) -> ImageId {
        self.image
    }

    pub fn pixel_size(&self) -> Vec2 {
        self.pixel_size
    }

    /// Width divided by height.
    pub fn aspect_ratio(&self) -> f32 {
        self.pixel_size.x / self.pixel_size.y
    }

    /// Images only prefer their pixel size when neither axis is constrained.
    /// Otherwise the free axis is derived from the other one.
    pub fn content_size(&self, width: SizePolicy, height: SizePolicy) -> ContentSize {
        let preferred = if width.is_fit() && height.is_fit() {
            self.pixel_size
        } else {
            Vec2::ZERO
        };
        ContentSize {
            min: Vec2::ZERO,
            preferred,
        }
    }
}

/// A horizontal bar filled from the left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressBar {
    color: Color,
    fill: f32,
}

impl ProgressBar {
    pub fn new(color: Color, fill: f32) -> Self {
        let mut bar = Self { color, fill: 0.0 };
        bar.set_fill(fill);
        bar
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn fill(&self) -> f32 {
        self.fill
    }

    /// Set the filled fraction, clamped to `0.0..=1.0`.
    pub fn set_fill(&mut self, fill: f32) {
        self.fill = if fill.is_nan() { 0.0 } else { fill.clamp(0.0, 1.0) };
    }
}
