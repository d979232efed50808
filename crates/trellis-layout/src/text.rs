//! Text measurement and word wrapping.
//!
//! Glyph metrics belong to the host's font provider; this module only needs
//! two numbers from it (run width and line height) and does the greedy word
//! wrapping itself so the solver can feed wrapped height back into layout.

use std::fmt;

/// Source of glyph metrics for a font.
pub trait FontMetrics: fmt::Debug {
    /// Width of `text` laid out on a single line.
    fn text_width(&self, text: &str, font_size: f32) -> f32;

    /// Distance between consecutive baselines.
    fn line_height(&self, font_size: f32) -> f32;
}

/// Character-count based estimate for when no real font is available.
///
/// Average glyph width is roughly 0.5-0.6 of the font size for proportional
/// fonts, so the defaults are a reasonable stand-in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMetrics {
    /// Glyph advance as a fraction of font size
    pub char_width: f32,
    /// Line height as a multiplier (e.g., 1.5 = 150%)
    pub line_height: f32,
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self {
            char_width: 0.55,
            line_height: 1.2,
        }
    }
}

impl FontMetrics for MonospaceMetrics {
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        text.chars().count() as f32 * self.char_width * font_size
    }

    fn line_height(&self, font_size: f32) -> f32 {
        self.line_height * font_size
    }
}

/// Measured text metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextMetrics {
    /// Width of the widest line
    pub width: f32,
    /// Height of all lines
    pub height: f32,
    /// Number of lines
    pub lines: u32,
}

/// One line of wrapped text.
#[derive(Debug, Clone, PartialEq)]
pub struct WrappedLine {
    pub text: String,
    pub width: f32,
}

/// Break `text` into lines no wider than `max_width`.
///
/// Words are separated by spaces and never split, so a single word wider
/// than `max_width` gets a line of its own. Explicit `\n` always breaks.
/// `None` disables wrapping.
pub fn wrap_text(
    text: &str,
    font_size: f32,
    max_width: Option<f32>,
    metrics: &dyn FontMetrics,
) -> Vec<WrappedLine> {
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let Some(max_width) = max_width else {
            lines.push(WrappedLine {
                text: paragraph.to_string(),
                width: metrics.text_width(paragraph, font_size),
            });
            continue;
        };

        let mut current = String::new();
        let mut current_width = 0.0;

        for word in paragraph.split(' ').filter(|w| !w.is_empty()) {
            if current.is_empty() {
                current.push_str(word);
                current_width = metrics.text_width(&current, font_size);
                continue;
            }

            let candidate = format!("{current} {word}");
            let candidate_width = metrics.text_width(&candidate, font_size);
            if candidate_width <= max_width {
                current = candidate;
                current_width = candidate_width;
            } else {
                lines.push(WrappedLine {
                    text: std::mem::take(&mut current),
                    width: current_width,
                });
                current.push_str(word);
                current_width = metrics.text_width(&current, font_size);
            }
        }

        lines.push(WrappedLine {
            text: current,
            width: current_width,
        });
    }

    lines
}

/// Measure text, optionally wrapped at `max_width`.
pub fn measure_text(
    text: &str,
    font_size: f32,
    max_width: Option<f32>,
    metrics: &dyn FontMetrics,
) -> TextMetrics {
    let lines = wrap_text(text, font_size, max_width, metrics);
    let line_count = lines.len().max(1) as u32;

    TextMetrics {
        width: lines.iter().map(|l| l.width).fold(0.0, f32::max),
        height: line_count as f32 * metrics.line_height(font_size),
        lines: line_count,
    }
}

/// Width of the widest single word, the narrowest text can wrap to.
pub fn widest_word(text: &str, font_size: f32, metrics: &dyn FontMetrics) -> f32 {
    text.split(|c: char| c == ' ' || c == '\n')
        .filter(|w| !w.is_empty())
        .map(|w| metrics.text_width(w, font_size))
        .fold(0.0, f32::max)
}
