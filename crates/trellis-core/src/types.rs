//! Core value types shared by the layout engine and renderers.

use glam::Vec2;

use crate::errors::ConfigError;

/// A color value.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create from 8-bit RGB values.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: 1.0,
        }
    }

    /// Create from hex string (e.g., "#FF5733" or "FF573380").
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            6 => Some(Self::from_rgb8(channel(0)?, channel(2)?, channel(4)?)),
            8 => {
                let mut color = Self::from_rgb8(channel(0)?, channel(2)?, channel(4)?);
                color.a = channel(6)? as f32 / 255.0;
                Some(color)
            }
            _ => None,
        }
    }

    /// Whether drawing this color changes anything.
    pub fn is_visible(&self) -> bool {
        self.a > 0.0
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::TRANSPARENT
    }
}

/// Axis-aligned rectangle in absolute coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    /// Create bounds with position and size.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Create bounds from position and size vectors.
    pub fn from_vecs(position: Vec2, size: Vec2) -> Self {
        Self::new(position.x, position.y, size.x, size.y)
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Get the right edge (x + width).
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Get the bottom edge (y + height).
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Check if a point is inside the bounds.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    /// Compute intersection with another bounds.
    pub fn intersect(&self, other: &Bounds) -> Option<Bounds> {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = self.right().min(other.right());
        let y2 = self.bottom().min(other.bottom());

        if x1 < x2 && y1 < y2 {
            Some(Bounds::new(x1, y1, x2 - x1, y2 - y1))
        } else {
            None
        }
    }

    /// Compute union (bounding box) with another bounds.
    pub fn union(&self, other: &Bounds) -> Bounds {
        let x1 = self.x.min(other.x);
        let y1 = self.y.min(other.y);
        let x2 = self.right().max(other.right());
        let y2 = self.bottom().max(other.bottom());
        Bounds::new(x1, y1, x2 - x1, y2 - y1)
    }

    /// Shrink the bounds by padding on each side.
    pub fn inset(&self, padding: &Padding) -> Bounds {
        Bounds::new(
            self.x + padding.left,
            self.y + padding.top,
            (self.width - padding.horizontal()).max(0.0),
            (self.height - padding.vertical()).max(0.0),
        )
    }
}

/// One of the two layout axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub const BOTH: [Axis; 2] = [Axis::X, Axis::Y];

    /// Component index into a `Vec2`.
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
        }
    }

    pub fn cross(self) -> Axis {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::X => f.write_str("width"),
            Axis::Y => f.write_str("height"),
        }
    }
}

/// How a node arranges its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    #[default]
    LeftToRight,
    TopToBottom,
}

impl Direction {
    /// The axis children are stacked along.
    pub fn main_axis(self) -> Axis {
        match self {
            Direction::LeftToRight => Axis::X,
            Direction::TopToBottom => Axis::Y,
        }
    }
}

/// Placement of children within leftover space on one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Align {
    /// Left or top
    #[default]
    Start,
    Center,
    /// Right or bottom
    End,
}

impl Align {
    /// Offset into `leftover` space for this alignment.
    pub fn offset(self, leftover: f32) -> f32 {
        match self {
            Align::Start => 0.0,
            Align::Center => leftover / 2.0,
            Align::End => leftover,
        }
    }
}

/// Padding on all sides.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Padding {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Padding {
    pub fn new(left: f32, right: f32, top: f32, bottom: f32) -> Self {
        Self { left, right, top, bottom }
    }

    /// Create uniform padding.
    pub fn uniform(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    /// Create symmetric padding.
    pub fn symmetric(horizontal: f32, vertical: f32) -> Self {
        Self::new(horizontal, horizontal, vertical, vertical)
    }

    /// Total horizontal padding.
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    /// Total vertical padding.
    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }

    /// Total padding along an axis.
    pub fn along(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.horizontal(),
            Axis::Y => self.vertical(),
        }
    }

    /// Leading padding (left or top) on an axis.
    pub fn start(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.left,
            Axis::Y => self.top,
        }
    }

    /// Reject negative or non-finite sides.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sides = [self.left, self.right, self.top, self.bottom];
        if sides.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(ConfigError::InvalidPadding { padding: *self });
        }
        Ok(())
    }
}

/// Sizing policy for one axis of a node.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SizePolicy {
    /// Exact size in pixels.
    Fixed(f32),
    /// Shrink to content, bounded by `min` and `max`.
    Fit { min: f32, max: f32 },
    /// Take leftover space in proportion to `weight`, bounded by `min` and `max`.
    Grow { weight: f32, min: f32, max: f32 },
}

impl Default for SizePolicy {
    fn default() -> Self {
        Self::fit()
    }
}

impl From<f32> for SizePolicy {
    fn from(value: f32) -> Self {
        Self::Fixed(value)
    }
}

impl SizePolicy {
    pub fn fixed(value: f32) -> Self {
        Self::Fixed(value)
    }

    pub fn fit() -> Self {
        Self::Fit { min: 0.0, max: f32::INFINITY }
    }

    pub fn grow() -> Self {
        Self::grow_weighted(1.0)
    }

    pub fn grow_weighted(weight: f32) -> Self {
        Self::Grow { weight, min: 0.0, max: f32::INFINITY }
    }

    /// Set the lower bound. Has no effect on `Fixed`.
    pub fn with_min(mut self, value: f32) -> Self {
        match &mut self {
            Self::Fixed(_) => {}
            Self::Fit { min, .. } | Self::Grow { min, .. } => *min = value,
        }
        self
    }

    /// Set the upper bound. Has no effect on `Fixed`.
    pub fn with_max(mut self, value: f32) -> Self {
        match &mut self {
            Self::Fixed(_) => {}
            Self::Fit { max, .. } | Self::Grow { max, .. } => *max = value,
        }
        self
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self, Self::Fixed(_))
    }

    pub fn is_fit(&self) -> bool {
        matches!(self, Self::Fit { .. })
    }

    pub fn is_grow(&self) -> bool {
        matches!(self, Self::Grow { .. })
    }

    /// Growth weight, or `None` for non-growing policies.
    pub fn weight(&self) -> Option<f32> {
        match self {
            Self::Grow { weight, .. } => Some(*weight),
            _ => None,
        }
    }

    /// The `(min, max)` range a resolved size must fall into.
    ///
    /// Malformed ranges are repaired rather than rejected here so the solver
    /// never sees `max < min` or a negative bound.
    pub fn bounds(&self) -> (f32, f32) {
        let (min, max) = match *self {
            Self::Fixed(value) => (value, value),
            Self::Fit { min, max } | Self::Grow { min, max, .. } => (min, max),
        };
        let min = if min.is_finite() { min.max(0.0) } else { 0.0 };
        let max = if max.is_nan() { f32::INFINITY } else { max.max(min) };
        (min, max)
    }

    /// Reject policies that cannot produce sensible geometry.
    pub fn validate(&self, axis: Axis) -> Result<(), ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidSizePolicy {
            axis,
            policy: *self,
            reason: reason.to_string(),
        };
        match *self {
            Self::Fixed(value) => {
                if !value.is_finite() || value < 0.0 {
                    return Err(invalid("fixed size must be finite and non-negative"));
                }
            }
            Self::Fit { min, max } | Self::Grow { min, max, .. } => {
                if !min.is_finite() || min < 0.0 {
                    return Err(invalid("min must be finite and non-negative"));
                }
                if max.is_nan() {
                    return Err(invalid("max must not be NaN"));
                }
                if min > max {
                    return Err(invalid("min is greater than max"));
                }
            }
        }
        if let Self::Grow { weight, .. } = *self {
            if !weight.is_finite() || weight <= 0.0 {
                return Err(invalid("grow weight must be finite and positive"));
            }
        }
        Ok(())
    }
}

/// Clamp `value` into `[min, max]` without panicking on inverted ranges.
///
/// `max < min` collapses to `min`, and the result is never negative.
pub fn clamp_size(value: f32, min: f32, max: f32) -> f32 {
    let min = min.max(0.0);
    let max = max.max(min);
    if value.is_nan() {
        return min;
    }
    value.max(min).min(max)
}

/// Opaque handle to an image owned by the host's resource provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageId(pub u32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_from_hex() {
        let c = Color::from_hex("#FF8000").unwrap();
        assert!((c.r - 1.0).abs() < 0.001);
        assert!((c.g - 128.0 / 255.0).abs() < 0.001);
        assert!(c.b.abs() < 0.001);
        assert!((c.a - 1.0).abs() < 0.001);

        let c = Color::from_hex("00000080").unwrap();
        assert!((c.a - 128.0 / 255.0).abs() < 0.001);

        assert!(Color::from_hex("#12345").is_none());
        assert!(Color::from_hex("zzzzzz").is_none());
    }

    #[test]
    fn test_bounds_contains() {
        let bounds = Bounds::new(10.0, 20.0, 100.0, 50.0);
        assert!(bounds.contains(Vec2::new(50.0, 40.0)));
        assert!(!bounds.contains(Vec2::new(5.0, 40.0)));
        assert!(!bounds.contains(Vec2::new(50.0, 100.0)));
    }

    #[test]
    fn test_bounds_intersection() {
        let a = Bounds::new(0.0, 0.0, 100.0, 100.0);
        let b = Bounds::new(50.0, 50.0, 100.0, 100.0);
        let intersection = a.intersect(&b).unwrap();
        assert_eq!(intersection, Bounds::new(50.0, 50.0, 50.0, 50.0));
        assert!(a.intersect(&Bounds::new(200.0, 0.0, 10.0, 10.0)).is_none());
    }

    #[test]
    fn test_bounds_inset() {
        let bounds = Bounds::new(0.0, 0.0, 100.0, 40.0);
        let inner = bounds.inset(&Padding::new(10.0, 5.0, 2.0, 3.0));
        assert_eq!(inner, Bounds::new(10.0, 2.0, 85.0, 35.0));

        let collapsed = bounds.inset(&Padding::uniform(60.0));
        assert_eq!(collapsed.width, 0.0);
    }

    #[test]
    fn test_padding_along_axis() {
        let padding = Padding::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(padding.along(Axis::X), 3.0);
        assert_eq!(padding.along(Axis::Y), 7.0);
        assert_eq!(padding.start(Axis::X), 1.0);
        assert_eq!(padding.start(Axis::Y), 3.0);
        assert!(Padding::uniform(-1.0).validate().is_err());
    }

    #[test]
    fn test_size_policy_validation() {
        assert!(SizePolicy::fixed(10.0).validate(Axis::X).is_ok());
        assert!(SizePolicy::fixed(-1.0).validate(Axis::X).is_err());
        assert!(SizePolicy::fit().with_min(20.0).with_max(10.0).validate(Axis::Y).is_err());
        assert!(SizePolicy::grow_weighted(0.0).validate(Axis::X).is_err());
        assert!(SizePolicy::grow_weighted(2.0).with_max(300.0).validate(Axis::X).is_ok());
    }

    #[test]
    fn test_size_policy_bounds_repair() {
        let inverted = SizePolicy::Fit { min: 20.0, max: 10.0 };
        assert_eq!(inverted.bounds(), (20.0, 20.0));
        assert_eq!(SizePolicy::fixed(40.0).bounds(), (40.0, 40.0));
        assert_eq!(SizePolicy::grow().bounds(), (0.0, f32::INFINITY));
    }

    #[test]
    fn test_clamp_size_never_panics() {
        assert_eq!(clamp_size(5.0, 10.0, 2.0), 10.0);
        assert_eq!(clamp_size(-3.0, -1.0, 4.0), 0.0);
        assert_eq!(clamp_size(f32::NAN, 1.0, 4.0), 1.0);
        assert_eq!(clamp_size(3.0, 1.0, 4.0), 3.0);
    }

    #[test]
    fn test_align_offset() {
        assert_eq!(Align::Start.offset(40.0), 0.0);
        assert_eq!(Align::Center.offset(40.0), 20.0);
        assert_eq!(Align::End.offset(40.0), 40.0);
    }
}
