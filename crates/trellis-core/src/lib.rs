//! Core types for the Trellis UI layout engine.
//!
//! This crate holds everything shared between the layout solver and the
//! renderers that consume its output:
//!
//! - [`types`]: sizing policies, padding, alignment, colors, and bounds
//! - [`errors`]: the construction-time error taxonomy
//! - [`surface`]: the [`Surface`] trait a host renderer implements

pub mod errors;
pub mod surface;
pub mod types;

pub use errors::{ConfigError, TreeError, TrellisError};
pub use surface::Surface;
pub use types::{clamp_size, Align, Axis, Bounds, Color, Direction, ImageId, Padding, SizePolicy};

pub use glam::Vec2;
