//! 2D display-list rendering for Trellis UI trees.
//!
//! [`Scene`] implements [`trellis_core::Surface`] by recording every draw
//! call as a [`RenderCommand`]. Hosts that batch draws can replay the list
//! against their own backend; tests can assert on it directly.

pub mod primitives;
pub mod scene;

pub use primitives::*;
pub use scene::Scene;
