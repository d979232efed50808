//! Layout computation for Trellis UI trees.
//!
//! This crate sizes and positions a tree of nodes from per-axis sizing
//! policies, then drives pointer interaction and drawing over the result.
//!
//! # Architecture
//!
//! 1. **Sizing**: fit, grow and shrink passes per axis, with water-filling
//!    distribution of free space and overflow
//! 2. **Content feedback**: wrapped text height and image aspect ratio feed
//!    the next iteration until the layout settles
//! 3. **Interaction and drawing**: hover/click tracking reported as events,
//!    drawing through a host-provided [`Surface`](trellis_core::Surface)
//!
//! # Example
//!
//! ```
//! use trellis_core::{Color, SizePolicy, Vec2};
//! use trellis_layout::{NodeSpec, TreeBuilder};
//!
//! let mut builder = TreeBuilder::new();
//! let sidebar = builder
//!     .push(NodeSpec::frame().size(SizePolicy::fixed(200.0), SizePolicy::grow()))
//!     .unwrap();
//! let body = builder
//!     .push(NodeSpec::text("Hello", 16.0, Color::WHITE).width(SizePolicy::grow()))
//!     .unwrap();
//! let mut tree = builder.finish().unwrap();
//!
//! tree.resolve_layout(Vec2::new(800.0, 600.0));
//! assert_eq!(tree.size(sidebar), Some(Vec2::new(200.0, 600.0)));
//! assert_eq!(tree.position(body).unwrap().x, 200.0);
//! ```

mod builder;
mod content;
pub mod distribute;
mod draw;
mod input;
mod options;
mod solve;
mod text;
mod tree;
mod widgets;

pub use builder::{NodeSpec, TreeBuilder};
pub use content::{ContentSize, ImageContent, NodeContent, ProgressBar, TextContent};
pub use input::{ActionTrigger, PointerState, UiEvent};
pub use options::LayoutOptions;
pub use solve::ResolveStats;
pub use text::{measure_text, widest_word, wrap_text, FontMetrics, MonospaceMetrics, TextMetrics, WrappedLine};
pub use tree::{LayoutNode, LayoutNodeId, LayoutTree, NodeStyle};
pub use widgets::{SelectorStyle, TextSelector};
