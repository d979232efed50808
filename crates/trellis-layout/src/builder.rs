//! Declarative tree construction.
//!
//! ```
//! use trellis_layout::{NodeSpec, TreeBuilder};
//! use trellis_core::{Color, SizePolicy, Vec2};
//!
//! let mut builder = TreeBuilder::new();
//! builder
//!     .scope(NodeSpec::button().named("ok"), |b| {
//!         b.push(NodeSpec::text("OK", 16.0, Color::WHITE))?;
//!         Ok(())
//!     })
//!     .unwrap();
//! let mut tree = builder.finish().unwrap();
//! tree.resolve_layout(Vec2::new(800.0, 600.0));
//! assert!(tree.find("ok").is_some());
//! ```

use std::rc::Rc;

use glam::Vec2;
use tracing::debug;
use trellis_core::{Align, Color, ConfigError, Direction, Padding, SizePolicy, TreeError, TrellisError};

use crate::content::{ImageContent, NodeContent, ProgressBar, TextContent};
use crate::options::LayoutOptions;
use crate::text::{FontMetrics, MonospaceMetrics};
use crate::tree::{LayoutNode, LayoutNodeId, LayoutTree, NodeStyle};

#[derive(Debug, Clone)]
enum SpecContent {
    Frame,
    Button,
    Text {
        text: String,
        font_size: f32,
        color: Color,
        metrics: Option<Rc<dyn FontMetrics>>,
    },
    Image(ImageContent),
    ProgressBar(ProgressBar),
}

/// Description of a node to be added by a [`TreeBuilder`].
#[derive(Debug, Clone)]
pub struct NodeSpec {
    name: Option<String>,
    style: NodeStyle,
    content: SpecContent,
}

impl NodeSpec {
    fn new(content: SpecContent) -> Self {
        Self {
            name: None,
            style: NodeStyle::default(),
            content,
        }
    }

    pub fn frame() -> Self {
        Self::new(SpecContent::Frame)
    }

    /// A frame that tracks hover and clicks and blocks the pointer.
    pub fn button() -> Self {
        Self::new(SpecContent::Button)
            .interactive(true)
            .blocks_mouse(true)
    }

    pub fn text(text: impl Into<String>, font_size: f32, color: Color) -> Self {
        Self::new(SpecContent::Text {
            text: text.into(),
            font_size,
            color,
            metrics: None,
        })
    }

    pub fn image(image: ImageContent) -> Self {
        Self::new(SpecContent::Image(image))
    }

    pub fn progress_bar(color: Color, fill: f32) -> Self {
        Self::new(SpecContent::ProgressBar(ProgressBar::new(color, fill)))
    }

    /// Unique name for [`LayoutTree::find`] and event reporting.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn position(mut self, x: f32, y: f32) -> Self {
        self.style.position = Vec2::new(x, y);
        self
    }

    pub fn size(mut self, width: impl Into<SizePolicy>, height: impl Into<SizePolicy>) -> Self {
        self.style.width = width.into();
        self.style.height = height.into();
        self
    }

    pub fn width(mut self, width: impl Into<SizePolicy>) -> Self {
        self.style.width = width.into();
        self
    }

    pub fn height(mut self, height: impl Into<SizePolicy>) -> Self {
        self.style.height = height.into();
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.style.direction = direction;
        self
    }

    pub fn padding(mut self, padding: Padding) -> Self {
        self.style.padding = padding;
        self
    }

    pub fn gap(mut self, gap: f32) -> Self {
        self.style.gap = gap;
        self
    }

    pub fn align(mut self, x: Align, y: Align) -> Self {
        self.style.x_align = x;
        self.style.y_align = y;
        self
    }

    pub fn background(mut self, color: Color) -> Self {
        self.style.background = color;
        self
    }

    pub fn interactive(mut self, enabled: bool) -> Self {
        self.style.can_interact = enabled;
        self
    }

    pub fn blocks_mouse(mut self, enabled: bool) -> Self {
        self.style.blocks_mouse = enabled;
        self
    }

    /// Font metrics for a text node. Others ignore this.
    pub fn metrics(mut self, metrics: Rc<dyn FontMetrics>) -> Self {
        if let SpecContent::Text { metrics: slot, .. } = &mut self.content {
            *slot = Some(metrics);
        }
        self
    }

    /// Replace the whole style.
    pub fn style(mut self, style: NodeStyle) -> Self {
        self.style = style;
        self
    }

    fn materialize(
        self,
        default_metrics: &Rc<dyn FontMetrics>,
    ) -> Result<(Option<String>, NodeStyle, NodeContent), ConfigError> {
        self.style.validate()?;
        let content = match self.content {
            SpecContent::Frame => NodeContent::Frame,
            SpecContent::Button => NodeContent::Button,
            SpecContent::Text {
                text,
                font_size,
                color,
                metrics,
            } => {
                let metrics = metrics.unwrap_or_else(|| Rc::clone(default_metrics));
                NodeContent::Text(TextContent::new(text, font_size, color, metrics)?)
            }
            SpecContent::Image(image) => NodeContent::Image(image),
            SpecContent::ProgressBar(bar) => NodeContent::ProgressBar(bar),
        };
        Ok((self.name, self.style, content))
    }
}

/// Builds a [`LayoutTree`] with nested open/close scopes.
#[derive(Debug)]
pub struct TreeBuilder {
    tree: LayoutTree,
    stack: Vec<LayoutNodeId>,
    metrics: Rc<dyn FontMetrics>,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    /// Start a tree whose root fills the viewport.
    pub fn new() -> Self {
        let style = NodeStyle {
            width: SizePolicy::grow(),
            height: SizePolicy::grow(),
            ..NodeStyle::default()
        };
        let root = LayoutNode::new(LayoutNodeId::ROOT, None, None, style, NodeContent::Frame);
        Self::from_root(root, Rc::new(MonospaceMetrics::default()))
    }

    /// Start a tree with a custom root.
    pub fn with_root(spec: NodeSpec) -> Result<Self, TrellisError> {
        let metrics: Rc<dyn FontMetrics> = Rc::new(MonospaceMetrics::default());
        let (name, style, content) = spec.materialize(&metrics)?;
        let root = LayoutNode::new(LayoutNodeId::ROOT, None, name, style, content);
        Ok(Self::from_root(root, metrics))
    }

    fn from_root(root: LayoutNode, metrics: Rc<dyn FontMetrics>) -> Self {
        Self {
            tree: LayoutTree::new(root, LayoutOptions::default()),
            stack: vec![LayoutNodeId::ROOT],
            metrics,
        }
    }

    /// Metrics for text nodes added from now on that don't bring their own.
    pub fn with_metrics(mut self, metrics: Rc<dyn FontMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_options(mut self, options: LayoutOptions) -> Self {
        self.tree.options = options;
        self
    }

    /// The node new children are added to.
    pub fn current(&self) -> LayoutNodeId {
        self.stack.last().copied().unwrap_or(LayoutNodeId::ROOT)
    }

    /// The tree built so far.
    pub fn tree(&self) -> &LayoutTree {
        &self.tree
    }

    /// Add a leaf under the current node.
    pub fn push(&mut self, spec: NodeSpec) -> Result<LayoutNodeId, TrellisError> {
        let (name, style, content) = spec.materialize(&self.metrics)?;
        let id = self.tree.insert(self.current(), name, style, content)?;
        Ok(id)
    }

    /// Add a node and make it current until the matching [`close`](Self::close).
    pub fn open(&mut self, spec: NodeSpec) -> Result<LayoutNodeId, TrellisError> {
        let id = self.push(spec)?;
        self.stack.push(id);
        Ok(id)
    }

    pub fn close(&mut self) -> Result<(), TrellisError> {
        if self.stack.len() <= 1 {
            return Err(TreeError::CloseRoot.into());
        }
        self.stack.pop();
        Ok(())
    }

    /// Open a node, run `build` inside it, then close it again.
    ///
    /// The builder is back at its starting depth afterwards, even when
    /// `build` fails or leaves nested nodes open. An error from `build`
    /// is returned as is.
    pub fn scope<F>(&mut self, spec: NodeSpec, build: F) -> Result<LayoutNodeId, TrellisError>
    where
        F: FnOnce(&mut Self) -> Result<(), TrellisError>,
    {
        let id = self.open(spec)?;
        let depth = self.stack.len();
        let result = build(self);
        if self.stack.len() < depth {
            result?;
            return Err(TreeError::ClosedOutsideScope.into());
        }
        let open = self.stack.len() - depth;
        self.stack.truncate(depth);
        self.close()?;
        result?;
        if open > 0 {
            return Err(TreeError::UnbalancedScope { open }.into());
        }
        Ok(id)
    }

    /// Finish building. Every opened scope must have been closed.
    pub fn finish(self) -> Result<LayoutTree, TrellisError> {
        let open = self.stack.len().saturating_sub(1);
        if open > 0 {
            return Err(TreeError::UnbalancedScope { open }.into());
        }
        debug!(nodes = self.tree.node_count(), "Built layout tree");
        Ok(self.tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::{Axis, ImageId};

    #[test]
    fn test_default_root_fills_viewport() {
        let tree = TreeBuilder::new().finish().unwrap();
        let root = tree.get(tree.root()).unwrap();
        assert!(root.style().width.is_grow());
        assert!(root.style().height.is_grow());
        assert!(root.parent().is_none());
    }

    #[test]
    fn test_scopes_nest() {
        let mut builder = TreeBuilder::new();
        let outer = builder
            .scope(NodeSpec::frame(), |b| {
                b.push(NodeSpec::frame())?;
                b.scope(NodeSpec::button(), |b| {
                    b.push(NodeSpec::text("x", 12.0, Color::WHITE))?;
                    Ok(())
                })?;
                Ok(())
            })
            .unwrap();
        let tree = builder.finish().unwrap();

        assert_eq!(tree.node_count(), 5);
        assert_eq!(tree.get(outer).unwrap().children().len(), 2);
        // Arena order is pre-order.
        let parents: Vec<_> = tree.nodes().map(|n| n.parent().map(|p| p.index())).collect();
        assert_eq!(parents, vec![None, Some(0), Some(1), Some(1), Some(3)]);
    }

    #[test]
    fn test_unbalanced_scopes_are_rejected() {
        let mut builder = TreeBuilder::new();
        builder.open(NodeSpec::frame()).unwrap();
        let err = builder.finish().unwrap_err();
        assert!(matches!(err, TrellisError::Tree(TreeError::UnbalancedScope { open: 1 })));

        let mut builder = TreeBuilder::new();
        let err = builder.close().unwrap_err();
        assert!(matches!(err, TrellisError::Tree(TreeError::CloseRoot)));

        let mut builder = TreeBuilder::new();
        let err = builder
            .scope(NodeSpec::frame(), |b| {
                b.open(NodeSpec::frame())?;
                Ok(())
            })
            .unwrap_err();
        assert!(matches!(err, TrellisError::Tree(TreeError::UnbalancedScope { open: 1 })));
        // The scope still unwinds, so the builder stays usable.
        assert!(builder.finish().is_ok());
    }

    #[test]
    fn test_scope_propagates_inner_errors() {
        let mut builder = TreeBuilder::new();
        let err = builder
            .scope(NodeSpec::frame(), |b| {
                b.open(NodeSpec::frame())?;
                b.push(NodeSpec::frame().gap(-1.0))?;
                b.close()?;
                Ok(())
            })
            .unwrap_err();
        assert!(matches!(err, TrellisError::Config(ConfigError::InvalidGap { .. })));

        let err = builder
            .scope(NodeSpec::frame(), |b| {
                b.close()?;
                Ok(())
            })
            .unwrap_err();
        assert!(matches!(err, TrellisError::Tree(TreeError::ClosedOutsideScope)));

        // Later nodes land under the root again.
        let sibling = builder.push(NodeSpec::frame()).unwrap();
        let tree = builder.finish().unwrap();
        assert_eq!(tree.parent(sibling), Some(tree.root()));
        assert_eq!(tree.node_count(), 5);
    }

    #[test]
    fn test_invalid_nodes_are_rejected() {
        let mut builder = TreeBuilder::new();

        let err = builder
            .push(NodeSpec::frame().width(SizePolicy::grow().with_min(50.0).with_max(10.0)))
            .unwrap_err();
        assert!(matches!(
            err,
            TrellisError::Config(ConfigError::InvalidSizePolicy { axis: Axis::X, .. })
        ));

        let err = builder
            .push(NodeSpec::frame().padding(Padding::uniform(-1.0)))
            .unwrap_err();
        assert!(matches!(err, TrellisError::Config(ConfigError::InvalidPadding { .. })));

        let err = builder
            .push(NodeSpec::text("x", -3.0, Color::WHITE))
            .unwrap_err();
        assert!(matches!(err, TrellisError::Config(ConfigError::InvalidFontSize { .. })));

        assert!(ImageContent::new(ImageId(0), 10.0, 0.0).is_err());
        // Nothing was added.
        assert_eq!(builder.tree().node_count(), 1);
    }

    #[test]
    fn test_names_are_unique() {
        let mut builder = TreeBuilder::new();
        builder.push(NodeSpec::frame().named("a")).unwrap();
        let err = builder.push(NodeSpec::frame().named("a")).unwrap_err();
        assert!(matches!(
            err,
            TrellisError::Config(ConfigError::DuplicateName { ref name }) if name == "a"
        ));
    }

    #[test]
    fn test_custom_metrics() {
        let wide: Rc<dyn FontMetrics> = Rc::new(MonospaceMetrics {
            char_width: 1.0,
            line_height: 2.0,
        });
        let mut builder = TreeBuilder::new().with_metrics(wide);
        let id = builder.push(NodeSpec::text("abcd", 10.0, Color::WHITE)).unwrap();
        let mut tree = builder.finish().unwrap();
        tree.resolve_layout(Vec2::new(800.0, 600.0));

        assert_eq!(tree.size(id), Some(Vec2::new(40.0, 20.0)));
    }

    #[test]
    fn test_button_defaults() {
        let mut builder = TreeBuilder::new();
        let id = builder.push(NodeSpec::button()).unwrap();
        let tree = builder.finish().unwrap();
        let style = tree.get(id).unwrap().style();
        assert!(style.can_interact);
        assert!(style.blocks_mouse);
    }
}
