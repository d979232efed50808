//! Layout tree data structures.
//!
//! Nodes live in a flat arena owned by [`LayoutTree`]. The builder appends a
//! parent before any of its children and closes a subtree before opening the
//! next sibling, so arena order is pre-order and reverse arena order visits
//! every child before its parent. The solver relies on both.

use std::fmt;

use glam::Vec2;
use indexmap::IndexMap;
use smallvec::SmallVec;
use trellis_core::{Align, Axis, Bounds, Color, ConfigError, Direction, Padding, SizePolicy, TreeError};

use crate::content::{ContentSize, ImageContent, NodeContent};
use crate::options::LayoutOptions;
use crate::solve::ResolveStats;

/// Index of a node within its tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayoutNodeId(pub(crate) u32);

impl LayoutNodeId {
    /// The root of every tree.
    pub const ROOT: LayoutNodeId = LayoutNodeId(0);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for LayoutNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Author-facing configuration of a node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeStyle {
    /// Offset from the slot the parent assigns (absolute for the root)
    pub position: Vec2,
    pub width: SizePolicy,
    pub height: SizePolicy,
    /// Axis children are laid out along
    pub direction: Direction,
    pub padding: Padding,
    /// Space between adjacent children along the main axis
    pub gap: f32,
    pub x_align: Align,
    pub y_align: Align,
    pub background: Color,
    /// Receives hover and click tracking
    pub can_interact: bool,
    /// Reported by `blocks_pointer` when under the cursor
    pub blocks_mouse: bool,
}

impl Default for NodeStyle {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            width: SizePolicy::fit(),
            height: SizePolicy::fit(),
            direction: Direction::LeftToRight,
            padding: Padding::default(),
            gap: 0.0,
            x_align: Align::Start,
            y_align: Align::Start,
            background: Color::TRANSPARENT,
            can_interact: false,
            blocks_mouse: false,
        }
    }
}

impl NodeStyle {
    pub fn policy(&self, axis: Axis) -> SizePolicy {
        match axis {
            Axis::X => self.width,
            Axis::Y => self.height,
        }
    }

    pub fn align(&self, axis: Axis) -> Align {
        match axis {
            Axis::X => self.x_align,
            Axis::Y => self.y_align,
        }
    }

    /// Check every numeric field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for axis in Axis::BOTH {
            self.policy(axis).validate(axis)?;
        }
        self.padding.validate()?;
        if !self.gap.is_finite() || self.gap < 0.0 {
            return Err(ConfigError::InvalidGap { gap: self.gap });
        }
        if !self.position.is_finite() {
            return Err(ConfigError::InvalidPosition {
                x: self.position.x,
                y: self.position.y,
            });
        }
        Ok(())
    }
}

/// Solver bookkeeping for one node.
#[derive(Debug, Clone, Default)]
pub(crate) struct NodeState {
    pub position: Vec2,
    pub size: Vec2,
    pub min_size: Vec2,
    /// Floor carried between iterations (wrapped text height, derived image sides)
    pub carried_min: Vec2,
    pub max_size: Vec2,
    pub content: ContentSize,
    pub prev_position: Vec2,
    pub prev_size: Vec2,
    pub prev_min_size: Vec2,
    pub dirty: bool,
}

/// Pointer tracking for one node.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Interaction {
    pub hovered: bool,
    pub clicked: bool,
    /// Seconds since the node was created or last entered by the pointer
    pub time: f32,
}

/// A node in the layout tree.
#[derive(Debug, Clone)]
pub struct LayoutNode {
    id: LayoutNodeId,
    name: Option<String>,
    parent: Option<LayoutNodeId>,
    pub(crate) children: SmallVec<[LayoutNodeId; 4]>,
    pub(crate) style: NodeStyle,
    pub(crate) content: NodeContent,
    pub(crate) visible: bool,
    pub(crate) state: NodeState,
    pub(crate) interaction: Interaction,
}

impl LayoutNode {
    pub(crate) fn new(
        id: LayoutNodeId,
        parent: Option<LayoutNodeId>,
        name: Option<String>,
        style: NodeStyle,
        content: NodeContent,
    ) -> Self {
        Self {
            id,
            name,
            parent,
            children: SmallVec::new(),
            style,
            content,
            visible: true,
            state: NodeState {
                dirty: true,
                ..NodeState::default()
            },
            interaction: Interaction::default(),
        }
    }

    pub fn id(&self) -> LayoutNodeId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn parent(&self) -> Option<LayoutNodeId> {
        self.parent
    }

    pub fn children(&self) -> &[LayoutNodeId] {
        &self.children
    }

    pub fn style(&self) -> &NodeStyle {
        &self.style
    }

    pub fn content(&self) -> &NodeContent {
        &self.content
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Absolute position from the last resolve.
    pub fn position(&self) -> Vec2 {
        self.state.position
    }

    /// Resolved size from the last resolve.
    pub fn size(&self) -> Vec2 {
        self.state.size
    }

    /// Smallest size this subtree can be squeezed to.
    pub fn min_size(&self) -> Vec2 {
        self.state.min_size
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::from_vecs(self.state.position, self.state.size)
    }

    /// Area inside the padding.
    pub fn inner_bounds(&self) -> Bounds {
        self.bounds().inset(&self.style.padding)
    }

    /// Whether this node or a descendant needs another solver pass.
    pub fn is_dirty(&self) -> bool {
        self.state.dirty
    }

    pub fn is_hovered(&self) -> bool {
        self.interaction.hovered
    }

    pub fn is_pressed(&self) -> bool {
        self.interaction.clicked
    }

    /// Seconds accumulated by `update` since creation or the last hover entry.
    pub fn time(&self) -> f32 {
        self.interaction.time
    }
}

/// A tree of layout nodes plus the state of its last resolve.
#[derive(Debug, Clone)]
pub struct LayoutTree {
    pub(crate) nodes: Vec<LayoutNode>,
    names: IndexMap<String, LayoutNodeId>,
    pub(crate) options: LayoutOptions,
    pub(crate) viewport: Option<Vec2>,
    pub(crate) stats: ResolveStats,
}

impl LayoutTree {
    pub(crate) fn new(root: LayoutNode, options: LayoutOptions) -> Self {
        let mut names = IndexMap::new();
        if let Some(name) = &root.name {
            names.insert(name.clone(), LayoutNodeId::ROOT);
        }
        Self {
            nodes: vec![root],
            names,
            options,
            viewport: None,
            stats: ResolveStats::default(),
        }
    }

    /// Append a child to `parent`. The caller validated the node.
    pub(crate) fn insert(
        &mut self,
        parent: LayoutNodeId,
        name: Option<String>,
        style: NodeStyle,
        content: NodeContent,
    ) -> Result<LayoutNodeId, ConfigError> {
        if let Some(name) = &name {
            if self.names.contains_key(name) {
                return Err(ConfigError::DuplicateName { name: name.clone() });
            }
        }

        let id = LayoutNodeId(self.nodes.len() as u32);
        if let Some(name) = &name {
            self.names.insert(name.clone(), id);
        }
        self.nodes.push(LayoutNode::new(id, Some(parent), name, style, content));
        self.nodes[parent.index()].children.push(id);
        self.mark_dirty(parent);
        Ok(id)
    }

    pub fn root(&self) -> LayoutNodeId {
        LayoutNodeId::ROOT
    }

    /// Number of nodes, the root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    pub fn with_options(mut self, options: LayoutOptions) -> Self {
        self.set_options(options);
        self
    }

    /// Replace the options. The next resolve recomputes everything.
    pub fn set_options(&mut self, options: LayoutOptions) {
        self.options = options;
        self.mark_dirty(LayoutNodeId::ROOT);
    }

    /// Get a node by ID.
    pub fn get(&self, id: LayoutNodeId) -> Option<&LayoutNode> {
        self.nodes.get(id.index())
    }

    /// Get a node by ID, or an error naming it.
    pub fn node(&self, id: LayoutNodeId) -> Result<&LayoutNode, TreeError> {
        self.get(id).ok_or(TreeError::UnknownNode { id: id.index() })
    }

    fn node_mut(&mut self, id: LayoutNodeId) -> Result<&mut LayoutNode, TreeError> {
        self.nodes
            .get_mut(id.index())
            .ok_or(TreeError::UnknownNode { id: id.index() })
    }

    /// Look a node up by its unique name.
    pub fn find(&self, name: &str) -> Option<LayoutNodeId> {
        self.names.get(name).copied()
    }

    /// Iterate over all nodes in pre-order.
    pub fn nodes(&self) -> impl Iterator<Item = &LayoutNode> {
        self.nodes.iter()
    }

    /// Get children of a node.
    pub fn children(&self, id: LayoutNodeId) -> impl Iterator<Item = &LayoutNode> {
        self.get(id)
            .into_iter()
            .flat_map(|n| n.children.iter())
            .filter_map(|child| self.get(*child))
    }

    pub fn parent(&self, id: LayoutNodeId) -> Option<LayoutNodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: LayoutNodeId) -> impl Iterator<Item = LayoutNodeId> + '_ {
        std::iter::successors(self.parent(id), move |&p| self.parent(p))
    }

    pub fn bounds(&self, id: LayoutNodeId) -> Option<Bounds> {
        self.get(id).map(LayoutNode::bounds)
    }

    pub fn position(&self, id: LayoutNodeId) -> Option<Vec2> {
        self.get(id).map(LayoutNode::position)
    }

    pub fn size(&self, id: LayoutNodeId) -> Option<Vec2> {
        self.get(id).map(LayoutNode::size)
    }

    pub fn min_size(&self, id: LayoutNodeId) -> Option<Vec2> {
        self.get(id).map(LayoutNode::min_size)
    }

    /// Unknown ids report clean.
    pub fn is_dirty(&self, id: LayoutNodeId) -> bool {
        self.get(id).is_some_and(LayoutNode::is_dirty)
    }

    /// Flag a node and all of its ancestors for re-resolution.
    pub fn mark_dirty(&mut self, id: LayoutNodeId) {
        let mut current = Some(id);
        while let Some(id) = current {
            let Some(node) = self.nodes.get_mut(id.index()) else {
                return;
            };
            node.state.dirty = true;
            current = node.parent;
        }
    }

    /// Replace the string shown by a text node.
    pub fn set_text(&mut self, id: LayoutNodeId, text: impl Into<String>) -> Result<(), TreeError> {
        let node = self.node_mut(id)?;
        match &mut node.content {
            NodeContent::Text(content) => content.set_text(text),
            other => return Err(mismatch(id, "text", other)),
        }
        self.mark_dirty(id);
        Ok(())
    }

    /// Swap the image shown by an image node.
    pub fn set_image(&mut self, id: LayoutNodeId, image: ImageContent) -> Result<(), TreeError> {
        let node = self.node_mut(id)?;
        match &mut node.content {
            NodeContent::Image(content) => *content = image,
            other => return Err(mismatch(id, "image", other)),
        }
        self.mark_dirty(id);
        Ok(())
    }

    /// Set a progress bar's fill fraction, clamped to `0.0..=1.0`.
    pub fn set_fill(&mut self, id: LayoutNodeId, fill: f32) -> Result<(), TreeError> {
        let node = self.node_mut(id)?;
        match &mut node.content {
            NodeContent::ProgressBar(bar) => bar.set_fill(fill),
            other => return Err(mismatch(id, "progress bar", other)),
        }
        self.mark_dirty(id);
        Ok(())
    }

    /// Hidden subtrees keep their space but are not updated, hit or drawn.
    pub fn set_visible(&mut self, id: LayoutNodeId, visible: bool) -> Result<(), TreeError> {
        self.node_mut(id)?.visible = visible;
        if !visible {
            let mut stack = vec![id];
            while let Some(current) = stack.pop() {
                let node = &mut self.nodes[current.index()];
                node.interaction.hovered = false;
                node.interaction.clicked = false;
                stack.extend(node.children.iter().copied());
            }
        }
        Ok(())
    }

    /// Whether `id` and all of its ancestors are visible.
    pub fn is_shown(&self, id: LayoutNodeId) -> bool {
        self.get(id).is_some_and(|n| n.visible)
            && self.ancestors(id).all(|a| self.nodes[a.index()].visible)
    }

    /// Find the topmost visible node at a given point.
    pub fn hit_test(&self, point: Vec2) -> Option<LayoutNodeId> {
        self.hit_test_recursive(LayoutNodeId::ROOT, point)
    }

    fn hit_test_recursive(&self, id: LayoutNodeId, point: Vec2) -> Option<LayoutNodeId> {
        let node = self.get(id)?;

        if !node.visible {
            return None;
        }

        // Children may overflow their parent, so test them first.
        for &child in node.children.iter().rev() {
            if let Some(hit) = self.hit_test_recursive(child, point) {
                return Some(hit);
            }
        }

        node.bounds().contains(point).then_some(id)
    }

    /// Get the total bounds of all visible content.
    pub fn content_bounds(&self) -> Bounds {
        let mut result: Option<Bounds> = None;
        let mut stack = vec![LayoutNodeId::ROOT];

        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.index()];
            if !node.visible {
                continue;
            }
            let bounds = node.bounds();
            result = Some(match result {
                Some(acc) => acc.union(&bounds),
                None => bounds,
            });
            stack.extend(node.children.iter().copied());
        }

        result.unwrap_or_default()
    }
}

fn mismatch(id: LayoutNodeId, expected: &'static str, found: &NodeContent) -> TreeError {
    TreeError::ContentMismatch {
        id: id.index(),
        expected,
        found: found.kind(),
    }
}
