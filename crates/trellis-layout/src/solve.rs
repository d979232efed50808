//! Iterative layout resolution.
//!
//! One iteration runs, per axis (X then Y):
//! 1. fit: children before parents, each container wraps its children
//! 2. grow: parents before children, leftover space goes to `Grow` children
//! 3. shrink: parents before children, overflow is taken back down to minimums
//!
//! Between the axes, text re-wraps at its final width and images derive
//! their free side from the other one. Positions are assigned last. Text
//! height and image aspect feed back into the next iteration, so the whole
//! thing repeats until nothing moves more than the tolerance, or the
//! iteration cap is hit.

use glam::Vec2;
use tracing::{debug, trace, warn};
use trellis_core::{clamp_size, Axis, SizePolicy};

use crate::content::NodeContent;
use crate::distribute::{self, GrowItem, ShrinkItem};
use crate::tree::{LayoutNode, LayoutTree, NodeState};

/// Outcome of the most recent resolve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveStats {
    /// Iterations run; zero when the cached layout was reused
    pub iterations: usize,
    /// Whether the layout settled before the iteration cap
    pub converged: bool,
    /// The tree was clean and the viewport unchanged, so nothing ran
    pub cached: bool,
}

impl LayoutTree {
    /// Resolve the layout for a viewport and return the root's minimum size.
    ///
    /// Does nothing if no node changed since the last call and the viewport
    /// is the same.
    pub fn resolve_layout(&mut self, viewport: Vec2) -> Vec2 {
        let viewport = sanitize(viewport);
        if !self.nodes[0].state.dirty && self.viewport == Some(viewport) {
            self.stats = ResolveStats {
                iterations: 0,
                converged: true,
                cached: true,
            };
            return self.nodes[0].state.min_size;
        }
        self.run(viewport)
    }

    /// Resolve even if nothing changed.
    pub fn force_resolve(&mut self, viewport: Vec2) -> Vec2 {
        self.run(sanitize(viewport))
    }

    pub fn last_resolve(&self) -> ResolveStats {
        self.stats
    }

    /// Viewport of the last resolve, if any.
    pub fn viewport(&self) -> Option<Vec2> {
        self.viewport
    }

    fn run(&mut self, viewport: Vec2) -> Vec2 {
        self.viewport = Some(viewport);
        let cap = self.options.iteration_cap();
        let epsilon = self.options.tolerance();
        self.measure_content();

        let mut stats = ResolveStats::default();
        for iteration in 0..cap {
            stats.iterations = iteration + 1;
            self.reset_sizes(iteration == 0);

            for axis in Axis::BOTH {
                let extent = viewport[axis.index()];
                self.fit_sizes(axis);
                self.grow_sizes(axis, extent, epsilon);
                self.shrink_sizes(axis, extent, epsilon);
                self.after_axis(axis);
            }
            self.place_children();

            let dirty = self.refresh_dirty(epsilon);
            trace!(iteration, dirty, "Layout iteration finished");
            if dirty == 0 {
                stats.converged = true;
                break;
            }
        }

        if !stats.converged {
            warn!(
                "Layout did not settle after {} iterations, keeping the last approximation",
                cap
            );
            // Keep the approximation until something changes.
            for node in &mut self.nodes {
                node.state.dirty = false;
            }
        }

        if self.options.warn_on_overflow {
            self.check_containment(epsilon);
        }

        debug!(
            iterations = stats.iterations,
            converged = stats.converged,
            nodes = self.nodes.len(),
            "Resolved layout"
        );
        self.stats = stats;
        self.nodes[0].state.min_size
    }

    fn measure_content(&mut self) {
        for node in &mut self.nodes {
            node.state.content = node
                .content
                .compute_min_size(node.style.width, node.style.height);
        }
    }

    /// Start sizes: `Fixed` at its value, `Fit` at its preferred content
    /// size, `Grow` at its minimum. The first iteration also reseeds the
    /// carried minimums from policy and content.
    fn reset_sizes(&mut self, first: bool) {
        for node in &mut self.nodes {
            let padding = node.style.padding;
            let content = node.state.content;

            for axis in Axis::BOTH {
                let a = axis.index();
                let policy = node.style.policy(axis);
                let (min, max) = policy.bounds();
                let pad = padding.along(axis);
                let state = &mut node.state;

                if first {
                    state.carried_min[a] = match policy {
                        SizePolicy::Fixed(_) => min,
                        _ => clamp_size(content.min[a] + pad, min, max),
                    };
                }
                let floor = state.carried_min[a];
                let start = match policy {
                    SizePolicy::Fixed(_) => min,
                    SizePolicy::Fit { .. } => content.preferred[a] + pad,
                    SizePolicy::Grow { .. } => 0.0,
                };

                state.max_size[a] = max;
                state.min_size[a] = floor;
                state.size[a] = clamp_size(start, floor, max);
            }
        }
    }

    /// Sum (main axis) or max (cross axis) of child sizes and minimums,
    /// gaps included, padding excluded.
    fn child_extent(&self, index: usize, axis: Axis) -> (f32, f32) {
        let node = &self.nodes[index];
        let along = node.style.direction.main_axis() == axis;
        let a = axis.index();

        let mut extent = 0.0f32;
        let mut min_extent = 0.0f32;
        for child in &node.children {
            let state = &self.nodes[child.index()].state;
            if along {
                extent += state.size[a];
                min_extent += state.min_size[a];
            } else {
                extent = extent.max(state.size[a]);
                min_extent = min_extent.max(state.min_size[a]);
            }
        }

        if along {
            let gaps = node.style.gap * node.children.len().saturating_sub(1) as f32;
            extent += gaps;
            min_extent += gaps;
        }
        (extent, min_extent)
    }

    fn fit_sizes(&mut self, axis: Axis) {
        let a = axis.index();
        for index in (0..self.nodes.len()).rev() {
            let (extent, min_extent) = self.child_extent(index, axis);
            let node = &mut self.nodes[index];
            let policy = node.style.policy(axis);
            let pad = node.style.padding.along(axis);
            let (policy_min, _) = policy.bounds();
            let state = &mut node.state;

            if !policy.is_fixed() {
                state.size[a] = state.size[a].max(extent + pad);
                state.min_size[a] = state.min_size[a].max(min_extent + pad);
            }
            state.min_size[a] = clamp_size(state.min_size[a], policy_min, state.max_size[a]);
            state.size[a] = clamp_size(state.size[a], state.min_size[a], state.max_size[a]);
        }
    }

    fn grow_sizes(&mut self, axis: Axis, viewport: f32, epsilon: f32) {
        let a = axis.index();
        let root = &mut self.nodes[0];
        if root.style.policy(axis).is_grow() {
            let state = &mut root.state;
            state.size[a] = clamp_size(viewport, state.min_size[a], state.max_size[a]);
        }

        for index in 0..self.nodes.len() {
            if !self.nodes[index].children.is_empty() {
                self.grow_children(index, axis, epsilon);
            }
        }
    }

    fn grow_children(&mut self, index: usize, axis: Axis, epsilon: f32) {
        let a = axis.index();
        let node = &self.nodes[index];
        let inner = node.state.size[a] - node.style.padding.along(axis);
        let children = node.children.clone();

        if node.style.direction.main_axis() != axis {
            for child in children {
                let child = &mut self.nodes[child.index()];
                if child.style.policy(axis).is_grow() {
                    let state = &mut child.state;
                    state.size[a] = clamp_size(inner, state.min_size[a], state.max_size[a]);
                }
            }
            return;
        }

        let (used, _) = self.child_extent(index, axis);
        let free = inner - used;
        if free <= epsilon {
            return;
        }

        let growing: Vec<usize> = children
            .iter()
            .map(|c| c.index())
            .filter(|&c| self.nodes[c].style.policy(axis).is_grow())
            .collect();
        if growing.is_empty() {
            return;
        }

        let mut items: Vec<GrowItem> = growing
            .iter()
            .map(|&c| {
                let child = &self.nodes[c];
                GrowItem {
                    size: child.state.size[a],
                    weight: child.style.policy(axis).weight().unwrap_or(1.0),
                    max: child.state.max_size[a],
                }
            })
            .collect();
        distribute::grow(&mut items, free, epsilon);

        for (&c, item) in growing.iter().zip(&items) {
            self.nodes[c].state.size[a] = item.size;
        }
    }

    fn shrink_sizes(&mut self, axis: Axis, viewport: f32, epsilon: f32) {
        let a = axis.index();
        let root = &mut self.nodes[0];
        if !root.style.policy(axis).is_fixed() && root.state.size[a] > viewport + epsilon {
            let state = &mut root.state;
            state.size[a] = viewport.max(state.min_size[a]);
        }

        for index in 0..self.nodes.len() {
            if !self.nodes[index].children.is_empty() {
                self.shrink_children(index, axis, epsilon);
            }
        }
    }

    fn shrink_children(&mut self, index: usize, axis: Axis, epsilon: f32) {
        let a = axis.index();
        let node = &self.nodes[index];
        let inner = node.state.size[a] - node.style.padding.along(axis);
        let children = node.children.clone();

        if node.style.direction.main_axis() != axis {
            for child in children {
                let child = &mut self.nodes[child.index()];
                if !child.style.policy(axis).is_fixed() {
                    let state = &mut child.state;
                    if state.size[a] > inner {
                        state.size[a] = inner.max(state.min_size[a]);
                    }
                }
            }
            return;
        }

        let (used, _) = self.child_extent(index, axis);
        let overflow = used - inner;
        if overflow <= epsilon {
            return;
        }

        let resizable: Vec<usize> = children
            .iter()
            .map(|c| c.index())
            .filter(|&c| !self.nodes[c].style.policy(axis).is_fixed())
            .collect();
        let mut items: Vec<ShrinkItem> = resizable
            .iter()
            .map(|&c| ShrinkItem {
                size: self.nodes[c].state.size[a],
                min: self.nodes[c].state.min_size[a],
            })
            .collect();
        let unabsorbed = distribute::shrink(&mut items, overflow, epsilon);
        if unabsorbed > epsilon {
            trace!(parent = index, %axis, unabsorbed, "Children cannot shrink further");
        }

        for (&c, item) in resizable.iter().zip(&items) {
            self.nodes[c].state.size[a] = item.size;
        }
    }

    fn after_axis(&mut self, axis: Axis) {
        for node in &mut self.nodes {
            match axis {
                Axis::X => width_resolved(node),
                Axis::Y => height_resolved(node),
            }
        }
    }

    fn place_children(&mut self) {
        self.nodes[0].state.position = self.nodes[0].style.position;

        for index in 0..self.nodes.len() {
            let node = &self.nodes[index];
            if node.children.is_empty() {
                continue;
            }

            let children = node.children.clone();
            let origin = node.state.position;
            let padding = node.style.padding;
            let gap = node.style.gap;
            let main = node.style.direction.main_axis();
            let cross = main.cross();
            let main_align = node.style.align(main);
            let cross_align = node.style.align(cross);
            let inner = node.state.size - Vec2::new(padding.horizontal(), padding.vertical());
            let (m, c) = (main.index(), cross.index());

            let (used, _) = self.child_extent(index, main);
            let mut cursor = origin[m] + padding.start(main) + main_align.offset(inner[m] - used);

            for child in children {
                let child = &mut self.nodes[child.index()];
                let offset = child.style.position;
                let size = child.state.size;

                let mut position = Vec2::ZERO;
                position[m] = cursor + offset[m];
                position[c] = origin[c]
                    + padding.start(cross)
                    + cross_align.offset(inner[c] - size[c])
                    + offset[c];

                child.state.position = position;
                cursor += size[m] + gap;
            }
        }
    }

    /// Recompute dirty flags against the previous iteration and return how
    /// many nodes are dirty. A node with a dirty child is dirty.
    fn refresh_dirty(&mut self, epsilon: f32) -> usize {
        let mut dirty = 0;
        for index in (0..self.nodes.len()).rev() {
            let child_dirty = self.nodes[index]
                .children
                .iter()
                .any(|c| self.nodes[c.index()].state.dirty);
            let state = &mut self.nodes[index].state;
            state.dirty = child_dirty || moved(state, epsilon);
            state.prev_position = state.position;
            state.prev_size = state.size;
            state.prev_min_size = state.min_size;
            if state.dirty {
                dirty += 1;
            }
        }
        dirty
    }

    fn check_containment(&self, epsilon: f32) {
        for node in self.nodes.iter().skip(1) {
            let Some(parent_id) = node.parent() else {
                continue;
            };
            let parent = &self.nodes[parent_id.index()];

            for axis in Axis::BOTH {
                if !parent.style.policy(axis).is_fixed() {
                    continue;
                }
                let a = axis.index();
                let start = node.state.position[a];
                let end = start + node.state.size[a];
                let parent_start = parent.state.position[a];
                let parent_end = parent_start + parent.state.size[a];

                if start < parent_start - epsilon || end > parent_end + epsilon {
                    warn!(
                        node = %node.id(),
                        name = node.name().unwrap_or_default(),
                        parent = %parent_id,
                        %axis,
                        "Node overflows its fixed-size parent"
                    );
                }
            }
        }
    }
}

/// Text re-wraps at its resolved width, and images with a free height
/// derive it from the width.
fn width_resolved(node: &mut LayoutNode) {
    let height = node.style.height;
    let padding = node.style.padding;
    let inner_width = (node.state.size.x - padding.horizontal()).max(0.0);

    if let Some(text_height) = node.content.on_width_resolved(inner_width) {
        if !height.is_fixed() {
            set_floor(&mut node.state, Axis::Y, height, text_height + padding.vertical());
        }
    }

    if let NodeContent::Image(image) = &node.content {
        if height.is_fit() {
            let derived = node.state.size.x / image.aspect_ratio();
            set_floor(&mut node.state, Axis::Y, height, derived);
        }
    }
}

/// Images with a free width and a constrained height derive the width.
fn height_resolved(node: &mut LayoutNode) {
    let width = node.style.width;
    if let NodeContent::Image(image) = &node.content {
        if width.is_fit() && !node.style.height.is_fit() {
            let derived = node.state.size.y * image.aspect_ratio();
            set_floor(&mut node.state, Axis::X, width, derived);
        }
    }
}

/// Pin a derived size as this node's floor for the rest of the resolve.
fn set_floor(state: &mut NodeState, axis: Axis, policy: SizePolicy, value: f32) {
    let (min, max) = policy.bounds();
    let a = axis.index();
    let value = clamp_size(value, min, max);
    state.carried_min[a] = value;
    state.min_size[a] = value;
    state.size[a] = value;
}

fn moved(state: &NodeState, epsilon: f32) -> bool {
    let differs = |a: Vec2, b: Vec2| (a - b).abs().max_element() > epsilon;
    differs(state.position, state.prev_position)
        || differs(state.size, state.prev_size)
        || differs(state.min_size, state.prev_min_size)
}

fn sanitize(viewport: Vec2) -> Vec2 {
    let clean = |v: f32| if v.is_finite() { v.max(0.0) } else { 0.0 };
    Vec2::new(clean(viewport.x), clean(viewport.y))
}
