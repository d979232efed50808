//! Pointer interaction.
//!
//! The tree never stores callbacks. [`LayoutTree::update`] reports what
//! happened as [`UiEvent`]s and the host decides what to do with them.

use glam::Vec2;
use smallvec::SmallVec;
use tracing::debug;

use crate::tree::{Interaction, LayoutNodeId, LayoutTree};

/// Pointer input for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    pub position: Vec2,
    /// Primary button is held
    pub pressed: bool,
    /// Primary button went down this frame
    pub just_pressed: bool,
    /// Primary button went up this frame
    pub just_released: bool,
    /// Vertical wheel movement this frame
    pub scroll_y: f32,
}

impl PointerState {
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }
}

/// What a node reacted to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActionTrigger {
    /// Pressed while over the node
    ClickDown,
    /// Still held after a press that started on the node
    ClickHold,
    /// Released after a press that started on the node
    ClickUp,
    HoverEnter,
    HoverExit,
    /// Wheel moved while over the node
    ScrollY(f32),
}

/// An interaction reported by [`LayoutTree::update`].
#[derive(Debug, Clone, PartialEq)]
pub struct UiEvent {
    pub node: LayoutNodeId,
    pub name: Option<String>,
    pub trigger: ActionTrigger,
}

type Triggers = SmallVec<[ActionTrigger; 4]>;

impl LayoutTree {
    /// Advance node timers and run pointer tracking for one frame.
    ///
    /// Re-resolves first if anything is dirty. Hidden subtrees are skipped.
    /// Events come out in pre-order.
    pub fn update(&mut self, delta: f32, pointer: &PointerState) -> Vec<UiEvent> {
        if self.nodes[0].state.dirty {
            match self.viewport {
                Some(viewport) => {
                    self.resolve_layout(viewport);
                }
                None => debug!("Skipping re-resolve, layout was never resolved"),
            }
        }

        let mut events = Vec::new();
        let mut stack = vec![LayoutNodeId::ROOT];

        while let Some(id) = stack.pop() {
            let node = &mut self.nodes[id.index()];
            if !node.visible {
                continue;
            }

            node.interaction.time += delta;
            if node.style.can_interact {
                let inside = node.bounds().contains(pointer.position);
                for trigger in track(&mut node.interaction, inside, pointer) {
                    events.push(UiEvent {
                        node: id,
                        name: node.name().map(str::to_string),
                        trigger,
                    });
                }
            }

            stack.extend(node.children.iter().rev().copied());
        }

        events
    }

    /// Whether a visible node that blocks the pointer lies under `point`.
    pub fn blocks_pointer(&self, point: Vec2) -> bool {
        let mut stack = vec![LayoutNodeId::ROOT];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.index()];
            if !node.visible {
                continue;
            }
            if node.style.blocks_mouse && node.bounds().contains(point) {
                return true;
            }
            stack.extend(node.children.iter().copied());
        }
        false
    }
}

/// Hover and click state machine for one node.
fn track(state: &mut Interaction, inside: bool, pointer: &PointerState) -> Triggers {
    let mut triggers = Triggers::new();

    if inside {
        if !state.hovered {
            state.hovered = true;
            state.time = 0.0;
            triggers.push(ActionTrigger::HoverEnter);
        }

        if pointer.just_pressed {
            state.clicked = true;
            triggers.push(ActionTrigger::ClickDown);
        } else if pointer.pressed && state.clicked {
            triggers.push(ActionTrigger::ClickHold);
        }

        if pointer.just_released && state.clicked {
            state.clicked = false;
            triggers.push(ActionTrigger::ClickUp);
        }

        if pointer.scroll_y != 0.0 {
            triggers.push(ActionTrigger::ScrollY(pointer.scroll_y));
        }
    } else {
        if state.hovered {
            state.hovered = false;
            triggers.push(ActionTrigger::HoverExit);
        }
        // Dragging off a node cancels the click.
        state.clicked = false;
    }

    triggers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{NodeSpec, TreeBuilder};
    use trellis_core::SizePolicy;

    fn button_tree() -> (LayoutTree, LayoutNodeId) {
        let mut builder = TreeBuilder::new();
        let button = builder
            .push(
                NodeSpec::button()
                    .named("ok")
                    .size(SizePolicy::fixed(100.0), SizePolicy::fixed(40.0))
                    .position(10.0, 10.0),
            )
            .unwrap();
        let mut tree = builder.finish().unwrap();
        tree.resolve_layout(Vec2::new(800.0, 600.0));
        (tree, button)
    }

    fn triggers(events: &[UiEvent]) -> Vec<ActionTrigger> {
        events.iter().map(|e| e.trigger).collect()
    }

    #[test]
    fn test_hover_enter_and_exit() {
        let (mut tree, button) = button_tree();
        let inside = PointerState::at(Vec2::new(50.0, 30.0));
        let outside = PointerState::at(Vec2::new(500.0, 500.0));

        let events = tree.update(0.016, &inside);
        assert_eq!(triggers(&events), vec![ActionTrigger::HoverEnter]);
        assert_eq!(events[0].node, button);
        assert_eq!(events[0].name.as_deref(), Some("ok"));
        assert!(tree.get(button).unwrap().is_hovered());

        assert!(tree.update(0.016, &inside).is_empty());

        let events = tree.update(0.016, &outside);
        assert_eq!(triggers(&events), vec![ActionTrigger::HoverExit]);
    }

    #[test]
    fn test_click_sequence() {
        let (mut tree, button) = button_tree();
        let position = Vec2::new(50.0, 30.0);

        tree.update(0.016, &PointerState::at(position));

        let down = PointerState {
            position,
            pressed: true,
            just_pressed: true,
            ..PointerState::default()
        };
        assert_eq!(triggers(&tree.update(0.016, &down)), vec![ActionTrigger::ClickDown]);
        assert!(tree.get(button).unwrap().is_pressed());

        let hold = PointerState {
            position,
            pressed: true,
            ..PointerState::default()
        };
        assert_eq!(triggers(&tree.update(0.016, &hold)), vec![ActionTrigger::ClickHold]);

        let up = PointerState {
            position,
            just_released: true,
            ..PointerState::default()
        };
        assert_eq!(triggers(&tree.update(0.016, &up)), vec![ActionTrigger::ClickUp]);
        assert!(!tree.get(button).unwrap().is_pressed());
    }

    #[test]
    fn test_release_without_press_is_ignored() {
        let (mut tree, _) = button_tree();
        let position = Vec2::new(50.0, 30.0);
        tree.update(0.016, &PointerState::at(position));

        let up = PointerState {
            position,
            just_released: true,
            ..PointerState::default()
        };
        assert!(tree.update(0.016, &up).is_empty());
    }

    #[test]
    fn test_leaving_cancels_click() {
        let (mut tree, button) = button_tree();
        let position = Vec2::new(50.0, 30.0);
        let down = PointerState {
            position,
            pressed: true,
            just_pressed: true,
            ..PointerState::default()
        };
        tree.update(0.016, &down);

        let away = PointerState {
            position: Vec2::new(500.0, 500.0),
            pressed: true,
            ..PointerState::default()
        };
        assert_eq!(triggers(&tree.update(0.016, &away)), vec![ActionTrigger::HoverExit]);
        assert!(!tree.get(button).unwrap().is_pressed());
    }

    #[test]
    fn test_scroll_and_timer() {
        let (mut tree, button) = button_tree();
        let scroll = PointerState {
            position: Vec2::new(50.0, 30.0),
            scroll_y: -1.0,
            ..PointerState::default()
        };
        let events = tree.update(0.5, &scroll);
        assert_eq!(
            triggers(&events),
            vec![ActionTrigger::HoverEnter, ActionTrigger::ScrollY(-1.0)]
        );

        // Hover entry reset the timer before this frame's delta was counted.
        tree.update(0.25, &scroll);
        let time = tree.get(button).unwrap().time();
        assert!((time - 0.25).abs() < 0.001);
        assert!((tree.get(tree.root()).unwrap().time() - 0.75).abs() < 0.001);
    }

    #[test]
    fn test_hidden_nodes_are_skipped() {
        let (mut tree, button) = button_tree();
        tree.set_visible(button, false).unwrap();
        let events = tree.update(0.016, &PointerState::at(Vec2::new(50.0, 30.0)));
        assert!(events.is_empty());
        assert!(!tree.blocks_pointer(Vec2::new(50.0, 30.0)));
    }

    #[test]
    fn test_hiding_a_panel_resets_nested_buttons() {
        let mut builder = TreeBuilder::new();
        let panel = builder
            .open(NodeSpec::frame().size(SizePolicy::fixed(200.0), SizePolicy::fixed(100.0)))
            .unwrap();
        let button = builder
            .push(NodeSpec::button().size(SizePolicy::fixed(100.0), SizePolicy::fixed(40.0)))
            .unwrap();
        builder.close().unwrap();
        let mut tree = builder.finish().unwrap();
        tree.resolve_layout(Vec2::new(800.0, 600.0));

        let down = PointerState {
            position: Vec2::new(20.0, 20.0),
            pressed: true,
            just_pressed: true,
            ..PointerState::default()
        };
        tree.update(0.016, &down);
        assert!(tree.get(button).unwrap().is_hovered());
        assert!(tree.get(button).unwrap().is_pressed());

        tree.set_visible(panel, false).unwrap();
        tree.set_visible(panel, true).unwrap();
        let node = tree.get(button).unwrap();
        assert!(!node.is_hovered());
        assert!(!node.is_pressed());
    }

    #[test]
    fn test_blocks_pointer() {
        let (tree, _) = button_tree();
        assert!(tree.blocks_pointer(Vec2::new(50.0, 30.0)));
        assert!(!tree.blocks_pointer(Vec2::new(500.0, 500.0)));
    }

    #[test]
    fn test_update_re_resolves_dirty_tree() {
        let mut builder = TreeBuilder::new();
        let label = builder
            .push(NodeSpec::text("a", 10.0, trellis_core::Color::WHITE))
            .unwrap();
        let mut tree = builder.finish().unwrap();
        tree.resolve_layout(Vec2::new(800.0, 600.0));
        let before = tree.size(label).unwrap();

        tree.set_text(label, "a much longer label").unwrap();
        tree.update(0.016, &PointerState::default());

        assert!(!tree.is_dirty(label));
        assert!(tree.size(label).unwrap().x > before.x);
    }
}
