//! Composite widgets assembled from plain nodes.

use trellis_core::{Align, Color, ConfigError, Direction, SizePolicy, TreeError, TrellisError};

use crate::builder::{NodeSpec, TreeBuilder};
use crate::content::ImageContent;
use crate::input::{ActionTrigger, UiEvent};
use crate::tree::{LayoutNodeId, LayoutTree};

/// Look of a [`TextSelector`].
#[derive(Debug, Clone)]
pub struct SelectorStyle {
    pub previous_arrow: ImageContent,
    pub next_arrow: ImageContent,
    pub font_size: f32,
    pub text_color: Color,
}

/// A label flanked by two arrow buttons that cycle through options.
///
/// The selector owns no tree state beyond node ids; feed it the events from
/// [`LayoutTree::update`] through [`handle_event`](Self::handle_event).
#[derive(Debug, Clone)]
pub struct TextSelector {
    root: LayoutNodeId,
    previous: LayoutNodeId,
    next: LayoutNodeId,
    label: LayoutNodeId,
    options: Vec<String>,
    index: usize,
}

impl TextSelector {
    /// Add the selector under the builder's current node.
    ///
    /// `frame` describes the outer container; its children are laid out
    /// left to right regardless of the direction it sets.
    pub fn build(
        builder: &mut TreeBuilder,
        frame: NodeSpec,
        options: Vec<String>,
        style: SelectorStyle,
    ) -> Result<Self, TrellisError> {
        let first = options.first().cloned().ok_or(ConfigError::EmptyOptions)?;

        let arrow = |image: ImageContent| {
            let button = NodeSpec::button().size(SizePolicy::fit(), SizePolicy::grow());
            let icon = NodeSpec::image(image).size(SizePolicy::fit(), SizePolicy::grow());
            (button, icon)
        };

        let mut previous = LayoutNodeId::ROOT;
        let mut next = LayoutNodeId::ROOT;
        let mut label = LayoutNodeId::ROOT;

        let root = builder.scope(frame.direction(Direction::LeftToRight), |b| {
            let (button, icon) = arrow(style.previous_arrow);
            previous = b.scope(button, |b| b.push(icon).map(|_| ()))?;

            let center = NodeSpec::frame()
                .size(SizePolicy::grow(), SizePolicy::grow())
                .align(Align::Center, Align::Center);
            b.scope(center, |b| {
                label = b.push(NodeSpec::text(first, style.font_size, style.text_color))?;
                Ok(())
            })?;

            let (button, icon) = arrow(style.next_arrow);
            next = b.scope(button, |b| b.push(icon).map(|_| ()))?;
            Ok(())
        })?;

        Ok(Self {
            root,
            previous,
            next,
            label,
            options,
            index: 0,
        })
    }

    /// Step through the options on a click release over either arrow.
    /// Returns whether the selection changed.
    pub fn handle_event(&mut self, tree: &mut LayoutTree, event: &UiEvent) -> Result<bool, TreeError> {
        if event.trigger != ActionTrigger::ClickUp {
            return Ok(false);
        }

        let count = self.options.len();
        if event.node == self.previous {
            self.index = (self.index + count - 1) % count;
        } else if event.node == self.next {
            self.index = (self.index + 1) % count;
        } else {
            return Ok(false);
        }

        tree.set_text(self.label, self.selected())?;
        Ok(true)
    }

    pub fn selected(&self) -> &str {
        &self.options[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn root(&self) -> LayoutNodeId {
        self.root
    }

    pub fn label(&self) -> LayoutNodeId {
        self.label
    }

    pub fn previous_button(&self) -> LayoutNodeId {
        self.previous
    }

    pub fn next_button(&self) -> LayoutNodeId {
        self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::PointerState;
    use glam::Vec2;
    use trellis_core::ImageId;

    fn style() -> SelectorStyle {
        SelectorStyle {
            previous_arrow: ImageContent::new(ImageId(1), 16.0, 16.0).unwrap(),
            next_arrow: ImageContent::new(ImageId(2), 16.0, 16.0).unwrap(),
            font_size: 16.0,
            text_color: Color::WHITE,
        }
    }

    fn options() -> Vec<String> {
        ["Low", "Medium", "High"].map(String::from).to_vec()
    }

    fn selector() -> (LayoutTree, TextSelector) {
        let mut builder = TreeBuilder::new();
        let frame = NodeSpec::frame().size(SizePolicy::fixed(300.0), SizePolicy::fixed(40.0));
        let selector = TextSelector::build(&mut builder, frame, options(), style()).unwrap();
        let mut tree = builder.finish().unwrap();
        tree.resolve_layout(Vec2::new(800.0, 600.0));
        (tree, selector)
    }

    fn click(tree: &mut LayoutTree, selector: &mut TextSelector, target: LayoutNodeId) -> bool {
        let center = tree.bounds(target).unwrap();
        let position = Vec2::new(center.x + center.width / 2.0, center.y + center.height / 2.0);
        let mut changed = false;
        let frames = [
            PointerState::at(position),
            PointerState {
                position,
                pressed: true,
                just_pressed: true,
                ..PointerState::default()
            },
            PointerState {
                position,
                just_released: true,
                ..PointerState::default()
            },
        ];
        for frame in frames {
            for event in tree.update(0.016, &frame) {
                changed |= selector.handle_event(tree, &event).unwrap();
            }
        }
        changed
    }

    #[test]
    fn test_layout() {
        let (tree, selector) = selector();
        let previous = tree.bounds(selector.previous_button()).unwrap();
        let next = tree.bounds(selector.next_button()).unwrap();

        // Arrows are square: 40px tall, width follows the image aspect.
        assert!((previous.width - 40.0).abs() < 0.01);
        assert!((previous.height - 40.0).abs() < 0.01);
        assert!((next.x - 260.0).abs() < 0.01);

        let label = tree.get(selector.label()).unwrap();
        assert_eq!(label.content().as_text().unwrap().text(), "Low");
    }

    #[test]
    fn test_cycles_with_wraparound() {
        let (mut tree, mut selector) = selector();
        let (previous, next) = (selector.previous_button(), selector.next_button());

        assert!(click(&mut tree, &mut selector, next));
        assert_eq!(selector.selected(), "Medium");

        click(&mut tree, &mut selector, next);
        click(&mut tree, &mut selector, next);
        assert_eq!(selector.selected(), "Low");

        click(&mut tree, &mut selector, previous);
        assert_eq!(selector.selected(), "High");
        assert_eq!(selector.index(), 2);

        let label = tree.get(selector.label()).unwrap();
        assert_eq!(label.content().as_text().unwrap().text(), "High");
    }

    #[test]
    fn test_other_events_are_ignored() {
        let (mut tree, mut selector) = selector();
        let event = UiEvent {
            node: selector.next_button(),
            name: None,
            trigger: ActionTrigger::HoverEnter,
        };
        assert!(!selector.handle_event(&mut tree, &event).unwrap());

        let event = UiEvent {
            node: selector.root(),
            name: None,
            trigger: ActionTrigger::ClickUp,
        };
        assert!(!selector.handle_event(&mut tree, &event).unwrap());
        assert_eq!(selector.selected(), "Low");
    }

    #[test]
    fn test_needs_options() {
        let mut builder = TreeBuilder::new();
        let err = TextSelector::build(&mut builder, NodeSpec::frame(), Vec::new(), style()).unwrap_err();
        assert!(matches!(err, TrellisError::Config(ConfigError::EmptyOptions)));
    }
}
