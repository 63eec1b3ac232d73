//! Layout containers.
//!
//! Each panel supplies the two node-specific hooks of the layout protocol:
//! `measure` (desired content size from the children's desired sizes) and
//! `arrange` (hand every child a rectangle inside the content rectangle).
//! Children with `LayoutVisible == false` are invisible to every algorithm.

pub mod advanced_stack;
pub mod canvas;
pub mod dock;
pub mod flow;
pub mod list;
pub mod stack;

pub use advanced_stack::AdvancedStackPanel;
pub use canvas::Anchor;
pub use dock::DockSide;
pub use flow::{FlowDirection, FlowPanel};
pub use list::ListPanel;
pub use stack::{Orientation, StackPanel};

use crate::primitives::{Rect, Size};
use crate::tree::{LayoutTree, NodeId};

/// Layout algorithm of a node.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Panel {
    /// Sized by its content; any children overlay the full content rectangle.
    #[default]
    Leaf,
    /// Anchored/absolute placement.
    Canvas,
    /// Children docked to edges, the last one fills the rest.
    Dock,
    Stack(StackPanel),
    /// Stack whose children may share leftover space by ratio.
    AdvancedStack(AdvancedStackPanel),
    /// Greedy line wrapping.
    Flow(FlowPanel),
    /// Vertical stack with a selected index.
    List(ListPanel),
}

impl Panel {
    pub(crate) fn measure_content(tree: &mut LayoutTree, id: NodeId, available: Size) -> Size {
        let panel = tree.nodes[id].panel;
        match panel {
            Panel::Leaf => measure_leaf(tree, id, available),
            Panel::Canvas => canvas::measure(tree, id, available),
            Panel::Dock => dock::measure(tree, id, available),
            Panel::Stack(stack) => stack.measure(tree, id, available),
            Panel::AdvancedStack(stack) => stack.measure(tree, id, available),
            Panel::Flow(flow) => flow.measure(tree, id, available),
            Panel::List(list) => list.stack().measure(tree, id, available),
        }
    }

    pub(crate) fn arrange_content(tree: &mut LayoutTree, id: NodeId, rect: Rect) {
        let panel = tree.nodes[id].panel;
        match panel {
            Panel::Leaf => {
                for child in tree.layout_children(id) {
                    tree.layout_node(child, rect);
                }
            }
            Panel::Canvas => canvas::arrange(tree, id, rect),
            Panel::Dock => dock::arrange(tree, id, rect),
            Panel::Stack(stack) => stack.arrange(tree, id, rect),
            Panel::AdvancedStack(stack) => stack.arrange(tree, id, rect),
            Panel::Flow(flow) => flow.arrange(tree, id, rect),
            Panel::List(list) => list.stack().arrange(tree, id, rect),
        }

        // Excluded children still get their geometry zeroed.
        let hidden: Vec<NodeId> = tree.nodes[id]
            .children
            .iter()
            .copied()
            .filter(|c| !tree.nodes[*c].layout_visible)
            .collect();
        for child in hidden {
            tree.layout_node(child, Rect::ZERO);
        }
    }
}

fn measure_leaf(tree: &mut LayoutTree, id: NodeId, available: Size) -> Size {
    let mut size = tree.nodes[id]
        .content
        .as_ref()
        .map_or(Size::ZERO, |content| content.measure(available));
    for child in tree.layout_children(id) {
        size = size.max(tree.measure_node(child, available, Size::ZERO));
    }
    size
}

// =========================================================================
// Axis helpers
// =========================================================================

/// Main-axis component of `size`.
#[inline]
pub(crate) fn main(size: Size, orientation: Orientation) -> f32 {
    match orientation {
        Orientation::Horizontal => size.width,
        Orientation::Vertical => size.height,
    }
}

/// Cross-axis component of `size`.
#[inline]
pub(crate) fn cross(size: Size, orientation: Orientation) -> f32 {
    match orientation {
        Orientation::Horizontal => size.height,
        Orientation::Vertical => size.width,
    }
}

#[inline]
pub(crate) fn size_from(main: f32, cross: f32, orientation: Orientation) -> Size {
    match orientation {
        Orientation::Horizontal => Size::new(main, cross),
        Orientation::Vertical => Size::new(cross, main),
    }
}

/// Child rectangle at `offset` along the main axis of `rect`, spanning its full cross axis.
#[inline]
pub(crate) fn slot(rect: Rect, offset: f32, extent: f32, orientation: Orientation) -> Rect {
    match orientation {
        Orientation::Horizontal => Rect::new(rect.x + offset, rect.y, extent, rect.height),
        Orientation::Vertical => Rect::new(rect.x, rect.y + offset, rect.width, extent),
    }
}
