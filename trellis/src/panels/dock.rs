//! Dock Panel - children carved off the edges, the last one fills the rest.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::primitives::{Rect, Size};
use crate::tree::{LayoutTree, NodeId};

pub const DOCK: &str = "Dock.Side";

/// Edge a child docks to. The last child ignores its side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DockSide {
    #[default]
    Top,
    Left,
    Bottom,
    Right,
}

pub fn set_dock(tree: &mut LayoutTree, id: NodeId, side: DockSide) -> Result<()> {
    tree.set_attached(id, DOCK, Some(side))
}

pub fn dock_side(tree: &LayoutTree, id: NodeId) -> DockSide {
    tree.get_attached(id, DOCK).unwrap_or_default()
}

pub(crate) fn measure(tree: &mut LayoutTree, id: NodeId, available: Size) -> Size {
    let children = tree.layout_children(id);
    let Some((last, docked)) = children.split_last() else {
        return Size::ZERO;
    };

    // Space consumed by docked children, and the extent needed so far.
    let mut used = Size::ZERO;
    let mut extent = Size::ZERO;

    for child in docked {
        let size = tree.measure_node(*child, available.saturating_sub(used), Size::ZERO);
        match dock_side(tree, *child) {
            DockSide::Left | DockSide::Right => {
                extent.height = extent.height.max(used.height + size.height);
                used.width += size.width;
            }
            DockSide::Top | DockSide::Bottom => {
                extent.width = extent.width.max(used.width + size.width);
                used.height += size.height;
            }
        }
    }

    let fill = tree.measure_node(*last, available.saturating_sub(used), Size::ZERO);
    Size::new(
        extent.width.max(used.width + fill.width),
        extent.height.max(used.height + fill.height),
    )
}

pub(crate) fn arrange(tree: &mut LayoutTree, id: NodeId, rect: Rect) {
    let children = tree.layout_children(id);
    let Some((last, docked)) = children.split_last() else {
        return;
    };

    let mut remaining = rect;
    for child in docked {
        let size = tree.measure_node(*child, remaining.size(), Size::ZERO);
        let (slot, rest) = carve(remaining, dock_side(tree, *child), size);
        tree.layout_node(*child, slot);
        remaining = rest;
    }
    tree.layout_node(*last, remaining);
}

/// Split `rect` into the docked child's slot and what is left over.
fn carve(rect: Rect, side: DockSide, size: Size) -> (Rect, Rect) {
    match side {
        DockSide::Left => {
            let w = size.width.min(rect.width);
            (
                Rect::new(rect.x, rect.y, w, rect.height),
                Rect::new(rect.x + w, rect.y, rect.width - w, rect.height),
            )
        }
        DockSide::Right => {
            let w = size.width.min(rect.width);
            (
                Rect::new(rect.right() - w, rect.y, w, rect.height),
                Rect::new(rect.x, rect.y, rect.width - w, rect.height),
            )
        }
        DockSide::Top => {
            let h = size.height.min(rect.height);
            (
                Rect::new(rect.x, rect.y, rect.width, h),
                Rect::new(rect.x, rect.y + h, rect.width, rect.height - h),
            )
        }
        DockSide::Bottom => {
            let h = size.height.min(rect.height);
            (
                Rect::new(rect.x, rect.bottom() - h, rect.width, h),
                Rect::new(rect.x, rect.y, rect.width, rect.height - h),
            )
        }
    }
}
