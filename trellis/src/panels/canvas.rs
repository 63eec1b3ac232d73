//! Canvas - anchored and absolute placement.
//!
//! Every child is positioned independently from attached properties:
//!
//! ```text
//! anchor point = parent.origin + parent.size * (anchor.left, anchor.top)
//! position     = anchor point + Canvas.Position
//! size         = AutoSize ? desired size
//!                         : Canvas.Size + parent.size * (anchor.right, anchor.bottom)
//! rect         = (position - Canvas.Origin * size, size)
//! ```
//!
//! With no properties set a child fills the canvas.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::primitives::{Point, Rect, Size};
use crate::tree::{LayoutTree, NodeId};

pub const ANCHOR: &str = "Canvas.Anchor";
pub const POSITION: &str = "Canvas.Position";
pub const AUTO_SIZE: &str = "Canvas.AutoSize";
pub const SIZE: &str = "Canvas.Size";
pub const ORIGIN: &str = "Canvas.Origin";

/// Fractional reference points (0..1) relative to the parent's bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Anchor {
    /// Pinned to the top-left corner, no stretch.
    pub const TOP_LEFT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    pub const FILL: Self = Self::new(0.0, 0.0, 1.0, 1.0);

    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self { left, top, right, bottom }
    }
}

impl Default for Anchor {
    fn default() -> Self {
        Self::FILL
    }
}

pub fn set_anchor(tree: &mut LayoutTree, id: NodeId, anchor: Anchor) -> Result<()> {
    tree.set_attached(id, ANCHOR, Some(anchor))
}

pub fn set_position(tree: &mut LayoutTree, id: NodeId, position: Point) -> Result<()> {
    tree.set_attached(id, POSITION, Some(position))
}

/// Size the child to its desired size instead of `Canvas.Size` plus stretch.
pub fn set_auto_size(tree: &mut LayoutTree, id: NodeId, auto_size: bool) -> Result<()> {
    tree.set_attached(id, AUTO_SIZE, Some(auto_size))
}

pub fn set_size(tree: &mut LayoutTree, id: NodeId, size: Size) -> Result<()> {
    tree.set_attached(id, SIZE, Some(size))
}

/// Pivot as a fraction of the child's own size.
pub fn set_origin(tree: &mut LayoutTree, id: NodeId, origin: Point) -> Result<()> {
    tree.set_attached(id, ORIGIN, Some(origin))
}

/// Placement properties of one child, with defaults filled in.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Placement {
    anchor: Anchor,
    position: Point,
    auto_size: bool,
    size: Size,
    origin: Point,
}

impl Placement {
    fn of(tree: &LayoutTree, id: NodeId) -> Self {
        Self {
            anchor: tree.get_attached(id, ANCHOR).unwrap_or_default(),
            position: tree.get_attached(id, POSITION).unwrap_or_default(),
            auto_size: tree.get_attached(id, AUTO_SIZE).unwrap_or(false),
            size: tree.get_attached(id, SIZE).unwrap_or(Size::ZERO),
            origin: tree.get_attached(id, ORIGIN).unwrap_or_default(),
        }
    }

    fn rect(&self, parent: Rect, desired: Size) -> Rect {
        let anchor_point = parent.origin() + parent.size() * Point::new(self.anchor.left, self.anchor.top);
        let position = anchor_point + self.position;

        let size = if self.auto_size {
            desired
        } else {
            let stretch = parent.size() * Point::new(self.anchor.right, self.anchor.bottom);
            Size::new(
                (self.size.width + stretch.x).max(0.0),
                (self.size.height + stretch.y).max(0.0),
            )
        };

        let pivot = size * self.origin;
        Rect::from_origin_size(position - pivot, size)
    }
}

/// Bounding size over all children (max, not sum).
pub(crate) fn measure(tree: &mut LayoutTree, id: NodeId, available: Size) -> Size {
    let mut size = Size::ZERO;
    for child in tree.layout_children(id) {
        size = size.max(tree.measure_node(child, available, Size::ZERO));
    }
    size
}

pub(crate) fn arrange(tree: &mut LayoutTree, id: NodeId, rect: Rect) {
    for child in tree.layout_children(id) {
        let desired = tree.measure_node(child, rect.size(), Size::ZERO);
        let placement = Placement::of(tree, child);
        tree.layout_node(child, placement.rect(rect, desired));
    }
}
