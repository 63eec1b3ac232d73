//! Stack Panel - children placed one after another along one axis.

use serde::Serialize;

use crate::primitives::{Rect, Size};
use crate::tree::{LayoutTree, NodeId};

use super::{cross, main, size_from, slot};

/// Direction of flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Orientation {
    Horizontal,
    #[default]
    Vertical,
}

/// Linear layout with uniform spacing between children.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackPanel {
    pub orientation: Orientation,
    pub spacing: f32,
}

impl StackPanel {
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            spacing: 0.0,
        }
    }

    pub fn vertical() -> Self {
        Self::new(Orientation::Vertical)
    }

    pub fn horizontal() -> Self {
        Self::new(Orientation::Horizontal)
    }

    /// Set spacing between children.
    pub fn spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing.max(0.0);
        self
    }

    /// Children get an unbounded main axis and the allotted cross axis.
    fn child_allotment(&self, available: Size) -> Size {
        size_from(f32::INFINITY, cross(available, self.orientation), self.orientation)
    }

    pub(crate) fn measure(&self, tree: &mut LayoutTree, id: NodeId, available: Size) -> Size {
        let children = tree.layout_children(id);
        let allotment = self.child_allotment(available);

        let mut total_main = 0.0f32;
        let mut max_cross = 0.0f32;
        for child in &children {
            let size = tree.measure_node(*child, allotment, Size::ZERO);
            total_main += main(size, self.orientation);
            max_cross = max_cross.max(cross(size, self.orientation));
        }
        if children.len() > 1 {
            total_main += self.spacing * (children.len() - 1) as f32;
        }

        size_from(total_main, max_cross, self.orientation)
    }

    pub(crate) fn arrange(&self, tree: &mut LayoutTree, id: NodeId, rect: Rect) {
        let allotment = self.child_allotment(rect.size());
        let mut cursor = 0.0f32;
        for child in tree.layout_children(id) {
            let extent = main(tree.measure_node(child, allotment, Size::ZERO), self.orientation);
            tree.layout_node(child, slot(rect, cursor, extent, self.orientation));
            cursor += extent + self.spacing;
        }
    }
}

impl Default for StackPanel {
    fn default() -> Self {
        Self::vertical()
    }
}
