//! Advanced Stack Panel - a stack whose children can share leftover space.
//!
//! A child is either AutoSize (its natural main-axis extent) or Fill. Fill
//! children split whatever the AutoSize children and spacing leave over:
//! each gets `(remaining / fill_count) * ratio`.

use crate::error::{LayoutError, Result};
use crate::primitives::{Rect, Size};
use crate::tree::{LayoutTree, NodeId};

use super::{Orientation, cross, main, size_from, slot};

pub const AUTO_SIZE: &str = "AdvancedStack.AutoSize";
pub const FILL_RATIO: &str = "AdvancedStack.FillRatio";

/// Make `id` a Fill child with the given share of the leftover space.
pub fn set_fill(tree: &mut LayoutTree, id: NodeId, ratio: f32) -> Result<()> {
    if !(0.0..=1.0).contains(&ratio) {
        return Err(LayoutError::InvalidArgument(format!("fill ratio {ratio} outside [0, 1]")));
    }
    tree.set_attached(id, AUTO_SIZE, Some(false))?;
    tree.set_attached(id, FILL_RATIO, Some(ratio))
}

pub fn set_auto_size(tree: &mut LayoutTree, id: NodeId, auto_size: bool) -> Result<()> {
    tree.set_attached(id, AUTO_SIZE, Some(auto_size))
}

/// `None` for AutoSize children, otherwise the fill ratio.
fn fill_ratio(tree: &LayoutTree, id: NodeId) -> Option<f32> {
    if tree.get_attached(id, AUTO_SIZE).unwrap_or(true) {
        return None;
    }
    Some(tree.get_attached(id, FILL_RATIO).unwrap_or(1.0f32).clamp(0.0, 1.0))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdvancedStackPanel {
    pub orientation: Orientation,
    pub spacing: f32,
}

impl AdvancedStackPanel {
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

    pub fn spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing.max(0.0);
        self
    }

    /// Sum of AutoSize extents plus spacing, and the number of Fill children.
    fn measure_auto(&self, tree: &mut LayoutTree, children: &[NodeId], cross_extent: f32) -> (f32, f32, usize) {
        let allotment = size_from(f32::INFINITY, cross_extent, self.orientation);
        let mut used = 0.0f32;
        let mut max_cross = 0.0f32;
        let mut fills = 0;
        for child in children {
            if fill_ratio(tree, *child).is_some() {
                fills += 1;
                continue;
            }
            let size = tree.measure_node(*child, allotment, Size::ZERO);
            used += main(size, self.orientation);
            max_cross = max_cross.max(cross(size, self.orientation));
        }
        if children.len() > 1 {
            used += self.spacing * (children.len() - 1) as f32;
        }
        (used, max_cross, fills)
    }

    pub(crate) fn measure(&self, tree: &mut LayoutTree, id: NodeId, available: Size) -> Size {
        let children = tree.layout_children(id);
        let available_main = main(available, self.orientation);
        let available_cross = cross(available, self.orientation);

        let (mut total, mut max_cross, fills) = self.measure_auto(tree, &children, available_cross);
        let remaining = (available_main - total).max(0.0);

        for child in &children {
            let Some(ratio) = fill_ratio(tree, *child) else {
                continue;
            };
            if available_main.is_finite() {
                let share = remaining / fills as f32 * ratio;
                let size = tree.measure_node(*child, size_from(share, available_cross, self.orientation), Size::ZERO);
                total += share;
                max_cross = max_cross.max(cross(size, self.orientation));
            } else {
                // Nothing to share; a fill child is as large as it wants to be.
                let size = tree.measure_node(*child, available, Size::ZERO);
                total += main(size, self.orientation);
                max_cross = max_cross.max(cross(size, self.orientation));
            }
        }

        size_from(total, max_cross, self.orientation)
    }

    pub(crate) fn arrange(&self, tree: &mut LayoutTree, id: NodeId, rect: Rect) {
        let children = tree.layout_children(id);
        let rect_main = main(rect.size(), self.orientation);
        let rect_cross = cross(rect.size(), self.orientation);

        let (used, _, fills) = self.measure_auto(tree, &children, rect_cross);
        let remaining = (rect_main - used).max(0.0);
        let auto_allotment = size_from(f32::INFINITY, rect_cross, self.orientation);

        let mut cursor = 0.0f32;
        for child in children {
            let extent = match fill_ratio(tree, child) {
                Some(ratio) => remaining / fills as f32 * ratio,
                None => main(tree.measure_node(child, auto_allotment, Size::ZERO), self.orientation),
            };
            tree.layout_node(child, slot(rect, cursor, extent, self.orientation));
            cursor += extent + self.spacing;
        }
    }
}

impl Default for AdvancedStackPanel {
    fn default() -> Self {
        Self::vertical()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panels::Panel;
    use crate::tree::Node;

    fn panel(tree: &mut LayoutTree, stack: AdvancedStackPanel) -> NodeId {
        tree.create(Node::new(Panel::AdvancedStack(stack)))
    }

    fn child(tree: &mut LayoutTree, parent: NodeId, node: Node) -> NodeId {
        let id = tree.create(node);
        tree.add_child(parent, id).unwrap();
        id
    }

    #[test]
    fn test_fill_child_takes_leftover() {
        let mut tree = LayoutTree::new();
        let stack = panel(&mut tree, AdvancedStackPanel::vertical());
        let auto = child(&mut tree, stack, Node::leaf().fixed_height(30.0));
        let fill = child(&mut tree, stack, Node::leaf());
        set_fill(&mut tree, fill, 1.0).unwrap();

        tree.layout(stack, Rect::new(0.0, 0.0, 50.0, 100.0)).unwrap();
        assert_eq!(tree.bounding_box(auto).unwrap(), Rect::new(0.0, 0.0, 50.0, 30.0));
        assert_eq!(tree.bounding_box(fill).unwrap(), Rect::new(0.0, 30.0, 50.0, 70.0));
    }

    #[test]
    fn test_measure_matches_arrange() {
        let mut tree = LayoutTree::new();
        let stack = panel(&mut tree, AdvancedStackPanel::horizontal().spacing(10.0));
        child(&mut tree, stack, Node::leaf().fixed_size(20.0, 5.0));
        let a = child(&mut tree, stack, Node::leaf());
        let b = child(&mut tree, stack, Node::leaf().fixed_height(15.0));
        set_fill(&mut tree, a, 1.0).unwrap();
        set_fill(&mut tree, b, 0.5).unwrap();

        // 200 - 20 - 2 * 10 = 160 left, 80 per fill slot.
        let size = tree.measure(stack, Size::new(200.0, 40.0)).unwrap();
        assert_eq!(size, Size::new(20.0 + 20.0 + 80.0 + 40.0, 15.0));

        tree.layout(stack, Rect::new(0.0, 0.0, 200.0, 40.0)).unwrap();
        assert_eq!(tree.bounding_box(a).unwrap(), Rect::new(30.0, 0.0, 80.0, 40.0));
        assert_eq!(tree.bounding_box(b).unwrap(), Rect::new(120.0, 0.0, 40.0, 40.0));
    }

    #[test]
    fn test_leftover_never_goes_negative() {
        let mut tree = LayoutTree::new();
        let stack = panel(&mut tree, AdvancedStackPanel::vertical());
        child(&mut tree, stack, Node::leaf().fixed_height(150.0));
        let fill = child(&mut tree, stack, Node::leaf());
        set_fill(&mut tree, fill, 1.0).unwrap();

        tree.layout(stack, Rect::new(0.0, 0.0, 10.0, 100.0)).unwrap();
        assert_eq!(tree.bounding_box(fill).unwrap(), Rect::ZERO);
    }

    #[test]
    fn test_unbounded_fill_uses_own_extent() {
        let mut tree = LayoutTree::new();
        let stack = panel(&mut tree, AdvancedStackPanel::vertical());
        child(&mut tree, stack, Node::leaf().fixed_height(30.0));
        let fill = child(&mut tree, stack, Node::leaf().fixed_height(12.0));
        set_fill(&mut tree, fill, 0.5).unwrap();

        assert_eq!(tree.measure(stack, Size::UNBOUNDED).unwrap().height, 42.0);
    }

    #[test]
    fn test_fill_ratio_is_validated() {
        let mut tree = LayoutTree::new();
        let id = tree.create(Node::leaf());
        assert!(matches!(set_fill(&mut tree, id, 1.5), Err(LayoutError::InvalidArgument(_))));
        assert!(tree.attached(id).unwrap().is_empty());

        set_fill(&mut tree, id, 0.25).unwrap();
        assert_eq!(fill_ratio(&tree, id), Some(0.25));
        set_auto_size(&mut tree, id, true).unwrap();
        assert_eq!(fill_ratio(&tree, id), None);
    }
}
