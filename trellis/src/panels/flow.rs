//! Flow Panel - greedy wrapping, like inline text.

use crate::primitives::{Point, Rect, Size};
use crate::tree::{LayoutTree, NodeId};

use super::{Orientation, cross, main, size_from};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlowDirection {
    /// Rows, wrapping downwards.
    #[default]
    LeftToRight,
    /// Columns, wrapping to the right.
    TopDown,
}

impl FlowDirection {
    fn orientation(self) -> Orientation {
        match self {
            FlowDirection::LeftToRight => Orientation::Horizontal,
            FlowDirection::TopDown => Orientation::Vertical,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FlowPanel {
    pub direction: FlowDirection,
    /// Gap between items on a line.
    pub spacing: f32,
    /// Gap between lines.
    pub line_spacing: f32,
}

/// Result of breaking a sequence of items into lines.
#[derive(Debug, Default)]
struct Lines {
    /// (main, cross) offset of each item.
    offsets: Vec<(f32, f32)>,
    extent: (f32, f32),
}

impl FlowPanel {
    pub fn new(direction: FlowDirection) -> Self {
        Self {
            direction,
            ..Self::default()
        }
    }

    pub fn spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing.max(0.0);
        self
    }

    pub fn line_spacing(mut self, line_spacing: f32) -> Self {
        self.line_spacing = line_spacing.max(0.0);
        self
    }

    /// The one wrap rule both passes share: break when the line already has
    /// an item and the next one would cross `limit`.
    fn break_lines(&self, sizes: &[Size], limit: f32) -> Lines {
        let orientation = self.direction.orientation();
        let mut lines = Lines::default();
        let mut cursor = 0.0f32;
        let mut line_start = 0.0f32;
        let mut line_extent = 0.0f32;
        let mut max_main = 0.0f32;

        for size in sizes {
            let extent = main(*size, orientation);
            if cursor > 0.0 && cursor + extent > limit {
                line_start += line_extent + self.line_spacing;
                cursor = 0.0;
                line_extent = 0.0;
            }
            lines.offsets.push((cursor, line_start));
            max_main = max_main.max(cursor + extent);
            line_extent = line_extent.max(cross(*size, orientation));
            cursor += extent + self.spacing;
        }

        if !sizes.is_empty() {
            lines.extent = (max_main, line_start + line_extent);
        }
        lines
    }

    pub(crate) fn measure(&self, tree: &mut LayoutTree, id: NodeId, available: Size) -> Size {
        let sizes: Vec<Size> = tree
            .layout_children(id)
            .into_iter()
            .map(|child| tree.measure_node(child, available, Size::ZERO))
            .collect();
        let orientation = self.direction.orientation();
        let lines = self.break_lines(&sizes, main(available, orientation));
        size_from(lines.extent.0, lines.extent.1, orientation)
    }

    pub(crate) fn arrange(&self, tree: &mut LayoutTree, id: NodeId, rect: Rect) {
        let children = tree.layout_children(id);
        let sizes: Vec<Size> = children
            .iter()
            .map(|child| tree.measure_node(*child, rect.size(), Size::ZERO))
            .collect();
        let orientation = self.direction.orientation();
        let lines = self.break_lines(&sizes, main(rect.size(), orientation));

        for ((child, size), (main_offset, cross_offset)) in children.into_iter().zip(sizes).zip(lines.offsets) {
            let offset = size_from(main_offset, cross_offset, orientation);
            let origin = rect.origin() + Point::new(offset.width, offset.height);
            tree.layout_node(child, Rect::from_origin_size(origin, size));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panels::Panel;
    use crate::tree::Node;

    fn flow_of(panel: FlowPanel, sizes: &[(f32, f32)]) -> (LayoutTree, NodeId, Vec<NodeId>) {
        let mut tree = LayoutTree::new();
        let flow = tree.create(Node::new(Panel::Flow(panel)));
        let children = sizes
            .iter()
            .map(|(w, h)| {
                let child = tree.create(Node::leaf().fixed_size(*w, *h));
                tree.add_child(flow, child).unwrap();
                child
            })
            .collect();
        (tree, flow, children)
    }

    #[test]
    fn test_wraps_rows_below_tallest_item() {
        let (mut tree, flow, children) = flow_of(
            FlowPanel::new(FlowDirection::LeftToRight).spacing(5.0),
            &[(40.0, 10.0), (40.0, 25.0), (40.0, 10.0)],
        );
        tree.layout(flow, Rect::new(0.0, 0.0, 100.0, 100.0)).unwrap();

        assert_eq!(tree.bounding_box(children[0]).unwrap(), Rect::new(0.0, 0.0, 40.0, 10.0));
        assert_eq!(tree.bounding_box(children[1]).unwrap(), Rect::new(45.0, 0.0, 40.0, 25.0));
        assert_eq!(tree.bounding_box(children[2]).unwrap(), Rect::new(0.0, 25.0, 40.0, 10.0));
    }

    #[test]
    fn test_measure_agrees_with_placement() {
        let (mut tree, flow, _) = flow_of(
            FlowPanel::new(FlowDirection::LeftToRight).spacing(5.0).line_spacing(2.0),
            &[(40.0, 10.0), (40.0, 25.0), (40.0, 10.0)],
        );
        assert_eq!(tree.measure(flow, Size::new(100.0, 100.0)).unwrap(), Size::new(85.0, 37.0));
    }

    #[test]
    fn test_oversized_item_gets_its_own_line() {
        let (mut tree, flow, children) = flow_of(FlowPanel::new(FlowDirection::LeftToRight), &[(150.0, 10.0), (10.0, 10.0)]);
        tree.layout(flow, Rect::new(0.0, 0.0, 100.0, 100.0)).unwrap();
        assert_eq!(tree.bounding_box(children[0]).unwrap().origin(), Point::ORIGIN);
        assert_eq!(tree.bounding_box(children[1]).unwrap().origin(), Point::new(0.0, 10.0));
    }

    #[test]
    fn test_top_down_wraps_into_columns() {
        let (mut tree, flow, children) = flow_of(FlowPanel::new(FlowDirection::TopDown), &[(20.0, 30.0), (10.0, 30.0), (20.0, 30.0)]);
        tree.layout(flow, Rect::new(0.0, 0.0, 100.0, 70.0)).unwrap();

        assert_eq!(tree.bounding_box(children[1]).unwrap().origin(), Point::new(0.0, 30.0));
        assert_eq!(tree.bounding_box(children[2]).unwrap().origin(), Point::new(20.0, 0.0));
    }

    #[test]
    fn test_unbounded_flow_is_one_line() {
        let (mut tree, flow, _) = flow_of(FlowPanel::new(FlowDirection::LeftToRight).spacing(1.0), &[(10.0, 4.0), (10.0, 6.0)]);
        assert_eq!(tree.measure(flow, Size::UNBOUNDED).unwrap(), Size::new(21.0, 6.0));
    }
}
