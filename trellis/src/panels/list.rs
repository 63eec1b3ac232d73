//! List Panel - a vertical stack that tracks one selected child.

use crate::error::{LayoutError, Result};
use crate::tree::{LayoutTree, NodeId};

use super::{Panel, StackPanel};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ListPanel {
    pub spacing: f32,
    pub selected: Option<usize>,
}

impl ListPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing.max(0.0);
        self
    }

    pub(crate) fn stack(&self) -> StackPanel {
        StackPanel::vertical().spacing(self.spacing)
    }

    /// Keep the selection on the same child after an insert at `index`.
    pub(crate) fn child_inserted(&mut self, index: usize) {
        if let Some(selected) = self.selected.as_mut() {
            if *selected >= index {
                *selected += 1;
            }
        }
    }

    /// Keep the selection on the same child after the child at `index` is
    /// removed; removing the selected child clears it.
    pub(crate) fn child_removed(&mut self, index: usize) {
        self.selected = match self.selected {
            Some(selected) if selected == index => None,
            Some(selected) if selected > index => Some(selected - 1),
            other => other,
        };
    }
}

/// Select the child at `index`; `-1` clears the selection.
pub fn select(tree: &mut LayoutTree, id: NodeId, index: isize) -> Result<()> {
    let count = tree.node(id)?.children.len();
    let selection = match index {
        -1 => None,
        i if i >= 0 && (i as usize) < count => Some(i as usize),
        _ => return Err(LayoutError::IndexOutOfRange { index, count }),
    };

    match tree.panel_mut(id)? {
        Panel::List(list) => {
            list.selected = selection;
            tracing::trace!(?id, ?selection, "list selection changed");
            Ok(())
        }
        other => Err(LayoutError::InvalidArgument(format!("node {id:?} is a {other:?}, not a list"))),
    }
}

pub fn selected(tree: &LayoutTree, id: NodeId) -> Option<usize> {
    match tree.get(id)?.panel() {
        Panel::List(list) => list.selected,
        _ => None,
    }
}

/// The selected child node.
pub fn selected_node(tree: &LayoutTree, id: NodeId) -> Option<NodeId> {
    selected(tree, id).and_then(|index| tree.children(id).get(index).copied())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{Rect, Size};
    use crate::tree::Node;

    fn list_with(count: usize) -> (LayoutTree, NodeId, Vec<NodeId>) {
        let mut tree = LayoutTree::new();
        let list = tree.create(Node::new(Panel::List(ListPanel::new().spacing(2.0))));
        let items = (0..count)
            .map(|_| {
                let item = tree.create(Node::leaf().fixed_height(10.0));
                tree.add_child(list, item).unwrap();
                item
            })
            .collect();
        (tree, list, items)
    }

    #[test]
    fn test_select_within_range() {
        let (mut tree, list, items) = list_with(3);
        assert_eq!(selected(&tree, list), None);

        select(&mut tree, list, 2).unwrap();
        assert_eq!(selected(&tree, list), Some(2));
        assert_eq!(selected_node(&tree, list), Some(items[2]));

        select(&mut tree, list, -1).unwrap();
        assert_eq!(selected(&tree, list), None);
    }

    #[test]
    fn test_select_out_of_range_is_rejected() {
        let (mut tree, list, _) = list_with(3);
        select(&mut tree, list, 1).unwrap();

        assert_eq!(
            select(&mut tree, list, 3).unwrap_err(),
            LayoutError::IndexOutOfRange { index: 3, count: 3 }
        );
        assert_eq!(
            select(&mut tree, list, -2).unwrap_err(),
            LayoutError::IndexOutOfRange { index: -2, count: 3 }
        );
        // Failed selects leave the old selection in place.
        assert_eq!(selected(&tree, list), Some(1));
    }

    #[test]
    fn test_select_on_non_list_fails() {
        let mut tree = LayoutTree::new();
        let leaf = tree.create(Node::leaf());
        assert!(matches!(select(&mut tree, leaf, -1), Err(LayoutError::InvalidArgument(_))));
    }

    #[test]
    fn test_lays_out_as_vertical_stack() {
        let (mut tree, list, items) = list_with(3);
        assert_eq!(tree.measure(list, Size::new(50.0, 100.0)).unwrap(), Size::new(0.0, 34.0));
        tree.layout(list, Rect::new(0.0, 0.0, 50.0, 100.0)).unwrap();
        assert_eq!(tree.bounding_box(items[2]).unwrap(), Rect::new(0.0, 24.0, 50.0, 10.0));
    }

    #[test]
    fn test_selection_follows_child_removal() {
        let (mut tree, list, items) = list_with(3);
        select(&mut tree, list, 2).unwrap();

        tree.remove_child(list, items[0]).unwrap();
        assert_eq!(selected(&tree, list), Some(1));
        assert_eq!(selected_node(&tree, list), Some(items[2]));

        tree.remove_child(list, items[1]).unwrap();
        assert_eq!(tree.children(list).len(), 1);
        assert_eq!(selected(&tree, list), Some(0));
        assert_eq!(selected_node(&tree, list), Some(items[2]));

        tree.remove_child(list, items[2]).unwrap();
        assert_eq!(selected(&tree, list), None);
    }

    #[test]
    fn test_destroying_selected_child_clears_selection() {
        let (mut tree, list, items) = list_with(3);
        select(&mut tree, list, 1).unwrap();
        tree.destroy(items[1]).unwrap();

        assert_eq!(selected(&tree, list), None);
        assert_eq!(tree.children(list).len(), 2);
    }

    #[test]
    fn test_clear_children_clears_selection() {
        let (mut tree, list, _) = list_with(3);
        select(&mut tree, list, 0).unwrap();
        tree.clear_children(list).unwrap();

        assert_eq!(selected(&tree, list), None);
        assert_eq!(selected_node(&tree, list), None);
    }

    #[test]
    fn test_selection_follows_insert_before_it() {
        let (mut tree, list, items) = list_with(2);
        select(&mut tree, list, 1).unwrap();
        let front = tree.create(Node::leaf());
        tree.insert_child(list, 0, front).unwrap();

        assert_eq!(selected(&tree, list), Some(2));
        assert_eq!(selected_node(&tree, list), Some(items[1]));
    }

    #[test]
    fn test_set_panel_rejects_out_of_range_selection() {
        let (mut tree, list, _) = list_with(2);
        let panel = Panel::List(ListPanel {
            spacing: 0.0,
            selected: Some(2),
        });
        assert_eq!(
            tree.set_panel(list, panel).unwrap_err(),
            LayoutError::IndexOutOfRange { index: 2, count: 2 }
        );
        assert_eq!(selected(&tree, list), None);
    }
}
