//! The layout tree.
//!
//! Nodes live in a slot arena and refer to each other by [`NodeId`]. A node's
//! child list is the only ownership edge; the parent link is a plain id. A node
//! is either parentless (a root, or detached and waiting to be re-attached) or
//! held by exactly one parent's child list.
//!
//! ```text
//! mutation -> invalidate_measure (up) / invalidate_arrangement (down)
//!          -> layout(root, viewport) -> measure + arrange dirty subtrees
//! ```

mod measure;
mod node;
mod paint;

pub use node::{Alignment, BoxModel, Node, NodeId};

use slotmap::SlotMap;

use crate::attached::{AttachedProperties, AttachedValue};
use crate::content::Content;
use crate::error::{LayoutError, Result};
use crate::panels::{ListPanel, Panel};
use crate::primitives::{Rect, Size};

/// Arena of layout nodes.
#[derive(Debug, Default)]
pub struct LayoutTree {
    pub(crate) nodes: SlotMap<NodeId, Node>,
}

impl LayoutTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a parentless node.
    pub fn create(&mut self, node: Node) -> NodeId {
        let id = self.nodes.insert(node);
        tracing::trace!(?id, "created node");
        id
    }

    /// Detach `id` from its parent and drop it together with its whole subtree.
    pub fn destroy(&mut self, id: NodeId) -> Result<()> {
        let parent = self.node(id)?.parent;
        if let Some(parent) = parent {
            self.remove_child(parent, id)?;
        }

        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(current) {
                stack.extend(node.children);
            }
        }
        tracing::debug!(?id, "destroyed subtree");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub(crate) fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(id).ok_or(LayoutError::NodeNotFound(id))
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes.get_mut(id).ok_or(LayoutError::NodeNotFound(id))
    }

    // =========================================================================
    // Structure
    // =========================================================================

    /// Append `child` to `parent`'s child list.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        let count = self.node(parent)?.children.len();
        self.insert_child(parent, count, child)
    }

    /// Insert `child` at `index` in `parent`'s child list.
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) -> Result<()> {
        let count = self.node(parent)?.children.len();
        if let Some(existing) = self.node(child)?.parent {
            return Err(LayoutError::AlreadyParented { child, parent: existing });
        }
        if child == parent || self.is_ancestor(child, parent) {
            return Err(LayoutError::WouldCreateCycle { child, parent });
        }
        if index > count {
            return Err(LayoutError::IndexOutOfRange {
                index: index as isize,
                count,
            });
        }

        self.nodes[parent].children.insert(index, child);
        self.nodes[child].parent = Some(parent);
        if let Panel::List(list) = &mut self.nodes[parent].panel {
            list.child_inserted(index);
        }
        tracing::trace!(?parent, ?child, index, "attached child");
        self.invalidate_measure_node(child);
        Ok(())
    }

    /// Remove `child` from `parent`, leaving it parentless but alive.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        let node = self.node(parent)?;
        let Some(index) = node.children.iter().position(|c| *c == child) else {
            return Err(LayoutError::NotAChild { child, parent });
        };

        self.nodes[parent].children.remove(index);
        if let Panel::List(list) = &mut self.nodes[parent].panel {
            list.child_removed(index);
        }
        if let Some(detached) = self.nodes.get_mut(child) {
            detached.parent = None;
        }
        tracing::trace!(?parent, ?child, "detached child");
        self.invalidate_measure_node(parent);
        // The detached node's cached geometry belongs to its old position.
        self.invalidate_measure_node(child);
        Ok(())
    }

    /// Detach every child of `parent`, returning them in their former order.
    pub fn clear_children(&mut self, parent: NodeId) -> Result<Vec<NodeId>> {
        let node = self.node_mut(parent)?;
        let children = std::mem::take(&mut node.children);
        if let Panel::List(list) = &mut node.panel {
            list.selected = None;
        }
        for child in &children {
            if let Some(node) = self.nodes.get_mut(*child) {
                node.parent = None;
            }
            self.invalidate_measure_node(*child);
        }
        self.invalidate_measure_node(parent);
        Ok(children)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Iterate the ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |current| self.parent(*current))
    }

    /// Whether `ancestor` is a strict ancestor of `id`.
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }

    /// The deepest node that is `a` or an ancestor of `a`, and also `b` or an ancestor of `b`.
    pub fn nearest_common_ancestor(&self, a: NodeId, b: NodeId) -> Option<NodeId> {
        let chain: Vec<NodeId> = std::iter::once(b).chain(self.ancestors(b)).collect();
        std::iter::once(a)
            .chain(self.ancestors(a))
            .find(|candidate| chain.contains(candidate))
    }

    /// Depth-first search of the subtree at `root` for a node with the given name.
    pub fn find_by_name(&self, root: NodeId, name: &str) -> Option<NodeId> {
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let node = self.nodes.get(id)?;
            if node.name.as_deref() == Some(name) {
                return Some(id);
            }
            stack.extend(node.children.iter().rev());
        }
        None
    }

    pub fn desired_size(&self, id: NodeId) -> Option<Size> {
        self.nodes.get(id).map(|n| n.desired_size)
    }

    pub fn bounding_box(&self, id: NodeId) -> Option<Rect> {
        self.nodes.get(id).map(|n| n.bounding_box)
    }

    pub fn content_rect(&self, id: NodeId) -> Option<Rect> {
        self.nodes.get(id).map(|n| n.content_rect)
    }

    pub fn is_measure_valid(&self, id: NodeId) -> bool {
        self.nodes.get(id).is_some_and(|n| n.measure_valid)
    }

    pub fn is_arrange_dirty(&self, id: NodeId) -> bool {
        self.nodes.get(id).is_some_and(|n| n.arrange_dirty)
    }

    /// Own opacity multiplied by every ancestor's.
    pub fn computed_opacity(&self, id: NodeId) -> f32 {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .filter_map(|n| self.nodes.get(n))
            .map(|n| n.opacity)
            .product()
    }

    /// Children that take part in layout, in insertion order.
    pub(crate) fn layout_children(&self, id: NodeId) -> Vec<NodeId> {
        self.nodes[id]
            .children
            .iter()
            .copied()
            .filter(|c| self.nodes[*c].layout_visible)
            .collect()
    }

    // =========================================================================
    // Property mutation
    // =========================================================================

    /// Edit the box model of `id`; the edit is rolled back if it leaves a
    /// negative or non-finite length.
    pub fn set_box(&mut self, id: NodeId, edit: impl FnOnce(&mut BoxModel)) -> Result<()> {
        let node = self.node_mut(id)?;
        let mut layout = node.layout;
        edit(&mut layout);
        if !layout.is_valid() {
            return Err(LayoutError::InvalidArgument(format!("box model {layout:?} has negative or non-finite lengths")));
        }
        node.layout = layout;
        self.invalidate_measure_node(id);
        Ok(())
    }

    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> Result<()> {
        self.node_mut(id)?.visible = visible;
        Ok(())
    }

    /// Include or exclude `id` (and its subtree) from layout entirely.
    pub fn set_layout_visible(&mut self, id: NodeId, layout_visible: bool) -> Result<()> {
        let node = self.node_mut(id)?;
        if node.layout_visible == layout_visible {
            return Ok(());
        }
        node.layout_visible = layout_visible;
        // Force a fresh measurement either way so the cached zero (or the
        // stale visible size) is not reused.
        node.measure_valid = true;
        self.invalidate_measure_node(id);
        Ok(())
    }

    pub fn set_enabled(&mut self, id: NodeId, enabled: bool) -> Result<()> {
        self.node_mut(id)?.enabled = enabled;
        Ok(())
    }

    pub fn set_opacity(&mut self, id: NodeId, opacity: f32) -> Result<()> {
        if !(0.0..=1.0).contains(&opacity) {
            return Err(LayoutError::InvalidArgument(format!("opacity {opacity} outside [0, 1]")));
        }
        self.node_mut(id)?.opacity = opacity;
        Ok(())
    }

    pub fn set_clip_children(&mut self, id: NodeId, clip: bool) -> Result<()> {
        self.node_mut(id)?.clip_children = clip;
        Ok(())
    }

    pub fn set_name(&mut self, id: NodeId, name: Option<String>) -> Result<()> {
        self.node_mut(id)?.name = name;
        Ok(())
    }

    /// Replace the layout algorithm of `id`.
    pub fn set_panel(&mut self, id: NodeId, panel: Panel) -> Result<()> {
        let node = self.node_mut(id)?;
        if let Panel::List(ListPanel {
            selected: Some(index), ..
        }) = panel
        {
            let count = node.children.len();
            if index >= count {
                return Err(LayoutError::IndexOutOfRange {
                    index: index as isize,
                    count,
                });
            }
        }
        node.panel = panel;
        self.invalidate_measure_node(id);
        Ok(())
    }

    pub(crate) fn panel_mut(&mut self, id: NodeId) -> Result<&mut Panel> {
        Ok(&mut self.node_mut(id)?.panel)
    }

    pub fn set_content(&mut self, id: NodeId, content: Option<Box<dyn Content>>) -> Result<()> {
        self.node_mut(id)?.content = content;
        self.invalidate_measure_node(id);
        Ok(())
    }

    // =========================================================================
    // Attached properties
    // =========================================================================

    pub fn attached(&self, id: NodeId) -> Option<&AttachedProperties> {
        self.nodes.get(id).map(|n| &n.attached)
    }

    /// Typed read of an attached property; `None` if missing or of another type.
    pub fn get_attached<T: AttachedValue>(&self, id: NodeId, name: &str) -> Option<T> {
        self.nodes.get(id).and_then(|n| n.attached.get(name))
    }

    /// Set (or with `None`, remove) an attached property and invalidate the owner.
    pub fn set_attached<T: AttachedValue>(&mut self, id: NodeId, name: &str, value: Option<T>) -> Result<()> {
        if name.is_empty() {
            return Err(LayoutError::InvalidArgument("attached property name is empty".into()));
        }
        self.node_mut(id)?.attached.set(name, value.map(AttachedValue::into_value));
        self.invalidate_measure_node(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panels::StackPanel;

    fn tree_with_chain() -> (LayoutTree, NodeId, NodeId, NodeId) {
        let mut tree = LayoutTree::new();
        let root = tree.create(Node::new(Panel::Stack(StackPanel::vertical())));
        let mid = tree.create(Node::new(Panel::Stack(StackPanel::vertical())));
        let leaf = tree.create(Node::leaf());
        tree.add_child(root, mid).unwrap();
        tree.add_child(mid, leaf).unwrap();
        (tree, root, mid, leaf)
    }

    #[test]
    fn add_child_sets_parent() {
        let (tree, root, mid, leaf) = tree_with_chain();
        assert_eq!(tree.parent(mid), Some(root));
        assert_eq!(tree.parent(leaf), Some(mid));
        assert_eq!(tree.children(root), &[mid]);
        assert_eq!(tree.ancestors(leaf).collect::<Vec<_>>(), vec![mid, root]);
    }

    #[test]
    fn reparenting_is_rejected() {
        let (mut tree, root, _mid, leaf) = tree_with_chain();
        let err = tree.add_child(root, leaf).unwrap_err();
        assert!(matches!(err, LayoutError::AlreadyParented { .. }));
    }

    #[test]
    fn cycles_are_rejected() {
        let (mut tree, root, _mid, leaf) = tree_with_chain();
        let err = tree.add_child(leaf, root).unwrap_err();
        assert!(matches!(err, LayoutError::WouldCreateCycle { .. }));
        let err = tree.add_child(root, root).unwrap_err();
        assert!(matches!(err, LayoutError::WouldCreateCycle { .. }));
    }

    #[test]
    fn insert_child_checks_index() {
        let (mut tree, root, _mid, _leaf) = tree_with_chain();
        let extra = tree.create(Node::leaf());
        let err = tree.insert_child(root, 5, extra).unwrap_err();
        assert_eq!(err, LayoutError::IndexOutOfRange { index: 5, count: 1 });
        tree.insert_child(root, 0, extra).unwrap();
        assert_eq!(tree.children(root)[0], extra);
    }

    #[test]
    fn remove_child_detaches_and_allows_reattach() {
        let (mut tree, root, mid, leaf) = tree_with_chain();
        tree.remove_child(mid, leaf).unwrap();
        assert_eq!(tree.parent(leaf), None);
        assert!(tree.children(mid).is_empty());

        let err = tree.remove_child(mid, leaf).unwrap_err();
        assert!(matches!(err, LayoutError::NotAChild { .. }));

        tree.add_child(root, leaf).unwrap();
        assert_eq!(tree.parent(leaf), Some(root));
    }

    #[test]
    fn destroy_drops_subtree() {
        let (mut tree, root, mid, leaf) = tree_with_chain();
        tree.destroy(mid).unwrap();
        assert!(!tree.contains(mid));
        assert!(!tree.contains(leaf));
        assert!(tree.children(root).is_empty());
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.destroy(mid).unwrap_err(), LayoutError::NodeNotFound(mid));
    }

    #[test]
    fn nearest_common_ancestor() {
        let (mut tree, root, mid, leaf) = tree_with_chain();
        let sibling = tree.create(Node::leaf());
        tree.add_child(root, sibling).unwrap();

        assert_eq!(tree.nearest_common_ancestor(leaf, sibling), Some(root));
        assert_eq!(tree.nearest_common_ancestor(leaf, mid), Some(mid));
        assert_eq!(tree.nearest_common_ancestor(leaf, leaf), Some(leaf));

        let orphan = tree.create(Node::leaf());
        assert_eq!(tree.nearest_common_ancestor(leaf, orphan), None);
    }

    #[test]
    fn find_by_name_searches_subtree() {
        let mut tree = LayoutTree::new();
        let root = tree.create(Node::leaf().name("root"));
        let child = tree.create(Node::leaf().name("ok-button"));
        tree.add_child(root, child).unwrap();
        assert_eq!(tree.find_by_name(root, "ok-button"), Some(child));
        assert_eq!(tree.find_by_name(child, "root"), None);
    }

    #[test]
    fn computed_opacity_multiplies_ancestors() {
        let mut tree = LayoutTree::new();
        let root = tree.create(Node::leaf().opacity(0.5));
        let child = tree.create(Node::leaf().opacity(0.5));
        tree.add_child(root, child).unwrap();
        assert_eq!(tree.computed_opacity(child), 0.25);

        assert!(matches!(tree.set_opacity(child, 1.5), Err(LayoutError::InvalidArgument(_))));
        tree.set_opacity(child, 1.0).unwrap();
        assert_eq!(tree.computed_opacity(child), 0.5);
    }

    #[test]
    fn set_box_rolls_back_invalid_edits() {
        let mut tree = LayoutTree::new();
        let id = tree.create(Node::leaf().fixed_width(10.0));
        let err = tree.set_box(id, |b| b.fixed_width = -3.0).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidArgument(_)));
        assert_eq!(tree.get(id).unwrap().box_model().fixed_width, 10.0);
    }

    #[test]
    fn attached_properties_round_trip_through_tree() {
        let mut tree = LayoutTree::new();
        let id = tree.create(Node::leaf());
        tree.set_attached(id, "Custom.Weight", Some(2.0f32)).unwrap();
        assert_eq!(tree.get_attached::<f32>(id, "Custom.Weight"), Some(2.0));
        tree.set_attached::<f32>(id, "Custom.Weight", None).unwrap();
        assert!(tree.attached(id).unwrap().is_empty());

        let err = tree.set_attached(id, "", Some(true)).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidArgument(_)));
    }
}
