//! Tree snapshots for debugging.
//!
//! A [`NodeSnapshot`] captures the geometry and flags of a subtree at one
//! point in time. It serializes to JSON so a frame can be dumped and diffed.

use serde::Serialize;

use crate::panels::Panel;
use crate::primitives::{Rect, Size};
use crate::tree::{LayoutTree, NodeId};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeSnapshot {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub panel: &'static str,
    pub desired_size: Size,
    pub bounding_box: Rect,
    pub content_rect: Rect,
    pub visible: bool,
    pub layout_visible: bool,
    pub enabled: bool,
    pub measure_valid: bool,
    pub arrange_dirty: bool,
    /// Names of the attached properties set on the node.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attached: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnapshot>,
}

impl NodeSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Number of nodes in the snapshot, itself included.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(NodeSnapshot::node_count).sum::<usize>()
    }

    /// Depth-first search by node name.
    pub fn find(&self, name: &str) -> Option<&NodeSnapshot> {
        if self.name.as_deref() == Some(name) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(name))
    }
}

fn panel_name(panel: &Panel) -> &'static str {
    match panel {
        Panel::Leaf => "leaf",
        Panel::Canvas => "canvas",
        Panel::Dock => "dock",
        Panel::Stack(_) => "stack",
        Panel::AdvancedStack(_) => "advanced_stack",
        Panel::Flow(_) => "flow",
        Panel::List(_) => "list",
    }
}

impl LayoutTree {
    /// Capture the subtree at `id`.
    pub fn snapshot(&self, id: NodeId) -> Option<NodeSnapshot> {
        let node = self.nodes.get(id)?;
        Some(NodeSnapshot {
            id: format!("{id:?}"),
            name: node.name.clone(),
            panel: panel_name(&node.panel),
            desired_size: node.desired_size,
            bounding_box: node.bounding_box,
            content_rect: node.content_rect,
            visible: node.visible,
            layout_visible: node.layout_visible,
            enabled: node.enabled,
            measure_valid: node.measure_valid,
            arrange_dirty: node.arrange_dirty,
            attached: node.attached.iter().map(|(name, _)| name.to_owned()).collect(),
            children: node.children.iter().filter_map(|c| self.snapshot(*c)).collect(),
        })
    }
}
