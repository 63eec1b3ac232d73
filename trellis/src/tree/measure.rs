//! Two-pass layout protocol: measure (bottom-up desired sizes) and layout
//! (top-down placement), plus the invalidation rules that decide what the next
//! pass has to recompute.

use crate::error::Result;
use crate::panels::Panel;
use crate::primitives::{Rect, Size};

use super::{LayoutTree, NodeId};

impl LayoutTree {
    // =========================================================================
    // Public entry points
    // =========================================================================

    /// Measure `id` against `allotment`, returning its desired size.
    ///
    /// Returns the cached size when the measurement is still valid.
    pub fn measure(&mut self, id: NodeId, allotment: Size) -> Result<Size> {
        self.measure_with_reserved(id, allotment, Size::ZERO)
    }

    /// Measure with part of the allotment reserved by the caller (e.g. for
    /// chrome drawn around the node).
    pub fn measure_with_reserved(&mut self, id: NodeId, allotment: Size, reserved: Size) -> Result<Size> {
        self.node(id)?;
        Ok(self.measure_node(id, allotment, reserved))
    }

    /// Place `id` within `bounds`, arranging its subtree if it is dirty.
    pub fn layout(&mut self, id: NodeId, bounds: Rect) -> Result<()> {
        self.node(id)?;
        tracing::trace!(?id, ?bounds, "layout pass");
        self.layout_node(id, bounds);
        Ok(())
    }

    pub fn invalidate_measure(&mut self, id: NodeId) -> Result<()> {
        self.node(id)?;
        self.invalidate_measure_node(id);
        Ok(())
    }

    pub fn invalidate_arrangement(&mut self, id: NodeId) -> Result<()> {
        self.node(id)?;
        self.invalidate_arrangement_node(id);
        Ok(())
    }

    // =========================================================================
    // Measure
    // =========================================================================

    pub(crate) fn measure_node(&mut self, id: NodeId, allotment: Size, reserved: Size) -> Size {
        let node = &mut self.nodes[id];
        if node.measure_valid {
            return node.desired_size;
        }
        if !node.layout_visible {
            node.desired_size = Size::ZERO;
            node.measure_valid = true;
            return Size::ZERO;
        }

        let layout = node.layout;
        let thickness = layout.box_thickness().total();
        let mut available = allotment.saturating_sub(thickness);

        let (limit_w, limit_h) = layout.limit();
        if layout.fixed_width > 0.0 {
            available.width = layout.fixed_width;
        } else if let Some(max) = limit_w {
            available.width = available.width.min(max);
        }
        if layout.fixed_height > 0.0 {
            available.height = layout.fixed_height;
        } else if let Some(max) = limit_h {
            available.height = available.height.min(max);
        }

        // Ancestor limits constrain descendants before any top-down pass has run.
        let mut cursor = node.parent;
        while let Some(ancestor) = cursor {
            let a = &self.nodes[ancestor];
            let (w, h) = a.layout.limit();
            if let Some(w) = w {
                available.width = available.width.min(w);
            }
            if let Some(h) = h {
                available.height = available.height.min(h);
            }
            cursor = a.parent;
        }

        let available = available.saturating_sub(reserved);
        let measured = sanitize(Panel::measure_content(self, id, available), id);

        let node = &mut self.nodes[id];
        let desired = node.layout.resolve(measured) + thickness;
        node.desired_size = desired;
        node.measure_valid = true;
        desired
    }

    // =========================================================================
    // Layout
    // =========================================================================

    pub(crate) fn layout_node(&mut self, id: NodeId, bounds: Rect) {
        let node = &mut self.nodes[id];
        if !node.layout_visible {
            node.desired_size = Size::ZERO;
            node.measure_valid = true;
            node.bounding_box = Rect::ZERO;
            node.content_rect = Rect::ZERO;
            return;
        }
        if !node.arrange_dirty {
            return;
        }

        if bounds.is_empty() {
            self.collapse(id);
            return;
        }

        let desired = self.measure_node(id, bounds.size(), Size::ZERO);
        let node = &mut self.nodes[id];
        let layout = node.layout;
        let (x, width) = layout.horizontal_alignment.place(bounds.x, bounds.width, desired.width);
        let (y, height) = layout.vertical_alignment.place(bounds.y, bounds.height, desired.height);
        let aligned = Rect::new(x, y, width, height);

        node.bounding_box = aligned.deflate(layout.padding);
        node.content_rect = node.bounding_box.deflate(layout.margin);
        let content_rect = node.content_rect;

        Panel::arrange_content(self, id, content_rect);
        self.nodes[id].arrange_dirty = false;
    }

    /// Lay out `id` and its subtree as empty.
    ///
    /// The subtree stays dirty so the next pass with real bounds arranges it
    /// again, whether or not it was ever measured.
    fn collapse(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let node = &mut self.nodes[current];
            node.bounding_box = Rect::ZERO;
            node.content_rect = Rect::ZERO;
            node.arrange_dirty = true;
            stack.extend(node.children.iter().copied());
        }
    }

    // =========================================================================
    // Invalidation
    // =========================================================================

    /// Invalidate the measurement of `id` and, unconditionally, of every ancestor.
    pub(crate) fn invalidate_measure_node(&mut self, id: NodeId) {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let Some(node) = self.nodes.get_mut(current) else {
                return;
            };
            if node.measure_valid {
                node.measure_valid = false;
                self.invalidate_arrangement_node(current);
            }
            cursor = self.nodes.get(current).and_then(|n| n.parent);
        }
    }

    /// Mark `id` and every descendant as needing arrangement; the parent's
    /// measurement may now be stale too.
    pub(crate) fn invalidate_arrangement_node(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        if node.arrange_dirty {
            return;
        }
        if let Some(parent) = node.parent {
            self.invalidate_measure_node(parent);
        }
        self.nodes[id].arrange_dirty = true;

        let children = self.nodes[id].children.clone();
        for child in children {
            self.invalidate_arrangement_node(child);
        }
    }
}

fn sanitize(size: Size, id: NodeId) -> Size {
    if size.width.is_finite() && size.height.is_finite() && size.width >= 0.0 && size.height >= 0.0 {
        return size;
    }
    tracing::warn!(?id, ?size, "content measured to a non-finite or negative size, clamping");
    Size::new(finite_or_zero(size.width), finite_or_zero(size.height))
}

fn finite_or_zero(v: f32) -> f32 {
    if v.is_finite() { v.max(0.0) } else { 0.0 }
}
