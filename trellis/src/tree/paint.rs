//! Paint traversal: hands each visible node's geometry to its content.

use crate::content::PaintArea;
use crate::primitives::Rect;
use crate::render::Renderer;

use super::{LayoutTree, NodeId};

impl LayoutTree {
    /// Paint the subtree at `id`, parents before children.
    ///
    /// The caller owns the batch boundary; see [`render::batch`](crate::render::batch).
    pub fn paint(&self, id: NodeId, renderer: &mut dyn Renderer) {
        let parent_opacity = self.parent(id).map_or(1.0, |p| self.computed_opacity(p));
        self.paint_node(id, renderer, parent_opacity, None);
    }

    fn paint_node(&self, id: NodeId, renderer: &mut dyn Renderer, parent_opacity: f32, clip: Option<Rect>) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        if !node.visible || !node.layout_visible {
            return;
        }

        let opacity = parent_opacity * node.opacity;
        if let Some(content) = &node.content {
            let area = PaintArea {
                bounding_box: node.bounding_box,
                content_rect: node.content_rect,
                opacity,
            };
            content.paint(&area, renderer);
        }

        let mut child_clip = clip;
        if node.clip_children {
            let own = node.content_rect;
            let effective = match clip {
                Some(outer) => outer.intersection(&own).unwrap_or(Rect::new(own.x, own.y, 0.0, 0.0)),
                None => own,
            };
            renderer.set_clip(Some(effective));
            child_clip = Some(effective);
        }

        for child in &node.children {
            self.paint_node(*child, renderer, opacity, child_clip);
        }

        if node.clip_children {
            renderer.set_clip(clip);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::content::ColorBox;
    use crate::panels::Panel;
    use crate::primitives::{Color, Rect};
    use crate::render::PrimitiveBatch;
    use crate::tree::{LayoutTree, Node};

    #[test]
    fn paints_visible_nodes_with_computed_opacity() {
        let mut tree = LayoutTree::new();
        let root = tree.create(Node::new(Panel::Canvas).opacity(0.5).content(ColorBox::new(Color::BLACK)));
        let shown = tree.create(Node::leaf().opacity(0.5).content(ColorBox::new(Color::WHITE)));
        let hidden = tree.create(Node::leaf().visible(false).content(ColorBox::new(Color::WHITE)));
        tree.add_child(root, shown).unwrap();
        tree.add_child(root, hidden).unwrap();
        tree.layout(root, Rect::new(0.0, 0.0, 10.0, 10.0)).unwrap();

        let mut batch = PrimitiveBatch::new();
        tree.paint(root, &mut batch);

        assert_eq!(batch.solid_rects.len(), 2);
        assert_eq!(batch.solid_rects[0].color.a, 0.5);
        assert_eq!(batch.solid_rects[1].color.a, 0.25);
    }

    #[test]
    fn clip_children_restores_outer_clip() {
        let mut tree = LayoutTree::new();
        let root = tree.create(Node::new(Panel::Canvas).clip_children(true));
        let child = tree.create(Node::leaf().content(ColorBox::new(Color::WHITE)));
        tree.add_child(root, child).unwrap();
        tree.layout(root, Rect::new(0.0, 0.0, 40.0, 30.0)).unwrap();

        let mut batch = PrimitiveBatch::new();
        tree.paint(root, &mut batch);

        assert_eq!(batch.solid_rects[0].clip_rect, Some(Rect::new(0.0, 0.0, 40.0, 30.0)));
        assert_eq!(batch.current_clip(), None);
    }
}
