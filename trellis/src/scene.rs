//! Frame driver.
//!
//! A [`Scene`] owns the tree, its root and the event router. Each call to
//! [`Scene::tick`] runs one frame:
//!
//! ```text
//! queued input -> router.dispatch -> router.advance(dt) -> layout(root, viewport) -> paint
//! ```

use std::collections::VecDeque;
use std::time::Duration;

use crate::config::SceneConfig;
use crate::error::{LayoutError, Result};
use crate::events::EventRouter;
use crate::input::InputEvent;
use crate::panels::Panel;
use crate::primitives::Rect;
use crate::render::{self, Renderer};
use crate::tree::{LayoutTree, Node, NodeId};

pub struct Scene {
    tree: LayoutTree,
    root: NodeId,
    router: EventRouter,
    viewport: Rect,
    pending: VecDeque<InputEvent>,
    frame: u64,
}

impl Scene {
    /// Create a scene whose root is an empty canvas.
    pub fn new(config: SceneConfig) -> Self {
        let mut tree = LayoutTree::new();
        let root = tree.create(Node::new(Panel::Canvas).name("root").clip_children(config.clip_root));
        Self {
            tree,
            root,
            router: EventRouter::new(config.router),
            viewport: config.viewport,
            pending: VecDeque::new(),
            frame: 0,
        }
    }

    pub fn tree(&self) -> &LayoutTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut LayoutTree {
        &mut self.tree
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn router(&self) -> &EventRouter {
        &self.router
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Number of completed ticks.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Attach `node` under the root and return its id.
    pub fn add(&mut self, node: Node) -> Result<NodeId> {
        let id = self.tree.create(node);
        self.tree.add_child(self.root, id)?;
        Ok(id)
    }

    /// Buffer an input event until the next tick.
    pub fn queue_input(&mut self, event: InputEvent) {
        self.pending.push_back(event);
    }

    pub fn pending_input(&self) -> usize {
        self.pending.len()
    }

    /// Resize the viewport; the root is re-measured on the next tick.
    pub fn set_viewport(&mut self, viewport: Rect) -> Result<()> {
        let finite = [viewport.x, viewport.y, viewport.width, viewport.height]
            .iter()
            .all(|c| c.is_finite());
        if !finite || viewport.width < 0.0 || viewport.height < 0.0 {
            return Err(LayoutError::InvalidArgument(format!("viewport {viewport:?} is not a finite, non-negative rectangle")));
        }
        if viewport == self.viewport {
            return Ok(());
        }
        tracing::debug!(?viewport, "viewport changed");
        self.viewport = viewport;
        self.tree.invalidate_measure(self.root)
    }

    pub fn set_focus(&mut self, target: Option<NodeId>) {
        self.router.set_focus(&mut self.tree, target);
    }

    /// Run one frame.
    pub fn tick(&mut self, dt: Duration, renderer: &mut dyn Renderer) -> Result<()> {
        let _span = tracing::trace_span!("tick", frame = self.frame).entered();

        while let Some(event) = self.pending.pop_front() {
            self.router.dispatch(&mut self.tree, self.root, &event);
        }
        self.router.advance(dt);

        self.tree.layout(self.root, self.viewport)?;

        let tree = &self.tree;
        let root = self.root;
        render::batch(renderer, |r| tree.paint(root, r));

        self.frame += 1;
        Ok(())
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(SceneConfig::default())
    }
}
