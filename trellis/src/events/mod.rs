//! Routed events.
//!
//! Handlers are registered per node and per [`EventKind`]. An event starts at
//! a source node and bubbles towards the root until some node reports
//! [`EventResult::Handled`].
//!
//! Handlers receive `&mut LayoutTree`, so they may restructure the tree while
//! an event is in flight. The handler list of the node being invoked is moved
//! out for the duration of the call and put back afterwards (if the node still
//! exists), which keeps the borrow of the tree exclusive.

pub mod router;

pub use router::EventRouter;

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::error::Result;
use crate::input::{KeyEvent, MouseButton};
use crate::primitives::Point;
use crate::tree::{LayoutTree, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EventKind {
    MouseMove,
    MouseDown,
    MouseUp,
    MouseEnter,
    MouseLeave,
    Click,
    DoubleClick,
    MouseScroll,
    KeyDown,
    KeyUp,
    TextInput,
    GainedFocus,
    LostFocus,
}

/// Data carried by a routed event.
#[derive(Debug, Clone, PartialEq)]
pub enum EventPayload {
    Pointer {
        position: Point,
        button: Option<MouseButton>,
    },
    /// Delta is already converted to pixels.
    Scroll { position: Point, delta: Point },
    Key(KeyEvent),
    Text(String),
    /// The node focus moved away from (for `GainedFocus`) or to (for `LostFocus`).
    Focus { other: Option<NodeId> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoutedEvent {
    pub kind: EventKind,
    /// Node the event started bubbling from.
    pub source: NodeId,
    /// Node whose handlers are currently running.
    pub current: NodeId,
    pub payload: EventPayload,
}

impl RoutedEvent {
    pub fn position(&self) -> Option<Point> {
        match &self.payload {
            EventPayload::Pointer { position, .. } | EventPayload::Scroll { position, .. } => Some(*position),
            _ => None,
        }
    }
}

/// Result of running a node's handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventResult {
    /// Keep bubbling.
    #[default]
    Ignored,
    /// Stop at this node.
    Handled,
}

impl EventResult {
    pub fn is_handled(&self) -> bool {
        matches!(self, EventResult::Handled)
    }
}

impl From<bool> for EventResult {
    fn from(handled: bool) -> Self {
        if handled { EventResult::Handled } else { EventResult::Ignored }
    }
}

pub type Handler = Box<dyn FnMut(&mut LayoutTree, &RoutedEvent) -> EventResult>;

/// Per-node handler lists.
#[derive(Default)]
pub(crate) struct Handlers {
    by_kind: HashMap<EventKind, Vec<Handler>>,
}

impl Handlers {
    fn push(&mut self, kind: EventKind, handler: Handler) {
        self.by_kind.entry(kind).or_default().push(handler);
    }

    fn take(&mut self, kind: EventKind) -> Vec<Handler> {
        self.by_kind.remove(&kind).unwrap_or_default()
    }

    /// Put back a list taken with [`take`](Self::take). Handlers registered
    /// while it was out run after the restored ones.
    fn restore(&mut self, kind: EventKind, mut handlers: Vec<Handler>) {
        if let Some(added) = self.by_kind.remove(&kind) {
            handlers.extend(added);
        }
        if !handlers.is_empty() {
            self.by_kind.insert(kind, handlers);
        }
    }

    pub(crate) fn count(&self, kind: EventKind) -> usize {
        self.by_kind.get(&kind).map_or(0, Vec::len)
    }
}

impl fmt::Debug for Handlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.by_kind.iter().map(|(kind, list)| (kind, list.len())))
            .finish()
    }
}

impl LayoutTree {
    /// Register a handler for `kind` on `id`.
    pub fn on<F>(&mut self, id: NodeId, kind: EventKind, handler: F) -> Result<()>
    where
        F: FnMut(&mut LayoutTree, &RoutedEvent) -> EventResult + 'static,
    {
        self.node_mut(id)?.handlers.push(kind, Box::new(handler));
        Ok(())
    }

    pub fn handler_count(&self, id: NodeId, kind: EventKind) -> usize {
        self.nodes.get(id).map_or(0, |n| n.handlers.count(kind))
    }

    /// Run every handler `id` has for `event.kind`.
    ///
    /// All handlers run even after one reports handled.
    pub fn invoke(&mut self, id: NodeId, event: &RoutedEvent) -> EventResult {
        let Some(node) = self.nodes.get_mut(id) else {
            return EventResult::Ignored;
        };
        let mut handlers = node.handlers.take(event.kind);
        if handlers.is_empty() {
            return EventResult::Ignored;
        }

        let mut handled = false;
        for handler in handlers.iter_mut() {
            handled |= handler(self, event).is_handled();
        }

        if let Some(node) = self.nodes.get_mut(id) {
            node.handlers.restore(event.kind, handlers);
        }
        handled.into()
    }

    /// Bubble from `start` to the root. Returns the node that handled it.
    pub fn bubble(&mut self, start: NodeId, kind: EventKind, payload: EventPayload) -> Option<NodeId> {
        self.bubble_until(start, None, kind, payload)
    }

    /// Bubble from `start`, stopping without invoking once `stop` is reached.
    pub fn bubble_until(
        &mut self,
        start: NodeId,
        stop: Option<NodeId>,
        kind: EventKind,
        payload: EventPayload,
    ) -> Option<NodeId> {
        tracing::trace!(?start, ?stop, ?kind, "bubbling event");
        let mut cursor = Some(start);
        while let Some(current) = cursor {
            if Some(current) == stop || !self.contains(current) {
                break;
            }
            let parent = self.parent(current);
            let event = RoutedEvent {
                kind,
                source: start,
                current,
                payload: payload.clone(),
            };
            if self.invoke(current, &event).is_handled() {
                return Some(current);
            }
            // A handler may have detached or destroyed `current`.
            cursor = if self.contains(current) { self.parent(current) } else { parent };
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::tree::Node;

    type Log = Rc<RefCell<Vec<(NodeId, EventKind)>>>;

    fn record(tree: &mut LayoutTree, id: NodeId, kind: EventKind, log: &Log, result: EventResult) {
        let log = log.clone();
        tree.on(id, kind, move |_, event| {
            log.borrow_mut().push((event.current, event.kind));
            result
        })
        .unwrap();
    }

    fn chain() -> (LayoutTree, NodeId, NodeId, NodeId) {
        let mut tree = LayoutTree::new();
        let root = tree.create(Node::leaf());
        let mid = tree.create(Node::leaf());
        let leaf = tree.create(Node::leaf());
        tree.add_child(root, mid).unwrap();
        tree.add_child(mid, leaf).unwrap();
        (tree, root, mid, leaf)
    }

    fn text() -> EventPayload {
        EventPayload::Text("x".into())
    }

    // =========================================================================
    // Bubbling
    // =========================================================================

    #[test]
    fn bubbles_to_root_when_ignored() {
        let (mut tree, root, mid, leaf) = chain();
        let log = Log::default();
        for id in [root, mid, leaf] {
            record(&mut tree, id, EventKind::TextInput, &log, EventResult::Ignored);
        }

        assert_eq!(tree.bubble(leaf, EventKind::TextInput, text()), None);
        assert_eq!(
            *log.borrow(),
            vec![(leaf, EventKind::TextInput), (mid, EventKind::TextInput), (root, EventKind::TextInput)]
        );
    }

    #[test]
    fn stops_at_handling_node() {
        let (mut tree, root, mid, leaf) = chain();
        let log = Log::default();
        record(&mut tree, mid, EventKind::KeyDown, &log, EventResult::Handled);
        record(&mut tree, root, EventKind::KeyDown, &log, EventResult::Ignored);

        assert_eq!(tree.bubble(leaf, EventKind::KeyDown, text()), Some(mid));
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn bubble_until_excludes_stop() {
        let (mut tree, root, mid, leaf) = chain();
        let log = Log::default();
        for id in [root, mid, leaf] {
            record(&mut tree, id, EventKind::MouseUp, &log, EventResult::Ignored);
        }

        tree.bubble_until(leaf, Some(mid), EventKind::MouseUp, text());
        assert_eq!(*log.borrow(), vec![(leaf, EventKind::MouseUp)]);
    }

    #[test]
    fn every_handler_on_a_node_runs() {
        let (mut tree, _root, _mid, leaf) = chain();
        let log = Log::default();
        record(&mut tree, leaf, EventKind::Click, &log, EventResult::Handled);
        record(&mut tree, leaf, EventKind::Click, &log, EventResult::Ignored);

        assert_eq!(tree.bubble(leaf, EventKind::Click, text()), Some(leaf));
        assert_eq!(log.borrow().len(), 2);
        assert_eq!(tree.handler_count(leaf, EventKind::Click), 2);
    }

    // =========================================================================
    // Re-entrancy
    // =========================================================================

    #[test]
    fn handler_can_destroy_its_node() {
        let (mut tree, root, mid, leaf) = chain();
        let log = Log::default();
        tree.on(leaf, EventKind::Click, |tree, event| {
            tree.destroy(event.current).unwrap();
            EventResult::Ignored
        })
        .unwrap();
        record(&mut tree, mid, EventKind::Click, &log, EventResult::Ignored);
        record(&mut tree, root, EventKind::Click, &log, EventResult::Ignored);

        tree.bubble(leaf, EventKind::Click, text());
        assert!(!tree.contains(leaf));
        assert_eq!(log.borrow().len(), 2);
    }

    #[test]
    fn handler_added_during_dispatch_is_kept() {
        let (mut tree, _root, _mid, leaf) = chain();
        tree.on(leaf, EventKind::Click, move |tree, event| {
            tree.on(event.current, EventKind::Click, |_, _| EventResult::Handled).unwrap();
            EventResult::Ignored
        })
        .unwrap();

        tree.bubble(leaf, EventKind::Click, text());
        assert_eq!(tree.handler_count(leaf, EventKind::Click), 2);
    }

    #[test]
    fn event_result_from_bool() {
        assert!(EventResult::from(true).is_handled());
        assert_eq!(EventResult::from(false), EventResult::Ignored);
    }
}
