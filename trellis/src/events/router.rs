//! Event router and focus coordinator.
//!
//! Turns the raw input stream into routed events on the tree, tracking which
//! node is hovered, which is pressed, which holds keyboard focus, and which is
//! staged to receive focus if the primary button is released over it.

use std::collections::HashMap;
use std::time::Duration;

use crate::config::RouterConfig;
use crate::input::{InputEvent, KeyEvent, MouseButton, ScrollDelta};
use crate::primitives::Point;
use crate::tree::{LayoutTree, NodeId};

use super::{EventKind, EventPayload};

/// The press waiting for its release.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Press {
    target: NodeId,
    button: MouseButton,
    position: Point,
}

/// Armed after a click; a second click on `target` before it runs out is a double click.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ClickTimer {
    target: NodeId,
    remaining: Duration,
}

#[derive(Debug, Default)]
pub struct EventRouter {
    config: RouterConfig,
    hovered: Option<NodeId>,
    focused: Option<NodeId>,
    pressed: Option<Press>,
    focus_candidate: Option<NodeId>,
    click_timers: HashMap<MouseButton, ClickTimer>,
    /// Last pointer position seen, used for leave events no pointer event triggered.
    last_position: Point,
}

impl EventRouter {
    pub fn new(config: RouterConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn hovered(&self) -> Option<NodeId> {
        self.hovered
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    pub fn pressed(&self) -> Option<NodeId> {
        self.pressed.map(|p| p.target)
    }

    /// Position of the outstanding press, if any.
    pub fn press_position(&self) -> Option<Point> {
        self.pressed.map(|p| p.position)
    }

    pub fn focus_candidate(&self) -> Option<NodeId> {
        self.focus_candidate
    }

    /// Route one input event through the tree rooted at `root`.
    pub fn dispatch(&mut self, tree: &mut LayoutTree, root: NodeId, event: &InputEvent) {
        tracing::trace!(?event, "dispatching input");
        if let Some(position) = event.position() {
            self.last_position = position;
        }
        self.forget_unreachable(tree);

        match event {
            InputEvent::PointerMoved { position } => self.pointer_moved(tree, root, *position),
            InputEvent::PointerPressed { button, position } => self.pointer_pressed(tree, root, *button, *position),
            InputEvent::PointerReleased { button, position } => self.pointer_released(tree, root, *button, *position),
            InputEvent::PointerDoubleClicked { button, position } => {
                self.pointer_double_clicked(tree, root, *button, *position)
            }
            InputEvent::Scrolled { delta, position } => self.scrolled(tree, root, *delta, *position),
            InputEvent::KeyPressed(key) => self.key_pressed(tree, key),
            InputEvent::KeyReleased(key) => self.key_released(tree, key),
            InputEvent::Text(text) => self.text_input(tree, text),
        }
    }

    /// Run down the double-click timers.
    pub fn advance(&mut self, dt: Duration) {
        self.click_timers.retain(|_, timer| {
            timer.remaining = timer.remaining.saturating_sub(dt);
            !timer.remaining.is_zero()
        });
    }

    // =========================================================================
    // Pointer
    // =========================================================================

    pub fn pointer_moved(&mut self, tree: &mut LayoutTree, root: NodeId, position: Point) {
        let hit = tree.find_control(root, position);
        self.update_hover(tree, hit, position);
        if let Some(hit) = hit {
            tree.bubble(hit, EventKind::MouseMove, pointer(position, None));
        }
    }

    pub fn pointer_pressed(&mut self, tree: &mut LayoutTree, root: NodeId, button: MouseButton, position: Point) {
        let hit = tree.find_control(root, position);
        self.reconcile_stale_press(tree, hit, position);

        let Some(target) = hit else {
            self.pressed = None;
            return;
        };
        self.pressed = Some(Press {
            target,
            button,
            position,
        });
        let handled = tree
            .bubble(target, EventKind::MouseDown, pointer(position, Some(button)))
            .is_some();
        // Only an unhandled primary press stages focus.
        if button == self.config.primary_button {
            self.focus_candidate = (!handled && tree.contains(target)).then_some(target);
        }
    }

    pub fn pointer_released(&mut self, tree: &mut LayoutTree, root: NodeId, button: MouseButton, position: Point) {
        self.release(tree, root, button, position, false);
    }

    /// A release that the input layer already recognised as the second click.
    pub fn pointer_double_clicked(&mut self, tree: &mut LayoutTree, root: NodeId, button: MouseButton, position: Point) {
        self.release(tree, root, button, position, true);
    }

    fn release(&mut self, tree: &mut LayoutTree, root: NodeId, button: MouseButton, position: Point, double: bool) {
        let hit = tree.find_control(root, position);
        self.reconcile_stale_press(tree, hit, position);

        let press = self.pressed.take();
        let Some(target) = hit else {
            if button == self.config.primary_button {
                self.focus_candidate = None;
            }
            return;
        };

        if press.is_some_and(|p| p.target == target && p.button == button) {
            let kind = if double || self.is_second_click(button, target) {
                self.click_timers.remove(&button);
                EventKind::DoubleClick
            } else {
                self.click_timers.insert(
                    button,
                    ClickTimer {
                        target,
                        remaining: self.config.double_click_time(),
                    },
                );
                EventKind::Click
            };
            tree.bubble(target, kind, pointer(position, Some(button)));
        }

        if button == self.config.primary_button && self.focus_candidate.take() == Some(target) {
            self.set_focus(tree, Some(target));
        }

        if tree.contains(target) {
            tree.bubble(target, EventKind::MouseUp, pointer(position, Some(button)));
        }
    }

    fn is_second_click(&self, button: MouseButton, target: NodeId) -> bool {
        self.click_timers
            .get(&button)
            .is_some_and(|timer| timer.target == target && !timer.remaining.is_zero())
    }

    /// Scroll the hovered node, then re-evaluate hover since content may have
    /// moved under a static cursor.
    pub fn scrolled(&mut self, tree: &mut LayoutTree, root: NodeId, delta: ScrollDelta, position: Point) {
        if let Some(hovered) = self.hovered {
            let delta = delta.to_pixels(self.config.scroll_line_height);
            tree.bubble(hovered, EventKind::MouseScroll, EventPayload::Scroll { position, delta });
        }
        let hit = tree.find_control(root, position);
        self.update_hover(tree, hit, position);
    }

    /// Send leave/enter when the node under the cursor changes.
    fn update_hover(&mut self, tree: &mut LayoutTree, hit: Option<NodeId>, position: Point) {
        let old = self.hovered.filter(|id| tree.contains(*id));
        if hit == old {
            return;
        }
        self.hovered = hit;

        if let Some(old) = old {
            // Moving into a descendant does not leave the ancestor.
            let into_descendant = hit.is_some_and(|new| tree.is_ancestor(old, new));
            if !into_descendant {
                tree.bubble(old, EventKind::MouseLeave, pointer(position, None));
            }
        }
        if let Some(new) = hit {
            tree.bubble(new, EventKind::MouseEnter, pointer(position, None));
        }
    }

    /// If a different node is still pressed, release it with a synthetic
    /// `MouseUp` that stops below the nearest common ancestor of the stale
    /// target and `hit`.
    fn reconcile_stale_press(&mut self, tree: &mut LayoutTree, hit: Option<NodeId>, position: Point) {
        let Some(press) = self.pressed else {
            return;
        };
        if Some(press.target) == hit {
            return;
        }
        self.pressed = None;
        if !tree.contains(press.target) {
            return;
        }

        let stop = hit.and_then(|hit| tree.nearest_common_ancestor(press.target, hit));
        tracing::trace!(stale = ?press.target, ?hit, ?stop, "releasing stale press");
        tree.bubble_until(press.target, stop, EventKind::MouseUp, pointer(position, Some(press.button)));
    }

    // =========================================================================
    // Keyboard and focus
    // =========================================================================

    pub fn key_pressed(&mut self, tree: &mut LayoutTree, key: &KeyEvent) {
        self.to_focused(tree, EventKind::KeyDown, EventPayload::Key(key.clone()));
    }

    pub fn key_released(&mut self, tree: &mut LayoutTree, key: &KeyEvent) {
        self.to_focused(tree, EventKind::KeyUp, EventPayload::Key(key.clone()));
    }

    pub fn text_input(&mut self, tree: &mut LayoutTree, text: &str) {
        self.to_focused(tree, EventKind::TextInput, EventPayload::Text(text.to_owned()));
    }

    fn to_focused(&mut self, tree: &mut LayoutTree, kind: EventKind, payload: EventPayload) {
        match self.focused.filter(|id| tree.contains(*id)) {
            Some(focused) => {
                tree.bubble(focused, kind, payload);
            }
            None => tracing::trace!(?kind, "no focused node, dropping keyboard event"),
        }
    }

    /// Move keyboard focus, sending `LostFocus` then `GainedFocus`.
    ///
    /// Destroyed, hidden and disabled nodes cannot take focus.
    pub fn set_focus(&mut self, tree: &mut LayoutTree, target: Option<NodeId>) {
        let target = target.filter(|id| {
            let focusable = tree.is_hit_testable(*id);
            if !focusable {
                tracing::warn!(?id, "focus requested for a node that cannot be hit");
            }
            focusable
        });
        let old = self.focused.filter(|id| tree.contains(*id));
        if old == target {
            return;
        }
        self.focused = target;
        tracing::debug!(from = ?old, to = ?target, "focus changed");

        if let Some(old) = old {
            tree.bubble(old, EventKind::LostFocus, EventPayload::Focus { other: target });
        }
        if let Some(new) = target {
            tree.bubble(new, EventKind::GainedFocus, EventPayload::Focus { other: old });
        }
    }

    /// Drop references to nodes that were destroyed, or hidden or disabled
    /// since the last event.
    ///
    /// A hovered node that can no longer be hit gets `MouseLeave` and a
    /// focused one loses focus. A press on such a node is left for the stale
    /// press reconciliation of the next press or release.
    fn forget_unreachable(&mut self, tree: &mut LayoutTree) {
        self.focused = self.focused.filter(|id| tree.contains(*id));
        self.focus_candidate = self.focus_candidate.filter(|id| tree.is_hit_testable(*id));
        self.pressed = self.pressed.filter(|p| tree.contains(p.target));
        self.click_timers.retain(|_, timer| tree.contains(timer.target));

        match self.hovered {
            Some(hovered) if !tree.contains(hovered) => self.hovered = None,
            Some(hovered) if !tree.is_hit_testable(hovered) => {
                tracing::trace!(?hovered, "hovered node can no longer be hit");
                self.hovered = None;
                tree.bubble(hovered, EventKind::MouseLeave, pointer(self.last_position, None));
            }
            _ => {}
        }
        if let Some(focused) = self.focused.filter(|id| !tree.is_hit_testable(*id)) {
            tracing::debug!(?focused, "focused node can no longer be hit, dropping focus");
            self.set_focus(tree, None);
        }
    }
}

fn pointer(position: Point, button: Option<MouseButton>) -> EventPayload {
    EventPayload::Pointer { position, button }
}
