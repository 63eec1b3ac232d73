//! Input events delivered by the input collaborator.
//!
//! Positions are already expressed in layout coordinates; this module does no
//! device translation. [`EventRouter::dispatch`](crate::events::EventRouter::dispatch)
//! consumes these and turns them into routed events on the tree.

use serde::{Deserialize, Serialize};

use crate::primitives::Point;

/// Mouse button types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

/// Scroll delta types.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollDelta {
    /// Scroll by lines (discrete, e.g., mouse wheel notches).
    Lines { x: f32, y: f32 },

    /// Scroll by pixels (smooth, e.g., trackpad).
    Pixels { x: f32, y: f32 },
}

impl ScrollDelta {
    /// Convert to a pixel offset given the height of one line.
    pub fn to_pixels(self, line_height: f32) -> Point {
        match self {
            ScrollDelta::Lines { x, y } => Point::new(x * line_height, y * line_height),
            ScrollDelta::Pixels { x, y } => Point::new(x, y),
        }
    }
}

/// Keyboard modifier keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };

    /// Check if any modifier is pressed.
    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }
}

/// Named keys (non-character keys).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedKey {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    PageUp,
    PageDown,
    Backspace,
    Delete,
    Enter,
    Tab,
    Escape,
    Space,
    Unknown,
}

/// A keyboard key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// A named (special) key.
    Named(NamedKey),

    /// A character key.
    Character(String),
}

impl Key {
    pub fn named(key: NamedKey) -> Self {
        Self::Named(key)
    }

    pub fn character(c: impl Into<String>) -> Self {
        Self::Character(c.into())
    }
}

/// A key transition together with the modifiers held at the time.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }
}

/// One discrete event from the input collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerMoved {
        position: Point,
    },
    PointerPressed {
        button: MouseButton,
        position: Point,
    },
    PointerReleased {
        button: MouseButton,
        position: Point,
    },
    /// Emitted by input layers that detect double clicks themselves.
    PointerDoubleClicked {
        button: MouseButton,
        position: Point,
    },
    Scrolled {
        delta: ScrollDelta,
        position: Point,
    },
    KeyPressed(KeyEvent),
    KeyReleased(KeyEvent),
    /// Text produced by the OS (handles shift/compose/dead keys).
    Text(String),
}

impl InputEvent {
    /// The pointer position carried by the event, if any.
    pub fn position(&self) -> Option<Point> {
        match self {
            InputEvent::PointerMoved { position }
            | InputEvent::PointerPressed { position, .. }
            | InputEvent::PointerReleased { position, .. }
            | InputEvent::PointerDoubleClicked { position, .. }
            | InputEvent::Scrolled { position, .. } => Some(*position),
            InputEvent::KeyPressed(_) | InputEvent::KeyReleased(_) | InputEvent::Text(_) => None,
        }
    }
}
