//! Trellis: retained-mode UI layout core
//!
//! Trellis owns a tree of visual nodes and keeps their geometry up to date:
//! - Two-pass layout (measure bottom-up, arrange top-down) with cached results
//! - Targeted invalidation so only affected subtrees are recomputed
//! - Layout containers: canvas, dock, stack, advanced stack, flow, list
//! - Pointer and keyboard routing with hover, press and focus tracking
//!
//! # Architecture
//!
//! Nodes live in an arena ([`LayoutTree`]) and are addressed by [`NodeId`].
//! Each node carries a box model, a [`Panel`] that positions its children,
//! optional [`Content`] that measures and paints the node itself, and a bag
//! of attached properties the parent panel reads.
//!
//! Drawing, text shaping and raw input belong to collaborators behind the
//! [`Renderer`], [`TextMeasurer`] and [`InputEvent`] seams.
//!
//! # Usage
//!
//! ```ignore
//! use trellis::{Scene, SceneConfig, Node, PrimitiveBatch};
//!
//! let mut scene = Scene::new(SceneConfig::default());
//! let button = scene.add(Node::leaf().fixed_size(80.0, 24.0))?;
//! scene.tree_mut().on(button, EventKind::Click, |_, _| EventResult::Handled)?;
//!
//! let mut batch = PrimitiveBatch::new();
//! scene.tick(frame_time, &mut batch)?;
//! ```

// Core primitives
pub mod error;
pub mod primitives;

// Collaborator seams
pub mod content;
pub mod input;
pub mod render;

// Layout system
pub mod attached;
pub mod panels;
pub mod tree;

// Routing
pub mod events;

// Frame driver
pub mod config;
pub mod diagnostics;
pub mod scene;

pub use attached::{AttachedProperties, AttachedValue, PropertyValue};
pub use config::{RouterConfig, SceneConfig};
pub use content::{ColorBox, Content, Image, Label, MonospaceMetrics, PaintArea, TextMeasurer};
pub use diagnostics::NodeSnapshot;
pub use error::{ConfigError, LayoutError, Result};
pub use events::{EventKind, EventPayload, EventResult, EventRouter, RoutedEvent};
pub use input::{InputEvent, Key, KeyEvent, Modifiers, MouseButton, NamedKey, ScrollDelta};
pub use panels::{
    AdvancedStackPanel, Anchor, DockSide, FlowDirection, FlowPanel, ListPanel, Orientation, Panel, StackPanel,
};
pub use primitives::{Color, Point, Rect, Size, Thickness};
pub use render::{PrimitiveBatch, Renderer, TextureId};
pub use scene::Scene;
pub use tree::{Alignment, BoxModel, LayoutTree, Node, NodeId};
