//! Layout node: box-model properties, cached geometry and dirty flags.

use std::fmt;

use serde::Serialize;

use crate::attached::AttachedProperties;
use crate::content::Content;
use crate::events::Handlers;
use crate::panels::Panel;
use crate::primitives::{Rect, Size, Thickness};

slotmap::new_key_type! {
    /// Identifies a node inside a [`LayoutTree`](super::LayoutTree).
    pub struct NodeId;
}

/// Placement of a node's measured extent within the bounds it is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Alignment {
    /// Fill the whole axis.
    #[default]
    Stretch,
    Start,
    Center,
    End,
}

impl Alignment {
    /// Place `extent` inside `[start, start + available)`, returning `(offset, extent)`.
    pub(crate) fn place(self, start: f32, available: f32, extent: f32) -> (f32, f32) {
        let extent = extent.min(available).max(0.0);
        match self {
            Alignment::Stretch => (start, available.max(0.0)),
            Alignment::Start => (start, extent),
            Alignment::Center => (start + (available - extent) / 2.0, extent),
            Alignment::End => (start + available - extent, extent),
        }
    }
}

/// Sizing and spacing properties of a node.
///
/// Zero means "unset" for the fixed, min and max lengths.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct BoxModel {
    pub horizontal_alignment: Alignment,
    pub vertical_alignment: Alignment,
    pub fixed_width: f32,
    pub fixed_height: f32,
    pub min_width: f32,
    pub min_height: f32,
    pub max_width: f32,
    pub max_height: f32,
    pub margin: Thickness,
    pub padding: Thickness,
}

impl BoxModel {
    /// Margin plus padding; the space a node reserves around its content.
    pub fn box_thickness(&self) -> Thickness {
        self.margin + self.padding
    }

    /// Clamp a measured content size to `[min, max]`, then apply any fixed size.
    pub(crate) fn resolve(&self, content: Size) -> Size {
        Size::new(
            resolve_axis(content.width, self.fixed_width, self.min_width, self.max_width),
            resolve_axis(content.height, self.fixed_height, self.min_height, self.max_height),
        )
    }

    /// The tightest limit this node puts on its own allotment per axis, if any.
    pub(crate) fn limit(&self) -> (Option<f32>, Option<f32>) {
        (axis_limit(self.fixed_width, self.max_width), axis_limit(self.fixed_height, self.max_height))
    }

    pub(crate) fn is_valid(&self) -> bool {
        let lengths = [
            self.fixed_width,
            self.fixed_height,
            self.min_width,
            self.min_height,
            self.max_width,
            self.max_height,
        ];
        lengths.iter().all(|v| v.is_finite() && *v >= 0.0) && self.margin.is_valid() && self.padding.is_valid()
    }
}

fn resolve_axis(measured: f32, fixed: f32, min: f32, max: f32) -> f32 {
    if fixed > 0.0 {
        return fixed;
    }
    let mut value = measured;
    if min > 0.0 {
        value = value.max(min);
    }
    if max > 0.0 {
        value = value.min(max);
    }
    value
}

fn axis_limit(fixed: f32, max: f32) -> Option<f32> {
    if fixed > 0.0 {
        Some(fixed)
    } else if max > 0.0 {
        Some(max)
    } else {
        None
    }
}

/// A visual element in the tree.
///
/// Nodes are built with the builder methods below, then inserted with
/// [`LayoutTree::create`](super::LayoutTree::create). After insertion every
/// mutation goes through the tree so invalidation can follow.
pub struct Node {
    pub(crate) name: Option<String>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) layout: BoxModel,
    pub(crate) panel: Panel,
    pub(crate) content: Option<Box<dyn Content>>,
    pub(crate) attached: AttachedProperties,
    pub(crate) handlers: Handlers,

    pub(crate) visible: bool,
    pub(crate) layout_visible: bool,
    pub(crate) enabled: bool,
    pub(crate) clip_children: bool,
    pub(crate) opacity: f32,

    pub(crate) desired_size: Size,
    pub(crate) bounding_box: Rect,
    pub(crate) content_rect: Rect,
    pub(crate) measure_valid: bool,
    pub(crate) arrange_dirty: bool,
}

impl Node {
    /// Create a node laid out by `panel`.
    pub fn new(panel: Panel) -> Self {
        Self {
            name: None,
            parent: None,
            children: Vec::new(),
            layout: BoxModel::default(),
            panel,
            content: None,
            attached: AttachedProperties::new(),
            handlers: Handlers::default(),
            visible: true,
            layout_visible: true,
            enabled: true,
            clip_children: false,
            opacity: 1.0,
            desired_size: Size::ZERO,
            bounding_box: Rect::ZERO,
            content_rect: Rect::ZERO,
            measure_valid: false,
            arrange_dirty: true,
        }
    }

    /// A leaf node whose size comes from its content (if any) and box model.
    pub fn leaf() -> Self {
        Self::new(Panel::Leaf)
    }

    /// Set a diagnostic name (also used by `LayoutTree::find_by_name`).
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn content(mut self, content: impl Content + 'static) -> Self {
        self.content = Some(Box::new(content));
        self
    }

    pub fn fixed_size(mut self, width: f32, height: f32) -> Self {
        self.layout.fixed_width = width;
        self.layout.fixed_height = height;
        self
    }

    pub fn fixed_width(mut self, width: f32) -> Self {
        self.layout.fixed_width = width;
        self
    }

    pub fn fixed_height(mut self, height: f32) -> Self {
        self.layout.fixed_height = height;
        self
    }

    pub fn min_size(mut self, width: f32, height: f32) -> Self {
        self.layout.min_width = width;
        self.layout.min_height = height;
        self
    }

    pub fn max_size(mut self, width: f32, height: f32) -> Self {
        self.layout.max_width = width;
        self.layout.max_height = height;
        self
    }

    pub fn margin(mut self, margin: Thickness) -> Self {
        self.layout.margin = margin;
        self
    }

    pub fn padding(mut self, padding: Thickness) -> Self {
        self.layout.padding = padding;
        self
    }

    /// Set horizontal and vertical alignment.
    pub fn align(mut self, horizontal: Alignment, vertical: Alignment) -> Self {
        self.layout.horizontal_alignment = horizontal;
        self.layout.vertical_alignment = vertical;
        self
    }

    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn layout_visible(mut self, layout_visible: bool) -> Self {
        self.layout_visible = layout_visible;
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Clip children's painting to this node's content rectangle.
    pub fn clip_children(mut self, clip: bool) -> Self {
        self.clip_children = clip;
        self
    }

    pub fn box_model(&self) -> &BoxModel {
        &self.layout
    }

    pub fn panel(&self) -> &Panel {
        &self.panel
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("panel", &self.panel)
            .field("layout", &self.layout)
            .field("desired_size", &self.desired_size)
            .field("bounding_box", &self.bounding_box)
            .field("measure_valid", &self.measure_valid)
            .field("arrange_dirty", &self.arrange_dirty)
            .finish_non_exhaustive()
    }
}
