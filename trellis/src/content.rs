//! Node content: the leaf measurement hook and the paint hook.
//!
//! Text shaping is not done here. [`Label`] asks a [`TextMeasurer`]
//! (provided by the font/metrics collaborator) how large its text is.

use std::fmt;
use std::rc::Rc;

use crate::primitives::{Color, Point, Rect, Size};
use crate::render::{Renderer, TextureId};

// Metrics for a 14px monospace face, used by `MonospaceMetrics::default()`.
pub const CHAR_WIDTH: f32 = 8.4;
pub const LINE_HEIGHT: f32 = 18.0;
pub const BASE_FONT_SIZE: f32 = 14.0;

/// Geometry handed to [`Content::paint`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaintArea {
    pub bounding_box: Rect,
    pub content_rect: Rect,
    /// Own opacity multiplied by every ancestor's.
    pub opacity: f32,
}

/// What a node measures and paints, independent of how it is laid out.
pub trait Content {
    /// Desired content size within `available` (either axis may be infinite).
    fn measure(&self, available: Size) -> Size;

    fn paint(&self, _area: &PaintArea, _renderer: &mut dyn Renderer) {}
}

/// Text metrics collaborator.
pub trait TextMeasurer {
    /// Size of `text` at `font_size`, wrapped to `max_width` when finite.
    fn measure_text(&self, text: &str, font_size: f32, max_width: f32) -> Size;
}

/// Fixed-advance metrics: every character is `char_width` wide at `base_font_size`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMetrics {
    pub char_width: f32,
    pub line_height: f32,
    pub base_font_size: f32,
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self {
            char_width: CHAR_WIDTH,
            line_height: LINE_HEIGHT,
            base_font_size: BASE_FONT_SIZE,
        }
    }
}

impl TextMeasurer for MonospaceMetrics {
    fn measure_text(&self, text: &str, font_size: f32, max_width: f32) -> Size {
        let scale = font_size / self.base_font_size;
        let advance = self.char_width * scale;
        let line_height = self.line_height * scale;

        let chars = text.chars().count();
        if chars == 0 {
            return Size::new(0.0, line_height);
        }
        let full_width = chars as f32 * advance;
        if !max_width.is_finite() || full_width <= max_width {
            return Size::new(full_width, line_height);
        }

        let columns = ((max_width / advance).floor() as usize).max(1);
        let lines = chars.div_ceil(columns);
        Size::new(columns as f32 * advance, lines as f32 * line_height)
    }
}

// =========================================================================
// Built-in content
// =========================================================================

/// A run of text.
#[derive(Clone)]
pub struct Label {
    pub text: String,
    pub font_size: f32,
    pub color: Color,
    measurer: Rc<dyn TextMeasurer>,
}

impl Label {
    pub fn new(text: impl Into<String>, measurer: Rc<dyn TextMeasurer>) -> Self {
        Self {
            text: text.into(),
            font_size: BASE_FONT_SIZE,
            color: Color::WHITE,
            measurer,
        }
    }

    pub fn font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

impl fmt::Debug for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Label")
            .field("text", &self.text)
            .field("font_size", &self.font_size)
            .finish_non_exhaustive()
    }
}

impl Content for Label {
    fn measure(&self, available: Size) -> Size {
        self.measurer.measure_text(&self.text, self.font_size, available.width)
    }

    fn paint(&self, area: &PaintArea, renderer: &mut dyn Renderer) {
        let origin = area.content_rect.origin();
        renderer.text(&self.text, Point::new(origin.x, origin.y), self.font_size, self.color.faded(area.opacity));
    }
}

/// A solid fill of the bounding box. Measures to nothing on its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorBox {
    pub color: Color,
}

impl ColorBox {
    pub fn new(color: Color) -> Self {
        Self { color }
    }
}

impl Content for ColorBox {
    fn measure(&self, _available: Size) -> Size {
        Size::ZERO
    }

    fn paint(&self, area: &PaintArea, renderer: &mut dyn Renderer) {
        renderer.fill_rect(area.bounding_box, self.color.faded(area.opacity));
    }
}

/// A textured rectangle with a natural size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Image {
    pub texture: TextureId,
    pub natural_size: Size,
    pub tint: Color,
}

impl Image {
    pub fn new(texture: TextureId, natural_size: Size) -> Self {
        Self {
            texture,
            natural_size,
            tint: Color::WHITE,
        }
    }
}

impl Content for Image {
    fn measure(&self, _available: Size) -> Size {
        self.natural_size
    }

    fn paint(&self, area: &PaintArea, renderer: &mut dyn Renderer) {
        renderer.textured_rect(area.content_rect, self.texture, self.tint.faded(area.opacity));
    }
}
