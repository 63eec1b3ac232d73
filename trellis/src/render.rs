//! Drawing collaborator interface.
//!
//! The layout core never rasterizes anything. Each node's content paints into
//! a [`Renderer`] using its own bounding box and content rectangle.
//! [`PrimitiveBatch`] is a recording renderer: it keeps the primitives in flat
//! lists so a backend (or a test) can consume them after the frame.

use crate::primitives::{Color, Point, Rect};

/// Opaque handle to a texture owned by the drawing backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u64);

/// Primitive drawing surface.
pub trait Renderer {
    /// Open a batch. Every draw call of a frame happens between `begin_batch` and `end_batch`.
    fn begin_batch(&mut self);
    fn end_batch(&mut self);

    /// Replace the active clip rectangle; `None` disables clipping.
    fn set_clip(&mut self, clip: Option<Rect>);

    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn textured_rect(&mut self, rect: Rect, texture: TextureId, tint: Color);
    fn text(&mut self, text: &str, position: Point, font_size: f32, color: Color);
    fn line(&mut self, from: Point, to: Point, thickness: f32, color: Color);
    fn circle(&mut self, center: Point, radius: f32, color: Color);
}

/// Run `draw` inside a begin/end batch boundary.
pub fn batch<R, F, T>(renderer: &mut R, draw: F) -> T
where
    R: Renderer + ?Sized,
    F: FnOnce(&mut R) -> T,
{
    renderer.begin_batch();
    let out = draw(renderer);
    renderer.end_batch();
    out
}

// =========================================================================
// Recorded primitives
// =========================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolidRect {
    pub rect: Rect,
    pub color: Color,
    pub clip_rect: Option<Rect>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TexturedRect {
    pub rect: Rect,
    pub texture: TextureId,
    pub tint: Color,
    pub clip_rect: Option<Rect>,
}

/// A pre-positioned text run.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub position: Point,
    pub font_size: f32,
    pub color: Color,
    pub clip_rect: Option<Rect>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub p1: Point,
    pub p2: Point,
    pub thickness: f32,
    pub color: Color,
    pub clip_rect: Option<Rect>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Point,
    pub radius: f32,
    pub color: Color,
    pub clip_rect: Option<Rect>,
}

/// A batch of primitives recorded for one or more frames.
#[derive(Debug, Default, Clone)]
pub struct PrimitiveBatch {
    pub solid_rects: Vec<SolidRect>,
    pub textured_rects: Vec<TexturedRect>,
    pub text_runs: Vec<TextRun>,
    pub lines: Vec<LineSegment>,
    pub circles: Vec<Circle>,

    /// Number of completed begin/end pairs.
    pub batches_completed: usize,

    clip: Option<Rect>,
    open: bool,
}

impl PrimitiveBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all primitives and the clip.
    pub fn clear(&mut self) {
        self.solid_rects.clear();
        self.textured_rects.clear();
        self.text_runs.clear();
        self.lines.clear();
        self.circles.clear();
        self.clip = None;
    }

    pub fn current_clip(&self) -> Option<Rect> {
        self.clip
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Total number of recorded primitives.
    pub fn len(&self) -> usize {
        self.solid_rects.len() + self.textured_rects.len() + self.text_runs.len() + self.lines.len() + self.circles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Renderer for PrimitiveBatch {
    fn begin_batch(&mut self) {
        if self.open {
            tracing::warn!("begin_batch called on an open batch");
        }
        self.open = true;
    }

    fn end_batch(&mut self) {
        if !self.open {
            tracing::warn!("end_batch called without begin_batch");
            return;
        }
        self.open = false;
        self.batches_completed += 1;
    }

    fn set_clip(&mut self, clip: Option<Rect>) {
        self.clip = clip;
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let clip_rect = self.clip;
        self.solid_rects.push(SolidRect { rect, color, clip_rect });
    }

    fn textured_rect(&mut self, rect: Rect, texture: TextureId, tint: Color) {
        let clip_rect = self.clip;
        self.textured_rects.push(TexturedRect {
            rect,
            texture,
            tint,
            clip_rect,
        });
    }

    fn text(&mut self, text: &str, position: Point, font_size: f32, color: Color) {
        let clip_rect = self.clip;
        self.text_runs.push(TextRun {
            text: text.to_owned(),
            position,
            font_size,
            color,
            clip_rect,
        });
    }

    fn line(&mut self, from: Point, to: Point, thickness: f32, color: Color) {
        let clip_rect = self.clip;
        self.lines.push(LineSegment {
            p1: from,
            p2: to,
            thickness,
            color,
            clip_rect,
        });
    }

    fn circle(&mut self, center: Point, radius: f32, color: Color) {
        let clip_rect = self.clip;
        self.circles.push(Circle {
            center,
            radius,
            color,
            clip_rect,
        });
    }
}
