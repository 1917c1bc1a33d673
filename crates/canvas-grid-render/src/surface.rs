//! The drawing surface contract.
//!
//! A [`Surface`] is the mutable 2-D drawing handle that cell renderers paint
//! into. It is a scarce resource owned by the caller and shared across many
//! renderer calls in one repaint, so state discipline matters:
//!
//! - Every `save()` must be paired with a `restore()` before the renderer
//!   returns. [`Surface::state_depth`] lets callers verify that nothing leaked.
//! - Clips intersect; they can only be widened again by `restore()`.
//! - Transforms compose in local space: `translate` then `fill_rect` draws the
//!   rectangle offset by the translation.
//!
//! The surface does not pre-clip anything on behalf of renderers. A renderer
//! that must not draw outside its cell clips itself inside a save/restore pair.

use crate::paint::Stroke;
use crate::transform::Transform2D;
use crate::types::{Color, Point, Rect, Size};

/// Vertical anchoring of a text run relative to its origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextBaseline {
    /// The origin is the top of the em box.
    Top,
    /// The origin is the vertical middle of the em box.
    #[default]
    Middle,
    /// The origin is the alphabetic baseline.
    Alphabetic,
    /// The origin is the bottom of the em box.
    Bottom,
}

/// Font selection for text runs.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    /// Font family name.
    pub family: String,
    /// Size in pixels.
    pub size: f32,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            family: "sans-serif".to_string(),
            size: 12.0,
        }
    }
}

impl Font {
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
        }
    }
}

/// Style for [`Surface::fill_text`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextStyle {
    pub font: Font,
    pub color: Color,
    pub baseline: TextBaseline,
}

/// The 2-D drawing interface consumed by cell renderers and the grid viewport.
///
/// The trait is object safe; renderers receive `&mut dyn Surface`.
pub trait Surface {
    /// Size of the drawable area in device pixels.
    fn size(&self) -> Size;

    // =========================================================================
    // State Management
    // =========================================================================

    /// Save the current transform and clip.
    fn save(&mut self);

    /// Restore the most recently saved state. Unbalanced calls are ignored.
    fn restore(&mut self);

    /// Number of `save()` calls not yet matched by `restore()`.
    fn state_depth(&self) -> usize;

    // =========================================================================
    // Transform Operations
    // =========================================================================

    /// Get the current transform.
    fn transform(&self) -> Transform2D;

    /// Replace the current transform.
    fn set_transform(&mut self, transform: Transform2D);

    /// Apply a translation in local coordinates.
    fn translate(&mut self, tx: f32, ty: f32) {
        let t = self.transform().concat(&Transform2D::translate(tx, ty));
        self.set_transform(t);
    }

    /// Apply a scale in local coordinates.
    fn scale(&mut self, sx: f32, sy: f32) {
        let t = self.transform().concat(&Transform2D::scale(sx, sy));
        self.set_transform(t);
    }

    // =========================================================================
    // Clipping
    // =========================================================================

    /// Intersect the clip with `rect`, given in local coordinates.
    fn clip_rect(&mut self, rect: Rect);

    /// The current clip in device coordinates, or `None` when unclipped.
    fn clip_bounds(&self) -> Option<Rect>;

    // =========================================================================
    // Drawing
    // =========================================================================

    /// Fill a rectangle with a solid color.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Replace everything inside a rectangle with `color`, without blending.
    /// A transparent color erases.
    fn clear_rect(&mut self, rect: Rect, color: Color);

    /// Stroke a straight line centred on the segment `from -> to`.
    fn stroke_line(&mut self, from: Point, to: Point, stroke: &Stroke);

    /// Draw a single line of text anchored at `origin`.
    fn fill_text(&mut self, text: &str, origin: Point, style: &TextStyle);

    /// Measure a single line of text.
    fn measure_text(&self, text: &str, font: &Font) -> Size;
}

/// Transform and clip in effect for drawing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RenderState {
    pub transform: Transform2D,
    /// Clip in device coordinates. `Some(Rect::ZERO)` clips everything away.
    pub clip: Option<Rect>,
}

/// A stack of saved [`RenderState`]s, for surface implementations.
#[derive(Debug, Clone, Default)]
pub struct RenderStateStack {
    current: RenderState,
    saved: Vec<RenderState>,
}

impl RenderStateStack {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn current(&self) -> &RenderState {
        &self.current
    }

    pub fn save(&mut self) {
        self.saved.push(self.current);
    }

    /// Pop the last saved state. Returns `false` if nothing was saved.
    pub fn restore(&mut self) -> bool {
        match self.saved.pop() {
            Some(state) => {
                self.current = state;
                true
            }
            None => false,
        }
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    pub fn set_transform(&mut self, transform: Transform2D) {
        self.current.transform = transform;
    }

    /// Intersect the clip with a rectangle in local coordinates.
    pub fn clip_rect(&mut self, rect: Rect) {
        let device = self.current.transform.transform_rect(&rect);
        self.current.clip = Some(match self.current.clip {
            Some(existing) => existing.intersect(&device).unwrap_or(Rect::ZERO),
            None => device,
        });
    }

    /// Drop all saved states and reset to identity/unclipped.
    pub fn reset(&mut self) {
        self.saved.clear();
        self.current = RenderState::default();
    }
}
