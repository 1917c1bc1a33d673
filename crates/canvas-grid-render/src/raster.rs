//! A software [`Surface`] backed by an RGBA pixel buffer.
//!
//! `RasterSurface` is the headless surface used by tests and by hosts that
//! composite the grid themselves. Pixels are sampled at their centres: a pixel
//! `(px, py)` is covered by a rectangle when `(px + 0.5, py + 0.5)` lies inside
//! it, so integer-aligned rectangles cover exactly the pixels they span.
//!
//! Text is not rasterized. Each visible `fill_text` call is recorded as a
//! [`TextRun`] so callers can assert on what was drawn and where.

use crate::error::{RenderError, RenderResult};
use crate::paint::{LineCap, Stroke};
use crate::surface::{Font, RenderStateStack, Surface, TextBaseline, TextStyle};
use crate::transform::Transform2D;
use crate::types::{Color, Point, Rect, Size};

/// Average advance of a glyph, as a fraction of the font size.
const GLYPH_ADVANCE: f32 = 0.6;

/// A recorded text draw.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    /// Anchor in device coordinates.
    pub origin: Point,
    pub style: TextStyle,
    /// Estimated ink box in device coordinates.
    pub bounds: Rect,
    /// Clip in effect when the run was drawn.
    pub clip: Option<Rect>,
}

/// Counters for drawing calls that reached the surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RasterStats {
    pub fill_calls: u32,
    pub stroke_calls: u32,
    pub text_calls: u32,
}

/// An in-memory RGBA surface.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
    state: RenderStateStack,
    text_runs: Vec<TextRun>,
    stats: RasterStats,
}

impl RasterSurface {
    /// Create a transparent surface of the given size.
    pub fn new(width: u32, height: u32) -> RenderResult<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidDimensions { width, height });
        }
        tracing::debug!(target: "canvas_grid::render", width, height, "created raster surface");
        Ok(Self {
            width,
            height,
            pixels: vec![Color::TRANSPARENT; width as usize * height as usize],
            state: RenderStateStack::new(),
            text_runs: Vec::new(),
            stats: RasterStats::default(),
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The color of one pixel, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[(y * self.width + x) as usize])
    }

    /// The 8-bit RGBA value of one pixel, or `None` outside the surface.
    pub fn pixel_rgba8(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixel(x, y).map(Color::to_rgba8)
    }

    /// Text runs recorded since creation or the last [`take_text_runs`](Self::take_text_runs).
    pub fn text_runs(&self) -> &[TextRun] {
        &self.text_runs
    }

    /// Drain the recorded text runs.
    pub fn take_text_runs(&mut self) -> Vec<TextRun> {
        std::mem::take(&mut self.text_runs)
    }

    pub fn stats(&self) -> RasterStats {
        self.stats
    }

    /// Overwrite every pixel, ignoring transform and clip.
    pub fn clear(&mut self, color: Color) {
        self.pixels.fill(color);
        self.text_runs.clear();
    }

    /// Reset transform, clip and the saved-state stack.
    pub fn reset_state(&mut self) {
        self.state.reset();
    }

    fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width as f32, self.height as f32)
    }

    /// Visible part of a device-space rectangle.
    fn visible(&self, device: &Rect) -> Option<Rect> {
        let on_surface = device.intersect(&self.bounds())?;
        match self.state.current().clip {
            Some(clip) => on_surface.intersect(&clip),
            None => Some(on_surface),
        }
    }

    fn fill_device_rect(&mut self, device: Rect, color: Color) {
        self.write_device_rect(device, |px| color.over(px));
    }

    fn write_device_rect(&mut self, device: Rect, mut write: impl FnMut(Color) -> Color) {
        let Some(area) = self.visible(&device) else {
            return;
        };

        let x0 = (area.left() - 0.5).ceil().max(0.0) as u32;
        let x1 = ((area.right() - 0.5).ceil().max(0.0) as u32).min(self.width);
        let y0 = (area.top() - 0.5).ceil().max(0.0) as u32;
        let y1 = ((area.bottom() - 0.5).ceil().max(0.0) as u32).min(self.height);

        for y in y0..y1 {
            let row = (y * self.width) as usize;
            for x in x0..x1 {
                let px = &mut self.pixels[row + x as usize];
                *px = write(*px);
            }
        }
    }

    fn stroke_axis_aligned(&mut self, from: Point, to: Point, width: f32, stroke: &Stroke) {
        let horizontal = from.y == to.y;
        let (start, end) = if horizontal { (from.x, to.x) } else { (from.y, to.y) };
        let dir = if end >= start { 1.0 } else { -1.0 };
        let length = (end - start).abs();
        let half = width / 2.0;
        let cap = match stroke.cap {
            LineCap::Butt => 0.0,
            LineCap::Square => half,
        };

        let spans = match &stroke.dash_pattern {
            Some(dash) => {
                let local_len = length / self.length_scale(horizontal);
                dash.segments(local_len)
                    .into_iter()
                    .map(|(s, e)| (s / local_len * length, e / local_len * length))
                    .collect()
            }
            None => vec![(0.0, length)],
        };

        for (s, e) in spans {
            let a = start + dir * s - dir * cap;
            let b = start + dir * e + dir * cap;
            let rect = if horizontal {
                Rect::from_corners(Point::new(a, from.y - half), Point::new(b, from.y + half))
            } else {
                Rect::from_corners(Point::new(from.x - half, a), Point::new(from.x + half, b))
            };
            self.fill_device_rect(rect, stroke.color);
        }
    }

    fn stroke_sampled(&mut self, from: Point, to: Point, width: f32, stroke: &Stroke) {
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        let length = (dx * dx + dy * dy).sqrt();
        if length <= 0.0 {
            return;
        }

        let spans = match &stroke.dash_pattern {
            Some(dash) => dash.segments(length),
            None => vec![(0.0, length)],
        };

        let half = width / 2.0;
        let mut covered = std::collections::HashSet::new();
        for (s, e) in spans {
            let mut t = s;
            while t <= e {
                let cx = from.x + dx * t / length;
                let cy = from.y + dy * t / length;
                let x0 = (cx - half).round() as i64;
                let y0 = (cy - half).round() as i64;
                let side = width.round().max(1.0) as i64;
                for y in y0..y0 + side {
                    for x in x0..x0 + side {
                        covered.insert((x, y));
                    }
                }
                t += 0.5;
            }
        }

        for (x, y) in covered {
            self.fill_device_rect(Rect::new(x as f32, y as f32, 1.0, 1.0), stroke.color);
        }
    }

    fn length_scale(&self, horizontal: bool) -> f32 {
        let (sx, sy) = self.state.current().transform.axis_scale();
        let s = if horizontal { sx } else { sy };
        if s > 0.0 { s } else { 1.0 }
    }
}

impl Surface for RasterSurface {
    fn size(&self) -> Size {
        Size::from((self.width, self.height))
    }

    fn save(&mut self) {
        self.state.save();
    }

    fn restore(&mut self) {
        if !self.state.restore() {
            tracing::warn!(target: "canvas_grid::render", "restore() without matching save()");
        }
    }

    fn state_depth(&self) -> usize {
        self.state.depth()
    }

    fn transform(&self) -> Transform2D {
        self.state.current().transform
    }

    fn set_transform(&mut self, transform: Transform2D) {
        self.state.set_transform(transform);
    }

    fn clip_rect(&mut self, rect: Rect) {
        self.state.clip_rect(rect);
    }

    fn clip_bounds(&self) -> Option<Rect> {
        self.state.current().clip
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        if color.is_transparent() || rect.is_empty() {
            return;
        }
        self.stats.fill_calls += 1;
        let device = self.state.current().transform.transform_rect(&rect);
        self.fill_device_rect(device, color);
    }

    fn clear_rect(&mut self, rect: Rect, color: Color) {
        if rect.is_empty() {
            return;
        }
        self.stats.fill_calls += 1;
        let device = self.state.current().transform.transform_rect(&rect);
        self.write_device_rect(device, |_| color);
    }

    fn stroke_line(&mut self, from: Point, to: Point, stroke: &Stroke) {
        if stroke.color.is_transparent() || stroke.width <= 0.0 {
            return;
        }
        self.stats.stroke_calls += 1;

        let transform = self.state.current().transform;
        let a = transform.transform_point(from);
        let b = transform.transform_point(to);
        let horizontal = a.y == b.y;
        let width = stroke.width * self.length_scale(!horizontal);

        if horizontal || a.x == b.x {
            self.stroke_axis_aligned(a, b, width, stroke);
        } else {
            self.stroke_sampled(a, b, width, stroke);
        }
    }

    fn fill_text(&mut self, text: &str, origin: Point, style: &TextStyle) {
        if text.is_empty() || style.color.is_transparent() {
            return;
        }

        let extent = self.measure_text(text, &style.font);
        let top = match style.baseline {
            TextBaseline::Top => origin.y,
            TextBaseline::Middle => origin.y - extent.height / 2.0,
            TextBaseline::Alphabetic => origin.y - extent.height * 0.8,
            TextBaseline::Bottom => origin.y - extent.height,
        };
        let transform = self.state.current().transform;
        let local = Rect::new(origin.x, top, extent.width, extent.height);
        let bounds = transform.transform_rect(&local);

        if self.visible(&bounds).is_none() {
            return;
        }

        self.stats.text_calls += 1;
        self.text_runs.push(TextRun {
            text: text.to_string(),
            origin: transform.transform_point(origin),
            style: style.clone(),
            bounds,
            clip: self.state.current().clip,
        });
    }

    fn measure_text(&self, text: &str, font: &Font) -> Size {
        let glyphs = text.chars().count() as f32;
        Size::new(glyphs * font.size * GLYPH_ADVANCE, font.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::DashPattern;

    fn surface() -> RasterSurface {
        RasterSurface::new(20, 20).unwrap()
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        assert_eq!(
            RasterSurface::new(0, 10).unwrap_err(),
            RenderError::InvalidDimensions {
                width: 0,
                height: 10
            }
        );
    }

    #[test]
    fn test_fill_rect_covers_exact_pixels() {
        let mut s = surface();
        s.fill_rect(Rect::new(2.0, 3.0, 4.0, 2.0), Color::RED);

        assert_eq!(s.pixel(2, 3), Some(Color::RED));
        assert_eq!(s.pixel(5, 4), Some(Color::RED));
        assert_eq!(s.pixel(6, 4), Some(Color::TRANSPARENT));
        assert_eq!(s.pixel(2, 5), Some(Color::TRANSPARENT));
        assert_eq!(s.pixel(1, 3), Some(Color::TRANSPARENT));
    }

    #[test]
    fn test_fill_respects_clip_and_restore() {
        let mut s = surface();
        s.save();
        s.clip_rect(Rect::new(0.0, 0.0, 5.0, 5.0));
        s.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Color::GREEN);
        s.restore();
        assert_eq!(s.state_depth(), 0);
        assert_eq!(s.clip_bounds(), None);

        assert_eq!(s.pixel(4, 4), Some(Color::GREEN));
        assert_eq!(s.pixel(5, 5), Some(Color::TRANSPARENT));
    }

    #[test]
    fn test_translate_and_scale() {
        let mut s = surface();
        s.save();
        s.translate(10.0, 10.0);
        s.scale(2.0, 2.0);
        s.fill_rect(Rect::new(0.0, 0.0, 2.0, 2.0), Color::BLUE);
        s.restore();

        assert_eq!(s.pixel(10, 10), Some(Color::BLUE));
        assert_eq!(s.pixel(13, 13), Some(Color::BLUE));
        assert_eq!(s.pixel(14, 14), Some(Color::TRANSPARENT));
        assert!(s.transform().is_identity());
    }

    #[test]
    fn test_negative_origin_is_clipped_to_surface() {
        let mut s = surface();
        s.fill_rect(Rect::new(-5.0, -5.0, 6.0, 6.0), Color::RED);
        assert_eq!(s.pixel(0, 0), Some(Color::RED));
        assert_eq!(s.pixel(1, 1), Some(Color::TRANSPARENT));
    }

    #[test]
    fn test_horizontal_stroke_band() {
        let mut s = surface();
        let stroke = Stroke::new(Color::RED, 2.0);
        s.stroke_line(Point::new(0.0, 5.0), Point::new(10.0, 5.0), &stroke);

        assert_eq!(s.pixel(0, 4), Some(Color::RED));
        assert_eq!(s.pixel(9, 5), Some(Color::RED));
        assert_eq!(s.pixel(9, 6), Some(Color::TRANSPARENT));
        assert_eq!(s.pixel(10, 5), Some(Color::TRANSPARENT));
    }

    #[test]
    fn test_dashed_vertical_stroke() {
        let mut s = surface();
        let stroke = Stroke::new(Color::BLACK, 1.0).with_dash(DashPattern::simple(2.0, 2.0));
        s.stroke_line(Point::new(3.5, 0.0), Point::new(3.5, 8.0), &stroke);

        let inked: Vec<bool> = (0..8)
            .map(|y| s.pixel(3, y) == Some(Color::BLACK))
            .collect();
        assert_eq!(
            inked,
            vec![true, true, false, false, true, true, false, false]
        );
    }

    #[test]
    fn test_diagonal_stroke_marks_endpoints() {
        let mut s = surface();
        s.stroke_line(Point::new(0.5, 0.5), Point::new(9.5, 9.5), &Stroke::default());
        assert_eq!(s.pixel(0, 0), Some(Color::BLACK));
        assert_eq!(s.pixel(5, 5), Some(Color::BLACK));
        assert_eq!(s.pixel(9, 0), Some(Color::TRANSPARENT));
    }

    #[test]
    fn test_text_recorded_when_visible() {
        let mut s = surface();
        let style = TextStyle {
            color: Color::BLACK,
            ..Default::default()
        };
        s.fill_text("42", Point::new(2.0, 10.0), &style);
        s.fill_text("hidden", Point::new(100.0, 100.0), &style);

        assert_eq!(s.text_runs().len(), 1);
        let run = &s.text_runs()[0];
        assert_eq!(run.text, "42");
        assert_eq!(run.bounds.top(), 4.0);
        assert_eq!(s.stats().text_calls, 1);
    }

    #[test]
    fn test_unbalanced_restore_is_ignored() {
        let mut s = surface();
        s.restore();
        assert_eq!(s.state_depth(), 0);
    }
}
