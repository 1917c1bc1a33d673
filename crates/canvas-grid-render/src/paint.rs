//! Stroke styles for line drawing.

use crate::error::{RenderError, RenderResult};
use crate::types::Color;

/// Stroke style for drawing lines.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    /// Stroke color.
    pub color: Color,
    /// Stroke width in pixels.
    pub width: f32,
    /// Line cap style.
    pub cap: LineCap,
    /// Dash pattern (lengths of dashes and gaps).
    pub dash_pattern: Option<DashPattern>,
}

impl Default for Stroke {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 1.0,
            cap: LineCap::Butt,
            dash_pattern: None,
        }
    }
}

impl Stroke {
    /// Create a solid stroke with the given color and width.
    pub fn new(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            ..Default::default()
        }
    }

    /// Set the line cap.
    pub fn with_cap(mut self, cap: LineCap) -> Self {
        self.cap = cap;
        self
    }

    /// Set the dash pattern.
    pub fn with_dash(mut self, pattern: DashPattern) -> Self {
        self.dash_pattern = Some(pattern);
        self
    }
}

/// Line cap style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    /// Flat cap at the exact endpoint.
    #[default]
    Butt,
    /// Square cap extending half the stroke width past the endpoint.
    Square,
}

/// Dash pattern for stroked lines.
#[derive(Debug, Clone, PartialEq)]
pub struct DashPattern {
    /// Alternating lengths of dashes and gaps, starting with a dash.
    pattern: Vec<f32>,
    /// Offset into the pattern to start.
    offset: f32,
}

impl DashPattern {
    /// Create a new dash pattern.
    ///
    /// Negative lengths are treated as zero; at least one length must be positive.
    pub fn new(pattern: Vec<f32>, offset: f32) -> RenderResult<Self> {
        let pattern: Vec<f32> = pattern.into_iter().map(|len| len.max(0.0)).collect();
        if !pattern.iter().any(|len| *len > 0.0) {
            return Err(RenderError::InvalidDashPattern);
        }
        Ok(Self { pattern, offset })
    }

    /// Create a simple dash pattern with the given dash and gap lengths.
    ///
    /// Both lengths are clamped to at least a quarter pixel.
    #[inline]
    pub fn simple(dash_length: f32, gap_length: f32) -> Self {
        Self {
            pattern: vec![dash_length.max(0.25), gap_length.max(0.25)],
            offset: 0.0,
        }
    }

    /// The dash/gap lengths.
    pub fn pattern(&self) -> &[f32] {
        &self.pattern
    }

    /// The starting offset into the pattern.
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Split a line of `length` pixels into the `[start, end)` spans that are inked.
    pub fn segments(&self, length: f32) -> Vec<(f32, f32)> {
        let period: f32 = self.pattern.iter().sum();
        let mut spans = Vec::new();
        if length <= 0.0 || period <= 0.0 {
            return spans;
        }

        // Odd-length patterns repeat with dash and gap roles swapped, as in SVG.
        let lengths: Vec<f32> = if self.pattern.len() % 2 == 1 {
            self.pattern.iter().chain(self.pattern.iter()).copied().collect()
        } else {
            self.pattern.clone()
        };
        let period = if lengths.len() != self.pattern.len() {
            period * 2.0
        } else {
            period
        };

        let mut pos = -(self.offset.rem_euclid(period));
        let mut index = 0;
        while pos < length {
            let len = lengths[index % lengths.len()];
            if index % 2 == 0 && len > 0.0 {
                let start = pos.max(0.0);
                let end = (pos + len).min(length);
                if start < end {
                    spans.push((start, end));
                }
            }
            pos += len;
            index += 1;
        }
        spans
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_stroke() {
        let stroke = Stroke::default();
        assert_eq!(stroke.width, 1.0);
        assert_eq!(stroke.cap, LineCap::Butt);
        assert!(stroke.dash_pattern.is_none());
    }

    #[test]
    fn test_dash_segments() {
        let dash = DashPattern::simple(4.0, 2.0);
        assert_eq!(
            dash.segments(14.0),
            vec![(0.0, 4.0), (6.0, 10.0), (12.0, 14.0)]
        );
    }

    #[test]
    fn test_dash_offset() {
        let dash = DashPattern::new(vec![2.0, 2.0], 1.0).unwrap();
        assert_eq!(dash.segments(6.0), vec![(0.0, 1.0), (3.0, 5.0)]);
    }

    #[test]
    fn test_odd_pattern_alternates_roles() {
        let dash = DashPattern::new(vec![1.0], 0.0).unwrap();
        assert_eq!(dash.segments(5.0), vec![(0.0, 1.0), (2.0, 3.0), (4.0, 5.0)]);
    }

    #[test]
    fn test_invalid_pattern() {
        assert_eq!(
            DashPattern::new(vec![0.0, -1.0], 0.0),
            Err(RenderError::InvalidDashPattern)
        );
    }
}
