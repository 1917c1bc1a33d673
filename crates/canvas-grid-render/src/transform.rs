//! 2D affine transformations.

use crate::types::{Point, Rect};

/// A 2D affine transformation matrix.
///
/// Stored as a 3x2 matrix:
/// ```text
/// | m00 m10 m20 |   | scale_x  skew_x   translate_x |
/// | m01 m11 m21 | = | skew_y   scale_y  translate_y |
/// ```
///
/// # Example
///
/// ```
/// use canvas_grid_render::{Point, Transform2D};
///
/// // `concat` applies the argument first, in the local space of `self`.
/// let t = Transform2D::scale(2.0, 2.0).concat(&Transform2D::translate(10.0, 0.0));
/// assert_eq!(t.transform_point(Point::new(5.0, 0.0)), Point::new(30.0, 0.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2D {
    pub m00: f32,
    pub m01: f32,
    pub m10: f32,
    pub m11: f32,
    pub m20: f32,
    pub m21: f32,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform2D {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        m00: 1.0,
        m01: 0.0,
        m10: 0.0,
        m11: 1.0,
        m20: 0.0,
        m21: 0.0,
    };

    /// A pure translation.
    #[inline]
    pub const fn translate(tx: f32, ty: f32) -> Self {
        Self {
            m20: tx,
            m21: ty,
            ..Self::IDENTITY
        }
    }

    /// A pure (possibly non-uniform) scale about the origin.
    #[inline]
    pub const fn scale(sx: f32, sy: f32) -> Self {
        Self {
            m00: sx,
            m11: sy,
            ..Self::IDENTITY
        }
    }

    /// Compose with `local`, which is applied before `self`.
    pub fn concat(&self, local: &Transform2D) -> Transform2D {
        Transform2D {
            m00: self.m00 * local.m00 + self.m10 * local.m01,
            m01: self.m01 * local.m00 + self.m11 * local.m01,
            m10: self.m00 * local.m10 + self.m10 * local.m11,
            m11: self.m01 * local.m10 + self.m11 * local.m11,
            m20: self.m00 * local.m20 + self.m10 * local.m21 + self.m20,
            m21: self.m01 * local.m20 + self.m11 * local.m21 + self.m21,
        }
    }

    /// Returns `true` for the identity transform.
    #[inline]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Returns `true` if axis-aligned rectangles stay axis-aligned.
    #[inline]
    pub fn is_axis_aligned(&self) -> bool {
        self.m01 == 0.0 && self.m10 == 0.0
    }

    /// Transform a point.
    #[inline]
    pub fn transform_point(&self, p: Point) -> Point {
        Point::new(
            self.m00 * p.x + self.m10 * p.y + self.m20,
            self.m01 * p.x + self.m11 * p.y + self.m21,
        )
    }

    /// Transform a rectangle, returning the bounding box of its corners.
    pub fn transform_rect(&self, rect: &Rect) -> Rect {
        if self.is_axis_aligned() {
            let a = self.transform_point(rect.origin);
            let b = self.transform_point(Point::new(rect.right(), rect.bottom()));
            return Rect::from_corners(a, b);
        }

        let corners = [
            self.transform_point(rect.origin),
            self.transform_point(Point::new(rect.right(), rect.top())),
            self.transform_point(Point::new(rect.left(), rect.bottom())),
            self.transform_point(Point::new(rect.right(), rect.bottom())),
        ];
        let (mut min, mut max) = (corners[0], corners[0]);
        for c in &corners[1..] {
            min = Point::new(min.x.min(c.x), min.y.min(c.y));
            max = Point::new(max.x.max(c.x), max.y.max(c.y));
        }
        Rect::from_corners(min, max)
    }

    /// Scale factor applied to lengths along the x and y axes.
    #[inline]
    pub fn axis_scale(&self) -> (f32, f32) {
        (
            (self.m00 * self.m00 + self.m01 * self.m01).sqrt(),
            (self.m10 * self.m10 + self.m11 * self.m11).sqrt(),
        )
    }
}
