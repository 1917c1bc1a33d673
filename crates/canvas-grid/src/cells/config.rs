//! The per-cell snapshot handed to renderers.

use canvas_grid_render::Rect;

use super::style::CellOptions;
use crate::model::CellValue;

/// Which part of the grid a cell belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellRegion {
    /// A data cell.
    #[default]
    Body,
    /// A row header section; the section index is in `row`, `column` is 0.
    RowHeader,
    /// A column header section; the section index is in `column`, `row` is 0.
    ColumnHeader,
}

/// Everything a renderer needs to draw one cell, built fresh for each call.
///
/// Coordinates are viewport pixels and may be negative when the cell is
/// partially scrolled off. The borrowed value and options make it impossible
/// for a renderer to keep them past the call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellConfig<'a> {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub row: usize,
    pub column: usize,
    pub value: Option<&'a CellValue>,
    pub options: Option<&'a CellOptions>,
    pub region: CellRegion,
}

impl<'a> CellConfig<'a> {
    /// A body cell with no value and no options.
    pub fn new(row: usize, column: usize, rect: Rect) -> Self {
        Self {
            x: rect.left(),
            y: rect.top(),
            width: rect.width(),
            height: rect.height(),
            row,
            column,
            value: None,
            options: None,
            region: CellRegion::Body,
        }
    }

    pub fn with_value(mut self, value: Option<&'a CellValue>) -> Self {
        self.value = value;
        self
    }

    pub fn with_options(mut self, options: Option<&'a CellOptions>) -> Self {
        self.options = options;
        self
    }

    pub fn with_region(mut self, region: CellRegion) -> Self {
        self.region = region;
        self
    }

    /// The cell's logical rectangle.
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// The area a renderer may touch: one extra pixel above and to the left,
    /// so that adjacent cells share their boundary pixels.
    #[inline]
    pub fn bleed_rect(&self) -> Rect {
        Rect::new(self.x - 1.0, self.y - 1.0, self.width + 1.0, self.height + 1.0)
    }

    /// The interior left for content once the shared boundary column and row
    /// on the right and bottom are excluded.
    #[inline]
    pub fn content_rect(&self) -> Rect {
        Rect::new(
            self.x,
            self.y,
            (self.width - 1.0).max(0.0),
            (self.height - 1.0).max(0.0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bleed_rect_extends_up_and_left() {
        let config = CellConfig::new(3, 4, Rect::new(10.0, 20.0, 100.0, 24.0));
        assert_eq!(config.bleed_rect(), Rect::new(9.0, 19.0, 101.0, 25.0));
        assert_eq!(config.bleed_rect().right(), config.rect().right());
        assert_eq!(config.content_rect(), Rect::new(10.0, 20.0, 99.0, 23.0));
    }

    #[test]
    fn test_defaults() {
        let config = CellConfig::new(0, 0, Rect::ZERO);
        assert_eq!(config.region, CellRegion::Body);
        assert!(config.value.is_none());
        assert_eq!(config.content_rect().width(), 0.0);
    }
}
