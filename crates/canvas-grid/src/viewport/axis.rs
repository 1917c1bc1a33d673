//! One scrollable axis of the viewport.

use std::ops::Range;

use canvas_grid_core::logging::targets;

use crate::error::GridResult;
use crate::section::{SectionList, SectionMap, UniformSectionMap};

/// A section map plus the scroll offset into it.
///
/// `origin` is where the first section would start in viewport pixels when
/// not scrolled (the header strip size), and `extent` is how many pixels of
/// the axis are available for sections.
#[derive(Debug)]
pub(crate) struct Axis {
    map: Box<dyn SectionMap>,
    offset: u64,
    origin: f32,
    extent: f32,
}

impl Axis {
    pub(crate) fn new(count: usize, size: u32, uniform: bool, origin: f32) -> Self {
        let map: Box<dyn SectionMap> = if uniform {
            Box::new(UniformSectionMap::new(count, size))
        } else {
            Box::new(SectionList::new(count, size))
        };
        Self {
            map,
            offset: 0,
            origin,
            extent: 0.0,
        }
    }

    pub(crate) fn map(&self) -> &dyn SectionMap {
        self.map.as_ref()
    }

    pub(crate) fn map_mut(&mut self) -> &mut dyn SectionMap {
        self.map.as_mut()
    }

    pub(crate) fn offset(&self) -> u64 {
        self.offset
    }

    pub(crate) fn set_extent(&mut self, extent: f32) {
        self.extent = extent.max(0.0);
    }

    /// Largest offset that still fills the available extent.
    pub(crate) fn max_offset(&self) -> u64 {
        self.map.total_size().saturating_sub(self.extent as u64)
    }

    /// Set the scroll offset, clamped. Returns `true` if it moved.
    pub(crate) fn scroll_to(&mut self, offset: u64) -> bool {
        let clamped = offset.min(self.max_offset());
        let moved = clamped != self.offset;
        self.offset = clamped;
        moved
    }

    /// Re-clamp after the content shrank. Returns `true` if the offset moved.
    pub(crate) fn clamp(&mut self) -> bool {
        self.scroll_to(self.offset)
    }

    /// Viewport coordinate of a content position.
    pub(crate) fn to_view(&self, position: u64) -> f32 {
        (position as f64 - self.offset as f64) as f32 + self.origin
    }

    /// Content position under a viewport coordinate, if any.
    pub(crate) fn to_content(&self, view: f32) -> Option<u64> {
        let local = f64::from(view - self.origin);
        if local < 0.0 || local >= f64::from(self.extent) {
            return None;
        }
        Some((local + self.offset as f64) as u64)
    }

    /// Sections overlapping the visible extent.
    pub(crate) fn visible(&self) -> Range<usize> {
        self.map.visible_range(self.offset, self.extent.ceil() as u64)
    }

    /// Viewport `(start, length)` of sections `start..end`.
    pub(crate) fn view_span(&self, start: usize, end: usize) -> (f32, f32) {
        let (position, length) = self.map.span(start, end);
        (self.to_view(position), length as f32)
    }

    /// Viewport `(start, length)` of one section.
    pub(crate) fn section_view(&self, index: usize) -> (f32, f32) {
        (
            self.to_view(self.map.section_position(index)),
            self.map.section_size(index) as f32,
        )
    }

    /// Resize one section, switching to per-section storage if needed.
    pub(crate) fn resize_section(&mut self, index: usize, size: u32) -> GridResult<()> {
        if !self.map.supports_per_section_sizes() && size != self.map.default_size() {
            tracing::debug!(
                target: targets::SECTION,
                count = self.map.count(),
                "switching to per-section sizes"
            );
            self.map = Box::new(SectionList::new(self.map.count(), self.map.default_size()));
        }
        self.map.set_section_size(index, size)
    }
}
