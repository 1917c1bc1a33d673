use std::fmt;
use std::ops::Range;

use crate::error::GridResult;

/// Maps section indices on one axis to pixel extents and back.
///
/// Positions are measured from the start of the first section. Sections are
/// contiguous: `section_position(i + 1) == section_position(i) + section_size(i)`.
///
/// # Out-of-range queries
///
/// - `section_position(i)` for `i >= count()` is `total_size()`.
/// - `section_size(i)` for `i >= count()` is `0`.
/// - `section_at(p)` is `None` for `p >= total_size()`.
///
/// Structural edits take the same half-open ranges as the model signals that
/// drive them, and fail without changing anything when out of bounds.
pub trait SectionMap: Send + Sync + fmt::Debug {
    /// Number of sections.
    fn count(&self) -> usize;

    /// Sum of all section sizes.
    fn total_size(&self) -> u64;

    /// Offset of the start of section `index`.
    fn section_position(&self, index: usize) -> u64;

    /// Size of section `index`.
    fn section_size(&self, index: usize) -> u32;

    /// The section whose `[position, position + size)` contains `position`.
    ///
    /// Zero-size sections contain no pixel and are never returned.
    fn section_at(&self, position: u64) -> Option<usize>;

    /// Insert `count` sections of the default size before `start`.
    fn insert_sections(&mut self, start: usize, count: usize) -> GridResult<()>;

    /// Remove the `count` sections beginning at `start`.
    fn remove_sections(&mut self, start: usize, count: usize) -> GridResult<()>;

    /// Move `count` sections beginning at `start` so that, afterwards, the
    /// block begins at `destination`.
    fn move_sections(&mut self, start: usize, count: usize, destination: usize)
    -> GridResult<()>;

    /// Discard every section and create `count` of the default size.
    fn reset(&mut self, count: usize);

    /// Resize one section.
    fn set_section_size(&mut self, index: usize, size: u32) -> GridResult<()>;

    /// The size given to new sections.
    fn default_size(&self) -> u32;

    /// Whether [`set_section_size`](Self::set_section_size) accepts sizes
    /// other than the default.
    fn supports_per_section_sizes(&self) -> bool;

    /// Pixel extent of `start..end`, as `(position, length)`.
    fn span(&self, start: usize, end: usize) -> (u64, u64) {
        let from = self.section_position(start);
        let to = self.section_position(end.max(start));
        (from, to - from)
    }

    /// Indices of the sections overlapping the pixel window `[offset, offset + extent)`.
    fn visible_range(&self, offset: u64, extent: u64) -> Range<usize> {
        if extent == 0 {
            return 0..0;
        }
        let Some(first) = self.section_at(offset) else {
            return 0..0;
        };
        let last_pixel = (offset + extent - 1).min(self.total_size().saturating_sub(1));
        let last = self.section_at(last_pixel).unwrap_or(first);
        first..last + 1
    }
}
