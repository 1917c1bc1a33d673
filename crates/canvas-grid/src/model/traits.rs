//! The data model trait and its change-notification taxonomy.

use std::ops::Range;

use canvas_grid_core::Signal;

use super::data::CellData;

/// A half-open interval `start..end` of row or column indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SectionRange {
    pub start: usize,
    pub end: usize,
}

impl SectionRange {
    /// Create a range; `end` is exclusive.
    #[inline]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// A range containing exactly one section.
    #[inline]
    pub const fn single(index: usize) -> Self {
        Self::new(index, index + 1)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index < self.end
    }

    #[inline]
    pub fn as_range(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl From<Range<usize>> for SectionRange {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

/// A block of sections that moved.
///
/// `destination` is the index of the block's first section *after* the move,
/// so the block now occupies `destination..destination + range.len()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SectionRangeMove {
    pub range: SectionRange,
    pub destination: usize,
}

impl SectionRangeMove {
    pub const fn new(range: SectionRange, destination: usize) -> Self {
        Self { range, destination }
    }

    /// Where the block sits after the move.
    pub fn destination_range(&self) -> SectionRange {
        SectionRange::new(self.destination, self.destination + self.range.len())
    }

    /// All indices whose section changed, before or after the move.
    pub fn affected(&self) -> SectionRange {
        let dest = self.destination_range();
        SectionRange::new(
            self.range.start.min(dest.start),
            self.range.end.max(dest.end),
        )
    }
}

/// A rectangular block of cells, half-open on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CellRange {
    pub start_row: usize,
    pub end_row: usize,
    pub start_column: usize,
    pub end_column: usize,
}

impl CellRange {
    pub const fn new(start_row: usize, end_row: usize, start_column: usize, end_column: usize) -> Self {
        Self {
            start_row,
            end_row,
            start_column,
            end_column,
        }
    }

    /// The range covering exactly one cell.
    pub const fn single(row: usize, column: usize) -> Self {
        Self::new(row, row + 1, column, column + 1)
    }

    pub fn rows(&self) -> SectionRange {
        SectionRange::new(self.start_row, self.end_row)
    }

    pub fn columns(&self) -> SectionRange {
        SectionRange::new(self.start_column, self.end_column)
    }

    pub fn is_empty(&self) -> bool {
        self.rows().is_empty() || self.columns().is_empty()
    }

    pub fn contains(&self, row: usize, column: usize) -> bool {
        self.rows().contains(row) && self.columns().contains(column)
    }
}

/// Change notifications emitted by a [`DataModel`].
///
/// Models emit the most specific signal that describes a change. A content
/// edit emits `cell_data_changed`, never `model_changed`; `model_changed` is
/// reserved for changes that invalidate structure wholesale.
///
/// All notifications are emitted after the change has been applied, so
/// listeners observe the new counts and contents.
pub struct ModelSignals {
    /// Everything may have changed: counts, contents and headers.
    pub model_changed: Signal<()>,

    /// Rows now occupying `start..end` were inserted.
    pub rows_inserted: Signal<SectionRange>,
    /// Rows formerly at `start..end` were removed.
    pub rows_removed: Signal<SectionRange>,
    /// A block of rows moved.
    pub rows_moved: Signal<SectionRangeMove>,

    /// Columns now occupying `start..end` were inserted.
    pub columns_inserted: Signal<SectionRange>,
    /// Columns formerly at `start..end` were removed.
    pub columns_removed: Signal<SectionRange>,
    /// A block of columns moved.
    pub columns_moved: Signal<SectionRangeMove>,

    /// Row header content changed for the range.
    pub row_header_data_changed: Signal<SectionRange>,
    /// Column header content changed for the range.
    pub column_header_data_changed: Signal<SectionRange>,

    /// Content of the cells in the rectangle changed.
    pub cell_data_changed: Signal<CellRange>,
}

impl Default for ModelSignals {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ModelSignals {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelSignals").finish_non_exhaustive()
    }
}

impl ModelSignals {
    pub fn new() -> Self {
        Self {
            model_changed: Signal::new(),
            rows_inserted: Signal::new(),
            rows_removed: Signal::new(),
            rows_moved: Signal::new(),
            columns_inserted: Signal::new(),
            columns_removed: Signal::new(),
            columns_moved: Signal::new(),
            row_header_data_changed: Signal::new(),
            column_header_data_changed: Signal::new(),
            cell_data_changed: Signal::new(),
        }
    }

    /// Emit `cell_data_changed` for a single cell.
    pub fn emit_cell_changed(&self, row: usize, column: usize) {
        self.cell_data_changed.emit(CellRange::single(row, column));
    }

    /// Block or unblock every signal at once.
    pub fn set_blocked(&self, blocked: bool) {
        self.model_changed.set_blocked(blocked);
        self.rows_inserted.set_blocked(blocked);
        self.rows_removed.set_blocked(blocked);
        self.rows_moved.set_blocked(blocked);
        self.columns_inserted.set_blocked(blocked);
        self.columns_removed.set_blocked(blocked);
        self.columns_moved.set_blocked(blocked);
        self.row_header_data_changed.set_blocked(blocked);
        self.column_header_data_changed.set_blocked(blocked);
        self.cell_data_changed.set_blocked(blocked);
    }

    /// Total number of connected listeners across all signals.
    pub fn connection_count(&self) -> usize {
        self.model_changed.connection_count()
            + self.rows_inserted.connection_count()
            + self.rows_removed.connection_count()
            + self.rows_moved.connection_count()
            + self.columns_inserted.connection_count()
            + self.columns_removed.connection_count()
            + self.columns_moved.connection_count()
            + self.row_header_data_changed.connection_count()
            + self.column_header_data_changed.connection_count()
            + self.cell_data_changed.connection_count()
    }
}

/// The source of truth for a grid's counts and contents.
///
/// Accessors fill an output [`CellData`] record rather than returning one so
/// that a repaint can reuse a single allocation for every visible cell.
/// Out-of-range indices must leave the record cleared.
pub trait DataModel: Send + Sync {
    /// Current number of rows.
    fn row_count(&self) -> usize;

    /// Current number of columns.
    fn column_count(&self) -> usize;

    /// Fill `out` with the value, renderer name and options of one cell.
    fn cell_data(&self, row: usize, column: usize, out: &mut CellData);

    /// Fill `out` for a row header section. Models without headers clear it.
    fn row_header_data(&self, row: usize, out: &mut CellData) {
        let _ = row;
        out.clear();
    }

    /// Fill `out` for a column header section. Models without headers clear it.
    fn column_header_data(&self, column: usize, out: &mut CellData) {
        let _ = column;
        out.clear();
    }

    /// The model's change notifications.
    fn signals(&self) -> &ModelSignals;
}

static_assertions::assert_impl_all!(ModelSignals: Send, Sync);
static_assertions::assert_obj_safe!(DataModel);
