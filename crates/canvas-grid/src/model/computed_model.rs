//! A model whose cells are produced by closures.
//!
//! `ComputedModel` stores nothing per cell, which makes it suitable for very
//! large or synthetic grids. Because it cannot see changes to whatever its
//! closures read, callers announce them through the `invalidate_*` methods.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use canvas_grid_core::logging::targets;

use super::data::CellData;
use super::traits::{CellRange, DataModel, ModelSignals, SectionRange};

/// Fills the record for a body cell: `(row, column, out)`.
pub type CellFn = Arc<dyn Fn(usize, usize, &mut CellData) + Send + Sync>;

/// Fills the record for a header section: `(section, out)`.
pub type HeaderFn = Arc<dyn Fn(usize, &mut CellData) + Send + Sync>;

/// A closure-backed model.
///
/// # Example
///
/// ```
/// use canvas_grid::model::{CellData, ComputedModel, DataModel};
///
/// let model = ComputedModel::new(1_000_000, 26, |row, column, out| {
///     out.value = Some(((row * column) as i64).into());
/// });
///
/// let mut cell = CellData::default();
/// model.cell_data(999, 3, &mut cell);
/// assert_eq!(cell.value.map(|v| v.to_string()).as_deref(), Some("2997"));
/// ```
pub struct ComputedModel {
    rows: AtomicUsize,
    columns: AtomicUsize,
    cell_fn: CellFn,
    row_header_fn: Option<HeaderFn>,
    column_header_fn: Option<HeaderFn>,
    signals: ModelSignals,
}

impl ComputedModel {
    pub fn new<F>(rows: usize, columns: usize, cell_fn: F) -> Self
    where
        F: Fn(usize, usize, &mut CellData) + Send + Sync + 'static,
    {
        Self {
            rows: AtomicUsize::new(rows),
            columns: AtomicUsize::new(columns),
            cell_fn: Arc::new(cell_fn),
            row_header_fn: None,
            column_header_fn: None,
            signals: ModelSignals::new(),
        }
    }

    /// Supply row header content.
    pub fn with_row_headers<F>(mut self, header_fn: F) -> Self
    where
        F: Fn(usize, &mut CellData) + Send + Sync + 'static,
    {
        self.row_header_fn = Some(Arc::new(header_fn));
        self
    }

    /// Supply column header content.
    pub fn with_column_headers<F>(mut self, header_fn: F) -> Self
    where
        F: Fn(usize, &mut CellData) + Send + Sync + 'static,
    {
        self.column_header_fn = Some(Arc::new(header_fn));
        self
    }

    /// Grow or shrink at the end, emitting `rows_inserted`/`rows_removed`.
    pub fn set_row_count(&self, rows: usize) {
        let old = self.rows.swap(rows, Ordering::SeqCst);
        tracing::debug!(target: targets::MODEL, old, new = rows, "row count changed");
        if rows > old {
            self.signals.rows_inserted.emit(SectionRange::new(old, rows));
        } else if rows < old {
            self.signals.rows_removed.emit(SectionRange::new(rows, old));
        }
    }

    /// Grow or shrink at the end, emitting `columns_inserted`/`columns_removed`.
    pub fn set_column_count(&self, columns: usize) {
        let old = self.columns.swap(columns, Ordering::SeqCst);
        tracing::debug!(target: targets::MODEL, old, new = columns, "column count changed");
        if columns > old {
            self.signals
                .columns_inserted
                .emit(SectionRange::new(old, columns));
        } else if columns < old {
            self.signals
                .columns_removed
                .emit(SectionRange::new(columns, old));
        }
    }

    /// Announce that the cells in `range` now compute different content.
    pub fn invalidate_cells(&self, range: CellRange) {
        if !range.is_empty() {
            self.signals.cell_data_changed.emit(range);
        }
    }

    /// Announce that row headers in `range` changed.
    pub fn invalidate_row_headers(&self, range: SectionRange) {
        if !range.is_empty() {
            self.signals.row_header_data_changed.emit(range);
        }
    }

    /// Announce that column headers in `range` changed.
    pub fn invalidate_column_headers(&self, range: SectionRange) {
        if !range.is_empty() {
            self.signals.column_header_data_changed.emit(range);
        }
    }

    /// Announce that everything may have changed.
    pub fn invalidate_all(&self) {
        self.signals.model_changed.emit(());
    }

    fn in_bounds(&self, row: usize, column: usize) -> bool {
        row < self.rows.load(Ordering::SeqCst) && column < self.columns.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for ComputedModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComputedModel")
            .field("rows", &self.rows.load(Ordering::SeqCst))
            .field("columns", &self.columns.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl DataModel for ComputedModel {
    fn row_count(&self) -> usize {
        self.rows.load(Ordering::SeqCst)
    }

    fn column_count(&self) -> usize {
        self.columns.load(Ordering::SeqCst)
    }

    fn cell_data(&self, row: usize, column: usize, out: &mut CellData) {
        out.clear();
        if self.in_bounds(row, column) {
            (self.cell_fn)(row, column, out);
        }
    }

    fn row_header_data(&self, row: usize, out: &mut CellData) {
        out.clear();
        if let Some(header_fn) = &self.row_header_fn
            && row < self.row_count()
        {
            header_fn(row, out);
        }
    }

    fn column_header_data(&self, column: usize, out: &mut CellData) {
        out.clear();
        if let Some(header_fn) = &self.column_header_fn
            && column < self.column_count()
        {
            header_fn(column, out);
        }
    }

    fn signals(&self) -> &ModelSignals {
        &self.signals
    }
}

static_assertions::assert_impl_all!(ComputedModel: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CellValue;
    use parking_lot::Mutex;

    #[test]
    fn test_cells_outside_counts_are_cleared() {
        let model = ComputedModel::new(2, 2, |_, _, out| out.value = Some(CellValue::Int(1)));
        let mut out = CellData::new().with_renderer("stale");

        model.cell_data(1, 1, &mut out);
        assert_eq!(out.value, Some(CellValue::Int(1)));
        assert_eq!(out.renderer, None);

        model.cell_data(2, 0, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_count_changes_emit_structural_signals() {
        let model = ComputedModel::new(10, 4, |_, _, _| {});
        let log = Arc::new(Mutex::new(Vec::new()));

        let log_ins = log.clone();
        model.signals().rows_inserted.connect(move |r| {
            log_ins.lock().push(("rows+", *r));
        });
        let log_rem = log.clone();
        model.signals().columns_removed.connect(move |r| {
            log_rem.lock().push(("cols-", *r));
        });

        model.set_row_count(12);
        model.set_row_count(12);
        model.set_column_count(1);

        assert_eq!(
            *log.lock(),
            vec![
                ("rows+", SectionRange::new(10, 12)),
                ("cols-", SectionRange::new(1, 4)),
            ]
        );
    }

    #[test]
    fn test_headers() {
        let model = ComputedModel::new(3, 3, |_, _, _| {})
            .with_column_headers(|c, out| out.value = Some(format!("C{c}").into()));

        let mut out = CellData::default();
        model.column_header_data(2, &mut out);
        assert_eq!(out.value, Some(CellValue::from("C2")));

        model.row_header_data(0, &mut out);
        assert!(out.is_empty());
    }
}
