//! A table model that stores every cell.
//!
//! `TableModel` keeps a dense `rows x columns` grid of [`CellData`] plus one
//! record per row and column header. Every mutation validates its indices,
//! applies the change, releases the lock and then emits the single most
//! specific notification for what happened.

use parking_lot::RwLock;

use canvas_grid_core::logging::targets;

use super::data::{CellData, CellValue};
use super::traits::{CellRange, DataModel, ModelSignals, SectionRange, SectionRangeMove};
use crate::error::{GridError, GridResult, check_move, check_range};

#[derive(Debug, Default)]
struct TableData {
    cells: Vec<Vec<CellData>>,
    row_headers: Vec<CellData>,
    column_headers: Vec<CellData>,
    column_count: usize,
}

impl TableData {
    fn with_size(rows: usize, columns: usize) -> Self {
        Self {
            cells: vec![vec![CellData::default(); columns]; rows],
            row_headers: vec![CellData::default(); rows],
            column_headers: vec![CellData::default(); columns],
            column_count: columns,
        }
    }

    fn row_count(&self) -> usize {
        self.cells.len()
    }

    fn check_cell(&self, row: usize, column: usize) -> GridResult<()> {
        if row >= self.row_count() || column >= self.column_count {
            return Err(GridError::CellOutOfBounds {
                row,
                column,
                rows: self.row_count(),
                columns: self.column_count,
            });
        }
        Ok(())
    }
}

/// A stored, editable table.
///
/// # Example
///
/// ```
/// use canvas_grid::model::{DataModel, TableModel};
///
/// let model = TableModel::new(10, 3);
/// model.signals().rows_inserted.connect(|range| {
///     println!("rows {}..{} inserted", range.start, range.end);
/// });
///
/// model.insert_rows(5, 3).unwrap();
/// assert_eq!(model.row_count(), 13);
/// ```
#[derive(Debug, Default)]
pub struct TableModel {
    data: RwLock<TableData>,
    signals: ModelSignals,
}

impl TableModel {
    /// Create a table of empty cells.
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            data: RwLock::new(TableData::with_size(rows, columns)),
            signals: ModelSignals::new(),
        }
    }

    /// Create a table from row-major values. Short rows are padded with empty cells.
    pub fn from_rows<I, R, V>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        let model = Self::default();
        *model.data.write() = Self::build(rows);
        model
    }

    fn build<I, R, V>(rows: I) -> TableData
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        let mut cells: Vec<Vec<CellData>> = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|v| CellData::new().with_value(v))
                    .collect()
            })
            .collect();
        let column_count = cells.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut cells {
            row.resize(column_count, CellData::default());
        }
        TableData {
            row_headers: vec![CellData::default(); cells.len()],
            column_headers: vec![CellData::default(); column_count],
            cells,
            column_count,
        }
    }

    // -------------------------------------------------------------------------
    // Cell content
    // -------------------------------------------------------------------------

    /// Set the value of one cell.
    ///
    /// Emits `cell_data_changed` only if the value actually changed.
    pub fn set_value(&self, row: usize, column: usize, value: Option<CellValue>) -> GridResult<()> {
        let changed = {
            let mut data = self.data.write();
            data.check_cell(row, column)?;
            let cell = &mut data.cells[row][column];
            if cell.value == value {
                false
            } else {
                cell.value = value;
                true
            }
        };
        if changed {
            tracing::trace!(target: targets::MODEL, row, column, "cell value changed");
            self.signals.emit_cell_changed(row, column);
        }
        Ok(())
    }

    /// Replace the whole record of one cell.
    pub fn set_cell(&self, row: usize, column: usize, cell: CellData) -> GridResult<()> {
        let changed = {
            let mut data = self.data.write();
            data.check_cell(row, column)?;
            let slot = &mut data.cells[row][column];
            if *slot == cell {
                false
            } else {
                *slot = cell;
                true
            }
        };
        if changed {
            self.signals.emit_cell_changed(row, column);
        }
        Ok(())
    }

    /// Get a copy of one cell's record.
    pub fn cell(&self, row: usize, column: usize) -> Option<CellData> {
        self.data.read().cells.get(row)?.get(column).cloned()
    }

    /// Edit every cell in `range` through a closure, then emit one
    /// `cell_data_changed` for the whole rectangle.
    pub fn update_cells<F>(&self, range: CellRange, mut f: F) -> GridResult<()>
    where
        F: FnMut(usize, usize, &mut CellData),
    {
        {
            let mut data = self.data.write();
            let rows = data.row_count();
            let columns = data.column_count;
            check_range("row", range.start_row, range.end_row, rows)?;
            check_range("column", range.start_column, range.end_column, columns)?;
            for row in range.rows().as_range() {
                for column in range.columns().as_range() {
                    f(row, column, &mut data.cells[row][column]);
                }
            }
        }
        if !range.is_empty() {
            self.signals.cell_data_changed.emit(range);
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Headers
    // -------------------------------------------------------------------------

    /// Set the record of a row header section.
    pub fn set_row_header(&self, row: usize, header: CellData) -> GridResult<()> {
        {
            let mut data = self.data.write();
            let count = data.row_count();
            check_range("row", row, row + 1, count)?;
            data.row_headers[row] = header;
        }
        self.signals
            .row_header_data_changed
            .emit(SectionRange::single(row));
        Ok(())
    }

    /// Set the record of a column header section.
    pub fn set_column_header(&self, column: usize, header: CellData) -> GridResult<()> {
        {
            let mut data = self.data.write();
            let count = data.column_count;
            check_range("column", column, column + 1, count)?;
            data.column_headers[column] = header;
        }
        self.signals
            .column_header_data_changed
            .emit(SectionRange::single(column));
        Ok(())
    }

    /// Label every column header, starting at column 0.
    pub fn set_column_labels<I, S>(&self, labels: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let count = {
            let mut data = self.data.write();
            let mut count = 0;
            for (header, label) in data.column_headers.iter_mut().zip(labels) {
                header.value = Some(CellValue::Text(label.into()));
                count += 1;
            }
            count
        };
        if count > 0 {
            self.signals
                .column_header_data_changed
                .emit(SectionRange::new(0, count));
        }
    }

    // -------------------------------------------------------------------------
    // Structure
    // -------------------------------------------------------------------------

    /// Insert `count` empty rows so that they occupy `start..start + count`.
    pub fn insert_rows(&self, start: usize, count: usize) -> GridResult<()> {
        {
            let mut data = self.data.write();
            check_range("row", start, start, data.row_count())?;
            let columns = data.column_count;
            data.cells
                .splice(start..start, (0..count).map(|_| vec![CellData::default(); columns]));
            data.row_headers
                .splice(start..start, (0..count).map(|_| CellData::default()));
        }
        if count > 0 {
            tracing::debug!(target: targets::MODEL, start, count, "rows inserted");
            self.signals
                .rows_inserted
                .emit(SectionRange::new(start, start + count));
        }
        Ok(())
    }

    /// Remove the rows `start..start + count`.
    pub fn remove_rows(&self, start: usize, count: usize) -> GridResult<()> {
        {
            let mut data = self.data.write();
            check_range("row", start, start + count, data.row_count())?;
            data.cells.drain(start..start + count);
            data.row_headers.drain(start..start + count);
        }
        if count > 0 {
            tracing::debug!(target: targets::MODEL, start, count, "rows removed");
            self.signals
                .rows_removed
                .emit(SectionRange::new(start, start + count));
        }
        Ok(())
    }

    /// Move rows `start..start + count` so that the block begins at `destination`.
    pub fn move_rows(&self, start: usize, count: usize, destination: usize) -> GridResult<()> {
        {
            let mut data = self.data.write();
            check_move("row", start, start + count, destination, data.row_count())?;
            move_block(&mut data.cells, start, count, destination);
            move_block(&mut data.row_headers, start, count, destination);
        }
        if count > 0 && start != destination {
            tracing::debug!(target: targets::MODEL, start, count, destination, "rows moved");
            self.signals.rows_moved.emit(SectionRangeMove::new(
                SectionRange::new(start, start + count),
                destination,
            ));
        }
        Ok(())
    }

    /// Insert `count` empty columns so that they occupy `start..start + count`.
    pub fn insert_columns(&self, start: usize, count: usize) -> GridResult<()> {
        {
            let mut data = self.data.write();
            check_range("column", start, start, data.column_count)?;
            for row in &mut data.cells {
                row.splice(start..start, (0..count).map(|_| CellData::default()));
            }
            data.column_headers
                .splice(start..start, (0..count).map(|_| CellData::default()));
            data.column_count += count;
        }
        if count > 0 {
            tracing::debug!(target: targets::MODEL, start, count, "columns inserted");
            self.signals
                .columns_inserted
                .emit(SectionRange::new(start, start + count));
        }
        Ok(())
    }

    /// Remove the columns `start..start + count`.
    pub fn remove_columns(&self, start: usize, count: usize) -> GridResult<()> {
        {
            let mut data = self.data.write();
            check_range("column", start, start + count, data.column_count)?;
            for row in &mut data.cells {
                row.drain(start..start + count);
            }
            data.column_headers.drain(start..start + count);
            data.column_count -= count;
        }
        if count > 0 {
            tracing::debug!(target: targets::MODEL, start, count, "columns removed");
            self.signals
                .columns_removed
                .emit(SectionRange::new(start, start + count));
        }
        Ok(())
    }

    /// Move columns `start..start + count` so that the block begins at `destination`.
    pub fn move_columns(&self, start: usize, count: usize, destination: usize) -> GridResult<()> {
        {
            let mut data = self.data.write();
            check_move("column", start, start + count, destination, data.column_count)?;
            for row in &mut data.cells {
                move_block(row, start, count, destination);
            }
            move_block(&mut data.column_headers, start, count, destination);
        }
        if count > 0 && start != destination {
            tracing::debug!(target: targets::MODEL, start, count, destination, "columns moved");
            self.signals.columns_moved.emit(SectionRangeMove::new(
                SectionRange::new(start, start + count),
                destination,
            ));
        }
        Ok(())
    }

    /// Replace all contents and emit `model_changed`.
    pub fn reset<I, R, V>(&self, rows: I)
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        let data = Self::build(rows);
        *self.data.write() = data;
        tracing::debug!(target: targets::MODEL, "model reset");
        self.signals.model_changed.emit(());
    }

    /// Remove every row and column and emit `model_changed`.
    pub fn clear(&self) {
        *self.data.write() = TableData::default();
        self.signals.model_changed.emit(());
    }
}

/// Move `v[start..start + count]` so it begins at `destination` afterwards.
fn move_block<T>(v: &mut Vec<T>, start: usize, count: usize, destination: usize) {
    if count == 0 || start == destination {
        return;
    }
    let block: Vec<T> = v.drain(start..start + count).collect();
    v.splice(destination..destination, block);
}

impl DataModel for TableModel {
    fn row_count(&self) -> usize {
        self.data.read().row_count()
    }

    fn column_count(&self) -> usize {
        self.data.read().column_count
    }

    fn cell_data(&self, row: usize, column: usize, out: &mut CellData) {
        match self.data.read().cells.get(row).and_then(|r| r.get(column)) {
            Some(cell) => out.clone_from(cell),
            None => out.clear(),
        }
    }

    fn row_header_data(&self, row: usize, out: &mut CellData) {
        match self.data.read().row_headers.get(row) {
            Some(header) => out.clone_from(header),
            None => out.clear(),
        }
    }

    fn column_header_data(&self, column: usize, out: &mut CellData) {
        match self.data.read().column_headers.get(column) {
            Some(header) => out.clone_from(header),
            None => out.clear(),
        }
    }

    fn signals(&self) -> &ModelSignals {
        &self.signals
    }
}

static_assertions::assert_impl_all!(TableModel: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn numbered(rows: usize, columns: usize) -> TableModel {
        TableModel::from_rows((0..rows).map(|r| (0..columns).map(move |c| (r * 100 + c) as i64)))
    }

    fn value(model: &TableModel, row: usize, column: usize) -> Option<CellValue> {
        let mut out = CellData::default();
        model.cell_data(row, column, &mut out);
        out.value
    }

    #[test]
    fn test_from_rows_pads_short_rows() {
        let model = TableModel::from_rows(vec![vec!["a", "b"], vec!["c"]]);
        assert_eq!(model.row_count(), 2);
        assert_eq!(model.column_count(), 2);
        assert_eq!(value(&model, 1, 1), None);
        assert_eq!(value(&model, 1, 0), Some(CellValue::from("c")));
    }

    #[test]
    fn test_out_of_range_access_clears_record() {
        let model = numbered(2, 2);
        let mut out = CellData::new().with_value(7).with_renderer("x");
        model.cell_data(5, 0, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_set_value_emits_only_on_change() {
        let model = numbered(3, 3);
        let events = Arc::new(Mutex::new(Vec::new()));

        let events_clone = events.clone();
        model.signals().cell_data_changed.connect(move |range| {
            events_clone.lock().push(*range);
        });

        model.set_value(1, 2, Some(CellValue::Int(102))).unwrap();
        model.set_value(1, 2, Some(CellValue::Int(5))).unwrap();
        assert_eq!(*events.lock(), vec![CellRange::single(1, 2)]);

        assert!(matches!(
            model.set_value(3, 0, None),
            Err(GridError::CellOutOfBounds { row: 3, .. })
        ));
    }

    #[test]
    fn test_insert_rows_shifts_existing() {
        let model = numbered(10, 1);
        let inserted = Arc::new(Mutex::new(None));

        let inserted_clone = inserted.clone();
        model.signals().rows_inserted.connect(move |range| {
            *inserted_clone.lock() = Some(*range);
        });

        model.insert_rows(5, 3).unwrap();
        assert_eq!(*inserted.lock(), Some(SectionRange::new(5, 8)));
        assert_eq!(model.row_count(), 13);
        assert_eq!(value(&model, 5, 0), None);
        assert_eq!(value(&model, 8, 0), Some(CellValue::Int(500)));
        assert_eq!(value(&model, 12, 0), Some(CellValue::Int(900)));
    }

    #[test]
    fn test_remove_rows() {
        let model = numbered(6, 2);
        model.remove_rows(1, 2).unwrap();
        assert_eq!(model.row_count(), 4);
        assert_eq!(value(&model, 1, 1), Some(CellValue::Int(301)));
        assert!(model.remove_rows(3, 2).is_err());
    }

    #[test]
    fn test_move_rows_destination_is_post_move_index() {
        let model = numbered(6, 1);
        let moved = Arc::new(Mutex::new(None));

        let moved_clone = moved.clone();
        model.signals().rows_moved.connect(move |m| {
            *moved_clone.lock() = Some(*m);
        });

        model.move_rows(0, 2, 3).unwrap();
        let order: Vec<_> = (0..6).map(|r| value(&model, r, 0)).collect();
        assert_eq!(
            order,
            [200, 300, 400, 0, 100, 500]
                .into_iter()
                .map(|v| Some(CellValue::Int(v)))
                .collect::<Vec<_>>()
        );
        assert_eq!(
            *moved.lock(),
            Some(SectionRangeMove::new(SectionRange::new(0, 2), 3))
        );
    }

    #[test]
    fn test_column_structure() {
        let model = numbered(2, 4);
        model.insert_columns(1, 1).unwrap();
        assert_eq!(model.column_count(), 5);
        assert_eq!(value(&model, 0, 2), Some(CellValue::Int(1)));

        model.remove_columns(0, 2).unwrap();
        assert_eq!(value(&model, 1, 0), Some(CellValue::Int(101)));

        model.move_columns(2, 1, 0).unwrap();
        assert_eq!(value(&model, 0, 0), Some(CellValue::Int(3)));
    }

    #[test]
    fn test_headers_emit_header_signals() {
        let model = numbered(3, 3);
        let rows = Arc::new(Mutex::new(Vec::new()));
        let columns = Arc::new(Mutex::new(Vec::new()));

        let rows_clone = rows.clone();
        model.signals().row_header_data_changed.connect(move |r| {
            rows_clone.lock().push(*r);
        });
        let columns_clone = columns.clone();
        model.signals().column_header_data_changed.connect(move |r| {
            columns_clone.lock().push(*r);
        });

        model.set_row_header(2, CellData::new().with_value("third")).unwrap();
        model.set_column_labels(["A", "B"]);

        assert_eq!(*rows.lock(), vec![SectionRange::single(2)]);
        assert_eq!(*columns.lock(), vec![SectionRange::new(0, 2)]);

        let mut out = CellData::default();
        model.column_header_data(1, &mut out);
        assert_eq!(out.value, Some(CellValue::from("B")));
    }

    #[test]
    fn test_update_cells_emits_single_rectangle() {
        let model = numbered(4, 4);
        let events = Arc::new(Mutex::new(Vec::new()));

        let events_clone = events.clone();
        model.signals().cell_data_changed.connect(move |r| {
            events_clone.lock().push(*r);
        });

        let range = CellRange::new(1, 3, 0, 2);
        model
            .update_cells(range, |_, _, cell| cell.renderer = Some("bold".into()))
            .unwrap();

        assert_eq!(*events.lock(), vec![range]);
        assert_eq!(model.cell(2, 1).unwrap().renderer.as_deref(), Some("bold"));
    }

    #[test]
    fn test_reset_emits_model_changed_only() {
        let model = numbered(2, 2);
        let total = Arc::new(Mutex::new(0));

        let total_clone = total.clone();
        model.signals().model_changed.connect(move |_| {
            *total_clone.lock() += 1;
        });
        model.signals().rows_inserted.connect(|_| panic!("unexpected rows_inserted"));

        model.reset(vec![vec![1, 2, 3]; 5]);
        assert_eq!(*total.lock(), 1);
        assert_eq!(model.row_count(), 5);
        assert_eq!(model.column_count(), 3);
    }
}
