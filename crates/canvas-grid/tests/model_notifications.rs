//! What the bundled models announce, observed through their public signals.

use std::sync::Arc;

use canvas_grid::model::{
    CellData, CellRange, CellValue, ComputedModel, DataModel, ModelSignals, SectionRange,
    SectionRangeMove, TableModel,
};
use parking_lot::Mutex;

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Reset,
    RowsInserted(SectionRange),
    RowsRemoved(SectionRange),
    RowsMoved(SectionRangeMove),
    ColumnsInserted(SectionRange),
    ColumnsRemoved(SectionRange),
    ColumnsMoved(SectionRangeMove),
    RowHeaders(SectionRange),
    ColumnHeaders(SectionRange),
    Cells(CellRange),
}

fn record(signals: &ModelSignals) -> Arc<Mutex<Vec<Event>>> {
    let log = Arc::new(Mutex::new(Vec::new()));

    let l = log.clone();
    signals.model_changed.connect(move |_| l.lock().push(Event::Reset));
    let l = log.clone();
    signals
        .rows_inserted
        .connect(move |r| l.lock().push(Event::RowsInserted(*r)));
    let l = log.clone();
    signals
        .rows_removed
        .connect(move |r| l.lock().push(Event::RowsRemoved(*r)));
    let l = log.clone();
    signals
        .rows_moved
        .connect(move |m| l.lock().push(Event::RowsMoved(*m)));
    let l = log.clone();
    signals
        .columns_inserted
        .connect(move |r| l.lock().push(Event::ColumnsInserted(*r)));
    let l = log.clone();
    signals
        .columns_removed
        .connect(move |r| l.lock().push(Event::ColumnsRemoved(*r)));
    let l = log.clone();
    signals
        .columns_moved
        .connect(move |m| l.lock().push(Event::ColumnsMoved(*m)));
    let l = log.clone();
    signals
        .row_header_data_changed
        .connect(move |r| l.lock().push(Event::RowHeaders(*r)));
    let l = log.clone();
    signals
        .column_header_data_changed
        .connect(move |r| l.lock().push(Event::ColumnHeaders(*r)));
    let l = log.clone();
    signals
        .cell_data_changed
        .connect(move |r| l.lock().push(Event::Cells(*r)));

    log
}

fn text(model: &dyn DataModel, row: usize, column: usize) -> Option<String> {
    let mut out = CellData::default();
    model.cell_data(row, column, &mut out);
    out.value.map(|v| v.to_string())
}

#[test]
fn table_model_announces_each_edit_once() {
    let model = TableModel::new(4, 3);
    let log = record(model.signals());

    model.insert_rows(1, 2).unwrap();
    model.remove_columns(0, 1).unwrap();
    model.move_rows(0, 2, 3).unwrap();
    model.set_value(0, 0, Some(CellValue::from(7))).unwrap();
    model.set_value(0, 0, Some(CellValue::from(7))).unwrap();
    model.set_row_header(2, CellData::default().with_value("r2")).unwrap();
    model.set_column_labels(["x", "y"]);
    model.reset([["a"]]);

    assert_eq!(
        *log.lock(),
        vec![
            Event::RowsInserted(SectionRange::new(1, 3)),
            Event::ColumnsRemoved(SectionRange::new(0, 1)),
            Event::RowsMoved(SectionRangeMove::new(SectionRange::new(0, 2), 3)),
            Event::Cells(CellRange::single(0, 0)),
            Event::RowHeaders(SectionRange::single(2)),
            Event::ColumnHeaders(SectionRange::new(0, 2)),
            Event::Reset,
        ]
    );
    assert_eq!((model.row_count(), model.column_count()), (1, 1));
}

#[test]
fn no_op_edits_are_silent() {
    let model = TableModel::new(3, 3);
    let log = record(model.signals());

    model.insert_rows(1, 0).unwrap();
    model.remove_columns(2, 0).unwrap();
    model.move_columns(1, 1, 1).unwrap();
    model
        .update_cells(CellRange::new(1, 1, 0, 3), |_, _, _| {})
        .unwrap();

    assert!(log.lock().is_empty());
}

#[test]
fn rejected_edits_are_silent_and_leave_data_alone() {
    let model = TableModel::from_rows([["a", "b"], ["c", "d"]]);
    let log = record(model.signals());

    assert!(model.insert_rows(3, 1).is_err());
    assert!(model.remove_rows(1, 2).is_err());
    assert!(model.move_columns(0, 1, 2).is_err());
    assert!(model.set_value(2, 0, None).is_err());

    assert!(log.lock().is_empty());
    assert_eq!(text(&model, 1, 1).as_deref(), Some("d"));
}

#[test]
fn moved_block_lands_at_its_post_move_index() {
    let model = TableModel::from_rows((0..6).map(|r| [r as i64]));
    let log = record(model.signals());

    model.move_rows(1, 2, 3).unwrap();

    let order: Vec<String> = (0..6).filter_map(|r| text(&model, r, 0)).collect();
    assert_eq!(order, ["0", "3", "4", "1", "2", "5"]);

    let Event::RowsMoved(mv) = log.lock()[0] else {
        panic!("expected a move");
    };
    assert_eq!(mv.destination_range(), SectionRange::new(3, 5));
    assert_eq!(mv.affected(), SectionRange::new(1, 5));
}

#[test]
fn computed_model_reports_count_changes_as_tail_edits() {
    let model = ComputedModel::new(10, 2, |row, column, out| {
        out.value = Some(CellValue::from((row * 10 + column) as i64));
    });
    let log = record(model.signals());

    model.set_row_count(12);
    model.set_row_count(12);
    model.set_column_count(1);
    model.invalidate_cells(CellRange::new(0, 0, 0, 1));
    model.invalidate_cells(CellRange::new(0, 2, 0, 1));
    model.invalidate_all();

    assert_eq!(
        *log.lock(),
        vec![
            Event::RowsInserted(SectionRange::new(10, 12)),
            Event::ColumnsRemoved(SectionRange::new(1, 2)),
            Event::Cells(CellRange::new(0, 2, 0, 1)),
            Event::Reset,
        ]
    );
    assert_eq!(text(&model, 11, 0).as_deref(), Some("110"));
    assert_eq!(text(&model, 11, 1), None);
}

#[test]
fn blocked_signals_drop_notifications() {
    let model = TableModel::new(2, 2);
    let log = record(model.signals());

    model.signals().set_blocked(true);
    model.insert_rows(0, 1).unwrap();
    model.signals().set_blocked(false);
    model.insert_rows(0, 1).unwrap();

    assert_eq!(*log.lock(), vec![Event::RowsInserted(SectionRange::new(0, 1))]);
}
