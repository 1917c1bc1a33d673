//! Data models and their change-notification taxonomy.
//!
//! A [`DataModel`] is the source of truth for a grid: it reports row and column
//! counts, fills [`CellData`] records for body cells and header sections, and
//! announces every change through its [`ModelSignals`].
//!
//! # Notifications
//!
//! | Signal | Payload | Meaning |
//! |---|---|---|
//! | `model_changed` | `()` | anything may have changed |
//! | `rows_inserted` / `columns_inserted` | [`SectionRange`] | new sections now at `start..end` |
//! | `rows_removed` / `columns_removed` | [`SectionRange`] | sections formerly at `start..end` are gone |
//! | `rows_moved` / `columns_moved` | [`SectionRangeMove`] | a block now starts at `destination` |
//! | `row_header_data_changed` / `column_header_data_changed` | [`SectionRange`] | header content changed |
//! | `cell_data_changed` | [`CellRange`] | content of a rectangle changed |
//!
//! Every range is half-open.
//!
//! # Model Implementations
//!
//! - [`TableModel`]: stores every cell; editable
//! - [`ComputedModel`]: closure-backed; stores nothing per cell

mod computed_model;
mod data;
mod table_model;
mod traits;

pub use computed_model::{CellFn, ComputedModel, HeaderFn};
pub use data::{CellData, CellValue};
pub use table_model::TableModel;
pub use traits::{CellRange, DataModel, ModelSignals, SectionRange, SectionRangeMove};
