//! The viewport: section geometry, scrolling, damage and painting.
//!
//! [`GridViewport`] binds a [`DataModel`](crate::model::DataModel) and turns
//! its notifications into damage:
//!
//! | Notification | Damaged area |
//! |---|---|
//! | model reset, renderer change, resize, scroll | everything |
//! | sections inserted or removed | from the first affected section to the end |
//! | sections moved | source and destination spans |
//! | header data changed | the header span only |
//! | cell data changed | the cells' bleed rectangle, if visible |
//!
//! Nothing is fetched from the model until [`GridViewport::paint`], and then
//! only for cells touching the damage.

mod axis;
mod grid;
mod registry;

pub use grid::{GridViewport, PaintStats, column_label};
pub use registry::{RendererRegistry, RendererSet};
