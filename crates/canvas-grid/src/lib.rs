//! Canvas Grid - a virtualized, canvas-painted data grid core.
//!
//! The crate is organised around four contracts:
//!
//! - [`cells`]: how a cell is painted, layer by layer, from a [`cells::CellConfig`]
//! - [`model`]: what a data model reports and how it announces changes
//! - [`section`]: how rows and columns map to pixels
//! - [`viewport`]: how a grid consumes all of the above and repaints only damage
//!
//! Drawing goes through the [`render::Surface`] trait, so the same grid paints
//! into the in-memory [`render::RasterSurface`] in tests and into a real
//! canvas backend in an application.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use canvas_grid::prelude::*;
//!
//! let model = Arc::new(TableModel::from_rows([["Name", "Qty"], ["apples", "3"]]));
//! let viewport = GridViewport::new(GridConfig::default()).with_model(model);
//! viewport.set_size(320.0, 120.0);
//!
//! let mut surface = RasterSurface::new(320, 120)?;
//! let stats = viewport.paint(&mut surface);
//! assert_eq!(stats.cells, 4);
//! assert!(surface.text_runs().iter().any(|run| run.text == "apples"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cells;
mod config;
mod error;
pub mod model;
pub mod prelude;
pub mod section;
pub mod viewport;

pub use canvas_grid_core::{ConnectionId, PerfSpan, Property, Signal};
pub use config::GridConfig;
pub use error::{GridError, GridResult};
pub use model::{DataModel, TableModel};
pub use viewport::GridViewport;

/// Drawing surface and geometry types.
pub mod render {
    pub use canvas_grid_render::*;
}
