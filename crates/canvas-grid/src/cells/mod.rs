//! Cell renderers and the data they receive.
//!
//! A [`CellRenderer`] draws one cell in three layers (background, content,
//! border) from a [`CellConfig`] built by the viewport for each paint call.
//! Renderers hold policy only and announce policy changes through their
//! `changed` signal.
//!
//! # Renderers
//!
//! - [`SimpleCellRenderer`]: background and border, no content
//! - [`TextCellRenderer`]: adds the value's text, left-inset and centred
//!
//! # Policies
//!
//! Background and border policies are [`CellStyle`] values: fixed, or computed
//! from the cell. A model can override them for individual cells through
//! [`CellOptions`].
//!
//! ```
//! use canvas_grid::cells::{BackgroundStyle, CellConfig, CellRenderer, TextCellRenderer};
//! use canvas_grid::model::CellValue;
//! use canvas_grid_render::{Color, RasterSurface, Rect};
//!
//! let renderer = TextCellRenderer::new().with_background(BackgroundStyle::from_cell_fn(
//!     |_, column, _| Some(if column % 2 == 1 { Color::RED } else { Color::GREEN }),
//! ));
//!
//! let value = CellValue::from(42);
//! let mut surface = RasterSurface::new(100, 30).unwrap();
//! let config = CellConfig::new(0, 1, Rect::new(1.0, 1.0, 80.0, 24.0)).with_value(Some(&value));
//! renderer.paint(&mut surface, &config);
//!
//! assert_eq!(surface.pixel(40, 12), Some(Color::RED));
//! assert_eq!(surface.text_runs()[0].text, "42");
//! ```

mod border;
mod config;
mod renderer;
mod simple;
mod style;
mod text;

pub use border::{BorderSpec, BorderWeight, Edge, EdgeOrder, EdgeStyle, LineStyle};
pub use config::{CellConfig, CellRegion};
pub use renderer::{CellRenderer, paint_layers};
pub use simple::SimpleCellRenderer;
pub use style::{BackgroundStyle, BorderStyle, CellOptions, CellStyle};
pub use text::{EmptyValuePolicy, TEXT_INSET, TextCellRenderer};
