//! Drawing layer for Canvas Grid.
//!
//! This crate defines the [`Surface`] contract that cell renderers draw into,
//! the geometry and color types they use, and [`RasterSurface`], a software
//! implementation that keeps pixels in memory.
//!
//! # Drawing on a Raster Surface
//!
//! ```
//! use canvas_grid_render::{Color, RasterSurface, Rect, Surface};
//!
//! # fn main() -> canvas_grid_render::RenderResult<()> {
//! let mut surface = RasterSurface::new(64, 32)?;
//!
//! surface.save();
//! surface.clip_rect(Rect::new(0.0, 0.0, 32.0, 32.0));
//! surface.fill_rect(Rect::new(0.0, 0.0, 64.0, 32.0), Color::from_hex_u32(0x93C47D));
//! surface.restore();
//!
//! assert_eq!(surface.pixel_rgba8(10, 10), Some([0x93, 0xC4, 0x7D, 0xFF]));
//! assert_eq!(surface.pixel_rgba8(40, 10), Some([0, 0, 0, 0]));
//! # Ok(())
//! # }
//! ```
//!
//! # Damage Tracking
//!
//! [`DamageTracker`] accumulates invalidated regions between repaints so that
//! a repaint only revisits what changed.

pub mod damage;
mod error;
pub mod paint;
pub mod raster;
pub mod surface;
mod transform;
mod types;

pub use damage::DamageTracker;
pub use error::{RenderError, RenderResult};
pub use paint::{DashPattern, LineCap, Stroke};
pub use raster::{RasterStats, RasterSurface, TextRun};
pub use surface::{Font, RenderState, RenderStateStack, Surface, TextBaseline, TextStyle};
pub use transform::Transform2D;
pub use types::{Color, Point, Rect, Size};

static_assertions::assert_impl_all!(RasterSurface: Send, Sync);
static_assertions::assert_obj_safe!(Surface);
