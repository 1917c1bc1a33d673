//! Commonly used types:
//!
//! ```
//! use canvas_grid::prelude::*;
//! ```

// ============================================================================
// Signals and Properties
// ============================================================================

pub use canvas_grid_core::{ConnectionId, Property, Signal};

// ============================================================================
// Models
// ============================================================================

pub use crate::model::{
    CellData, CellRange, CellValue, ComputedModel, DataModel, ModelSignals, SectionRange,
    SectionRangeMove, TableModel,
};

// ============================================================================
// Cells
// ============================================================================

pub use crate::cells::{
    BackgroundStyle, BorderSpec, BorderStyle, BorderWeight, CellConfig, CellOptions, CellRegion,
    CellRenderer, CellStyle, Edge, EdgeOrder, EdgeStyle, EmptyValuePolicy, LineStyle,
    SimpleCellRenderer, TextCellRenderer,
};

// ============================================================================
// Geometry and Viewport
// ============================================================================

pub use crate::section::{SectionList, SectionMap, UniformSectionMap};
pub use crate::viewport::{GridViewport, PaintStats};
pub use crate::{GridConfig, GridError, GridResult};

// ============================================================================
// Drawing
// ============================================================================

pub use canvas_grid_render::{Color, Font, Point, RasterSurface, Rect, Size, Surface};
