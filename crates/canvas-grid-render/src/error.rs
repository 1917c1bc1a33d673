//! Error types for the render crate.

use thiserror::Error;

/// Errors that can occur when creating or configuring drawing resources.
///
/// Drawing itself never fails: painting outside a surface or clip is a silent no-op.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    /// Invalid surface dimensions (zero width or height).
    #[error("invalid surface dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// A color string was not `#RRGGBB` or `#RRGGBBAA`.
    #[error("invalid color `{0}`: expected #RRGGBB or #RRGGBBAA")]
    InvalidColor(String),

    /// A dash pattern had no positive segment length.
    #[error("dash pattern must contain at least one positive length")]
    InvalidDashPattern,
}

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;
