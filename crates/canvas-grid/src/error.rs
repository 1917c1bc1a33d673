//! Error types for the grid crate.
//!
//! Painting never fails. Errors come only from mutation entry points (model
//! edits, section-map edits), from parsing edge orders and from loading
//! configuration.

use canvas_grid_render::RenderError;
use thiserror::Error;

/// Errors raised by grid mutation and configuration APIs.
#[derive(Error, Debug)]
pub enum GridError {
    /// A section range does not fit the current section count.
    #[error("{kind} range {start}..{end} out of bounds for count {count}")]
    RangeOutOfBounds {
        kind: &'static str,
        start: usize,
        end: usize,
        count: usize,
    },

    /// A single cell index is outside the model.
    #[error("cell ({row}, {column}) out of bounds for a {rows}x{columns} model")]
    CellOutOfBounds {
        row: usize,
        column: usize,
        rows: usize,
        columns: usize,
    },

    /// A move whose destination would place the block past the end.
    #[error("cannot move {kind} {start}..{end} to {destination} with count {count}")]
    InvalidMove {
        kind: &'static str,
        start: usize,
        end: usize,
        destination: usize,
        count: usize,
    },

    /// Per-section sizes were requested from a map that only supports one size.
    #[error("section map has a single uniform size; per-section sizing is not supported")]
    UniformSections,

    /// An edge order that is not a permutation of the four edges.
    #[error("invalid edge order `{0}`: expected a permutation of t, r, b, l")]
    InvalidEdgeOrder(String),

    /// A configuration value failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration TOML could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration could not be written as TOML.
    #[error("failed to serialize configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// A drawing resource could not be created.
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Result type for grid operations.
pub type GridResult<T> = Result<T, GridError>;

/// Validate a half-open `start..end` range against `count`.
pub(crate) fn check_range(
    kind: &'static str,
    start: usize,
    end: usize,
    count: usize,
) -> GridResult<()> {
    if start > end || end > count {
        return Err(GridError::RangeOutOfBounds {
            kind,
            start,
            end,
            count,
        });
    }
    Ok(())
}

/// Validate moving `start..end` so that it begins at `destination` afterwards.
pub(crate) fn check_move(
    kind: &'static str,
    start: usize,
    end: usize,
    destination: usize,
    count: usize,
) -> GridResult<()> {
    check_range(kind, start, end, count)?;
    if destination + (end - start) > count {
        return Err(GridError::InvalidMove {
            kind,
            start,
            end,
            destination,
            count,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_range() {
        assert!(check_range("row", 0, 0, 0).is_ok());
        assert!(check_range("row", 2, 5, 5).is_ok());
        assert!(check_range("row", 3, 2, 5).is_err());
        assert!(check_range("row", 0, 6, 5).is_err());
    }

    #[test]
    fn test_check_move() {
        assert!(check_move("column", 0, 2, 3, 5).is_ok());
        let err = check_move("column", 0, 2, 4, 5).unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot move column 0..2 to 4 with count 5"
        );
    }
}
