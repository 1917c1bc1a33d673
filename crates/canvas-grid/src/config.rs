//! Grid configuration.
//!
//! [`GridConfig`] collects the defaults a viewport starts from. Every field has
//! a default, so a TOML document only needs the keys it changes:
//!
//! ```
//! use canvas_grid::GridConfig;
//!
//! let config = GridConfig::from_toml_str(r##"
//! default_row_height = 30
//! void_color = "#202020"
//! empty_value_policy = "absent_only"
//! "##).unwrap();
//!
//! assert_eq!(config.default_row_height, 30);
//! assert_eq!(config.default_column_width, 100);
//! ```

use canvas_grid_render::{Color, Font};
use serde::{Deserialize, Serialize};

use crate::cells::EmptyValuePolicy;
use crate::error::{GridError, GridResult};

/// Viewport defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Height of rows that were never resized.
    pub default_row_height: u32,
    /// Width of columns that were never resized.
    pub default_column_width: u32,
    /// Width of the row header strip; `0` hides it.
    pub row_header_width: u32,
    /// Height of the column header strip; `0` hides it.
    pub column_header_height: u32,
    /// Damaged areas are reset to this color before cells are drawn. A
    /// transparent void erases them, so the host's backdrop shows through
    /// wherever a cell draws no background.
    pub void_color: Color,
    /// Background of header sections.
    pub header_background: Color,
    pub font_family: String,
    pub font_size: f32,
    pub text_color: Color,
    /// Start rows on a single-size map; the first per-row resize switches to
    /// per-section sizes.
    pub uniform_rows: bool,
    pub empty_value_policy: EmptyValuePolicy,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            default_row_height: 24,
            default_column_width: 100,
            row_header_width: 48,
            column_header_height: 24,
            void_color: Color::WHITE,
            header_background: Color::from_hex_u32(0xF3F3F3),
            font_family: "sans-serif".to_string(),
            font_size: 12.0,
            text_color: Color::BLACK,
            uniform_rows: true,
            empty_value_policy: EmptyValuePolicy::default(),
        }
    }
}

impl GridConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> GridResult<Self> {
        let config: GridConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to a TOML document.
    pub fn to_toml_string(&self) -> GridResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject values no viewport can work with.
    pub fn validate(&self) -> GridResult<()> {
        if self.default_row_height == 0 {
            return Err(GridError::InvalidConfig(
                "default_row_height must be positive".into(),
            ));
        }
        if self.default_column_width == 0 {
            return Err(GridError::InvalidConfig(
                "default_column_width must be positive".into(),
            ));
        }
        if !(self.font_size.is_finite() && self.font_size > 0.0) {
            return Err(GridError::InvalidConfig(format!(
                "font_size must be a positive number, got {}",
                self.font_size
            )));
        }
        Ok(())
    }

    /// The configured text font.
    pub fn font(&self) -> Font {
        Font::new(self.font_family.clone(), self.font_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(GridConfig::from_toml_str("").unwrap(), GridConfig::default());
    }

    #[test]
    fn test_round_trip() {
        let config = GridConfig {
            header_background: Color::from_hex_u32(0x93C47D),
            uniform_rows: false,
            ..GridConfig::default()
        };
        let text = config.to_toml_string().unwrap();
        assert!(text.contains("header_background = \"#93C47D\""));
        assert_eq!(GridConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_validation() {
        let err = GridConfig::from_toml_str("default_row_height = 0").unwrap_err();
        assert!(matches!(err, GridError::InvalidConfig(_)));

        let err = GridConfig::from_toml_str("void_color = \"nope\"").unwrap_err();
        assert!(matches!(err, GridError::ConfigParse(_)));

        let err = GridConfig::from_toml_str("font_size = -1.0").unwrap_err();
        assert!(matches!(err, GridError::InvalidConfig(_)));
    }
}
