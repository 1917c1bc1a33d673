//! Cell values and the per-cell data record filled by models.

use std::fmt;
use std::sync::Arc;

use crate::cells::CellOptions;

/// The payload of a cell.
///
/// Absence is expressed as `Option::<CellValue>::None`, never as a variant.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl CellValue {
    /// Is this value "falsy": empty text, zero, NaN or `false`?
    ///
    /// Falsy values are still values; whether they are drawn is a renderer
    /// policy (see `EmptyValuePolicy`).
    pub fn is_falsy(&self) -> bool {
        match self {
            CellValue::Text(s) => s.is_empty(),
            CellValue::Int(i) => *i == 0,
            CellValue::Float(f) => *f == 0.0 || f.is_nan(),
            CellValue::Bool(b) => !b,
        }
    }

    /// The text, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The value as a float, if numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Int(i) => Some(*i as f64),
            CellValue::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => f.write_str(s),
            CellValue::Int(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Int(value)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        CellValue::Int(value.into())
    }
}

impl From<usize> for CellValue {
    fn from(value: usize) -> Self {
        CellValue::Int(value as i64)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

/// The output record a model fills for one cell or header section.
///
/// - `value`: what to draw.
/// - `renderer`: the name of a registered renderer; `None` (or an unknown
///   name) selects the viewport's default renderer.
/// - `options`: per-cell overrides of the renderer's own policy.
///
/// The viewport reuses one record across a repaint, so models must set every
/// field they care about and call [`clear`](Self::clear) for cells they do not
/// know.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellData {
    pub value: Option<CellValue>,
    pub renderer: Option<String>,
    pub options: Option<Arc<CellOptions>>,
}

impl CellData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset every field to absent.
    pub fn clear(&mut self) {
        self.value = None;
        self.renderer = None;
        self.options = None;
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_none() && self.renderer.is_none() && self.options.is_none()
    }

    pub fn with_value(mut self, value: impl Into<CellValue>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_renderer(mut self, name: impl Into<String>) -> Self {
        self.renderer = Some(name.into());
        self
    }

    pub fn with_options(mut self, options: impl Into<Arc<CellOptions>>) -> Self {
        self.options = Some(options.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_falsy_values() {
        assert!(CellValue::from(0).is_falsy());
        assert!(CellValue::from("").is_falsy());
        assert!(CellValue::from(false).is_falsy());
        assert!(CellValue::from(0.0).is_falsy());
        assert!(CellValue::Float(f64::NAN).is_falsy());

        assert!(!CellValue::from(1).is_falsy());
        assert!(!CellValue::from("0").is_falsy());
        assert!(!CellValue::from(true).is_falsy());
    }

    #[test]
    fn test_display() {
        assert_eq!(CellValue::from(42).to_string(), "42");
        assert_eq!(CellValue::from(1.5).to_string(), "1.5");
        assert_eq!(CellValue::from("abc").to_string(), "abc");
        assert_eq!(CellValue::from(true).to_string(), "true");
    }

    #[test]
    fn test_typed_accessors() {
        assert_eq!(CellValue::from("abc").as_text(), Some("abc"));
        assert_eq!(CellValue::from(7).as_text(), None);

        assert_eq!(CellValue::from(7).as_f64(), Some(7.0));
        assert_eq!(CellValue::from(2.5).as_f64(), Some(2.5));
        assert_eq!(CellValue::from("7").as_f64(), None);
        assert_eq!(CellValue::from(true).as_f64(), None);
    }

    #[test]
    fn test_cell_data_clear() {
        let mut data = CellData::new()
            .with_value(3)
            .with_renderer("text")
            .with_options(CellOptions::default());
        assert!(!data.is_empty());

        data.clear();
        assert!(data.is_empty());
        assert_eq!(data, CellData::default());
    }
}
