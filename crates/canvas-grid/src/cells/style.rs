//! Renderer policy values: fixed, or computed per cell.

use std::fmt;
use std::sync::Arc;

use canvas_grid_render::Color;

use super::border::BorderSpec;
use super::config::CellConfig;
use crate::model::CellValue;

type StyleFn<T> = Arc<dyn Fn(&CellConfig<'_>) -> T + Send + Sync>;

/// A policy value that is either fixed or derived from the cell being drawn.
///
/// Resolution happens once per draw call through [`resolve`](Self::resolve).
/// Two computed styles compare equal only when they share the same closure.
pub enum CellStyle<T> {
    Fixed(T),
    Computed(StyleFn<T>),
}

impl<T: Clone> CellStyle<T> {
    /// Wrap a closure over the full [`CellConfig`].
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&CellConfig<'_>) -> T + Send + Sync + 'static,
    {
        CellStyle::Computed(Arc::new(f))
    }

    /// Wrap a closure over `(row, column, value)` only.
    pub fn from_cell_fn<F>(f: F) -> Self
    where
        F: Fn(usize, usize, Option<&CellValue>) -> T + Send + Sync + 'static,
    {
        CellStyle::Computed(Arc::new(move |config: &CellConfig<'_>| {
            f(config.row, config.column, config.value)
        }))
    }

    /// The concrete value for `config`.
    pub fn resolve(&self, config: &CellConfig<'_>) -> T {
        match self {
            CellStyle::Fixed(value) => value.clone(),
            CellStyle::Computed(f) => f(config),
        }
    }
}

impl<T: Clone> Clone for CellStyle<T> {
    fn clone(&self) -> Self {
        match self {
            CellStyle::Fixed(value) => CellStyle::Fixed(value.clone()),
            CellStyle::Computed(f) => CellStyle::Computed(Arc::clone(f)),
        }
    }
}

impl<T: PartialEq> PartialEq for CellStyle<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CellStyle::Fixed(a), CellStyle::Fixed(b)) => a == b,
            (CellStyle::Computed(a), CellStyle::Computed(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for CellStyle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellStyle::Fixed(value) => f.debug_tuple("Fixed").field(value).finish(),
            CellStyle::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl<T> From<T> for CellStyle<T> {
    fn from(value: T) -> Self {
        CellStyle::Fixed(value)
    }
}

/// Background policy. Resolving to `None` paints nothing.
pub type BackgroundStyle = CellStyle<Option<Color>>;

/// Border policy. Resolving to `None` draws no border.
pub type BorderStyle = CellStyle<Option<BorderSpec>>;

impl BackgroundStyle {
    /// A fixed background color.
    pub fn color(color: Color) -> Self {
        CellStyle::Fixed(Some(color))
    }
}

impl BorderStyle {
    /// A fixed border.
    pub fn spec(spec: BorderSpec) -> Self {
        CellStyle::Fixed(Some(spec))
    }
}

/// Per-cell overrides supplied by a model.
///
/// A field that is `Some` replaces the renderer's own policy for this cell,
/// even when it resolves to "nothing". A field that is `None` defers to the
/// renderer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellOptions {
    pub background: Option<BackgroundStyle>,
    pub border: Option<BorderStyle>,
    pub text_color: Option<Color>,
}

impl CellOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_background(mut self, background: impl Into<BackgroundStyle>) -> Self {
        self.background = Some(background.into());
        self
    }

    pub fn with_border(mut self, border: impl Into<BorderStyle>) -> Self {
        self.border = Some(border.into());
        self
    }

    pub fn with_text_color(mut self, color: Color) -> Self {
        self.text_color = Some(color);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canvas_grid_render::Rect;

    #[test]
    fn test_fixed_resolves_to_value() {
        let style = BackgroundStyle::color(Color::RED);
        let config = CellConfig::new(0, 0, Rect::ZERO);
        assert_eq!(style.resolve(&config), Some(Color::RED));
    }

    #[test]
    fn test_cell_fn_sees_indices() {
        let style = BackgroundStyle::from_cell_fn(|_, column, _| {
            (column % 2 == 1).then_some(Color::BLUE)
        });
        let odd = CellConfig::new(0, 3, Rect::ZERO);
        let even = CellConfig::new(0, 4, Rect::ZERO);
        assert_eq!(style.resolve(&odd), Some(Color::BLUE));
        assert_eq!(style.resolve(&even), None);
    }

    #[test]
    fn test_equality() {
        assert_eq!(
            BackgroundStyle::color(Color::RED),
            BackgroundStyle::color(Color::RED)
        );

        let computed = BackgroundStyle::computed(|_| None);
        assert_eq!(computed, computed.clone());
        assert_ne!(computed, BackgroundStyle::computed(|_| None));
        assert_ne!(computed, BackgroundStyle::Fixed(None));
    }
}
