//! A renderer that paints backgrounds and borders.

use canvas_grid_core::{Property, Signal};
use canvas_grid_render::{Color, Surface};

use super::border::BorderSpec;
use super::config::CellConfig;
use super::renderer::CellRenderer;
use super::style::{BackgroundStyle, BorderStyle};
use canvas_grid_core::logging::targets;

/// Paints an optional background and an optional border, no content.
///
/// Both policies can be overridden per cell through
/// [`CellOptions`](super::CellOptions). [`TextCellRenderer`](super::TextCellRenderer)
/// builds on this type for its own background and border layers.
///
/// # Example
///
/// ```
/// use canvas_grid::cells::{BackgroundStyle, CellRenderer, SimpleCellRenderer};
/// use canvas_grid_render::Color;
///
/// let renderer = SimpleCellRenderer::new();
/// renderer.changed().connect(|_| println!("repaint"));
///
/// assert!(renderer.set_background(Some(BackgroundStyle::color(Color::GREEN))));
/// assert!(!renderer.set_background(Some(BackgroundStyle::color(Color::GREEN))));
/// ```
#[derive(Debug, Default)]
pub struct SimpleCellRenderer {
    background: Property<Option<BackgroundStyle>>,
    border: Property<Option<BorderStyle>>,
    changed: Signal<()>,
}

impl SimpleCellRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_background(self, background: impl Into<BackgroundStyle>) -> Self {
        self.background.set_silent(Some(background.into()));
        self
    }

    pub fn with_border(self, border: impl Into<BorderStyle>) -> Self {
        self.border.set_silent(Some(border.into()));
        self
    }

    pub fn background(&self) -> Option<BackgroundStyle> {
        self.background.get()
    }

    /// Replace the background policy. Returns `true` and emits `changed` if it differs.
    pub fn set_background(&self, background: Option<BackgroundStyle>) -> bool {
        let changed = self.background.set_and_notify(background, &self.changed);
        if changed {
            tracing::debug!(target: targets::RENDERER, "background policy changed");
        }
        changed
    }

    pub fn border(&self) -> Option<BorderStyle> {
        self.border.get()
    }

    /// Replace the border policy. Returns `true` and emits `changed` if it differs.
    pub fn set_border(&self, border: Option<BorderStyle>) -> bool {
        let changed = self.border.set_and_notify(border, &self.changed);
        if changed {
            tracing::debug!(target: targets::RENDERER, "border policy changed");
        }
        changed
    }

    /// The background color for `config`, with cell options taking precedence.
    pub fn resolve_background(&self, config: &CellConfig<'_>) -> Option<Color> {
        if let Some(style) = config.options.and_then(|o| o.background.as_ref()) {
            return style.resolve(config);
        }
        self.background
            .with(|style| style.as_ref().and_then(|s| s.resolve(config)))
    }

    /// The border for `config`, with cell options taking precedence.
    pub fn resolve_border(&self, config: &CellConfig<'_>) -> Option<BorderSpec> {
        if let Some(style) = config.options.and_then(|o| o.border.as_ref()) {
            return style.resolve(config);
        }
        self.border
            .with(|style| style.as_ref().and_then(|s| s.resolve(config)))
    }
}

impl CellRenderer for SimpleCellRenderer {
    fn draw_background(&self, surface: &mut dyn Surface, config: &CellConfig<'_>) {
        if let Some(color) = self.resolve_background(config)
            && !color.is_transparent()
        {
            surface.fill_rect(config.bleed_rect(), color);
        }
    }

    fn draw_border(&self, surface: &mut dyn Surface, config: &CellConfig<'_>) {
        if let Some(border) = self.resolve_border(config) {
            border.draw(surface, config.bleed_rect());
        }
    }

    fn changed(&self) -> &Signal<()> {
        &self.changed
    }
}
