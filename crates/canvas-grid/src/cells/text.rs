//! A renderer that draws a cell's value as text.

use canvas_grid_core::logging::targets;
use canvas_grid_core::{Property, Signal};
use canvas_grid_render::{Color, Font, Point, Surface, TextBaseline, TextStyle};
use serde::{Deserialize, Serialize};

use super::config::CellConfig;
use super::renderer::CellRenderer;
use super::simple::SimpleCellRenderer;
use super::style::{BackgroundStyle, BorderStyle};
use crate::model::CellValue;

/// Horizontal inset of text from the cell's left edge.
pub const TEXT_INSET: f32 = 2.0;

/// Which present values the text renderer skips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyValuePolicy {
    /// Falsy values (empty text, zero, NaN, `false`) draw nothing, like
    /// missing ones.
    #[default]
    Falsy,
    /// Only a missing value draws nothing; `0` and `false` are drawn.
    AbsentOnly,
}

impl EmptyValuePolicy {
    /// Whether `value` should be drawn under this policy.
    pub fn should_draw(self, value: Option<&CellValue>) -> bool {
        match (self, value) {
            (_, None) => false,
            (EmptyValuePolicy::Falsy, Some(v)) => !v.is_falsy(),
            (EmptyValuePolicy::AbsentOnly, Some(CellValue::Text(s))) => !s.is_empty(),
            (EmptyValuePolicy::AbsentOnly, Some(_)) => true,
        }
    }
}

/// Draws the value's `Display` form, left-inset and vertically centred,
/// clipped to the cell's content area.
///
/// Background and border come from an inner [`SimpleCellRenderer`], which
/// shares this renderer's `changed` signal through forwarding.
#[derive(Debug)]
pub struct TextCellRenderer {
    base: SimpleCellRenderer,
    text_color: Property<Color>,
    font: Property<Font>,
    empty_values: Property<EmptyValuePolicy>,
}

impl Default for TextCellRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextCellRenderer {
    pub fn new() -> Self {
        Self {
            base: SimpleCellRenderer::new(),
            text_color: Property::new(Color::BLACK),
            font: Property::new(Font::default()),
            empty_values: Property::new(EmptyValuePolicy::default()),
        }
    }

    pub fn with_background(mut self, background: impl Into<BackgroundStyle>) -> Self {
        self.base = self.base.with_background(background);
        self
    }

    pub fn with_border(mut self, border: impl Into<BorderStyle>) -> Self {
        self.base = self.base.with_border(border);
        self
    }

    pub fn with_text_color(self, color: Color) -> Self {
        self.text_color.set_silent(color);
        self
    }

    pub fn with_font(self, font: Font) -> Self {
        self.font.set_silent(font);
        self
    }

    pub fn with_empty_value_policy(self, policy: EmptyValuePolicy) -> Self {
        self.empty_values.set_silent(policy);
        self
    }

    /// The background and border layers.
    pub fn base(&self) -> &SimpleCellRenderer {
        &self.base
    }

    pub fn set_background(&self, background: Option<BackgroundStyle>) -> bool {
        self.base.set_background(background)
    }

    pub fn set_border(&self, border: Option<BorderStyle>) -> bool {
        self.base.set_border(border)
    }

    pub fn text_color(&self) -> Color {
        self.text_color.get()
    }

    pub fn set_text_color(&self, color: Color) -> bool {
        self.text_color.set_and_notify(color, self.base.changed())
    }

    pub fn font(&self) -> Font {
        self.font.get()
    }

    pub fn set_font(&self, font: Font) -> bool {
        self.font.set_and_notify(font, self.base.changed())
    }

    pub fn empty_value_policy(&self) -> EmptyValuePolicy {
        self.empty_values.get()
    }

    pub fn set_empty_value_policy(&self, policy: EmptyValuePolicy) -> bool {
        let changed = self.empty_values.set_and_notify(policy, self.base.changed());
        if changed {
            tracing::debug!(target: targets::RENDERER, ?policy, "empty value policy changed");
        }
        changed
    }
}

impl CellRenderer for TextCellRenderer {
    fn draw_background(&self, surface: &mut dyn Surface, config: &CellConfig<'_>) {
        self.base.draw_background(surface, config);
    }

    fn draw_content(&self, surface: &mut dyn Surface, config: &CellConfig<'_>) {
        if !self.empty_value_policy().should_draw(config.value) {
            return;
        }
        let Some(value) = config.value else {
            return;
        };
        let content = config.content_rect();
        if content.is_empty() {
            return;
        }

        let color = config
            .options
            .and_then(|o| o.text_color)
            .unwrap_or_else(|| self.text_color());
        let style = TextStyle {
            font: self.font(),
            color,
            baseline: TextBaseline::Middle,
        };
        let origin = Point::new(config.x + TEXT_INSET, config.y + config.height / 2.0);

        surface.save();
        surface.clip_rect(content);
        surface.fill_text(&value.to_string(), origin, &style);
        surface.restore();
    }

    fn draw_border(&self, surface: &mut dyn Surface, config: &CellConfig<'_>) {
        self.base.draw_border(surface, config);
    }

    fn changed(&self) -> &Signal<()> {
        self.base.changed()
    }
}
