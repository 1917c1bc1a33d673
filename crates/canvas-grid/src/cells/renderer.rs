//! The cell renderer contract.

use canvas_grid_core::Signal;
use canvas_grid_render::Surface;

use super::config::CellConfig;

/// Draws cells onto a [`Surface`].
///
/// A renderer is shared by every cell that names it, so it holds policy only
/// and never per-cell state. Drawing is split into three layers so that a
/// viewport can paint every background before any content and every content
/// before any border; a neighbour's background then never covers a border.
///
/// Every layer must leave the surface's state stack as it found it: any
/// `save` is paired with a `restore` before returning.
///
/// Implementors emit [`changed`](Self::changed) whenever a property that
/// affects output is assigned a different value. Views listening to it
/// schedule a repaint.
pub trait CellRenderer: Send + Sync {
    /// Paint the cell's background. Defaults to nothing.
    fn draw_background(&self, _surface: &mut dyn Surface, _config: &CellConfig<'_>) {}

    /// Paint the cell's content. Defaults to nothing.
    fn draw_content(&self, _surface: &mut dyn Surface, _config: &CellConfig<'_>) {}

    /// Paint the cell's border. Defaults to nothing.
    fn draw_border(&self, _surface: &mut dyn Surface, _config: &CellConfig<'_>) {}

    /// Paint all three layers for a single cell.
    fn paint(&self, surface: &mut dyn Surface, config: &CellConfig<'_>) {
        paint_layers(self, surface, config);
    }

    /// Emitted when output-affecting configuration changes.
    fn changed(&self) -> &Signal<()>;
}

/// Draw background, content and border, in that order.
pub fn paint_layers<R: CellRenderer + ?Sized>(
    renderer: &R,
    surface: &mut dyn Surface,
    config: &CellConfig<'_>,
) {
    renderer.draw_background(surface, config);
    renderer.draw_content(surface, config);
    renderer.draw_border(surface, config);
}

static_assertions::assert_obj_safe!(CellRenderer);

#[cfg(test)]
mod tests {
    use super::*;
    use canvas_grid_render::{Color, RasterSurface, Rect};
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Recording {
        calls: Mutex<Vec<&'static str>>,
        changed: Signal<()>,
    }

    impl CellRenderer for Recording {
        fn draw_background(&self, _surface: &mut dyn Surface, _config: &CellConfig<'_>) {
            self.calls.lock().push("background");
        }

        fn draw_border(&self, surface: &mut dyn Surface, config: &CellConfig<'_>) {
            self.calls.lock().push("border");
            surface.fill_rect(config.rect(), Color::RED);
        }

        fn changed(&self) -> &Signal<()> {
            &self.changed
        }
    }

    #[test]
    fn test_paint_runs_layers_in_order() {
        let renderer = Recording::default();
        let mut surface = RasterSurface::new(4, 4).unwrap();
        renderer.paint(&mut surface, &CellConfig::new(0, 0, Rect::new(0.0, 0.0, 2.0, 2.0)));

        assert_eq!(*renderer.calls.lock(), vec!["background", "border"]);
        assert_eq!(surface.pixel(1, 1), Some(Color::RED));
    }

    #[test]
    fn test_paint_through_trait_object() {
        let renderer: Box<dyn CellRenderer> = Box::new(Recording::default());
        let mut surface = RasterSurface::new(4, 4).unwrap();
        renderer.paint(&mut surface, &CellConfig::new(0, 0, Rect::new(0.0, 0.0, 1.0, 1.0)));
        assert_eq!(surface.state_depth(), 0);
    }
}
