//! The grid viewport: reacts to model and renderer changes, paints damage.

use std::ops::Range;
use std::sync::{Arc, Weak};

use canvas_grid_core::logging::targets;
use canvas_grid_core::{ConnectionId, PerfSpan, Signal};
use canvas_grid_render::{Color, DamageTracker, Point, Rect, Size, Surface};
use parking_lot::Mutex;

use super::axis::Axis;
use super::registry::{RendererRegistry, RendererSet};
use crate::cells::{
    BackgroundStyle, BorderSpec, BorderStyle, CellConfig, CellRegion, CellRenderer, Edge,
    EdgeStyle, TextCellRenderer,
};
use crate::config::GridConfig;
use crate::error::GridResult;
use crate::model::{CellData, CellRange, CellValue, DataModel, SectionRange, SectionRangeMove};

/// Counts from one [`GridViewport::paint`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaintStats {
    /// Body cells fetched from the model and drawn, once per damaged
    /// rectangle they touch.
    pub cells: usize,
    /// Header sections fetched from the model and drawn.
    pub headers: usize,
}

impl PaintStats {
    /// Total model fetches made during the paint.
    pub fn fetches(&self) -> usize {
        self.cells + self.headers
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Orientation {
    Rows,
    Columns,
}

/// Connections to every signal of a bound model. Dropping the binding
/// disconnects them, so a replaced model can no longer reach the viewport.
struct ModelBinding {
    model: Arc<dyn DataModel>,
    connections: [ConnectionId; 10],
}

impl ModelBinding {
    fn connect(model: Arc<dyn DataModel>, shared: &Weak<Shared>) -> Self {
        let signals = model.signals();
        let connections = [
            on(&signals.model_changed, shared, |state, _| state.reset_from_model()),
            on(&signals.rows_inserted, shared, |state, range| {
                state.sections_inserted(Orientation::Rows, range)
            }),
            on(&signals.rows_removed, shared, |state, range| {
                state.sections_removed(Orientation::Rows, range)
            }),
            on(&signals.rows_moved, shared, |state, mv| {
                state.sections_moved(Orientation::Rows, mv)
            }),
            on(&signals.columns_inserted, shared, |state, range| {
                state.sections_inserted(Orientation::Columns, range)
            }),
            on(&signals.columns_removed, shared, |state, range| {
                state.sections_removed(Orientation::Columns, range)
            }),
            on(&signals.columns_moved, shared, |state, mv| {
                state.sections_moved(Orientation::Columns, mv)
            }),
            on(&signals.row_header_data_changed, shared, |state, range| {
                state.headers_changed(Orientation::Rows, range)
            }),
            on(&signals.column_header_data_changed, shared, |state, range| {
                state.headers_changed(Orientation::Columns, range)
            }),
            on(&signals.cell_data_changed, shared, |state, range| {
                state.cells_changed(range)
            }),
        ];
        Self { model, connections }
    }
}

impl Drop for ModelBinding {
    fn drop(&mut self) {
        let s = self.model.signals();
        let [a, b, c, d, e, f, g, h, i, j] = self.connections;
        s.model_changed.disconnect(a);
        s.rows_inserted.disconnect(b);
        s.rows_removed.disconnect(c);
        s.rows_moved.disconnect(d);
        s.columns_inserted.disconnect(e);
        s.columns_removed.disconnect(f);
        s.columns_moved.disconnect(g);
        s.row_header_data_changed.disconnect(h);
        s.column_header_data_changed.disconnect(i);
        s.cell_data_changed.disconnect(j);
        tracing::debug!(target: targets::VIEWPORT, "model subscriptions released");
    }
}

/// Connect `react` to `signal` for as long as the viewport lives.
fn on<A: 'static>(
    signal: &Signal<A>,
    shared: &Weak<Shared>,
    react: fn(&mut ViewportState, &A) -> bool,
) -> ConnectionId {
    let shared = shared.clone();
    signal.connect(move |args| {
        if let Some(shared) = shared.upgrade() {
            shared.react(|state| react(state, args));
        }
    })
}

struct Shared {
    state: Mutex<ViewportState>,
    update_requested: Signal<()>,
}

impl Shared {
    /// Run `f` under the state lock; emit `update_requested` afterwards if it
    /// reports new damage.
    fn react(&self, f: impl FnOnce(&mut ViewportState) -> bool) -> bool {
        let damaged = f(&mut self.state.lock());
        if damaged {
            self.update_requested.emit(());
        }
        damaged
    }
}

/// A body or header cell scheduled for painting.
struct Job {
    row: usize,
    column: usize,
    rect: Rect,
    region: CellRegion,
}

/// One damaged rectangle and the cells that touch it.
struct Pass {
    clip: Rect,
    corner: Option<Rect>,
    regions: [(Rect, Vec<Job>); 3],
}

/// Everything a paint needs, captured under the lock.
struct Frame {
    void_color: Color,
    header_background: Color,
    model: Option<Arc<dyn DataModel>>,
    renderers: RendererSet,
    passes: Vec<Pass>,
}

struct ViewportState {
    config: GridConfig,
    size: Size,
    rows: Axis,
    columns: Axis,
    binding: Option<ModelBinding>,
    registry: RendererRegistry,
    damage: DamageTracker,
}

impl ViewportState {
    fn axis(&self, orientation: Orientation) -> &Axis {
        match orientation {
            Orientation::Rows => &self.rows,
            Orientation::Columns => &self.columns,
        }
    }

    fn axis_mut(&mut self, orientation: Orientation) -> &mut Axis {
        match orientation {
            Orientation::Rows => &mut self.rows,
            Orientation::Columns => &mut self.columns,
        }
    }

    fn model(&self) -> Option<&Arc<dyn DataModel>> {
        self.binding.as_ref().map(|b| &b.model)
    }

    fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.size.width, self.size.height)
    }

    fn header_extent(&self, orientation: Orientation) -> f32 {
        match orientation {
            Orientation::Rows => self.config.row_header_width as f32,
            Orientation::Columns => self.config.column_header_height as f32,
        }
    }

    fn body_rect(&self) -> Rect {
        let left = self.header_extent(Orientation::Rows);
        let top = self.header_extent(Orientation::Columns);
        Rect::new(
            left,
            top,
            (self.size.width - left).max(0.0),
            (self.size.height - top).max(0.0),
        )
    }

    fn row_header_rect(&self) -> Rect {
        let body = self.body_rect();
        Rect::new(0.0, body.top(), body.left(), body.height())
    }

    fn column_header_rect(&self) -> Rect {
        let body = self.body_rect();
        Rect::new(body.left(), 0.0, body.width(), body.top())
    }

    /// Record damage. Returns `false` if `rect` misses the viewport.
    fn damage(&mut self, rect: Rect) -> bool {
        if !rect.intersects(&self.bounds()) {
            return false;
        }
        self.damage.add_damage(rect);
        true
    }

    fn invalidate_all(&mut self) -> bool {
        self.damage.invalidate_all();
        true
    }

    /// Damage the strip from `from` to `to` along `orientation`, across the
    /// body and that axis' header strip.
    fn damage_band(&mut self, orientation: Orientation, from: f32, to: f32) -> bool {
        let body = self.body_rect();
        let rect = match orientation {
            Orientation::Rows => Rect::from_ltrb(0.0, from.max(body.top()), body.right(), to),
            Orientation::Columns => Rect::from_ltrb(from.max(body.left()), 0.0, to, body.bottom()),
        };
        self.damage(rect)
    }

    fn apply_extents(&mut self) {
        let body = self.body_rect();
        self.rows.set_extent(body.height());
        self.columns.set_extent(body.width());
        self.rows.clamp();
        self.columns.clamp();
        self.damage.set_viewport(self.bounds());
    }

    // -------------------------------------------------------------------------
    // Model reactions
    // -------------------------------------------------------------------------

    fn reset_from_model(&mut self) -> bool {
        let (rows, columns) = self
            .model()
            .map(|m| (m.row_count(), m.column_count()))
            .unwrap_or((0, 0));
        tracing::debug!(target: targets::VIEWPORT, rows, columns, "model reset");
        self.rows.map_mut().reset(rows);
        self.columns.map_mut().reset(columns);
        self.rows.clamp();
        self.columns.clamp();
        self.invalidate_all()
    }

    /// Finish a structural edit: resynchronise on failure, then damage from
    /// `start` to the end of the axis.
    fn after_structural(
        &mut self,
        orientation: Orientation,
        applied: GridResult<()>,
        start: usize,
    ) -> bool {
        if let Err(err) = applied {
            tracing::warn!(
                target: targets::VIEWPORT,
                %err,
                ?orientation,
                "section map out of sync with model, resetting"
            );
            return self.reset_from_model();
        }
        if self.axis_mut(orientation).clamp() {
            return self.invalidate_all();
        }
        let axis = self.axis(orientation);
        let from = axis.to_view(axis.map().section_position(start));
        let to = match orientation {
            Orientation::Rows => self.size.height,
            Orientation::Columns => self.size.width,
        };
        self.damage_band(orientation, from, to)
    }

    fn sections_inserted(&mut self, orientation: Orientation, range: &SectionRange) -> bool {
        tracing::debug!(target: targets::VIEWPORT, ?orientation, start = range.start, end = range.end, "sections inserted");
        let applied = self
            .axis_mut(orientation)
            .map_mut()
            .insert_sections(range.start, range.len());
        self.after_structural(orientation, applied, range.start)
    }

    fn sections_removed(&mut self, orientation: Orientation, range: &SectionRange) -> bool {
        tracing::debug!(target: targets::VIEWPORT, ?orientation, start = range.start, end = range.end, "sections removed");
        let applied = self
            .axis_mut(orientation)
            .map_mut()
            .remove_sections(range.start, range.len());
        self.after_structural(orientation, applied, range.start)
    }

    fn sections_moved(&mut self, orientation: Orientation, mv: &SectionRangeMove) -> bool {
        tracing::debug!(
            target: targets::VIEWPORT,
            ?orientation,
            start = mv.range.start,
            end = mv.range.end,
            destination = mv.destination,
            "sections moved"
        );
        let axis = self.axis_mut(orientation);
        let (source, source_len) = axis.view_span(mv.range.start, mv.range.end);
        if let Err(err) = axis
            .map_mut()
            .move_sections(mv.range.start, mv.range.len(), mv.destination)
        {
            tracing::warn!(target: targets::VIEWPORT, %err, "section map out of sync with model, resetting");
            return self.reset_from_model();
        }
        let target = mv.destination_range();
        let (dest, dest_len) = axis.view_span(target.start, target.end);
        let from = source.min(dest);
        let to = (source + source_len).max(dest + dest_len);
        self.damage_band(orientation, from, to)
    }

    fn headers_changed(&mut self, orientation: Orientation, range: &SectionRange) -> bool {
        let (start, length) = self.axis(orientation).view_span(range.start, range.end);
        let strip = match orientation {
            Orientation::Rows => self.row_header_rect(),
            Orientation::Columns => self.column_header_rect(),
        };
        let changed = match orientation {
            Orientation::Rows => Rect::new(strip.left(), start - 1.0, strip.width(), length + 1.0),
            Orientation::Columns => Rect::new(start - 1.0, strip.top(), length + 1.0, strip.height()),
        };
        match changed.intersect(&strip) {
            Some(rect) => self.damage(rect),
            None => false,
        }
    }

    fn cells_changed(&mut self, range: &CellRange) -> bool {
        let (x, width) = self
            .columns
            .view_span(range.start_column, range.end_column);
        let (y, height) = self.rows.view_span(range.start_row, range.end_row);
        // Include the one-pixel bleed into the neighbours above and to the left.
        let changed = Rect::new(x - 1.0, y - 1.0, width + 1.0, height + 1.0);
        match changed.intersect(&self.body_rect()) {
            Some(rect) => self.damage(rect),
            None => {
                tracing::trace!(
                    target: targets::VIEWPORT,
                    ?range,
                    "cell change outside the visible window"
                );
                false
            }
        }
    }

    // -------------------------------------------------------------------------
    // Painting
    // -------------------------------------------------------------------------

    fn body_jobs(&self, clip: &Rect) -> Vec<Job> {
        let rows = self.rows.visible();
        let columns = self.columns.visible();
        let mut jobs = Vec::with_capacity(rows.len() * columns.len());
        for row in rows {
            let (y, height) = self.rows.section_view(row);
            for column in columns.clone() {
                let (x, width) = self.columns.section_view(column);
                let rect = Rect::new(x, y, width, height);
                push_job(&mut jobs, clip, row, column, rect, CellRegion::Body);
            }
        }
        jobs
    }

    fn header_jobs(&self, orientation: Orientation, clip: &Rect) -> Vec<Job> {
        let strip = match orientation {
            Orientation::Rows => self.row_header_rect(),
            Orientation::Columns => self.column_header_rect(),
        };
        if strip.is_empty() {
            return Vec::new();
        }
        let axis = self.axis(orientation);
        let mut jobs = Vec::new();
        for index in axis.visible() {
            let (start, length) = axis.section_view(index);
            let (row, column, rect, region) = match orientation {
                Orientation::Rows => (
                    index,
                    0,
                    Rect::new(strip.left(), start, strip.width(), length),
                    CellRegion::RowHeader,
                ),
                Orientation::Columns => (
                    0,
                    index,
                    Rect::new(start, strip.top(), length, strip.height()),
                    CellRegion::ColumnHeader,
                ),
            };
            push_job(&mut jobs, clip, row, column, rect, region);
        }
        jobs
    }

    /// Capture the pending damage for painting and clear it.
    ///
    /// Each damaged rectangle becomes its own pass: the cells selected for a
    /// pass are exactly those whose bleed touches the area it clears.
    fn take_frame(&mut self) -> Option<Frame> {
        if !self.damage.has_damage() {
            return None;
        }
        let clips: Vec<Rect> = match self.damage.regions() {
            [] => self.damage.damage_region().into_iter().collect(),
            regions => regions.to_vec(),
        };

        let body = self.body_rect();
        let row_header = self.row_header_rect();
        let column_header = self.column_header_rect();
        let corner_rect = Rect::new(0.0, 0.0, body.left(), body.top());
        let has_model = self.model().is_some();

        let passes = clips
            .into_iter()
            .filter(|clip| !clip.is_empty())
            .map(|clip| {
                let corner = (!corner_rect.is_empty() && corner_rect.intersects(&clip)).then_some(corner_rect);
                let (body_jobs, row_jobs, column_jobs) = if has_model {
                    (
                        self.body_jobs(&clip),
                        self.header_jobs(Orientation::Rows, &clip),
                        self.header_jobs(Orientation::Columns, &clip),
                    )
                } else {
                    Default::default()
                };
                Pass {
                    clip,
                    corner,
                    regions: [
                        (body, body_jobs),
                        (column_header, column_jobs),
                        (row_header, row_jobs),
                    ],
                }
            })
            .collect();

        let frame = Frame {
            void_color: self.config.void_color,
            header_background: self.config.header_background,
            model: self.model().cloned(),
            renderers: self.registry.snapshot(),
            passes,
        };
        self.damage.clear();
        Some(frame)
    }
}

/// A virtualized grid view over a [`DataModel`].
///
/// The viewport owns the section geometry of both axes, follows every change
/// the model announces and accumulates the affected screen area. Hosts listen
/// to [`update_requested`](Self::update_requested) and call
/// [`paint`](Self::paint), which fetches and redraws only the damaged cells.
///
/// Cells name their renderer through [`CellData::renderer`]; unknown or
/// missing names use the default renderer. A change on any registered
/// renderer damages the whole viewport.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use canvas_grid::{GridConfig, GridViewport, TableModel};
/// use canvas_grid_render::RasterSurface;
///
/// let model = Arc::new(TableModel::new(100, 20));
/// let viewport = GridViewport::new(GridConfig::default()).with_model(model.clone());
/// viewport.set_size(400.0, 200.0);
///
/// let mut surface = RasterSurface::new(400, 200).unwrap();
/// let stats = viewport.paint(&mut surface);
/// assert_eq!((stats.cells, stats.headers), (32, 12));
///
/// // Rows far below the window are never fetched or repainted.
/// model.set_value(50, 0, Some("hidden".into())).unwrap();
/// assert!(!viewport.has_pending_damage());
///
/// model.set_value(1, 1, Some("z".into())).unwrap();
/// assert!(viewport.paint(&mut surface).cells < stats.cells);
/// ```
pub struct GridViewport {
    shared: Arc<Shared>,
}

impl Default for GridViewport {
    fn default() -> Self {
        Self::new(GridConfig::default())
    }
}

impl GridViewport {
    pub fn new(config: GridConfig) -> Self {
        let default: Arc<dyn CellRenderer> = Arc::new(
            TextCellRenderer::new()
                .with_text_color(config.text_color)
                .with_font(config.font())
                .with_empty_value_policy(config.empty_value_policy),
        );
        let header: Arc<dyn CellRenderer> = Arc::new(default_header_renderer(&config));

        let state = ViewportState {
            rows: Axis::new(
                0,
                config.default_row_height,
                config.uniform_rows,
                config.column_header_height as f32,
            ),
            columns: Axis::new(
                0,
                config.default_column_width,
                true,
                config.row_header_width as f32,
            ),
            size: Size::ZERO,
            binding: None,
            registry: RendererRegistry::new(default, header),
            damage: DamageTracker::with_viewport(Rect::ZERO),
            config,
        };

        let shared = Arc::new(Shared {
            state: Mutex::new(state),
            update_requested: Signal::new(),
        });

        let weak = Arc::downgrade(&shared);
        shared.state.lock().registry.set_listener(move || {
            if let Some(shared) = weak.upgrade() {
                tracing::debug!(target: targets::VIEWPORT, "renderer changed, full repaint");
                shared.react(|state| state.invalidate_all());
            }
        });

        Self { shared }
    }

    pub fn with_model(self, model: Arc<dyn DataModel>) -> Self {
        self.set_model(Some(model));
        self
    }

    /// Emitted whenever there is new damage to paint.
    pub fn update_requested(&self) -> &Signal<()> {
        &self.shared.update_requested
    }

    pub fn config(&self) -> GridConfig {
        self.shared.state.lock().config.clone()
    }

    // -------------------------------------------------------------------------
    // Model
    // -------------------------------------------------------------------------

    pub fn model(&self) -> Option<Arc<dyn DataModel>> {
        self.shared.state.lock().model().cloned()
    }

    /// Replace the model, releasing every subscription to the previous one.
    #[tracing::instrument(skip_all, target = "canvas_grid::viewport", level = "debug")]
    pub fn set_model(&self, model: Option<Arc<dyn DataModel>>) {
        let weak = Arc::downgrade(&self.shared);
        self.shared.react(|state| {
            state.binding = None;
            state.binding = model.map(|m| ModelBinding::connect(m, &weak));
            state.reset_from_model()
        });
    }

    // -------------------------------------------------------------------------
    // Renderers
    // -------------------------------------------------------------------------

    /// Register `renderer` under `name`. The viewport repaints fully.
    pub fn register_renderer(
        &self,
        name: impl Into<String>,
        renderer: Arc<dyn CellRenderer>,
    ) -> Option<Arc<dyn CellRenderer>> {
        let name = name.into();
        let mut previous = None;
        self.shared.react(|state| {
            previous = state.registry.register(name, renderer);
            state.invalidate_all()
        });
        previous
    }

    pub fn unregister_renderer(&self, name: &str) -> Option<Arc<dyn CellRenderer>> {
        let mut removed = None;
        self.shared.react(|state| {
            removed = state.registry.unregister(name);
            removed.is_some() && state.invalidate_all()
        });
        removed
    }

    pub fn set_default_renderer(&self, renderer: Arc<dyn CellRenderer>) {
        self.shared.react(|state| {
            state.registry.set_default_renderer(renderer);
            state.invalidate_all()
        });
    }

    pub fn set_header_renderer(&self, renderer: Arc<dyn CellRenderer>) {
        self.shared.react(|state| {
            state.registry.set_header_renderer(renderer);
            state.invalidate_all()
        });
    }

    /// The renderers currently in use.
    pub fn renderers(&self) -> RendererSet {
        self.shared.state.lock().registry.snapshot()
    }

    /// Number of distinct renderers whose `changed` signal is observed.
    pub fn renderer_subscription_count(&self) -> usize {
        self.shared.state.lock().registry.subscription_count()
    }

    // -------------------------------------------------------------------------
    // Geometry
    // -------------------------------------------------------------------------

    pub fn size(&self) -> Size {
        self.shared.state.lock().size
    }

    /// Resize the viewport. Everything is repainted.
    pub fn set_size(&self, width: f32, height: f32) {
        self.shared.react(|state| {
            state.size = Size::new(width.max(0.0), height.max(0.0));
            state.apply_extents();
            state.invalidate_all()
        });
    }

    /// Scroll offsets in content pixels, `(x, y)`.
    pub fn scroll_offset(&self) -> (u64, u64) {
        let state = self.shared.state.lock();
        (state.columns.offset(), state.rows.offset())
    }

    /// Scroll to content offsets, clamped to the scrollable range.
    /// Returns `true` if the view moved.
    pub fn scroll_to(&self, x: u64, y: u64) -> bool {
        self.shared.react(|state| {
            let moved_x = state.columns.scroll_to(x);
            let moved_y = state.rows.scroll_to(y);
            (moved_x || moved_y) && state.invalidate_all()
        })
    }

    /// Scroll by a signed pixel delta.
    pub fn scroll_by(&self, dx: i64, dy: i64) -> bool {
        let (x, y) = self.scroll_offset();
        self.scroll_to(x.saturating_add_signed(dx), y.saturating_add_signed(dy))
    }

    /// Scroll the least amount that brings the cell fully into view.
    pub fn scroll_to_cell(&self, row: usize, column: usize) -> bool {
        let (x, y) = {
            let state = self.shared.state.lock();
            (
                reveal(&state.columns, column, state.body_rect().width()),
                reveal(&state.rows, row, state.body_rect().height()),
            )
        };
        self.scroll_to(x, y)
    }

    pub fn row_height(&self, row: usize) -> u32 {
        self.shared.state.lock().rows.map().section_size(row)
    }

    pub fn column_width(&self, column: usize) -> u32 {
        self.shared.state.lock().columns.map().section_size(column)
    }

    /// Resize one row; damages from that row down.
    pub fn resize_row(&self, row: usize, height: u32) -> GridResult<()> {
        self.resize_section(Orientation::Rows, row, height)
    }

    /// Resize one column; damages from that column rightwards.
    pub fn resize_column(&self, column: usize, width: u32) -> GridResult<()> {
        self.resize_section(Orientation::Columns, column, width)
    }

    fn resize_section(&self, orientation: Orientation, index: usize, size: u32) -> GridResult<()> {
        let mut result = Ok(());
        self.shared.react(|state| {
            result = state.axis_mut(orientation).resize_section(index, size);
            result.is_ok() && state.after_structural(orientation, Ok(()), index)
        });
        result
    }

    /// Rows overlapping the body area.
    pub fn visible_rows(&self) -> Range<usize> {
        self.shared.state.lock().rows.visible()
    }

    /// Columns overlapping the body area.
    pub fn visible_columns(&self) -> Range<usize> {
        self.shared.state.lock().columns.visible()
    }

    /// Viewport rectangle of a body cell, whether or not it is visible.
    pub fn cell_rect(&self, row: usize, column: usize) -> Option<Rect> {
        let state = self.shared.state.lock();
        if row >= state.rows.map().count() || column >= state.columns.map().count() {
            return None;
        }
        let (x, width) = state.columns.section_view(column);
        let (y, height) = state.rows.section_view(row);
        Some(Rect::new(x, y, width, height))
    }

    /// The body cell under a viewport point.
    pub fn cell_at(&self, point: Point) -> Option<(usize, usize)> {
        let state = self.shared.state.lock();
        let x = state.columns.to_content(point.x)?;
        let y = state.rows.to_content(point.y)?;
        Some((state.rows.map().section_at(y)?, state.columns.map().section_at(x)?))
    }

    // -------------------------------------------------------------------------
    // Damage and painting
    // -------------------------------------------------------------------------

    /// Damage the whole viewport.
    pub fn invalidate(&self) {
        self.shared.react(|state| state.invalidate_all());
    }

    pub fn has_pending_damage(&self) -> bool {
        self.shared.state.lock().damage.has_damage()
    }

    /// Bounding box of the damage the next paint will redraw.
    pub fn pending_damage(&self) -> Option<Rect> {
        self.shared.state.lock().damage.damage_region()
    }

    /// Redraw the pending damage onto `surface`.
    ///
    /// Each damaged rectangle is cleared to the void color, then the body and
    /// both header strips are painted under that rectangle's clip. Within a strip
    /// every cell's background is drawn before any content and every
    /// content before any border.
    pub fn paint(&self, surface: &mut dyn Surface) -> PaintStats {
        let _perf = PerfSpan::new("viewport.paint");
        let Some(frame) = self.shared.state.lock().take_frame() else {
            tracing::trace!(target: targets::VIEWPORT, "nothing to repaint");
            return PaintStats::default();
        };

        let depth = surface.state_depth();
        let mut stats = PaintStats::default();
        for pass in &frame.passes {
            surface.save();
            surface.clip_rect(pass.clip);
            surface.clear_rect(pass.clip, frame.void_color);
            if let Some(rect) = pass.corner {
                surface.fill_rect(rect, frame.header_background);
            }

            if let Some(model) = &frame.model {
                for (area, jobs) in &pass.regions {
                    let painted = paint_region(surface, model.as_ref(), &frame.renderers, *area, jobs);
                    match jobs.first().map(|j| j.region) {
                        Some(CellRegion::Body) => stats.cells += painted,
                        Some(_) => stats.headers += painted,
                        None => {}
                    }
                }
            }
            surface.restore();
        }

        if surface.state_depth() != depth {
            tracing::warn!(
                target: targets::VIEWPORT,
                before = depth,
                after = surface.state_depth(),
                "surface state depth changed during paint"
            );
        }
        tracing::debug!(target: targets::VIEWPORT, cells = stats.cells, headers = stats.headers, "painted");
        stats
    }
}

/// Schedule a cell when its bleed rect touches `clip`.
fn push_job(jobs: &mut Vec<Job>, clip: &Rect, row: usize, column: usize, rect: Rect, region: CellRegion) {
    if rect.is_empty() {
        return;
    }
    let bleed = Rect::new(rect.left() - 1.0, rect.top() - 1.0, rect.width() + 1.0, rect.height() + 1.0);
    if bleed.intersects(clip) {
        jobs.push(Job {
            row,
            column,
            rect,
            region,
        });
    }
}

/// Fetch and draw every job in one strip, layer by layer.
fn paint_region(
    surface: &mut dyn Surface,
    model: &dyn DataModel,
    renderers: &RendererSet,
    area: Rect,
    jobs: &[Job],
) -> usize {
    if jobs.is_empty() {
        return 0;
    }

    let mut records: Vec<CellData> = Vec::with_capacity(jobs.len());
    for job in jobs {
        let mut data = CellData::default();
        match job.region {
            CellRegion::Body => model.cell_data(job.row, job.column, &mut data),
            CellRegion::RowHeader => {
                model.row_header_data(job.row, &mut data);
                if data.value.is_none() {
                    data.value = Some(CellValue::from(job.row + 1));
                }
            }
            CellRegion::ColumnHeader => {
                model.column_header_data(job.column, &mut data);
                if data.value.is_none() {
                    data.value = Some(CellValue::from(column_label(job.column)));
                }
            }
        }
        records.push(data);
    }

    let cells: Vec<(&Arc<dyn CellRenderer>, CellConfig<'_>)> = jobs
        .iter()
        .zip(&records)
        .map(|(job, data)| {
            let name = data.renderer.as_deref();
            let renderer = match job.region {
                CellRegion::Body => renderers.resolve(name),
                CellRegion::RowHeader | CellRegion::ColumnHeader => renderers.resolve_header(name),
            };
            let config = CellConfig::new(job.row, job.column, job.rect)
                .with_value(data.value.as_ref())
                .with_options(data.options.as_deref())
                .with_region(job.region);
            (renderer, config)
        })
        .collect();

    surface.save();
    surface.clip_rect(area);
    let depth = surface.state_depth();
    for (renderer, config) in &cells {
        renderer.draw_background(surface, config);
    }
    check_depth(surface, depth, "background");
    for (renderer, config) in &cells {
        renderer.draw_content(surface, config);
    }
    check_depth(surface, depth, "content");
    for (renderer, config) in &cells {
        renderer.draw_border(surface, config);
    }
    check_depth(surface, depth, "border");
    surface.restore();

    cells.len()
}

fn check_depth(surface: &dyn Surface, expected: usize, layer: &'static str) {
    let depth = surface.state_depth();
    if depth != expected {
        tracing::warn!(target: targets::VIEWPORT, layer, expected, depth, "renderer leaked surface state");
    }
}

/// Content offset that brings section `index` fully into an `extent`-long view.
fn reveal(axis: &Axis, index: usize, extent: f32) -> u64 {
    let start = axis.map().section_position(index);
    let end = start + u64::from(axis.map().section_size(index));
    let extent = extent as u64;
    let offset = axis.offset();
    if start < offset {
        start
    } else if end > offset + extent {
        end.saturating_sub(extent)
    } else {
        offset
    }
}

/// Spreadsheet-style label: `A`..`Z`, `AA`, `AB`, ...
pub fn column_label(index: usize) -> String {
    let mut label = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        label.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    label.reverse();
    String::from_utf8_lossy(&label).into_owned()
}

fn default_header_renderer(config: &GridConfig) -> TextCellRenderer {
    let rule = EdgeStyle::solid(Color::LIGHT_GRAY);
    TextCellRenderer::new()
        .with_background(BackgroundStyle::color(config.header_background))
        .with_border(BorderStyle::spec(
            BorderSpec::none()
                .with_edge(Edge::Right, Some(rule))
                .with_edge(Edge::Bottom, Some(rule)),
        ))
        .with_text_color(config.text_color)
        .with_font(config.font())
}

impl std::fmt::Debug for GridViewport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.shared.state.lock();
        f.debug_struct("GridViewport")
            .field("size", &state.size)
            .field("rows", &state.rows.map().count())
            .field("columns", &state.columns.map().count())
            .field("scroll", &(state.columns.offset(), state.rows.offset()))
            .field("renderers", &state.registry)
            .finish_non_exhaustive()
    }
}

static_assertions::assert_impl_all!(GridViewport: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TableModel;
    use canvas_grid_render::RasterSurface;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn viewport(rows: usize, columns: usize) -> (Arc<TableModel>, GridViewport) {
        let model = Arc::new(TableModel::new(rows, columns));
        let config = GridConfig {
            row_header_width: 0,
            column_header_height: 0,
            ..GridConfig::default()
        };
        let viewport = GridViewport::new(config).with_model(model.clone());
        viewport.set_size(400.0, 240.0);
        let mut surface = RasterSurface::new(400, 240).unwrap();
        viewport.paint(&mut surface);
        (model, viewport)
    }

    fn requests(viewport: &GridViewport) -> Arc<AtomicUsize> {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        viewport.update_requested().connect(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        count
    }

    #[test]
    fn test_column_labels() {
        assert_eq!(column_label(0), "A");
        assert_eq!(column_label(25), "Z");
        assert_eq!(column_label(26), "AA");
        assert_eq!(column_label(701), "ZZ");
        assert_eq!(column_label(702), "AAA");
    }

    #[test]
    fn test_visible_ranges() {
        let (_, viewport) = viewport(100, 10);
        assert_eq!(viewport.visible_rows(), 0..10);
        assert_eq!(viewport.visible_columns(), 0..4);

        viewport.scroll_to(50, 12);
        assert_eq!(viewport.visible_rows(), 0..11);
        assert_eq!(viewport.visible_columns(), 0..5);
    }

    #[test]
    fn test_cell_change_damages_the_cell_bleed() {
        let (model, viewport) = viewport(100, 10);
        let count = requests(&viewport);

        model.set_value(2, 1, Some("x".into())).unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(
            viewport.pending_damage(),
            Some(Rect::new(99.0, 47.0, 101.0, 25.0))
        );
    }

    #[test]
    fn test_cell_change_outside_window_is_ignored() {
        let (model, viewport) = viewport(100, 10);
        let count = requests(&viewport);

        model.set_value(50, 1, Some("x".into())).unwrap();
        model.set_value(0, 9, Some("x".into())).unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert!(!viewport.has_pending_damage());
    }

    #[test]
    fn test_insert_damages_from_start_down() {
        let (model, viewport) = viewport(100, 10);
        model.insert_rows(5, 3).unwrap();
        assert_eq!(viewport.pending_damage(), Some(Rect::new(0.0, 120.0, 400.0, 120.0)));
        assert_eq!(viewport.cell_rect(8, 0), Some(Rect::new(0.0, 192.0, 100.0, 24.0)));
    }

    #[test]
    fn test_scroll_clamps_and_repaints() {
        let (_, viewport) = viewport(20, 10);
        assert!(viewport.scroll_to(10_000, 10_000));
        assert_eq!(viewport.scroll_offset(), (600, 240));
        assert!(viewport.has_pending_damage());
        assert!(!viewport.scroll_by(10, 10));
        assert!(viewport.scroll_by(-600, 0));
        assert_eq!(viewport.scroll_offset(), (0, 240));
    }

    #[test]
    fn test_scroll_to_cell() {
        let (_, viewport) = viewport(100, 10);
        viewport.scroll_to_cell(20, 0);
        assert_eq!(viewport.scroll_offset(), (0, 21 * 24 - 240));
        viewport.scroll_to_cell(0, 0);
        assert_eq!(viewport.scroll_offset(), (0, 0));
    }

    #[test]
    fn test_cell_at() {
        let (_, viewport) = viewport(100, 10);
        viewport.scroll_to(0, 30);
        assert_eq!(viewport.cell_at(Point::new(150.0, 0.0)), Some((1, 1)));
        assert_eq!(viewport.cell_at(Point::new(-1.0, 0.0)), None);
    }

    #[test]
    fn test_resize_row() {
        let (_, viewport) = viewport(100, 10);
        viewport.resize_row(3, 50).unwrap();
        assert_eq!(viewport.row_height(3), 50);
        assert_eq!(viewport.cell_rect(4, 0).map(|r| r.top()), Some(122.0));
        assert!(viewport.resize_row(100, 10).is_err());
    }

    #[test]
    fn test_set_model_releases_previous_model() {
        let (model, viewport) = viewport(5, 5);
        assert_eq!(model.signals().connection_count(), 10);

        viewport.set_model(None);
        assert_eq!(model.signals().connection_count(), 0);

        let other = Arc::new(TableModel::new(1, 1));
        viewport.set_model(Some(other.clone()));
        drop(viewport);
        assert_eq!(other.signals().connection_count(), 0);
    }
}
