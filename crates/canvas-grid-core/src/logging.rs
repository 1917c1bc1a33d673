//! Logging facilities for Canvas Grid.
//!
//! All crates in the workspace log through the `tracing` crate under the
//! targets listed in [`targets`]. Nothing here installs a subscriber; the host
//! application decides where events go:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("canvas_grid::viewport=debug,canvas_grid::perf=info")
//!     .init();
//! ```

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Signal emission.
    pub const SIGNAL: &str = "canvas_grid::signal";
    /// Property change detection.
    pub const PROPERTY: &str = "canvas_grid::property";
    /// Data model mutations and notifications.
    pub const MODEL: &str = "canvas_grid::model";
    /// Cell renderer policy and drawing.
    pub const RENDERER: &str = "canvas_grid::renderer";
    /// Viewport reactions, scrolling and painting.
    pub const VIEWPORT: &str = "canvas_grid::viewport";
    /// Drawing surfaces and damage tracking.
    pub const RENDER: &str = "canvas_grid::render";
    /// Section geometry.
    pub const SECTION: &str = "canvas_grid::section";
    /// Performance spans.
    pub const PERF: &str = "canvas_grid::perf";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// This is useful for tracking the duration of operations such as a viewport
/// paint.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "canvas_grid::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}
