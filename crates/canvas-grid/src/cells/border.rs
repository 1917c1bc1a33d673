//! Cell borders: per-edge styles and the order edges are drawn in.

use std::fmt;
use std::str::FromStr;

use canvas_grid_render::{Color, DashPattern, Point, Stroke, Surface};

use crate::error::{GridError, GridResult};

/// One side of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];

    fn code(self) -> char {
        match self {
            Edge::Top => 't',
            Edge::Right => 'r',
            Edge::Bottom => 'b',
            Edge::Left => 'l',
        }
    }

    fn from_code(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            't' => Some(Edge::Top),
            'r' => Some(Edge::Right),
            'b' => Some(Edge::Bottom),
            'l' => Some(Edge::Left),
            _ => None,
        }
    }
}

/// Line thickness of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BorderWeight {
    #[default]
    Thin,
    Medium,
    Thick,
}

impl BorderWeight {
    /// Thickness in pixels.
    pub fn pixels(self) -> f32 {
        match self {
            BorderWeight::Thin => 1.0,
            BorderWeight::Medium => 2.0,
            BorderWeight::Thick => 3.0,
        }
    }
}

/// Line pattern of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LineStyle {
    None,
    #[default]
    Solid,
    Dash,
    Dot,
}

/// The style of a single edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeStyle {
    pub color: Color,
    pub weight: BorderWeight,
    pub line: LineStyle,
}

impl EdgeStyle {
    /// A thin solid edge.
    pub fn solid(color: Color) -> Self {
        Self {
            color,
            weight: BorderWeight::Thin,
            line: LineStyle::Solid,
        }
    }

    pub fn with_weight(mut self, weight: BorderWeight) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_line(mut self, line: LineStyle) -> Self {
        self.line = line;
        self
    }

    /// Whether drawing this edge has any effect.
    pub fn is_visible(&self) -> bool {
        self.line != LineStyle::None && !self.color.is_transparent()
    }

    fn stroke(&self) -> Stroke {
        let width = self.weight.pixels();
        let stroke = Stroke::new(self.color, width);
        match self.line {
            LineStyle::Dash => stroke.with_dash(DashPattern::simple(width * 3.0, width * 2.0)),
            LineStyle::Dot => stroke.with_dash(DashPattern::simple(width, width)),
            LineStyle::Solid | LineStyle::None => stroke,
        }
    }
}

/// The order in which the four edges of a cell are drawn.
///
/// Later edges overdraw earlier ones at the corners, which matters when
/// adjacent edges have different styles. Always a permutation of
/// [`Edge::ALL`]; parse one from a four-letter code such as `"trbl"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeOrder([Edge; 4]);

impl Default for EdgeOrder {
    fn default() -> Self {
        Self(Edge::ALL)
    }
}

impl EdgeOrder {
    /// Validate a permutation of the four edges.
    pub fn new(edges: [Edge; 4]) -> GridResult<Self> {
        let distinct = Edge::ALL.iter().all(|e| edges.contains(e));
        if !distinct {
            return Err(GridError::InvalidEdgeOrder(Self(edges).code()));
        }
        Ok(Self(edges))
    }

    pub fn edges(&self) -> [Edge; 4] {
        self.0
    }

    /// All 24 orderings, in lexicographic order of their position in [`Edge::ALL`].
    pub fn all() -> impl Iterator<Item = EdgeOrder> {
        let e = Edge::ALL;
        (0..4).flat_map(move |a| {
            (0..4).flat_map(move |b| {
                (0..4).flat_map(move |c| {
                    (0..4).filter_map(move |d| {
                        let idx = [a, b, c, d];
                        let distinct = (0..4).all(|i| idx.contains(&i));
                        distinct.then(|| EdgeOrder([e[a], e[b], e[c], e[d]]))
                    })
                })
            })
        })
    }

    /// The four-letter code, e.g. `"trbl"`.
    pub fn code(&self) -> String {
        self.0.iter().map(|e| e.code()).collect()
    }
}

impl FromStr for EdgeOrder {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || GridError::InvalidEdgeOrder(s.to_string());
        let chars: Vec<char> = s.chars().collect();
        if chars.len() != 4 {
            return Err(invalid());
        }
        let mut edges = [Edge::Top; 4];
        for (slot, c) in edges.iter_mut().zip(chars) {
            *slot = Edge::from_code(c).ok_or_else(invalid)?;
        }
        EdgeOrder::new(edges).map_err(|_| invalid())
    }
}

impl fmt::Display for EdgeOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code())
    }
}

/// A full border: an optional style per edge plus the draw order.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BorderSpec {
    pub top: Option<EdgeStyle>,
    pub right: Option<EdgeStyle>,
    pub bottom: Option<EdgeStyle>,
    pub left: Option<EdgeStyle>,
    pub order: EdgeOrder,
}

impl BorderSpec {
    /// No edges.
    pub fn none() -> Self {
        Self::default()
    }

    /// The same style on every edge.
    pub fn uniform(style: EdgeStyle) -> Self {
        Self {
            top: Some(style),
            right: Some(style),
            bottom: Some(style),
            left: Some(style),
            order: EdgeOrder::default(),
        }
    }

    pub fn with_edge(mut self, edge: Edge, style: Option<EdgeStyle>) -> Self {
        *self.edge_mut(edge) = style;
        self
    }

    pub fn with_order(mut self, order: EdgeOrder) -> Self {
        self.order = order;
        self
    }

    pub fn edge(&self, edge: Edge) -> Option<&EdgeStyle> {
        match edge {
            Edge::Top => self.top.as_ref(),
            Edge::Right => self.right.as_ref(),
            Edge::Bottom => self.bottom.as_ref(),
            Edge::Left => self.left.as_ref(),
        }
    }

    fn edge_mut(&mut self, edge: Edge) -> &mut Option<EdgeStyle> {
        match edge {
            Edge::Top => &mut self.top,
            Edge::Right => &mut self.right,
            Edge::Bottom => &mut self.bottom,
            Edge::Left => &mut self.left,
        }
    }

    /// Draw the visible edges inside `bounds`, in `self.order`.
    ///
    /// Each edge is a band along one side of `bounds` that grows inward with
    /// its weight, so nothing is drawn outside `bounds`.
    pub fn draw(&self, surface: &mut dyn Surface, bounds: canvas_grid_render::Rect) {
        let (l, t, r, b) = (bounds.left(), bounds.top(), bounds.right(), bounds.bottom());
        for edge in self.order.edges() {
            let Some(style) = self.edge(edge).filter(|s| s.is_visible()) else {
                continue;
            };
            let half = style.weight.pixels() / 2.0;
            let (from, to) = match edge {
                Edge::Top => (Point::new(l, t + half), Point::new(r, t + half)),
                Edge::Bottom => (Point::new(l, b - half), Point::new(r, b - half)),
                Edge::Left => (Point::new(l + half, t), Point::new(l + half, b)),
                Edge::Right => (Point::new(r - half, t), Point::new(r - half, b)),
            };
            surface.stroke_line(from, to, &style.stroke());
        }
    }
}
