//! Damage tracking for partial repaints.
//!
//! A grid receives many small, scattered invalidations between repaints: a
//! single edited cell here, a header strip there, a band of rows below an
//! insertion point. [`DamageTracker`] keeps them as a short list of disjoint-ish
//! rectangles so a repaint can skip everything that was not touched, and
//! collapses to a single bounding rectangle (or a full repaint) when the list
//! grows too fragmented to be worth it.

use crate::types::Rect;

/// Beyond this many separate regions, damage collapses to their bounding box.
const MAX_REGIONS: usize = 8;

/// Damage covering more than this fraction of the viewport becomes a full repaint.
const FULL_REPAINT_THRESHOLD: f32 = 0.9;

/// Tracks damaged (dirty) regions that need repainting.
///
/// # Example
///
/// ```
/// use canvas_grid_render::{DamageTracker, Rect};
///
/// let mut tracker = DamageTracker::with_viewport(Rect::new(0.0, 0.0, 800.0, 600.0));
/// tracker.add_damage(Rect::new(10.0, 10.0, 50.0, 30.0));
/// tracker.add_damage(Rect::new(400.0, 300.0, 20.0, 20.0));
///
/// assert_eq!(tracker.regions().len(), 2);
/// assert!(!tracker.intersects(&Rect::new(200.0, 200.0, 10.0, 10.0)));
///
/// tracker.clear();
/// assert!(!tracker.has_damage());
/// ```
#[derive(Debug, Clone, Default)]
pub struct DamageTracker {
    regions: Vec<Rect>,
    /// Number of `add_damage` calls that contributed since the last clear.
    damage_count: u32,
    full_repaint: bool,
    viewport: Option<Rect>,
}

impl DamageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a damage tracker that clips damage to `viewport`.
    pub fn with_viewport(viewport: Rect) -> Self {
        Self {
            viewport: Some(viewport),
            ..Self::default()
        }
    }

    /// Set the viewport bounds, clipping existing damage to it.
    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = Some(viewport);
        self.regions = self
            .regions
            .iter()
            .filter_map(|r| r.intersect(&viewport))
            .collect();
        self.check_full_repaint_threshold();
    }

    /// Get the viewport bounds.
    pub fn viewport(&self) -> Option<Rect> {
        self.viewport
    }

    /// Add a damaged region.
    ///
    /// Empty rectangles and damage entirely outside the viewport are ignored.
    pub fn add_damage(&mut self, rect: Rect) {
        if rect.width() <= 0.0 || rect.height() <= 0.0 || self.full_repaint {
            return;
        }

        let mut rect = match &self.viewport {
            Some(viewport) => match rect.intersect(viewport) {
                Some(clipped) => clipped,
                None => return,
            },
            None => rect,
        };

        self.damage_count += 1;

        // Absorb every region the new rect overlaps so the list stays disjoint.
        let mut i = 0;
        while i < self.regions.len() {
            if self.regions[i].intersects(&rect) || rect.contains_rect(&self.regions[i]) {
                rect = rect.union(&self.regions.swap_remove(i));
                i = 0;
            } else {
                i += 1;
            }
        }
        self.regions.push(rect);

        if self.regions.len() > MAX_REGIONS {
            let bounds = self.bounds_of_regions();
            self.regions.clear();
            self.regions.extend(bounds);
        }

        self.check_full_repaint_threshold();
    }

    /// Mark the entire viewport as damaged.
    pub fn invalidate_all(&mut self) {
        self.full_repaint = true;
        self.regions.clear();
        self.regions.extend(self.viewport);
        self.damage_count += 1;
    }

    /// The damaged regions. With a full repaint this is the viewport.
    pub fn regions(&self) -> &[Rect] {
        &self.regions
    }

    /// Bounding box of all damage, or the viewport on a full repaint.
    pub fn damage_region(&self) -> Option<Rect> {
        if self.full_repaint {
            return self.viewport.or_else(|| self.bounds_of_regions());
        }
        self.bounds_of_regions()
    }

    /// Does `rect` touch any damaged region?
    ///
    /// A full repaint without a viewport damages everything.
    pub fn intersects(&self, rect: &Rect) -> bool {
        if self.full_repaint && self.viewport.is_none() {
            return true;
        }
        self.regions.iter().any(|r| r.intersects(rect))
    }

    #[inline]
    pub fn has_damage(&self) -> bool {
        !self.regions.is_empty() || self.full_repaint
    }

    #[inline]
    pub fn needs_full_repaint(&self) -> bool {
        self.full_repaint
    }

    #[inline]
    pub fn damage_count(&self) -> u32 {
        self.damage_count
    }

    /// Clear all damage. Call after the damaged regions were repainted.
    pub fn clear(&mut self) {
        self.regions.clear();
        self.damage_count = 0;
        self.full_repaint = false;
    }

    /// Damaged area divided by viewport area, in `0.0..=1.0`.
    pub fn damage_ratio(&self) -> f32 {
        let Some(viewport) = self.viewport else {
            return 0.0;
        };
        let viewport_area = viewport.width() * viewport.height();
        if viewport_area <= 0.0 {
            return 0.0;
        }
        let damage_area: f32 = self.regions.iter().map(|r| r.width() * r.height()).sum();
        (damage_area / viewport_area).min(1.0)
    }

    fn bounds_of_regions(&self) -> Option<Rect> {
        self.regions.iter().copied().reduce(|a, b| a.union(&b))
    }

    fn check_full_repaint_threshold(&mut self) {
        if self.viewport.is_some() && self.damage_ratio() > FULL_REPAINT_THRESHOLD {
            tracing::trace!(target: "canvas_grid::render", "damage escalated to full repaint");
            self.full_repaint = true;
            self.regions.clear();
            self.regions.extend(self.viewport);
        }
    }
}
