//! Viewport measurement and the percent-space bounds derived from it

use serde::{Deserialize, Serialize};

use crate::consts::{NOMINAL_VIEWPORT_HEIGHT, NOMINAL_VIEWPORT_WIDTH};
use crate::px_to_percent;
use crate::tuning::Tuning;

/// Playfield size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::NOMINAL
    }
}

impl Viewport {
    /// Fallback size when the real playfield can't be measured
    pub const NOMINAL: Viewport = Viewport {
        width: NOMINAL_VIEWPORT_WIDTH,
        height: NOMINAL_VIEWPORT_HEIGHT,
    };

    /// Build from measured dimensions; zero, negative or non-finite sizes fall back to nominal
    pub fn new(width: f32, height: f32) -> Self {
        let usable = |v: f32| v.is_finite() && v > 0.0;
        if usable(width) && usable(height) {
            Self { width, height }
        } else {
            // Hosts re-measure every frame, so this stays below warn
            log::debug!("Unusable viewport {width}x{height}, using nominal size");
            Self::NOMINAL
        }
    }

    /// Build from an optional measurement
    pub fn measured(dims: Option<(f32, f32)>) -> Self {
        match dims {
            Some((w, h)) => Self::new(w, h),
            None => Self::NOMINAL,
        }
    }

    /// Legal range for the player's center (percent of width)
    ///
    /// `[border + halfWidth, 100 - border - halfWidth]`. Collapses to the
    /// middle when the viewport is too narrow to fit the player.
    pub fn player_bounds(&self, tuning: &Tuning) -> (f32, f32) {
        let border = px_to_percent(tuning.map_border_px, self.width);
        let half = px_to_percent(tuning.player_size_px, self.width) / 2.0;
        let lo = border + half;
        let hi = 100.0 - border - half;
        if lo <= hi { (lo, hi) } else { (50.0, 50.0) }
    }

    /// Legal range for a new rock's left edge (percent of width)
    ///
    /// `[border, 100 - border - obstacleWidth]`, collapsed to its lower end
    /// when the rock doesn't fit.
    pub fn spawn_range(&self, tuning: &Tuning) -> (f32, f32) {
        let border = px_to_percent(tuning.map_border_px, self.width);
        let rock = px_to_percent(tuning.obstacle_size_px, self.width);
        let hi = 100.0 - border - rock;
        (border, hi.max(border))
    }
}
