//! Collision detection between the climber and falling rocks
//!
//! Works in pixel space: percent positions are converted with the current
//! viewport, then both sprites are shrunk by a fixed fraction of their size
//! on every edge so grazing passes don't count.

use glam::Vec2;

use super::state::{GameState, Obstacle, Player};
use super::viewport::Viewport;
use crate::percent_to_px;
use crate::tuning::Tuning;

/// Axis-aligned box in pixels (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hitbox {
    pub min: Vec2,
    pub max: Vec2,
}

impl Hitbox {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Sprite box at `top_left` with `size`, each edge pulled in by `shrink * size`
    pub fn shrunk(top_left: Vec2, size: f32, shrink: f32) -> Self {
        let inset = Vec2::splat(size * shrink);
        Self {
            min: top_left + inset,
            max: top_left + Vec2::splat(size) - inset,
        }
    }

    /// Open-interval overlap on both axes; touching edges don't collide
    pub fn overlaps(&self, other: &Hitbox) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// Player hitbox: centered on `x%`, bottom edge `bottom_offset` above the viewport bottom
pub fn player_hitbox(player: &Player, viewport: &Viewport, tuning: &Tuning) -> Hitbox {
    let size = tuning.player_size_px;
    let center_x = percent_to_px(player.x, viewport.width);
    let bottom = viewport.height - tuning.player_bottom_offset_px;
    let top_left = Vec2::new(center_x - size / 2.0, bottom - size);
    Hitbox::shrunk(top_left, size, tuning.hitbox_shrink)
}

/// Rock hitbox: top-left corner at `(x%, y%)`
pub fn obstacle_hitbox(rock: &Obstacle, viewport: &Viewport, tuning: &Tuning) -> Hitbox {
    let top_left = Vec2::new(
        percent_to_px(rock.x, viewport.width),
        percent_to_px(rock.y, viewport.height),
    );
    Hitbox::shrunk(top_left, tuning.obstacle_size_px, tuning.hitbox_shrink)
}

/// Id of the first rock overlapping the player, if any
///
/// Which rock gets reported when several overlap depends on iteration order;
/// whether a collision is reported does not.
pub fn detect(state: &GameState, viewport: &Viewport, tuning: &Tuning) -> Option<u32> {
    let player = player_hitbox(&state.player, viewport, tuning);
    state
        .obstacles
        .iter()
        .find(|rock| player.overlaps(&obstacle_hitbox(rock, viewport, tuning)))
        .map(|rock| rock.id)
}
