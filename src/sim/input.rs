//! Keyboard intent tracking
//!
//! In [`MovementMode::Press`] every key-down event (including OS key repeats)
//! moves the player one fixed step immediately. In [`MovementMode::Hold`] the
//! tracker only records which direction is held and the simulation step moves
//! the player by `hold_speed * dt`, so speed is independent of frame rate and
//! key-repeat rate.

use serde::{Deserialize, Serialize};

use super::state::{Facing, Player};
use super::viewport::Viewport;
use crate::tuning::{MovementMode, Tuning};

/// A directional key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }

    pub fn facing(self) -> Facing {
        match self {
            Direction::Left => Facing::Left,
            Direction::Right => Facing::Right,
        }
    }
}

/// Held-key state
#[derive(Debug, Clone, Default)]
pub struct InputTracker {
    left: bool,
    right: bool,
    /// Most recently pressed direction (wins when both are held)
    last: Option<Direction>,
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key pressed (or auto-repeated)
    pub fn key_down(&mut self, dir: Direction, player: &mut Player, viewport: &Viewport, tuning: &Tuning) {
        match dir {
            Direction::Left => self.left = true,
            Direction::Right => self.right = true,
        }
        self.last = Some(dir);

        player.facing = dir.facing();
        player.moving = true;

        if tuning.movement == MovementMode::Press {
            apply_press(player, dir, viewport, tuning);
        }
    }

    /// Key released. Facing is left alone.
    pub fn key_up(&mut self, dir: Direction, player: &mut Player) {
        match dir {
            Direction::Left => self.left = false,
            Direction::Right => self.right = false,
        }
        if self.last == Some(dir) {
            self.last = match (self.left, self.right) {
                (true, _) => Some(Direction::Left),
                (_, true) => Some(Direction::Right),
                _ => None,
            };
        }
        player.moving = self.held().is_some();
    }

    /// Direction currently driving hold-mode movement
    pub fn held(&self) -> Option<Direction> {
        self.last
    }

    /// Forget all held keys (new attempt, match end)
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Move the player one fixed step, clamped to the legal band
pub fn apply_press(player: &mut Player, dir: Direction, viewport: &Viewport, tuning: &Tuning) {
    let (lo, hi) = viewport.player_bounds(tuning);
    player.x = (player.x + dir.sign() * tuning.move_step_percent).clamp(lo, hi);
}
