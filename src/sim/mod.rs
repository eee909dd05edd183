//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time arrives as explicit millisecond values, never read from a wall clock
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod clock;
pub mod collision;
pub mod input;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod timer;
pub mod viewport;

pub use clock::FrameClock;
pub use collision::{Hitbox, detect, obstacle_hitbox, player_hitbox};
pub use input::{Direction, InputTracker, apply_press};
pub use spawner::{next_spawn_delay, spawn_delay_bounds, spawn_obstacle};
pub use state::{
    Facing, GameEvent, GameState, MatchOutcome, MatchPhase, MatchState, Obstacle, Player, RockKind,
};
pub use tick::{TickInput, step};
pub use timer::{FiredTimer, TimerHandle, TimerKind, TimerQueue};
pub use viewport::Viewport;
