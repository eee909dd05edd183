//! Rock spawning and the difficulty ramp
//!
//! The spawn delay window shrinks linearly with match progress:
//! ~[640, 1200] ms at the start down to ~[80, 160] ms at the end.

use rand::Rng;

use super::state::{GameEvent, GameState, RockKind};
use super::viewport::Viewport;
use crate::tuning::Tuning;

/// `(min, max)` spawn delay in ms for a match progress in [0, 1]
pub fn spawn_delay_bounds(progress: f32, tuning: &Tuning) -> (f32, f32) {
    let p = if progress.is_finite() { progress.clamp(0.0, 1.0) } else { 0.0 };
    let min = (tuning.spawn_min_base_ms - tuning.spawn_min_drop_ms * p) * tuning.spawn_delay_scale;
    let max = (tuning.spawn_max_base_ms - tuning.spawn_max_drop_ms * p) * tuning.spawn_delay_scale;
    let min = min.max(0.0);
    (min, max.max(min))
}

/// Random delay until the next spawn
pub fn next_spawn_delay<R: Rng + ?Sized>(progress: f32, tuning: &Tuning, rng: &mut R) -> f32 {
    let (min, max) = spawn_delay_bounds(progress, tuning);
    min + rng.random::<f32>() * (max - min)
}

/// Drop a new rock just above the viewport at a random column
pub fn spawn_obstacle<R: Rng + ?Sized>(
    state: &mut GameState,
    viewport: &Viewport,
    tuning: &Tuning,
    rng: &mut R,
) -> u32 {
    let (lo, hi) = viewport.spawn_range(tuning);
    let x = lo + rng.random::<f32>() * (hi - lo);
    let kind = RockKind::ALL[rng.random_range(0..RockKind::ALL.len())];

    let id = state.spawn_obstacle_at(x, tuning.obstacle_spawn_y, kind);
    state.events.push(GameEvent::ObstacleSpawned { id, x, kind });
    log::debug!("Spawned {kind:?} rock {id} at x={x:.1}%");
    id
}
