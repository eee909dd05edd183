//! Rock Climb - a falling-rock dodging arcade mini-game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (frame clock, timers, spawning, collisions, game state)
//! - `session`: Match state machine wiring the simulation to its collaborators
//! - `tuning`: Data-driven game balance

pub mod session;
pub mod sim;
pub mod tuning;

pub use session::{OverlayStatus, Session, Snapshot};
pub use tuning::{MovementMode, Tuning, TuningError};

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Length of a match in seconds
    pub const GAME_DURATION_SECS: u32 = 60;
    /// Attempts per session
    pub const ATTEMPT_BUDGET: u32 = 3;
    /// Countdown period (one score point per period survived)
    pub const TIMER_PERIOD_MS: f64 = 1000.0;

    /// Largest frame delta fed to the simulation
    pub const MAX_FRAME_DT_MS: f32 = 50.0;

    /// Viewport width used when the real one can't be measured
    pub const NOMINAL_VIEWPORT_WIDTH: f32 = 500.0;
    /// Viewport height used when the real one can't be measured
    pub const NOMINAL_VIEWPORT_HEIGHT: f32 = 400.0;

    /// Player sprite (square, px)
    pub const PLAYER_SIZE_PX: f32 = 40.0;
    /// Gap between the player's feet and the viewport bottom
    pub const PLAYER_BOTTOM_OFFSET_PX: f32 = 40.0;
    /// Player starts each attempt centered
    pub const PLAYER_START_X: f32 = 50.0;
    /// Horizontal move per key press (percent of viewport width)
    pub const MOVE_STEP_PERCENT: f32 = 4.0;
    /// Continuous movement speed in hold mode (percent per ms)
    pub const HOLD_SPEED_PERCENT_PER_MS: f32 = 0.06;

    /// Rock sprite (square, px)
    pub const OBSTACLE_SIZE_PX: f32 = 50.0;
    /// Fall speed (percent of viewport height per ms)
    pub const OBSTACLE_SPEED_PERCENT_PER_MS: f32 = 0.11;
    /// Rocks appear just above the visible area
    pub const OBSTACLE_SPAWN_Y: f32 = -5.0;

    /// Decorative wall on both sides of the map
    pub const MAP_BORDER_PX: f32 = 60.0;
    /// Background scroll speed (px per ms)
    pub const BACKGROUND_SPEED_PX_PER_MS: f32 = 0.05;

    /// Each hitbox edge moves inward by this fraction of the sprite size
    pub const HITBOX_SHRINK: f32 = 0.1;

    /// Shortest spawn delay at the start of a match, before scaling
    ///
    /// The delay bounds ramp as `(base - drop * progress) * scale`.
    pub const SPAWN_MIN_BASE_MS: f32 = 800.0;
    /// How much the shortest delay shrinks by the end of a match
    pub const SPAWN_MIN_DROP_MS: f32 = 700.0;
    /// Longest spawn delay at the start of a match, before scaling
    pub const SPAWN_MAX_BASE_MS: f32 = 1500.0;
    /// How much the longest delay shrinks by the end of a match
    pub const SPAWN_MAX_DROP_MS: f32 = 1400.0;
    /// Applied to both delay bounds
    pub const SPAWN_DELAY_SCALE: f32 = 0.8;
}

/// Convert a percentage of `extent` to pixels
#[inline]
pub fn percent_to_px(percent: f32, extent: f32) -> f32 {
    percent / 100.0 * extent
}

/// Convert pixels to a percentage of `extent`
#[inline]
pub fn px_to_percent(px: f32, extent: f32) -> f32 {
    px / extent * 100.0
}
