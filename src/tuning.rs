//! Game balance and configuration
//!
//! Every gameplay number lives here so a session can be re-tuned from a JSON
//! file without recompiling. Missing fields fall back to [`crate::consts`].

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// How directional keys move the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementMode {
    /// One fixed step per key press event (the OS key-repeat keeps the player moving)
    #[default]
    Press,
    /// Continuous motion at `hold_speed` while a key is held, applied every frame
    Hold,
}

/// Data-driven game balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Match length in seconds
    pub game_duration_secs: u32,
    /// Attempts available for the whole session
    pub attempts: u32,
    /// Countdown period in ms
    pub timer_period_ms: f64,
    /// Frame delta clamp in ms
    pub max_frame_dt_ms: f32,

    pub player_size_px: f32,
    pub player_bottom_offset_px: f32,
    pub move_step_percent: f32,
    pub hold_speed_percent_per_ms: f32,
    pub movement: MovementMode,

    pub obstacle_size_px: f32,
    pub obstacle_speed_percent_per_ms: f32,
    pub obstacle_spawn_y: f32,

    pub map_border_px: f32,
    pub background_speed_px_per_ms: f32,
    pub hitbox_shrink: f32,

    pub spawn_min_base_ms: f32,
    pub spawn_min_drop_ms: f32,
    pub spawn_max_base_ms: f32,
    pub spawn_max_drop_ms: f32,
    pub spawn_delay_scale: f32,

    /// RNG seed (spawn positions, variants and delays)
    pub seed: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            game_duration_secs: GAME_DURATION_SECS,
            attempts: ATTEMPT_BUDGET,
            timer_period_ms: TIMER_PERIOD_MS,
            max_frame_dt_ms: MAX_FRAME_DT_MS,

            player_size_px: PLAYER_SIZE_PX,
            player_bottom_offset_px: PLAYER_BOTTOM_OFFSET_PX,
            move_step_percent: MOVE_STEP_PERCENT,
            hold_speed_percent_per_ms: HOLD_SPEED_PERCENT_PER_MS,
            movement: MovementMode::Press,

            obstacle_size_px: OBSTACLE_SIZE_PX,
            obstacle_speed_percent_per_ms: OBSTACLE_SPEED_PERCENT_PER_MS,
            obstacle_spawn_y: OBSTACLE_SPAWN_Y,

            map_border_px: MAP_BORDER_PX,
            background_speed_px_per_ms: BACKGROUND_SPEED_PX_PER_MS,
            hitbox_shrink: HITBOX_SHRINK,

            spawn_min_base_ms: SPAWN_MIN_BASE_MS,
            spawn_min_drop_ms: SPAWN_MIN_DROP_MS,
            spawn_max_base_ms: SPAWN_MAX_BASE_MS,
            spawn_max_drop_ms: SPAWN_MAX_DROP_MS,
            spawn_delay_scale: SPAWN_DELAY_SCALE,

            seed: 0,
        }
    }
}

/// Failure to read a tuning file
#[derive(Debug)]
pub enum TuningError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Io(e) => write!(f, "failed to read tuning file: {e}"),
            TuningError::Parse(e) => write!(f, "invalid tuning JSON: {e}"),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::Io(e) => Some(e),
            TuningError::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for TuningError {
    fn from(e: std::io::Error) -> Self {
        TuningError::Io(e)
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(e: serde_json::Error) -> Self {
        TuningError::Parse(e)
    }
}

impl Tuning {
    /// Parse tuning from JSON (missing fields use defaults)
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Tuning = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    /// Read tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Read tuning from a JSON file, falling back to defaults on any failure
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::warn!("{e}; using default tuning");
                Self::default()
            }
        }
    }

    /// Replace nonsensical values (non-finite, negative, zero sizes) with defaults
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        fn fix(value: &mut f32, default: f32, allow_zero: bool) {
            let bad = !value.is_finite() || *value < 0.0 || (!allow_zero && *value == 0.0);
            if bad {
                *value = default;
            }
        }

        fix(&mut self.max_frame_dt_ms, defaults.max_frame_dt_ms, false);
        fix(&mut self.player_size_px, defaults.player_size_px, false);
        fix(&mut self.player_bottom_offset_px, defaults.player_bottom_offset_px, true);
        fix(&mut self.move_step_percent, defaults.move_step_percent, true);
        fix(&mut self.hold_speed_percent_per_ms, defaults.hold_speed_percent_per_ms, true);
        fix(&mut self.obstacle_size_px, defaults.obstacle_size_px, false);
        fix(&mut self.obstacle_speed_percent_per_ms, defaults.obstacle_speed_percent_per_ms, true);
        fix(&mut self.map_border_px, defaults.map_border_px, true);
        fix(&mut self.background_speed_px_per_ms, defaults.background_speed_px_per_ms, true);
        fix(&mut self.spawn_min_base_ms, defaults.spawn_min_base_ms, false);
        fix(&mut self.spawn_min_drop_ms, defaults.spawn_min_drop_ms, true);
        fix(&mut self.spawn_max_base_ms, defaults.spawn_max_base_ms, false);
        fix(&mut self.spawn_max_drop_ms, defaults.spawn_max_drop_ms, true);
        fix(&mut self.spawn_delay_scale, defaults.spawn_delay_scale, false);

        if !self.obstacle_spawn_y.is_finite() {
            self.obstacle_spawn_y = defaults.obstacle_spawn_y;
        }
        // Shrinking by half or more on each edge would leave an empty box
        if !self.hitbox_shrink.is_finite() || !(0.0..0.5).contains(&self.hitbox_shrink) {
            self.hitbox_shrink = defaults.hitbox_shrink;
        }
        if !self.timer_period_ms.is_finite() || self.timer_period_ms <= 0.0 {
            self.timer_period_ms = defaults.timer_period_ms;
        }
        if self.game_duration_secs == 0 {
            self.game_duration_secs = defaults.game_duration_secs;
        }
        self
    }

    /// Match length in ms
    pub fn game_duration_ms(&self) -> f64 {
        self.game_duration_secs as f64 * self.timer_period_ms
    }

    /// Fraction of the match elapsed, in [0, 1]
    pub fn progress(&self, time_left_secs: u32) -> f32 {
        let total = self.game_duration_secs.max(1) as f32;
        (1.0 - time_left_secs as f32 / total).clamp(0.0, 1.0)
    }
}
