//! Rock Climb headless runner
//!
//! Plays a session with a simple dodging autopilot on a virtual 60 Hz clock
//! and prints the final read model as JSON. Useful for balance checks:
//!
//! ```text
//! RUST_LOG=info rock-climb [tuning.json]
//! ```

use rock_climb::sim::{Direction, MatchPhase, Viewport, obstacle_hitbox, player_hitbox};
use rock_climb::{Session, Tuning};

/// ~60 Hz display refresh
const FRAME_MS: f64 = 1000.0 / 60.0;
/// Typical OS key-repeat interval
const KEY_REPEAT_MS: f64 = 33.0;
/// Pause between attempts (the "Try Again" click)
const RETRY_DELAY_MS: f64 = 1500.0;

fn main() {
    env_logger::init();

    let tuning = match std::env::args().nth(1) {
        Some(path) => Tuning::load_or_default(path),
        None => Tuning::default(),
    };
    log::info!(
        "Rock Climb (headless) starting: {}s matches, {} attempts, seed {}",
        tuning.game_duration_secs,
        tuning.attempts,
        tuning.seed
    );

    let viewport = Viewport::NOMINAL;
    let mut session = Session::new(tuning);
    let mut now = 0.0;

    while session.start(now) {
        let mut autopilot = Autopilot::default();
        while session.phase() == MatchPhase::Running {
            now += FRAME_MS;
            autopilot.drive(&mut session, now, &viewport);
            session.frame(now, &viewport);
        }

        for event in session.drain_events() {
            log::debug!("{event:?}");
        }
        let snap = session.snapshot();
        if snap.last_outcome.is_some_and(|o| o.survived) {
            break;
        }
        now += RETRY_DELAY_MS;
    }

    match serde_json::to_string_pretty(&session.snapshot()) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to serialize snapshot: {e}"),
    }
}

/// Dodges the most threatening rock by tapping the key away from it
#[derive(Default)]
struct Autopilot {
    held: Option<Direction>,
    last_press_ms: f64,
}

impl Autopilot {
    fn drive(&mut self, session: &mut Session, now: f64, viewport: &Viewport) {
        let wanted = self.choose(session, viewport);

        if self.held != wanted {
            if let Some(dir) = self.held.take() {
                session.key_up(dir);
            }
        }
        if let Some(dir) = wanted {
            // Initial press, then auto-repeat
            if self.held.is_none() || now - self.last_press_ms >= KEY_REPEAT_MS {
                session.key_down(dir, viewport);
                self.last_press_ms = now;
            }
            self.held = Some(dir);
        }
    }

    fn choose(&self, session: &Session, viewport: &Viewport) -> Option<Direction> {
        let state = session.state();
        let tuning = session.tuning();
        let player = player_hitbox(&state.player, viewport, tuning);
        // Look a little wider than the hitbox so dodges start early
        let margin = tuning.player_size_px * 0.5;

        let threat = state
            .obstacles
            .iter()
            .map(|rock| obstacle_hitbox(rock, viewport, tuning))
            .filter(|hb| hb.max.y > player.min.y - viewport.height * 0.45 && hb.min.y < player.max.y)
            .filter(|hb| hb.min.x < player.max.x + margin && hb.max.x > player.min.x - margin)
            .max_by(|a, b| a.max.y.partial_cmp(&b.max.y).unwrap_or(std::cmp::Ordering::Equal))?;

        let (lo, hi) = viewport.player_bounds(tuning);
        let player_center = (player.min.x + player.max.x) / 2.0;
        let rock_center = (threat.min.x + threat.max.x) / 2.0;
        let x = state.player.x;

        // Move away from the rock unless pinned against a wall
        let away = if player_center < rock_center { Direction::Left } else { Direction::Right };
        let pinned = match away {
            Direction::Left => x <= lo + 0.5,
            Direction::Right => x >= hi - 0.5,
        };
        if pinned {
            Some(match away {
                Direction::Left => Direction::Right,
                Direction::Right => Direction::Left,
            })
        } else {
            Some(away)
        }
    }
}
