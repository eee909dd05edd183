//! Match state machine
//!
//! A [`Session`] is the single authoritative owner of everything that the
//! frame clock, the countdown and the spawner mutate. Hosts feed it
//! timestamps and key events; every timer callback reads the live state when
//! it fires and drops itself if the match it was scheduled for is gone.
//!
//! Hosts with real threads should put the session behind one `Mutex` and
//! route every callback through it.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::sim::{
    Direction, FiredTimer, FrameClock, GameEvent, GameState, InputTracker, MatchOutcome,
    MatchPhase, Obstacle, Player, RockKind, TickInput, TimerHandle, TimerKind, TimerQueue, Viewport,
    next_spawn_delay, spawn_obstacle, tick,
};
use crate::tuning::Tuning;

/// What the start/end overlay should show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OverlayStatus {
    /// Before the first attempt
    Title,
    /// No overlay
    Running,
    Won,
    Lost,
    /// Lost the last attempt; start is disabled
    OutOfAttempts,
}

/// Read-only view for the presentation layer
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub phase: MatchPhase,
    pub overlay: OverlayStatus,
    pub score: u32,
    pub time_left: u32,
    pub attempts_left: u32,
    pub best_score: u32,
    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub background_offset: f32,
    pub last_outcome: Option<MatchOutcome>,
}

/// One play session: a fixed attempt budget and the match currently in play
pub struct Session {
    tuning: Tuning,
    state: GameState,
    clock: FrameClock,
    timers: TimerQueue,
    countdown: Option<TimerHandle>,
    spawner: Option<TimerHandle>,
    input: InputTracker,
    rng: Pcg32,
    attempts_started: u32,
}

impl Session {
    pub fn new(tuning: Tuning) -> Self {
        let tuning = tuning.sanitized();
        Self {
            state: GameState::new(tuning.seed, tuning.game_duration_secs, tuning.attempts),
            clock: FrameClock::new(tuning.max_frame_dt_ms),
            timers: TimerQueue::new(),
            countdown: None,
            spawner: None,
            input: InputTracker::new(),
            rng: Pcg32::seed_from_u64(tuning.seed),
            attempts_started: 0,
            tuning,
        }
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Place a rock at an explicit position (scripted openings, tutorials)
    pub fn stage_obstacle(&mut self, x: f32, y: f32, kind: RockKind) -> u32 {
        self.state.spawn_obstacle_at(x, y, kind)
    }

    pub fn phase(&self) -> MatchPhase {
        self.state.round.phase
    }

    /// Begin an attempt at `now_ms`
    ///
    /// Ignored (returns false) when no attempts remain or a match is already
    /// running. The first rock spawns immediately; the countdown fires one
    /// period later.
    pub fn start(&mut self, now_ms: f64) -> bool {
        if !self.state.round.can_start() {
            log::info!(
                "Start ignored (phase {:?}, {} attempts left)",
                self.state.round.phase,
                self.state.round.attempts_left
            );
            self.state.events.push(GameEvent::StartRejected);
            return false;
        }

        self.state.reset_attempt(self.tuning.game_duration_secs);
        self.state.round.phase = MatchPhase::Running;
        self.input.reset();

        self.timers.cancel_all();
        self.countdown = Some(
            self.timers
                .schedule(now_ms + self.tuning.timer_period_ms, TimerKind::Countdown),
        );
        self.spawner = Some(self.timers.schedule(now_ms, TimerKind::Spawn));
        self.clock.start(now_ms);

        self.attempts_started += 1;
        self.state.events.push(GameEvent::MatchStarted {
            attempt: self.attempts_started,
        });
        log::info!(
            "Attempt {} started ({} left)",
            self.attempts_started,
            self.state.round.attempts_left
        );
        true
    }

    /// Start another attempt after a finished one
    pub fn restart(&mut self, now_ms: f64) -> bool {
        self.start(now_ms)
    }

    pub fn key_down(&mut self, dir: Direction, viewport: &Viewport) {
        if !self.state.round.is_running() {
            return;
        }
        self.input
            .key_down(dir, &mut self.state.player, viewport, &self.tuning);
    }

    pub fn key_up(&mut self, dir: Direction) {
        if !self.state.round.is_running() {
            return;
        }
        self.input.key_up(dir, &mut self.state.player);
    }

    /// Display-frame callback: run timers due by `now_ms`, then one simulation step
    pub fn frame(&mut self, now_ms: f64, viewport: &Viewport) {
        self.fire_due_timers(now_ms, viewport);
        if let Some(dt) = self.clock.tick(now_ms) {
            self.step(dt, viewport);
        }
    }

    /// Advance the playfield by `dt_ms` and end the attempt on a hit
    pub fn step(&mut self, dt_ms: f32, viewport: &Viewport) -> Option<MatchOutcome> {
        if !self.state.round.is_running() {
            return None;
        }
        let input = TickInput {
            held: self.input.held(),
        };
        let obstacle_id = tick::step(&mut self.state, &input, dt_ms, viewport, &self.tuning)?;

        log::warn!("Collision with rock {obstacle_id}");
        self.state.events.push(GameEvent::Collision { obstacle_id });
        let score = self.state.round.score;
        Some(self.end(false, score))
    }

    /// Fire every timer due at or before `now_ms`, in due order
    pub fn fire_due_timers(&mut self, now_ms: f64, viewport: &Viewport) {
        while let Some(fired) = self.timers.pop_due(now_ms) {
            match fired.kind {
                TimerKind::Countdown => self.on_countdown(fired),
                TimerKind::Spawn => self.on_spawn(fired, now_ms, viewport),
            }
        }
    }

    /// When the next timer will fire, if any
    pub fn next_timer_due(&self) -> Option<f64> {
        self.timers.next_due()
    }

    fn is_live(&self, fired: &FiredTimer, current: Option<TimerHandle>) -> bool {
        let live = self.state.round.is_running() && current == Some(fired.handle);
        if !live {
            log::debug!("Dropping stale {:?} timer", fired.kind);
        }
        live
    }

    fn on_countdown(&mut self, fired: FiredTimer) {
        if !self.is_live(&fired, self.countdown) {
            return;
        }
        let round = &mut self.state.round;
        if round.time_left <= 1 {
            round.time_left = 0;
            // The final second's point hasn't been added yet
            let final_score = round.score + 1;
            self.end(true, final_score);
            return;
        }
        round.score += 1;
        round.time_left -= 1;
        self.countdown = Some(self.timers.schedule(
            fired.due_ms + self.tuning.timer_period_ms,
            TimerKind::Countdown,
        ));
    }

    fn on_spawn(&mut self, fired: FiredTimer, now_ms: f64, viewport: &Viewport) {
        if !self.is_live(&fired, self.spawner) {
            return;
        }
        spawn_obstacle(&mut self.state, viewport, &self.tuning, &mut self.rng);

        let progress = self.tuning.progress(self.state.round.time_left);
        let delay = next_spawn_delay(progress, &self.tuning, &mut self.rng);
        // Measured from when the spawn actually ran, so a stall yields one late rock
        self.spawner = Some(self.timers.schedule(now_ms + delay as f64, TimerKind::Spawn));
    }

    fn end(&mut self, survived: bool, final_score: u32) -> MatchOutcome {
        let round = &mut self.state.round;
        round.best_score = round.best_score.max(final_score);
        if survived {
            round.score = round.score.max(final_score);
        } else {
            round.attempts_left = round.attempts_left.saturating_sub(1);
        }
        round.phase = MatchPhase::Over;
        let outcome = MatchOutcome {
            survived,
            final_score,
        };
        round.last_outcome = Some(outcome);

        self.clock.stop();
        self.timers.cancel_all();
        self.countdown = None;
        self.spawner = None;
        self.input.reset();
        self.state.player.moving = false;

        self.state.events.push(GameEvent::MatchFinished {
            survived,
            final_score,
        });
        log::info!(
            "Attempt over: {} with score {} (best {}, {} attempts left)",
            if survived { "survived" } else { "crushed" },
            final_score,
            self.state.round.best_score,
            self.state.round.attempts_left
        );
        outcome
    }

    pub fn overlay(&self) -> OverlayStatus {
        let round = &self.state.round;
        match round.phase {
            MatchPhase::Idle => OverlayStatus::Title,
            MatchPhase::Running => OverlayStatus::Running,
            MatchPhase::Over if round.attempts_left == 0 => OverlayStatus::OutOfAttempts,
            MatchPhase::Over => match round.last_outcome {
                Some(MatchOutcome { survived: true, .. }) => OverlayStatus::Won,
                _ => OverlayStatus::Lost,
            },
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        let round = &self.state.round;
        Snapshot {
            phase: round.phase,
            overlay: self.overlay(),
            score: round.score,
            time_left: round.time_left,
            attempts_left: round.attempts_left,
            best_score: round.best_score,
            player: self.state.player.clone(),
            obstacles: self.state.obstacles.clone(),
            background_offset: self.state.background_offset,
            last_outcome: round.last_outcome,
        }
    }

    /// Take pending notifications (match finished, spawns, collisions)
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.state.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VP: Viewport = Viewport::NOMINAL;

    fn session() -> Session {
        Session::new(Tuning::default())
    }

    #[test]
    fn test_start_resets_and_runs() {
        let mut s = session();
        assert_eq!(s.phase(), MatchPhase::Idle);
        assert_eq!(s.overlay(), OverlayStatus::Title);

        assert!(s.start(0.0));
        assert_eq!(s.phase(), MatchPhase::Running);
        assert_eq!(s.state().round.time_left, 60);
        assert_eq!(s.state().player.x, 50.0);
        assert_eq!(s.drain_events(), vec![GameEvent::MatchStarted { attempt: 1 }]);
        // First rock is due right away
        assert_eq!(s.next_timer_due(), Some(0.0));
    }

    #[test]
    fn test_start_while_running_is_ignored() {
        let mut s = session();
        s.start(0.0);
        s.fire_due_timers(5000.0, &VP);
        let score = s.state().round.score;
        assert!(!s.start(5000.0));
        assert_eq!(s.state().round.score, score);
        assert_eq!(s.phase(), MatchPhase::Running);
    }

    #[test]
    fn test_countdown_scores_once_per_second() {
        let mut s = session();
        s.start(0.0);
        s.fire_due_timers(999.0, &VP);
        assert_eq!(s.state().round.score, 0);
        s.fire_due_timers(1000.0, &VP);
        assert_eq!(s.state().round.score, 1);
        assert_eq!(s.state().round.time_left, 59);
        s.fire_due_timers(3500.0, &VP);
        assert_eq!(s.state().round.score, 3);
        assert_eq!(s.state().round.time_left, 57);
    }

    #[test]
    fn test_spawner_reschedules_itself() {
        let mut s = session();
        s.start(0.0);
        s.fire_due_timers(0.0, &VP);
        assert_eq!(s.state().obstacles.len(), 1);
        // Next spawn lands inside the opening window
        let due = s.next_timer_due().expect("spawner pending");
        assert!((640.0..=1200.0).contains(&due), "due={due}");
    }

    #[test]
    fn test_stalled_frame_spawns_at_most_one_rock() {
        let mut s = session();
        s.start(0.0);
        s.frame(0.0, &VP);
        assert_eq!(s.state().obstacles.len(), 1);
        s.drain_events();

        // Five seconds without a frame
        s.frame(5000.0, &VP);
        let spawned = s
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::ObstacleSpawned { .. }))
            .count();
        assert_eq!(spawned, 1);
        assert_eq!(s.state().obstacles.len(), 2);

        // The countdown still tracks wall-clock seconds
        assert_eq!(s.state().round.score, 5);
        assert_eq!(s.state().round.time_left, 55);

        // The next spawn is measured from the late one
        let spawn_due = s
            .timers
            .pending_due(TimerKind::Spawn)
            .expect("spawner pending");
        assert!(spawn_due > 5000.0, "due={spawn_due}");
    }

    #[test]
    fn test_keys_ignored_when_not_running() {
        let mut s = session();
        s.key_down(Direction::Left, &VP);
        assert_eq!(s.state().player.x, 50.0);
        assert!(!s.state().player.moving);

        s.start(0.0);
        s.key_down(Direction::Left, &VP);
        assert!((s.state().player.x - 46.0).abs() < 1e-4);
        s.key_up(Direction::Left);
        assert!(!s.state().player.moving);
    }

    #[test]
    fn test_collision_ends_attempt_and_stops_everything() {
        let mut s = session();
        s.start(0.0);
        s.fire_due_timers(2000.0, &VP);
        s.state.obstacles.clear();
        s.stage_obstacle(46.0, 80.0, RockKind::Granite);

        let outcome = s.step(16.0, &VP).expect("hit");
        assert_eq!(
            outcome,
            MatchOutcome {
                survived: false,
                final_score: 2
            }
        );
        assert_eq!(s.phase(), MatchPhase::Over);
        assert_eq!(s.state().round.attempts_left, 2);
        assert_eq!(s.state().round.best_score, 2);
        assert_eq!(s.overlay(), OverlayStatus::Lost);
        assert_eq!(s.next_timer_due(), None);

        // Late frames and timers change nothing
        let before = s.snapshot();
        s.frame(10_000.0, &VP);
        s.fire_due_timers(100_000.0, &VP);
        let after = s.snapshot();
        assert_eq!(before.score, after.score);
        assert_eq!(before.obstacles, after.obstacles);
        assert_eq!(before.background_offset, after.background_offset);
    }

    #[test]
    fn test_frame_uses_clamped_delta() {
        let mut s = session();
        s.start(0.0);
        s.fire_due_timers(0.0, &VP);
        let y0 = s.state().obstacles[0].y;
        // A 900ms gap (backgrounded tab) still only advances 50ms of motion
        s.clock_tick_only(900.0, &VP);
        let y1 = s.state().obstacles[0].y;
        assert!((y1 - y0 - 50.0 * 0.11).abs() < 1e-4);
    }

    #[test]
    fn test_events_include_match_finished() {
        let mut s = session();
        s.start(0.0);
        s.stage_obstacle(46.0, 80.0, RockKind::Slate);
        s.step(1.0, &VP);
        let events = s.drain_events();
        assert!(events.contains(&GameEvent::MatchFinished {
            survived: false,
            final_score: 0
        }));
        assert!(s.drain_events().is_empty());
    }

    impl Session {
        /// Frame without firing timers, so the spawner can't add rocks
        fn clock_tick_only(&mut self, now_ms: f64, viewport: &Viewport) {
            if let Some(dt) = self.clock.tick(now_ms) {
                self.step(dt, viewport);
            }
        }
    }
}
