//! Game state and core simulation types
//!
//! Positions are percentages of the viewport so the state survives resizes;
//! pixel conversion happens only at collision time.

use serde::{Deserialize, Serialize};

use crate::consts::PLAYER_START_X;

/// Current phase of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Before the first start
    #[default]
    Idle,
    /// Active gameplay
    Running,
    /// Attempt finished (won or lost); restartable while attempts remain
    Over,
}

/// Which way the player sprite faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

/// Rock sprite variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RockKind {
    Granite,
    Basalt,
    Slate,
}

impl RockKind {
    /// Spawn catalog (picked uniformly)
    pub const ALL: [RockKind; 3] = [RockKind::Granite, RockKind::Basalt, RockKind::Slate];
}

/// A falling rock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Left edge, percent of viewport width
    pub x: f32,
    /// Top edge, percent of viewport height (negative above the viewport)
    pub y: f32,
    pub kind: RockKind,
}

/// The climber
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Sprite center, percent of viewport width
    pub x: f32,
    pub facing: Facing,
    /// Drives the walk animation only; never affects collisions
    pub moving: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            x: PLAYER_START_X,
            facing: Facing::Right,
            moving: false,
        }
    }
}

/// How an attempt ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub survived: bool,
    pub final_score: u32,
}

/// Score, countdown and attempt bookkeeping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
    pub phase: MatchPhase,
    /// Seconds survived this attempt
    pub score: u32,
    /// Seconds remaining this attempt
    pub time_left: u32,
    pub attempts_left: u32,
    /// Best final score across attempts this session
    pub best_score: u32,
    pub last_outcome: Option<MatchOutcome>,
}

impl MatchState {
    pub fn new(duration_secs: u32, attempts: u32) -> Self {
        Self {
            phase: MatchPhase::Idle,
            score: 0,
            time_left: duration_secs,
            attempts_left: attempts,
            best_score: 0,
            last_outcome: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == MatchPhase::Running
    }

    pub fn can_start(&self) -> bool {
        self.attempts_left > 0 && self.phase != MatchPhase::Running
    }
}

/// Notifications for the presentation layer, drained once per frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    MatchStarted { attempt: u32 },
    /// `start()` was ignored (no attempts left or already running)
    StartRejected,
    ObstacleSpawned { id: u32, x: f32, kind: RockKind },
    Collision { obstacle_id: u32 },
    MatchFinished { survived: bool, final_score: u32 },
}

/// Complete simulation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub seed: u64,
    pub round: MatchState,
    pub player: Player,
    /// Active rocks, in spawn order
    pub obstacles: Vec<Obstacle>,
    /// Background scroll in px (unbounded, wrapped by the renderer)
    pub background_offset: f32,
    /// Pending notifications
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    pub fn new(seed: u64, duration_secs: u32, attempts: u32) -> Self {
        Self {
            seed,
            round: MatchState::new(duration_secs, attempts),
            player: Player::default(),
            obstacles: Vec::new(),
            background_offset: 0.0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID (monotonic for the whole session)
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add a rock at an explicit position
    pub fn spawn_obstacle_at(&mut self, x: f32, y: f32, kind: RockKind) -> u32 {
        let id = self.next_entity_id();
        self.obstacles.push(Obstacle { id, x, y, kind });
        id
    }

    /// Clear the playfield for a fresh attempt (attempts and best score survive)
    pub fn reset_attempt(&mut self, duration_secs: u32) {
        self.round.score = 0;
        self.round.time_left = duration_secs;
        self.player = Player::default();
        self.obstacles.clear();
        self.background_offset = 0.0;
    }
}
