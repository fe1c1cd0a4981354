//! Game state and core simulation types
//!
//! Everything a session mutates lives in `GameState`; the host owns it and
//! hands it to `tick` once per fixed step.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::entity::{Direction, Entity, EntityKind};
use super::maze::Maze;
use crate::highscores::HighScore;
use crate::tile_center;
use crate::tuning::{Difficulty, Tuning};

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Start menu, no session running
    Menu,
    /// Active gameplay
    Playing,
    /// Frozen after a life was lost, waiting for the respawn timer
    Paused,
    /// Session ended; only `return_to_menu` leaves this
    Over,
}

/// How a finished session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Loss,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    Dot,
    Power,
}

/// A consumable on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pickup {
    pub kind: PickupKind,
    pub pos: Vec2,
    pub radius: f32,
    pub value: u64,
}

impl Pickup {
    pub fn new(kind: PickupKind, pos: Vec2, tuning: &Tuning) -> Self {
        let (radius, value) = match kind {
            PickupKind::Dot => (tuning.dot_radius, tuning.dot_value),
            PickupKind::Power => (tuning.power_radius, tuning.power_value),
        };
        Self {
            kind,
            pos,
            radius,
            value,
        }
    }
}

/// Notifications for the display layer, drained by the host after each tick
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    SessionStarted { difficulty: Difficulty },
    PickupConsumed { kind: PickupKind, pos: Vec2 },
    ScoreChanged(u64),
    LivesChanged(u8),
    PhaseChanged(GamePhase),
    HighScoreBeaten(u64),
    SessionEnded {
        outcome: Outcome,
        score: u64,
        high_score: u64,
    },
}

/// Complete session state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub tuning: Tuning,
    pub maze: Maze,
    /// Wall rectangles derived from the maze
    pub walls: Vec<Rect>,
    /// Remaining pickups; only ever shrinks within a session
    pub pickups: Vec<Pickup>,
    pub player: Entity,
    pub pursuer: Entity,
    pub difficulty: Difficulty,
    /// Pixels per tick for the current difficulty
    pub pursuer_speed: f32,
    pub score: u64,
    pub lives: u8,
    pub phase: GamePhase,
    /// Set once the phase reaches Over
    pub outcome: Option<Outcome>,
    pub high_score: HighScore,
    /// Last requested player direction, reapplied each tick until it fits
    pub intent: Option<Direction>,
    /// Ticks until the post-death respawn (Paused only)
    pub reset_ticks: u32,
    /// Simulation tick counter (Playing ticks only)
    pub time_ticks: u64,
    #[serde(skip)]
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a state sitting on the menu
    pub fn new(maze: Maze, tuning: Tuning, high_score: HighScore) -> Self {
        let tile = tuning.tile_size;
        let (pc, pr) = maze.player_spawn();
        let (gc, gr) = maze.pursuer_spawn();
        let player = Entity::new(
            EntityKind::Player,
            tile_center(pc, pr, tile),
            tuning.entity_radius,
        );
        let pursuer = Entity::new(
            EntityKind::Pursuer,
            tile_center(gc, gr, tile),
            tuning.entity_radius,
        );

        Self {
            walls: maze.walls(tile),
            pickups: maze.pickups(&tuning),
            player,
            pursuer,
            difficulty: Difficulty::default(),
            pursuer_speed: tuning.pursuer_speed(Difficulty::default()),
            score: 0,
            lives: tuning.start_lives,
            phase: GamePhase::Menu,
            outcome: None,
            high_score,
            intent: None,
            reset_ticks: 0,
            time_ticks: 0,
            events: Vec::new(),
            tuning,
            maze,
        }
    }

    /// Begin a fresh session. Legal only from Menu; returns false otherwise.
    pub fn start(&mut self, difficulty: Difficulty) -> bool {
        if self.phase != GamePhase::Menu {
            log::debug!("Ignoring start while {:?}", self.phase);
            return false;
        }

        let tile = self.tuning.tile_size;
        self.walls = self.maze.walls(tile);
        self.pickups = self.maze.pickups(&self.tuning);
        self.player.respawn();
        self.player.heading = Direction::Up;
        self.pursuer.respawn();
        self.pursuer.heading = Direction::Up;
        self.difficulty = difficulty;
        self.pursuer_speed = self.tuning.pursuer_speed(difficulty);
        self.score = 0;
        self.lives = self.tuning.start_lives;
        self.outcome = None;
        self.intent = None;
        self.reset_ticks = 0;
        self.time_ticks = 0;
        self.phase = GamePhase::Playing;

        log::info!(
            "Session started ({}, {} pickups)",
            difficulty.as_str(),
            self.pickups.len()
        );
        self.push_event(GameEvent::SessionStarted { difficulty });
        self.push_event(GameEvent::ScoreChanged(0));
        self.push_event(GameEvent::LivesChanged(self.lives));
        self.push_event(GameEvent::PhaseChanged(GamePhase::Playing));
        true
    }

    /// Leave the end screen. Legal only from Over.
    pub fn return_to_menu(&mut self) -> bool {
        if self.phase != GamePhase::Over {
            log::debug!("Ignoring return to menu while {:?}", self.phase);
            return false;
        }
        self.phase = GamePhase::Menu;
        self.push_event(GameEvent::PhaseChanged(GamePhase::Menu));
        true
    }

    /// Buffer a direction (last write wins). Ignored outside a session.
    pub fn set_intent(&mut self, dir: Direction) {
        if matches!(self.phase, GamePhase::Playing | GamePhase::Paused) {
            self.intent = Some(dir);
        }
    }

    /// Total value of the pickups still on the board
    pub fn remaining_value(&self) -> u64 {
        self.pickups.iter().map(|p| p.value).sum()
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Put both entities back on their spawns and forget buffered input
    pub(crate) fn respawn_entities(&mut self) {
        self.player.respawn();
        self.pursuer.respawn();
        self.intent = None;
    }

    /// Finish the session, updating the in-memory high score
    pub(crate) fn end_session(&mut self, outcome: Outcome) {
        self.phase = GamePhase::Over;
        self.outcome = Some(outcome);
        self.reset_ticks = 0;
        self.player.stop();
        self.pursuer.stop();

        if self.high_score.submit(self.score) {
            log::info!("New high score: {}", self.score);
            self.push_event(GameEvent::HighScoreBeaten(self.score));
        }
        log::info!(
            "Session over: {:?}, score {} (best {})",
            outcome,
            self.score,
            self.high_score.best
        );
        self.push_event(GameEvent::PhaseChanged(GamePhase::Over));
        self.push_event(GameEvent::SessionEnded {
            outcome,
            score: self.score,
            high_score: self.high_score.best,
        });
    }
}
