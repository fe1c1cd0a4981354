//! Session driver
//!
//! Owns the game state plus the injected store, and turns wall-clock frame
//! deltas into fixed simulation ticks. Hosts (the browser shell, the native
//! demo, tests) talk to the game only through this type.

use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::highscores::HighScore;
use crate::persistence::KeyValueStore;
use crate::sim::{Direction, GameEvent, GameState, Maze, TickInput, tick};
use crate::tuning::{Difficulty, Tuning};

/// Longest frame delta accepted before clamping (tab switches, debugger stops)
const MAX_FRAME_DT: f32 = 0.1;

pub struct Session<S: KeyValueStore> {
    state: GameState,
    store: S,
    accumulator: f32,
    input: TickInput,
}

impl<S: KeyValueStore> Session<S> {
    /// Session on the stock maze
    pub fn new(store: S) -> Self {
        Self::with_maze(Maze::default(), store)
    }

    /// Tuning and high score come from the store; the game opens on the menu
    pub fn with_maze(maze: Maze, store: S) -> Self {
        let tuning = Tuning::load(&store);
        let high_score = HighScore::load(&store);
        Self {
            state: GameState::new(maze, tuning, high_score),
            store,
            accumulator: 0.0,
            input: TickInput::default(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn start(&mut self, difficulty: Difficulty) -> bool {
        let started = self.state.start(difficulty);
        if started {
            self.accumulator = 0.0;
            self.input = TickInput::default();
        }
        started
    }

    /// Back to the menu, picking up any high score written elsewhere
    pub fn return_to_menu(&mut self) -> bool {
        if !self.state.return_to_menu() {
            return false;
        }
        self.state.high_score = HighScore::load(&self.store);
        true
    }

    /// Queue a direction for the next tick (last write wins)
    pub fn push_intent(&mut self, dir: Direction) {
        self.input.intent = Some(dir);
    }

    /// Run exactly one tick and return everything it emitted
    pub fn step(&mut self) -> Vec<GameEvent> {
        self.run_tick();
        self.drain_events()
    }

    /// Feed a frame delta (seconds); runs as many ticks as have accrued
    pub fn advance(&mut self, dt: f32) -> Vec<GameEvent> {
        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.run_tick();
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS && self.accumulator >= SIM_DT {
            log::debug!("Dropping {:.3}s of simulation backlog", self.accumulator);
            self.accumulator = 0.0;
        }

        self.drain_events()
    }

    /// Events queued outside a tick (start, menu) plus anything pending
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        let events = self.state.drain_events();
        if events
            .iter()
            .any(|e| matches!(e, GameEvent::HighScoreBeaten(_)))
        {
            self.state.high_score.save(&mut self.store);
        }
        events
    }

    fn run_tick(&mut self) {
        let input = std::mem::take(&mut self.input);
        tick(&mut self.state, &input);
    }
}
