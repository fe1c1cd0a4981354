//! Pixel Muncher - A tile-grid maze chase arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (maze, movement, pursuit AI, game state)
//! - `session`: Session driver tying the simulation to persistence
//! - `platform`: Browser input mapping (keys, swipes)
//! - `persistence`: Injected key-value storage
//! - `tuning`: Data-driven game balance

pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod session;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use highscores::HighScore;
pub use session::Session;
pub use tuning::{Difficulty, Tuning};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep, one tick per 60 Hz frame
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Simulation ticks per second
    pub const TICKS_PER_SECOND: f32 = 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Side of one grid cell in pixels
    pub const TILE_SIZE: f32 = 20.0;
    /// Base speed unit, pixels per tick
    pub const BASE_SPEED: f32 = 4.0;
    pub const PLAYER_SPEED: f32 = 0.8 * BASE_SPEED;
    /// Pursuer speed before the difficulty multiplier
    pub const PURSUER_BASE_SPEED: f32 = 0.75 * BASE_SPEED;

    /// Player and pursuer share one radius
    pub const ENTITY_RADIUS: f32 = TILE_SIZE / 2.5;
    pub const DOT_RADIUS: f32 = 3.0;
    pub const POWER_RADIUS: f32 = 8.0;

    pub const DOT_VALUE: u64 = 10;
    pub const POWER_VALUE: u64 = 50;

    pub const START_LIVES: u8 = 3;
    /// Pause after losing a life before entities respawn
    pub const RESET_DELAY_SECS: f32 = 1.5;

    /// Minimum swipe travel (pixels) to count as a direction
    pub const SWIPE_THRESHOLD: f32 = 30.0;
}

/// Center of grid cell (col, row) in world coordinates
#[inline]
pub fn tile_center(col: i32, row: i32, tile: f32) -> Vec2 {
    Vec2::new(
        col as f32 * tile + tile / 2.0,
        row as f32 * tile + tile / 2.0,
    )
}

/// Grid cell whose center is nearest to `pos`
#[inline]
pub fn tile_coords(pos: Vec2, tile: f32) -> (i32, i32) {
    let half = tile / 2.0;
    (
        ((pos.x - half) / tile).round() as i32,
        ((pos.y - half) / tile).round() as i32,
    )
}

/// Snap a position onto the nearest tile center
#[inline]
pub fn snap_to_tile_center(pos: Vec2, tile: f32) -> Vec2 {
    let (col, row) = tile_coords(pos, tile);
    tile_center(col, row, tile)
}

/// True when `pos` sits exactly on a tile center on both axes.
///
/// Exact float comparison is intended: pursuer positions only ever land on
/// centers through assignment, never through accumulated steps.
#[inline]
pub fn is_tile_centered(pos: Vec2, tile: f32) -> bool {
    let half = tile / 2.0;
    (pos.x - half).rem_euclid(tile) == 0.0 && (pos.y - half).rem_euclid(tile) == 0.0
}
