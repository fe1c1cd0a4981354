//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Stable iteration order (row-major tiles, fixed direction order)
//! - No rendering, storage or platform dependencies

pub mod collision;
pub mod entity;
pub mod maze;
pub mod pursuit;
pub mod state;
pub mod tick;

pub use collision::{Rect, circle_hits_rect, circles_touch, hits_any_wall};
pub use entity::{Direction, Entity, EntityKind};
pub use maze::{DEFAULT_LAYOUT, Maze, MazeError, Tile};
pub use pursuit::{Decision, choose_direction, legal_directions, update_pursuer};
pub use state::{GameEvent, GamePhase, GameState, Outcome, Pickup, PickupKind};
pub use tick::{TickInput, tick};
