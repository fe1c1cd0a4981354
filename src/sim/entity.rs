//! Player and pursuer bodies
//!
//! Both share one `Entity` shape; behaviour differences live in free
//! functions keyed on `EntityKind` (see `tick` and `pursuit`).

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Cardinal heading on the grid (screen coordinates, +y is down)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// Fixed enumeration order; pursuit tie-breaks follow it
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Unit grid step as (dcol, drow)
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
        }
    }

    pub fn to_vec2(self) -> Vec2 {
        let (dx, dy) = self.offset();
        Vec2::new(dx as f32, dy as f32)
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Pursuer,
}

/// A moving circle on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub kind: EntityKind,
    pub pos: Vec2,
    /// Pixels per tick
    pub vel: Vec2,
    pub radius: f32,
    /// Pursuer: last committed direction (its only AI memory).
    /// Player: last direction the buffered intent was applied in.
    pub heading: Direction,
    /// Where the entity returns after a life is lost
    pub spawn: Vec2,
}

impl Entity {
    pub fn new(kind: EntityKind, spawn: Vec2, radius: f32) -> Self {
        Self {
            kind,
            pos: spawn,
            vel: Vec2::ZERO,
            radius,
            heading: Direction::Up,
            spawn,
        }
    }

    /// One explicit Euler step. Velocity is already per tick, and callers
    /// are responsible for gating it against walls first.
    #[inline]
    pub fn advance(&mut self) {
        self.pos += self.vel;
    }

    pub fn stop(&mut self) {
        self.vel = Vec2::ZERO;
    }

    /// Back to spawn at rest. Heading is kept.
    pub fn respawn(&mut self) {
        self.pos = self.spawn;
        self.vel = Vec2::ZERO;
    }
}
