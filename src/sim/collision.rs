//! Collision detection for circles against tiles
//!
//! Walls are axis-aligned tile squares. Entities are circles drawn inset
//! within their tile, so the wall test pads each rectangle to make the
//! effective boundary match the visible footprint rather than the full tile.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Padding applied to every side of a wall for a circle of `radius`
#[inline]
pub fn wall_padding(radius: f32, tile_size: f32) -> f32 {
    tile_size / 2.0 - radius - 1.0
}

/// Check a circle against a wall rectangle
///
/// The circle is tested where it will be after one step of `vel`, so passing
/// a candidate velocity answers "would this move enter the wall". Pass
/// `Vec2::ZERO` for a plain overlap test.
pub fn circle_hits_rect(pos: Vec2, radius: f32, vel: Vec2, rect: &Rect, tile_size: f32) -> bool {
    let padding = wall_padding(radius, tile_size);
    let next = pos + vel;

    next.y - radius <= rect.bottom() + padding
        && next.x + radius >= rect.x - padding
        && next.y + radius >= rect.y - padding
        && next.x - radius <= rect.right() + padding
}

/// True if the circle (after `vel`) touches any wall
pub fn hits_any_wall(pos: Vec2, radius: f32, vel: Vec2, walls: &[Rect], tile_size: f32) -> bool {
    walls
        .iter()
        .any(|wall| circle_hits_rect(pos, radius, vel, wall, tile_size))
}

/// Proximity test used for pickups and pursuer contact
#[inline]
pub fn circles_touch(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    a.distance(b) < a_radius + b_radius
}
