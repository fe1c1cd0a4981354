//! Platform input mapping
//!
//! Turns raw browser input (key names, touch coordinates) into grid
//! directions. Kept free of web-sys types so it runs in native tests.

use crate::sim::Direction;

/// Map a `KeyboardEvent.key` value to a direction
pub fn direction_for_key(key: &str) -> Option<Direction> {
    match key {
        "ArrowUp" | "w" | "W" => Some(Direction::Up),
        "ArrowDown" | "s" | "S" => Some(Direction::Down),
        "ArrowLeft" | "a" | "A" => Some(Direction::Left),
        "ArrowRight" | "d" | "D" => Some(Direction::Right),
        _ => None,
    }
}

/// Direction of a swipe from its total travel (screen coordinates)
///
/// Short swipes are ignored; otherwise the dominant axis wins and an exact
/// diagonal counts as vertical.
pub fn swipe_direction(dx: f32, dy: f32, threshold: f32) -> Option<Direction> {
    if dx.abs().max(dy.abs()) < threshold {
        return None;
    }
    if dx.abs() > dy.abs() {
        Some(if dx > 0.0 { Direction::Right } else { Direction::Left })
    } else {
        Some(if dy > 0.0 { Direction::Down } else { Direction::Up })
    }
}

/// Remembers where a touch began until it ends
#[derive(Debug, Clone, Copy)]
pub struct SwipeTracker {
    threshold: f32,
    origin: Option<(f32, f32)>,
}

impl SwipeTracker {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            origin: None,
        }
    }

    pub fn begin(&mut self, x: f32, y: f32) {
        self.origin = Some((x, y));
    }

    /// Finish the gesture. A touch end without a start yields nothing.
    pub fn end(&mut self, x: f32, y: f32) -> Option<Direction> {
        let (ox, oy) = self.origin.take()?;
        swipe_direction(x - ox, y - oy, self.threshold)
    }
}
