//! Pursuer AI
//!
//! A greedy single-step chaser. The pursuer only reconsiders its heading when
//! it sits exactly on a tile center, so every turn happens at a grid
//! intersection. At that point:
//!
//! 1. Legal directions are those whose neighbouring tile is on the board and
//!    not a wall (restricted walls included).
//! 2. With more than one option, reversing is not allowed.
//! 3. The option whose one-tile step lands closest (Euclidean) to the player
//!    wins; ties go to the earlier entry of `Direction::ALL`.
//!
//! There is no lookahead, so the pursuer can be led around loops.

use glam::Vec2;

use super::collision::{Rect, hits_any_wall};
use super::entity::{Direction, Entity};
use super::maze::Maze;
use crate::{is_tile_centered, snap_to_tile_center, tile_coords};

/// What the controller did on a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Between tile centers, heading unchanged
    Coasting,
    /// Committed a heading at a tile center
    Turned(Direction),
    /// Boxed in on every side; holding position
    Stuck,
}

/// Directions out of (col, row) that lead onto a passable tile
pub fn legal_directions(maze: &Maze, col: i32, row: i32) -> Vec<Direction> {
    Direction::ALL
        .into_iter()
        .filter(|dir| {
            let (dx, dy) = dir.offset();
            maze.is_passable(col + dx, row + dy)
        })
        .collect()
}

/// Pick the next heading for a pursuer standing on a tile center
///
/// Returns `None` when no neighbouring tile is passable.
pub fn choose_direction(
    maze: &Maze,
    pos: Vec2,
    heading: Direction,
    target: Vec2,
    tile_size: f32,
) -> Option<Direction> {
    let (col, row) = tile_coords(pos, tile_size);
    let mut options = legal_directions(maze, col, row);

    // Reversal only at dead ends
    if options.len() > 1 {
        options.retain(|dir| *dir != heading.opposite());
    }

    let mut best: Option<(Direction, f32)> = None;
    for dir in options {
        let step = pos + dir.to_vec2() * tile_size;
        let distance = step.distance(target);
        // Strict comparison keeps the first of equal candidates
        if best.is_none_or(|(_, d)| distance < d) {
            best = Some((dir, distance));
        }
    }
    best.map(|(dir, _)| dir)
}

/// Advance the pursuer by one tick
///
/// Order matters: decide (only when centered), then the wall guard, then
/// the move.
pub fn update_pursuer(
    pursuer: &mut Entity,
    target: Vec2,
    maze: &Maze,
    walls: &[Rect],
    speed: f32,
    tile_size: f32,
) -> Decision {
    let mut decision = Decision::Coasting;

    if is_tile_centered(pursuer.pos, tile_size) {
        decision = match choose_direction(maze, pursuer.pos, pursuer.heading, target, tile_size) {
            Some(dir) => {
                pursuer.heading = dir;
                pursuer.vel = dir.to_vec2() * speed;
                Decision::Turned(dir)
            }
            None => {
                log::debug!("Pursuer boxed in at {:?}", tile_coords(pursuer.pos, tile_size));
                pursuer.stop();
                Decision::Stuck
            }
        };
    }

    // Corrects drift at corners: stop and re-center on the nearest tile
    if hits_any_wall(pursuer.pos, pursuer.radius, pursuer.vel, walls, tile_size) {
        pursuer.stop();
        pursuer.pos = snap_to_tile_center(pursuer.pos, tile_size);
    }

    step_pursuer(pursuer, tile_size);
    decision
}

/// Move along the current heading, ending exactly on the next tile center if
/// this step would otherwise carry the pursuer past it
fn step_pursuer(pursuer: &mut Entity, tile_size: f32) {
    if pursuer.vel == Vec2::ZERO {
        return;
    }

    let ahead = next_center_ahead(pursuer.pos, pursuer.vel, tile_size);
    if pursuer.pos.distance(ahead) <= pursuer.vel.length() {
        pursuer.pos = ahead;
    } else {
        pursuer.advance();
    }
}

/// First tile center strictly ahead of `pos` along `vel` (cardinal only)
fn next_center_ahead(pos: Vec2, vel: Vec2, tile_size: f32) -> Vec2 {
    Vec2::new(
        next_line(pos.x, vel.x, tile_size),
        next_line(pos.y, vel.y, tile_size),
    )
}

fn next_line(coord: f32, v: f32, tile_size: f32) -> f32 {
    let half = tile_size / 2.0;
    let t = (coord - half) / tile_size;
    let index = if v > 0.0 {
        t.floor() + 1.0
    } else if v < 0.0 {
        t.ceil() - 1.0
    } else {
        return coord;
    };
    index * tile_size + half
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{ENTITY_RADIUS, TILE_SIZE};
    use crate::sim::entity::EntityKind;
    use crate::tile_center;
    use proptest::prelude::*;

    fn maze(s: &str) -> Maze {
        s.parse().unwrap()
    }

    fn pursuer_at(maze: &Maze) -> Entity {
        let (col, row) = maze.pursuer_spawn();
        Entity::new(EntityKind::Pursuer, tile_center(col, row, TILE_SIZE), ENTITY_RADIUS)
    }

    #[test]
    fn test_moves_toward_player() {
        let m = maze("#######\n#P....#\n#.###.#\n#..G..#\n#######");
        let pursuer = pursuer_at(&m);
        let target = tile_center(1, 1, TILE_SIZE);
        assert_eq!(
            choose_direction(&m, pursuer.pos, Direction::Up, target, TILE_SIZE),
            Some(Direction::Left)
        );
    }

    #[test]
    fn test_tie_breaks_in_enumeration_order() {
        let m = maze("#####\n#PG.#\n#####");
        let pos = tile_center(2, 1, TILE_SIZE);
        // Left and Right land equally far from a target on the pursuer itself
        assert_eq!(
            choose_direction(&m, pos, Direction::Up, pos, TILE_SIZE),
            Some(Direction::Right)
        );
    }

    #[test]
    fn test_no_reversal_in_corridor() {
        let m = maze("######\n#P.G.#\n######");
        let pos = tile_center(3, 1, TILE_SIZE);
        let behind = tile_center(4, 1, TILE_SIZE);
        // Player is behind, but turning around is off the table
        assert_eq!(
            choose_direction(&m, pos, Direction::Left, behind, TILE_SIZE),
            Some(Direction::Left)
        );
    }

    #[test]
    fn test_reverses_at_dead_end() {
        let m = maze("#####\n#P.G#\n#####");
        let pos = tile_center(3, 1, TILE_SIZE);
        assert_eq!(legal_directions(&m, 3, 1), vec![Direction::Left]);
        assert_eq!(
            choose_direction(&m, pos, Direction::Right, pos, TILE_SIZE),
            Some(Direction::Left)
        );
    }

    #[test]
    fn test_restricted_wall_and_board_edge_are_illegal() {
        let m = maze("G.=\nP..");
        assert_eq!(legal_directions(&m, 0, 0), vec![Direction::Right, Direction::Down]);
        assert_eq!(legal_directions(&m, 1, 0), vec![Direction::Down, Direction::Left]);
    }

    #[test]
    fn test_boxed_in_holds_position() {
        let m = maze("#####\n#P#G#\n#####");
        let walls = m.walls(TILE_SIZE);
        let mut pursuer = pursuer_at(&m);
        let start = pursuer.pos;

        let decision =
            update_pursuer(&mut pursuer, Vec2::ZERO, &m, &walls, 3.0, TILE_SIZE);
        assert_eq!(decision, Decision::Stuck);
        assert_eq!(pursuer.pos, start);
        assert_eq!(pursuer.vel, Vec2::ZERO);
        assert_eq!(pursuer.heading, Direction::Up);
    }

    #[test]
    fn test_wall_guard_snaps_to_center() {
        let m = maze("#####\n#P.G#\n#####");
        let walls = m.walls(TILE_SIZE);
        let mut pursuer = pursuer_at(&m);
        pursuer.pos = Vec2::new(68.75, 30.0);
        pursuer.vel = Vec2::new(3.75, 0.0);
        pursuer.heading = Direction::Right;

        let decision = update_pursuer(&mut pursuer, Vec2::ZERO, &m, &walls, 3.75, TILE_SIZE);
        assert_eq!(decision, Decision::Coasting);
        assert_eq!(pursuer.pos, Vec2::new(70.0, 30.0));
        assert_eq!(pursuer.vel, Vec2::ZERO);

        let decision = update_pursuer(&mut pursuer, Vec2::ZERO, &m, &walls, 3.75, TILE_SIZE);
        assert_eq!(decision, Decision::Turned(Direction::Left));
        assert_eq!(pursuer.vel, Vec2::new(-3.75, 0.0));
    }

    #[test]
    fn test_lands_exactly_on_next_center() {
        let m = Maze::default();
        let walls = m.walls(TILE_SIZE);
        let mut pursuer = pursuer_at(&m);
        pursuer.pos = tile_center(5, 4, TILE_SIZE);
        pursuer.heading = Direction::Right;
        let target = tile_center(18, 4, TILE_SIZE);

        let first = update_pursuer(&mut pursuer, target, &m, &walls, 2.25, TILE_SIZE);
        assert_eq!(first, Decision::Turned(Direction::Right));
        for _ in 0..8 {
            let d = update_pursuer(&mut pursuer, target, &m, &walls, 2.25, TILE_SIZE);
            assert_eq!(d, Decision::Coasting);
        }
        // 2.25 does not divide 20; the ninth step is shortened onto the center
        assert_eq!(pursuer.pos, tile_center(6, 4, TILE_SIZE));
        let next = update_pursuer(&mut pursuer, target, &m, &walls, 2.25, TILE_SIZE);
        assert_eq!(next, Decision::Turned(Direction::Right));
    }

    #[test]
    fn test_decides_only_on_centers_and_stays_on_board() {
        let m = Maze::default();
        let walls = m.walls(TILE_SIZE);
        let target = tile_center(1, 1, TILE_SIZE);

        for speed in [2.25, 3.0, 3.75] {
            let mut pursuer = pursuer_at(&m);
            let mut turns = 0;
            for _ in 0..2000 {
                let before = pursuer.pos;
                let decision = update_pursuer(&mut pursuer, target, &m, &walls, speed, TILE_SIZE);
                if decision != Decision::Coasting {
                    assert!(is_tile_centered(before, TILE_SIZE));
                    turns += 1;
                }
                assert!(pursuer.vel.x == 0.0 || pursuer.vel.y == 0.0);
                let (col, row) = tile_coords(pursuer.pos, TILE_SIZE);
                assert!(m.is_passable(col, row), "left the corridors at {col},{row}");
            }
            assert!(turns > 50, "pursuer barely moved at speed {speed}");
        }
    }

    proptest! {
        #[test]
        fn prop_never_reverses_with_alternatives(
            pick in 0usize..10_000,
            heading in 0usize..4,
            tx in 0.0f32..400.0,
            ty in 0.0f32..400.0,
        ) {
            let m = Maze::default();
            let open: Vec<(i32, i32)> = m
                .iter()
                .filter(|(_, tile)| tile.is_passable())
                .map(|(coords, _)| coords)
                .collect();
            let (col, row) = open[pick % open.len()];
            let heading = Direction::ALL[heading];
            let legal = legal_directions(&m, col, row);
            let pos = tile_center(col, row, TILE_SIZE);

            let chosen = choose_direction(&m, pos, heading, Vec2::new(tx, ty), TILE_SIZE);
            prop_assert!(chosen.is_some());
            let chosen = chosen.unwrap();
            prop_assert!(legal.contains(&chosen));
            if legal.len() >= 2 {
                prop_assert_ne!(chosen, heading.opposite());
            }
        }
    }
}
