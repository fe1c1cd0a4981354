//! Maze layout and derived geometry
//!
//! The grid itself never changes during a session. Walls and pickups are
//! derived from it once at session start; pickups then shrink independently.
//!
//! ## Tile legend
//!   '#' = Wall                   '=' = Restricted wall (pursuer pen)
//!   '.' = Pickup                 'o' = Power pickup
//!   ' ' = Open                   'P' = Player spawn (open)
//!   'p' = Player spawn on a dot  'G' = Pursuer spawn (open)

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::collision::Rect;
use super::state::{Pickup, PickupKind};
use crate::tile_center;
use crate::tuning::Tuning;

/// The stock 20x20 board
pub const DEFAULT_LAYOUT: [&str; 20] = [
    "####################",
    "#p.......##........#",
    "#o##.###.##.###.##o#",
    "#.##.###.##.###.##.#",
    "#..................#",
    "#.##.#.######.#.##.#",
    "#....#...##...#....#",
    "####.###G## ###.####",
    "####.# ====== #.####",
    "####.# =####= #.####",
    ".....  =#  #=  .....",
    "####.# =####= #.####",
    "####.# ====== #.####",
    "####.# ###### #.####",
    "#........##........#",
    "#o##.###.##.###.##o#",
    "#..#............#..#",
    "##.#.#.######.#.#.##",
    "#....#...##...#....#",
    "####################",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tile {
    #[default]
    Open,
    Wall,
    /// Impassable boundary of the pursuer pen
    RestrictedWall,
    Pickup,
    PowerPickup,
}

impl Tile {
    pub fn is_wall(self) -> bool {
        matches!(self, Tile::Wall | Tile::RestrictedWall)
    }

    pub fn is_passable(self) -> bool {
        !self.is_wall()
    }

    fn from_char(ch: char) -> Option<Self> {
        match ch {
            '#' => Some(Tile::Wall),
            '=' => Some(Tile::RestrictedWall),
            '.' | 'p' => Some(Tile::Pickup),
            'o' => Some(Tile::PowerPickup),
            ' ' | 'P' | 'G' => Some(Tile::Open),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MazeError {
    #[error("maze has no rows")]
    Empty,
    #[error("row {row} is {len} tiles wide, expected {expected}")]
    Ragged { row: usize, len: usize, expected: usize },
    #[error("unknown tile {ch:?} at column {col}, row {row}")]
    UnknownTile { ch: char, col: usize, row: usize },
    #[error("expected exactly one {marker:?} spawn marker, found {count}")]
    Spawn { marker: char, count: usize },
}

/// Immutable tile grid plus spawn points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Maze {
    width: usize,
    height: usize,
    /// Row-major
    tiles: Vec<Tile>,
    player_spawn: (i32, i32),
    pursuer_spawn: (i32, i32),
}

impl Default for Maze {
    fn default() -> Self {
        // DEFAULT_LAYOUT is checked by test_default_layout_shape
        Self::from_rows(&DEFAULT_LAYOUT).unwrap_or_else(|e| panic!("default maze: {e}"))
    }
}

impl FromStr for Maze {
    type Err = MazeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows: Vec<&str> = s.lines().collect();
        Self::from_rows(&rows)
    }
}

impl Maze {
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, MazeError> {
        let height = rows.len();
        if height == 0 {
            return Err(MazeError::Empty);
        }
        let width = rows[0].as_ref().chars().count();
        if width == 0 {
            return Err(MazeError::Empty);
        }

        let mut tiles = Vec::with_capacity(width * height);
        let mut players = Vec::new();
        let mut pursuers = Vec::new();

        for (row, line) in rows.iter().enumerate() {
            let line = line.as_ref();
            let len = line.chars().count();
            if len != width {
                return Err(MazeError::Ragged { row, len, expected: width });
            }
            for (col, ch) in line.chars().enumerate() {
                let tile = Tile::from_char(ch).ok_or(MazeError::UnknownTile { ch, col, row })?;
                match ch {
                    'P' | 'p' => players.push((col as i32, row as i32)),
                    'G' => pursuers.push((col as i32, row as i32)),
                    _ => {}
                }
                tiles.push(tile);
            }
        }

        let player_spawn = single_spawn('P', &players)?;
        let pursuer_spawn = single_spawn('G', &pursuers)?;

        Ok(Self {
            width,
            height,
            tiles,
            player_spawn,
            pursuer_spawn,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Tile at (col, row), `None` outside the grid
    pub fn tile(&self, col: i32, row: i32) -> Option<Tile> {
        if col < 0 || row < 0 {
            return None;
        }
        let (col, row) = (col as usize, row as usize);
        if col >= self.width || row >= self.height {
            return None;
        }
        Some(self.tiles[row * self.width + col])
    }

    /// In bounds and not a wall of either kind
    pub fn is_passable(&self, col: i32, row: i32) -> bool {
        self.tile(col, row).is_some_and(Tile::is_passable)
    }

    pub fn player_spawn(&self) -> (i32, i32) {
        self.player_spawn
    }

    pub fn pursuer_spawn(&self) -> (i32, i32) {
        self.pursuer_spawn
    }

    /// Iterate all tiles with their coordinates, row by row
    pub fn iter(&self) -> impl Iterator<Item = ((i32, i32), Tile)> + '_ {
        self.tiles.iter().enumerate().map(|(i, &tile)| {
            let col = (i % self.width) as i32;
            let row = (i / self.width) as i32;
            ((col, row), tile)
        })
    }

    /// One tile-square obstacle per wall tile, anchored at the tile's top-left
    pub fn walls(&self, tile_size: f32) -> Vec<Rect> {
        self.iter()
            .filter(|(_, tile)| tile.is_wall())
            .map(|((col, row), _)| {
                Rect::new(
                    col as f32 * tile_size,
                    row as f32 * tile_size,
                    tile_size,
                    tile_size,
                )
            })
            .collect()
    }

    /// Fresh pickup set, each centered in its tile
    pub fn pickups(&self, tuning: &Tuning) -> Vec<Pickup> {
        self.iter()
            .filter_map(|((col, row), tile)| {
                let kind = match tile {
                    Tile::Pickup => PickupKind::Dot,
                    Tile::PowerPickup => PickupKind::Power,
                    _ => return None,
                };
                Some(Pickup::new(kind, tile_center(col, row, tuning.tile_size), tuning))
            })
            .collect()
    }
}

fn single_spawn(marker: char, found: &[(i32, i32)]) -> Result<(i32, i32), MazeError> {
    match found {
        [spawn] => Ok(*spawn),
        _ => Err(MazeError::Spawn { marker, count: found.len() }),
    }
}
