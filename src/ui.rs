//! Display helpers shared by the browser shell and the native demo
//!
//! Nothing here touches the DOM; it only turns game state into the strings
//! and colors a host puts on screen.

use crate::sim::{GamePhase, GameState, Outcome, Tile};

/// CSS colors for canvas drawing
pub mod palette {
    pub const BACKGROUND: &str = "#000000";
    pub const WALL: &str = "#3498db";
    pub const DOT: &str = "#ecf0f1";
    pub const POWER: &str = "#f1c40f";
    pub const PLAYER: &str = "#f1c40f";
    pub const PURSUER: &str = "#e74c3c";
}

pub const HEART: char = '♥';

/// Fill color for a static tile; pen walls look like any other wall
pub fn tile_color(tile: Tile) -> Option<&'static str> {
    tile.is_wall().then_some(palette::WALL)
}

/// One heart per remaining life, space separated
pub fn lives_label(lives: u8) -> String {
    vec![HEART.to_string(); lives as usize].join(" ")
}

pub fn outcome_title(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Win => "YOU WIN!",
        Outcome::Loss => "GAME OVER",
    }
}

/// Text content of the HUD and menus for one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hud {
    pub score: String,
    pub high_score: String,
    pub lives: String,
    pub show_start_menu: bool,
    /// Title for the game-over menu, `None` while it is hidden
    pub end_title: Option<&'static str>,
}

impl Hud {
    pub fn from_state(state: &GameState) -> Self {
        let end_title = match (state.phase, state.outcome) {
            (GamePhase::Over, Some(outcome)) => Some(outcome_title(outcome)),
            _ => None,
        };
        Self {
            score: state.score.to_string(),
            high_score: state.high_score.best.to_string(),
            lives: lives_label(state.lives),
            show_start_menu: state.phase == GamePhase::Menu,
            end_title,
        }
    }
}
