//! Per-game records used to build tournament tallies.

use serde::{Deserialize, Serialize};

/// Side that won a game. A missing winner means the game was drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

/// One game from a tournament's game feed, reduced to what the tally
/// builder needs. Either side's identity may be unresolvable, in which case
/// the whole game is skipped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRecord {
    pub white: Option<String>,
    pub black: Option<String>,
    pub winner: Option<Color>,
}

impl GameRecord {
    pub fn new(white: Option<String>, black: Option<String>, winner: Option<Color>) -> Self {
        Self {
            white,
            black,
            winner,
        }
    }
}
