//! Players, game modes and the in-session game slice.

mod ball;
mod setup;
mod state;

use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub use ball::{BallType, FoulPoints, SNOOKER_FOUL_VALUES};
pub use setup::{parse_custom_duration, GameSetup};
pub use state::GameState;

/// One of the two seats at the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    Player1,
    Player2,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::Player1 => Player::Player2,
            Player::Player2 => Player::Player1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Player::Player1 => "player1",
            Player::Player2 => "player2",
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Player {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "p1" | "player1" => Ok(Player::Player1),
            "2" | "p2" | "player2" => Ok(Player::Player2),
            other => Err(ValidationError::InvalidValue {
                field: "player".into(),
                message: format!("expected player1 or player2, got '{other}'"),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// Timer and win tracking.
    Billiard,
    /// Timer, ball scoring and win tracking.
    Snooker,
}

impl GameMode {
    pub fn label(self) -> &'static str {
        match self {
            GameMode::Billiard => "Billiard",
            GameMode::Snooker => "Snooker",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            GameMode::Billiard => "Timer + Win Tracking",
            GameMode::Snooker => "Timer + Scoring + Win Tracking",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GameMode::Billiard => "billiard",
            GameMode::Snooker => "snooker",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "billiard" => Ok(GameMode::Billiard),
            "snooker" => Ok(GameMode::Snooker),
            other => Err(ValidationError::InvalidValue {
                field: "game_mode".into(),
                message: format!("unknown game mode '{other}'"),
            }),
        }
    }
}

/// A value held once per player, e.g. frame score or win count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerPair<T> {
    pub player1: T,
    pub player2: T,
}

impl<T> PlayerPair<T> {
    pub fn new(player1: T, player2: T) -> Self {
        Self { player1, player2 }
    }
}

impl<T> Index<Player> for PlayerPair<T> {
    type Output = T;

    fn index(&self, player: Player) -> &T {
        match player {
            Player::Player1 => &self.player1,
            Player::Player2 => &self.player2,
        }
    }
}

impl<T> IndexMut<Player> for PlayerPair<T> {
    fn index_mut(&mut self, player: Player) -> &mut T {
        match player {
            Player::Player1 => &mut self.player1,
            Player::Player2 => &mut self.player2,
        }
    }
}
