use serde::{Deserialize, Serialize};

use crate::game::{BallType, FoulPoints, Player, PlayerPair};

/// One undoable scoring command.
///
/// Each variant carries everything its inverse needs, so undo never has to
/// consult state that may have moved on since the action was recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScoringAction {
    Ball {
        player: Player,
        ball: BallType,
        value: u32,
    },
    Foul {
        fouling_player: Player,
        points: FoulPoints,
    },
    FrameWin {
        winner: Player,
        /// Frame score cleared by the win.
        prior_frame_score: PlayerPair<u32>,
        /// Rivalry credited with the win, if one was active.
        rivalry: Option<RivalryCredit>,
    },
}

/// Where a frame win landed in the rivalry record. The seat is resolved by
/// name when the win is recorded, since a rivalry may list the two players
/// in the opposite order to the current game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RivalryCredit {
    pub rivalry_id: String,
    pub seat: Player,
}

impl ScoringAction {
    pub fn kind(&self) -> &'static str {
        match self {
            ScoringAction::Ball { .. } => "ball",
            ScoringAction::Foul { .. } => "foul",
            ScoringAction::FrameWin { .. } => "frame_win",
        }
    }
}

/// What the timer should do after a scoring command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerRequest {
    /// A new shot begins: back to full duration.
    Reset,
    /// Undo/redo: stop the countdown without signalling a player switch.
    Halt,
}
