//! In-session scoring with undo and redo.
//!
//! Score state lives only for the session. Every mutation goes through a
//! recorded [`ScoringAction`] so it can be reverted exactly.

mod action;
mod history;
mod stack;

pub use action::{RivalryCredit, ScoringAction, TimerRequest};
pub use history::{CommandLog, HISTORY_CAPACITY};
pub use stack::{FrameScoreState, ScoringStack};
