use serde::{Deserialize, Serialize};

use super::action::{RivalryCredit, ScoringAction, TimerRequest};
use super::history::CommandLog;
use crate::game::{BallType, FoulPoints, GameState, Player, PlayerPair};
use crate::rivalry::RivalryStore;

/// Score state for the current session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameScoreState {
    pub current_frame_score: PlayerPair<u32>,
    pub session_wins: PlayerPair<u32>,
    /// 1-based.
    pub frame_number: u32,
}

impl Default for FrameScoreState {
    fn default() -> Self {
        Self {
            current_frame_score: PlayerPair::default(),
            session_wins: PlayerPair::default(),
            frame_number: 1,
        }
    }
}

/// Score state plus the command log that can revert it.
#[derive(Debug, Clone, Default)]
pub struct ScoringStack {
    score: FrameScoreState,
    log: CommandLog<ScoringAction>,
}

impl ScoringStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> &FrameScoreState {
        &self.score
    }

    pub fn can_undo(&self) -> bool {
        self.log.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.log.can_redo()
    }

    /// Credit a potted ball to `player`.
    pub fn record_ball(
        &mut self,
        player: Player,
        ball: BallType,
        game: &mut GameState,
        rivalries: &mut RivalryStore,
    ) -> TimerRequest {
        self.record(
            ScoringAction::Ball {
                player,
                ball,
                value: ball.value(),
            },
            game,
            rivalries,
        )
    }

    /// Foul by the current player: the opponent scores and takes the table.
    pub fn record_foul(
        &mut self,
        points: FoulPoints,
        game: &mut GameState,
        rivalries: &mut RivalryStore,
    ) -> TimerRequest {
        self.record(
            ScoringAction::Foul {
                fouling_player: game.current_player,
                points,
            },
            game,
            rivalries,
        )
    }

    /// Close the frame for `winner`. The active rivalry, if any, is credited
    /// on the counter that belongs to the winner's name.
    pub fn record_frame_win(
        &mut self,
        winner: Player,
        game: &mut GameState,
        rivalries: &mut RivalryStore,
    ) -> TimerRequest {
        let names = &game.player_names;
        let rivalry = rivalries.active().map(|r| RivalryCredit {
            rivalry_id: r.id.clone(),
            seat: r.seat_for(winner, &names.player1, &names.player2),
        });
        let action = ScoringAction::FrameWin {
            winner,
            prior_frame_score: self.score.current_frame_score,
            rivalry,
        };
        self.record(action, game, rivalries)
    }

    /// Revert the most recent action. `None` when there is nothing to undo.
    pub fn undo(
        &mut self,
        game: &mut GameState,
        rivalries: &mut RivalryStore,
    ) -> Option<TimerRequest> {
        let action = self.log.undo()?.clone();
        self.revert(&action, game, rivalries);
        tracing::debug!(kind = action.kind(), "scoring undo");
        Some(TimerRequest::Halt)
    }

    /// Re-apply the most recently undone action.
    pub fn redo(
        &mut self,
        game: &mut GameState,
        rivalries: &mut RivalryStore,
    ) -> Option<TimerRequest> {
        let action = self.log.redo()?.clone();
        self.apply(&action, game, rivalries);
        tracing::debug!(kind = action.kind(), "scoring redo");
        Some(TimerRequest::Halt)
    }

    /// New game: zero everything and forget the history in both directions.
    pub fn reset_all_scores(&mut self) {
        self.score = FrameScoreState::default();
        self.log.clear();
    }

    fn record(
        &mut self,
        action: ScoringAction,
        game: &mut GameState,
        rivalries: &mut RivalryStore,
    ) -> TimerRequest {
        self.apply(&action, game, rivalries);
        tracing::debug!(kind = action.kind(), "scoring action recorded");
        self.log.push(action);
        TimerRequest::Reset
    }

    fn apply(&mut self, action: &ScoringAction, game: &mut GameState, rivalries: &mut RivalryStore) {
        let score = &mut self.score;
        match action {
            ScoringAction::Ball { player, value, .. } => {
                score.current_frame_score[*player] += value;
            }
            ScoringAction::Foul {
                fouling_player,
                points,
            } => {
                let opponent = fouling_player.opponent();
                score.current_frame_score[opponent] += points.get();
                game.current_player = opponent;
            }
            ScoringAction::FrameWin { winner, rivalry, .. } => {
                score.session_wins[*winner] += 1;
                score.frame_number += 1;
                score.current_frame_score = PlayerPair::default();
                if let Some(credit) = rivalry {
                    rivalries.record_win(&credit.rivalry_id, credit.seat);
                }
            }
        }
    }

    fn revert(&mut self, action: &ScoringAction, game: &mut GameState, rivalries: &mut RivalryStore) {
        let score = &mut self.score;
        match action {
            ScoringAction::Ball { player, value, .. } => {
                let slot = &mut score.current_frame_score[*player];
                *slot = slot.saturating_sub(*value);
            }
            ScoringAction::Foul {
                fouling_player,
                points,
            } => {
                let slot = &mut score.current_frame_score[fouling_player.opponent()];
                *slot = slot.saturating_sub(points.get());
                game.current_player = *fouling_player;
            }
            ScoringAction::FrameWin {
                winner,
                prior_frame_score,
                rivalry,
            } => {
                let wins = &mut score.session_wins[*winner];
                *wins = wins.saturating_sub(1);
                score.frame_number = score.frame_number.saturating_sub(1).max(1);
                score.current_frame_score = *prior_frame_score;
                if let Some(credit) = rivalry {
                    rivalries.undo_win(&credit.rivalry_id, credit.seat);
                }
            }
        }
    }
}
