use serde::{Deserialize, Serialize};

use super::{GameMode, Player, PlayerPair};
use crate::timer::TimerDuration;

/// In-session game slice. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub mode: Option<GameMode>,
    pub player_names: PlayerPair<String>,
    pub timer_duration: TimerDuration,
    pub current_player: Player,
    pub is_game_active: bool,
    pub is_paused: bool,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            mode: None,
            player_names: PlayerPair::new("Player 1".to_string(), "Player 2".to_string()),
            timer_duration: TimerDuration::default(),
            current_player: Player::Player1,
            is_game_active: false,
            is_paused: false,
        }
    }
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_game_mode(&mut self, mode: GameMode) {
        self.mode = Some(mode);
    }

    pub fn set_players(&mut self, player1: &str, player2: &str) {
        self.player_names = PlayerPair::new(player1.to_string(), player2.to_string());
    }

    pub fn set_timer_duration(&mut self, duration: TimerDuration) {
        self.timer_duration = duration;
    }

    /// Player 1 always breaks.
    pub fn start_game(&mut self) {
        self.is_game_active = true;
        self.is_paused = false;
        self.current_player = Player::Player1;
    }

    pub fn pause_game(&mut self) {
        self.is_paused = true;
    }

    pub fn resume_game(&mut self) {
        self.is_paused = false;
    }

    pub fn switch_player(&mut self) {
        self.current_player = self.current_player.opponent();
    }

    pub fn end_game(&mut self) {
        self.is_game_active = false;
        self.is_paused = false;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn name_of(&self, player: Player) -> &str {
        &self.player_names[player]
    }

    pub fn current_player_name(&self) -> &str {
        self.name_of(self.current_player)
    }

    pub fn is_snooker(&self) -> bool {
        self.mode == Some(GameMode::Snooker)
    }
}
