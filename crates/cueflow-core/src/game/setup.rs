//! Pre-game form: player names and turn length.

use super::{GameState, Player};
use crate::error::ValidationError;
use crate::rivalry::RivalryStore;
use crate::timer::{TimerDuration, DEFAULT_TIMER_SECS};

/// Parse free-form duration text. Non-digit characters are dropped first,
/// so "45s" reads as 45.
pub fn parse_custom_duration(text: &str) -> Result<TimerDuration, ValidationError> {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "duration".into(),
            message: format!("'{text}' contains no digits"),
        });
    }
    let secs = digits
        .parse::<u64>()
        .map_err(|err| ValidationError::InvalidValue {
            field: "duration".into(),
            message: err.to_string(),
        })?;
    TimerDuration::from_secs(secs)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSetup {
    pub player1_name: String,
    pub player2_name: String,
    selected_secs: u64,
    custom_text: Option<String>,
}

impl Default for GameSetup {
    fn default() -> Self {
        Self {
            player1_name: String::new(),
            player2_name: String::new(),
            selected_secs: DEFAULT_TIMER_SECS,
            custom_text: None,
        }
    }
}

impl GameSetup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefill names from the active rivalry, if any.
    pub fn from_rivalries(rivalries: &RivalryStore) -> Self {
        let mut setup = Self::default();
        if let Some(active) = rivalries.active() {
            setup.player1_name = active.player1_name.clone();
            setup.player2_name = active.player2_name.clone();
        }
        setup
    }

    /// Pick a preset. Discards any custom text.
    pub fn select_duration(&mut self, secs: u64) {
        self.selected_secs = secs;
        self.custom_text = None;
    }

    /// Switch to a custom duration, keeping only the digits typed.
    pub fn set_custom_duration(&mut self, text: &str) {
        self.custom_text = Some(text.chars().filter(char::is_ascii_digit).collect());
    }

    pub fn is_custom(&self) -> bool {
        self.custom_text.is_some()
    }

    pub fn custom_text(&self) -> Option<&str> {
        self.custom_text.as_deref()
    }

    pub fn duration(&self) -> Result<TimerDuration, ValidationError> {
        match &self.custom_text {
            Some(text) => parse_custom_duration(text),
            None => TimerDuration::from_secs(self.selected_secs),
        }
    }

    pub fn validate(&self) -> Result<TimerDuration, ValidationError> {
        if self.player1_name.trim().is_empty() {
            return Err(ValidationError::EmptyPlayerName(Player::Player1.as_str()));
        }
        if self.player2_name.trim().is_empty() {
            return Err(ValidationError::EmptyPlayerName(Player::Player2.as_str()));
        }
        self.duration()
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Apply the form to the game slice and open (or reopen) the rivalry.
    /// Returns the rivalry id, which is now the active one.
    pub fn apply(
        &self,
        game: &mut GameState,
        rivalries: &mut RivalryStore,
    ) -> Result<String, ValidationError> {
        let duration = self.validate()?;
        let mode = game.mode.ok_or(ValidationError::MissingGameMode)?;
        let (p1, p2) = (self.player1_name.trim(), self.player2_name.trim());

        game.set_players(p1, p2);
        game.set_timer_duration(duration);
        let id = rivalries.create_or_find(p1, p2, mode).id.clone();
        tracing::debug!(%mode, secs = duration.secs(), rivalry = %id, "game configured");
        Ok(id)
    }
}
