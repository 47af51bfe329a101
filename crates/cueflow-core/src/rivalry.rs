//! Head-to-head rivalry history.
//!
//! A rivalry is identified by the unordered pair of normalized player names
//! (trimmed, lower-cased) plus the game mode. Names keep their original
//! casing for display. Counters only move through [`RivalryStore::record_win`]
//! and its inverse [`RivalryStore::undo_win`], which keeps
//! `total_games_played == wins.player1 + wins.player2`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::game::{GameMode, Player, PlayerPair};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rivalry {
    pub id: String,
    pub player1_name: String,
    pub player2_name: String,
    pub game_mode: GameMode,
    pub wins: PlayerPair<u32>,
    pub created_at: DateTime<Utc>,
    pub last_played_at: DateTime<Utc>,
    pub total_games_played: u32,
}

impl Rivalry {
    fn new(player1_name: &str, player2_name: &str, game_mode: GameMode, now: DateTime<Utc>) -> Self {
        Self {
            id: format!("rivalry_{}", Uuid::new_v4().simple()),
            player1_name: player1_name.trim().to_string(),
            player2_name: player2_name.trim().to_string(),
            game_mode,
            wins: PlayerPair::default(),
            created_at: now,
            last_played_at: now,
            total_games_played: 0,
        }
    }

    /// True when this rivalry is between the given names in the given mode,
    /// regardless of seat order or casing.
    pub fn matches(&self, player1: &str, player2: &str, mode: GameMode) -> bool {
        if self.game_mode != mode {
            return false;
        }
        let (a, b) = (normalize_name(player1), normalize_name(player2));
        let (p1, p2) = (
            normalize_name(&self.player1_name),
            normalize_name(&self.player2_name),
        );
        (p1 == a && p2 == b) || (p1 == b && p2 == a)
    }

    /// This rivalry's seat for whoever sits in `game_seat` of a game between
    /// `player1` and `player2`. A game that seats the pair the other way
    /// round maps each player to the opposite counter.
    pub fn seat_for(&self, game_seat: Player, player1: &str, player2: &str) -> Player {
        let (a, b) = (normalize_name(player1), normalize_name(player2));
        let (p1, p2) = (
            normalize_name(&self.player1_name),
            normalize_name(&self.player2_name),
        );
        if p1 != a && p1 == b && p2 == a {
            game_seat.opponent()
        } else {
            game_seat
        }
    }

    pub fn name_of(&self, player: Player) -> &str {
        match player {
            Player::Player1 => &self.player1_name,
            Player::Player2 => &self.player2_name,
        }
    }

    /// Human-friendly recency: "Today", "Yesterday", "3 days ago",
    /// "2 weeks ago", or the calendar date after a month.
    pub fn last_played_label(&self, now: DateTime<Utc>) -> String {
        let days = (now - self.last_played_at).num_days();
        match days {
            d if d <= 0 => "Today".to_string(),
            1 => "Yesterday".to_string(),
            d if d < 7 => format!("{d} days ago"),
            d if d < 30 => format!("{} weeks ago", d / 7),
            _ => self.last_played_at.format("%b %-d, %Y").to_string(),
        }
    }
}

pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Persisted rivalry slice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RivalryStore {
    #[serde(default)]
    rivalries: Vec<Rivalry>,
    #[serde(default)]
    active_rivalry_id: Option<String>,
}

impl RivalryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rivalries(&self) -> &[Rivalry] {
        &self.rivalries
    }

    pub fn len(&self) -> usize {
        self.rivalries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rivalries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Rivalry> {
        self.rivalries.iter().find(|r| r.id == id)
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active_rivalry_id.as_deref()
    }

    pub fn active(&self) -> Option<&Rivalry> {
        self.active_id().and_then(|id| self.get(id))
    }

    /// Point the active marker at `id`, or clear it. Unknown ids clear it.
    pub fn set_active(&mut self, id: Option<&str>) {
        self.active_rivalry_id = id.filter(|id| self.get(id).is_some()).map(str::to_string);
    }

    /// Most recently played first.
    pub fn sorted_by_last_played(&self) -> Vec<&Rivalry> {
        let mut sorted: Vec<&Rivalry> = self.rivalries.iter().collect();
        sorted.sort_by(|a, b| b.last_played_at.cmp(&a.last_played_at));
        sorted
    }

    pub fn create_or_find(&mut self, player1: &str, player2: &str, mode: GameMode) -> &Rivalry {
        self.create_or_find_at(player1, player2, mode, Utc::now())
    }

    /// Find the rivalry for this pair and mode or start a new one; either
    /// way it becomes the active rivalry.
    pub fn create_or_find_at(
        &mut self,
        player1: &str,
        player2: &str,
        mode: GameMode,
        now: DateTime<Utc>,
    ) -> &Rivalry {
        let index = match self
            .rivalries
            .iter()
            .position(|r| r.matches(player1, player2, mode))
        {
            Some(index) => {
                self.rivalries[index].last_played_at = now;
                index
            }
            None => {
                let rivalry = Rivalry::new(player1, player2, mode, now);
                tracing::info!(id = %rivalry.id, %mode, "new rivalry");
                self.rivalries.push(rivalry);
                self.rivalries.len() - 1
            }
        };
        self.active_rivalry_id = Some(self.rivalries[index].id.clone());
        &self.rivalries[index]
    }

    /// Credit a win. Unknown ids are ignored.
    pub fn record_win(&mut self, id: &str, winner: Player) {
        self.record_win_at(id, winner, Utc::now());
    }

    pub fn record_win_at(&mut self, id: &str, winner: Player, now: DateTime<Utc>) {
        let Some(rivalry) = self.rivalries.iter_mut().find(|r| r.id == id) else {
            tracing::debug!(id, "record_win on unknown rivalry ignored");
            return;
        };
        rivalry.wins[winner] += 1;
        rivalry.total_games_played += 1;
        rivalry.last_played_at = now;
    }

    /// Exact inverse of [`RivalryStore::record_win`]. Counters never go
    /// below zero; an attempt to do so is logged as a bug.
    pub fn undo_win(&mut self, id: &str, winner: Player) {
        let Some(rivalry) = self.rivalries.iter_mut().find(|r| r.id == id) else {
            tracing::debug!(id, "undo_win on unknown rivalry ignored");
            return;
        };
        if rivalry.wins[winner] == 0 || rivalry.total_games_played == 0 {
            tracing::error!(id, %winner, "undo_win without a matching recorded win");
            return;
        }
        rivalry.wins[winner] -= 1;
        rivalry.total_games_played -= 1;
    }

    /// Returns whether an entry was removed.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.rivalries.len();
        self.rivalries.retain(|r| r.id != id);
        if self.active_rivalry_id.as_deref() == Some(id) {
            self.active_rivalry_id = None;
        }
        let removed = self.rivalries.len() != before;
        if removed {
            tracing::info!(id, "rivalry deleted");
        }
        removed
    }

    pub fn clear_all(&mut self) {
        self.rivalries.clear();
        self.active_rivalry_id = None;
    }
}
