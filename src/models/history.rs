//! Completed games and the aggregate statistics kept across sessions.

use crate::models::player::Player;
use crate::models::session::GameSession;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of completed games kept in the history (newest first).
pub const HISTORY_LIMIT: usize = 50;

/// Summary of a finished game as stored in the history.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedGame {
    /// Same id as the session it was taken from.
    pub id: String,
    /// Final roster with totals.
    pub players: Vec<Player>,
    pub winner: Player,
    /// Number of rounds played.
    pub rounds: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CompletedGame {
    /// Summarise a finished session. Returns None while the session has no winner.
    pub fn from_session(session: &GameSession) -> Option<Self> {
        let winner = session.winner.clone()?;
        Some(Self {
            id: session.id.clone(),
            players: session.players.clone(),
            winner,
            rounds: session.rounds.len(),
            started_at: session.started_at,
            finished_at: session.finished_at.unwrap_or_else(Utc::now),
        })
    }
}

/// Games played counter plus the capped history.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStats {
    pub games_played: u32,
    pub games_history: Vec<CompletedGame>,
}

impl GameStats {
    pub fn contains(&self, id: &str) -> bool {
        self.games_history.iter().any(|g| g.id == id)
    }

    /// Prepend a completed game. No-op (returns false) if a game with the same id is already recorded.
    pub fn record(&mut self, game: CompletedGame) -> bool {
        if self.contains(&game.id) {
            return false;
        }
        self.games_played += 1;
        self.games_history.insert(0, game);
        self.games_history.truncate(HISTORY_LIMIT);
        true
    }

    /// Remove a game by id. The counter is decremented only if something was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.games_history.len();
        self.games_history.retain(|g| g.id != id);
        let removed = self.games_history.len() < before;
        if removed {
            self.games_played = self.games_played.saturating_sub(1);
        }
        removed
    }
}
