//! Player and PlayerAddedEvent data structures.

use crate::models::Score;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player (used as the key in round score maps).
pub type PlayerId = String;

/// Fresh opaque identifier for players, rounds, events and sessions.
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// A player in the current game.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Always recomputed from the round history; see `logic::calculate_totals`.
    #[serde(default)]
    pub total_score: Score,
}

impl Player {
    /// Create a new player with the given name and a zero total.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            total_score: 0,
        }
    }

    /// True if `name` matches this player's name, ignoring case.
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

/// Record of a player joining after the game started.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerAddedEvent {
    pub id: String,
    pub player_id: PlayerId,
    pub player_name: String,
    /// Baseline the player starts from instead of 0.
    pub initial_score: Score,
    /// Rounds stamped before this point are not counted for the player.
    pub timestamp: DateTime<Utc>,
}
