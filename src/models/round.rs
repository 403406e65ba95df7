//! Round: one hand of the game with each player's score delta.

use crate::models::player::PlayerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Unique identifier for a round.
pub type RoundId = String;

/// Points as entered by players and accumulated into totals. May be negative.
pub type Score = i32;

/// A recorded round.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    pub id: RoundId,
    /// 1-based, always equal to the round's position in the session.
    pub round_number: usize,
    /// Score delta per player present when the round was played.
    pub scores: HashMap<PlayerId, Score>,
    pub timestamp: DateTime<Utc>,
    /// Which deltas were discarded by the bust rule. Fixed at creation.
    #[serde(default)]
    pub ignored_scores: HashMap<PlayerId, bool>,
}

impl Round {
    /// Delta recorded for `player_id`, 0 if the player has no entry.
    pub fn score_for(&self, player_id: &str) -> Score {
        self.scores.get(player_id).copied().unwrap_or(0)
    }

    /// Whether the player's delta was discarded when this round was recorded.
    pub fn was_ignored(&self, player_id: &str) -> bool {
        self.ignored_scores.get(player_id).copied().unwrap_or(false)
    }
}
