//! GameSession, SessionStatus and GameError.

use crate::models::player::{Player, PlayerAddedEvent, PlayerId};
use crate::models::round::{Round, Score};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Target used when none is given (and for snapshots saved before targets were configurable).
pub const DEFAULT_WINNING_SCORE: Score = 500;

fn default_winning_score() -> Score {
    DEFAULT_WINNING_SCORE
}

/// Errors that can occur during game operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum GameError {
    /// No game in progress, or the game is not in a state that allows this action.
    InvalidState,
    /// Need at least 2 players to start a game.
    NotEnoughPlayers,
    /// A player name was empty after trimming.
    EmptyName,
    /// A player with this name already exists (names are unique, case-insensitive).
    DuplicateName(String),
    /// Winning score must be a positive number.
    InvalidWinningScore(Score),
    /// A round referenced a player that is not in the game.
    PlayerNotFound(PlayerId),
}

impl std::fmt::Display for GameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameError::InvalidState => write!(f, "Invalid state for this action"),
            GameError::NotEnoughPlayers => write!(f, "Need at least 2 players to start a game"),
            GameError::EmptyName => write!(f, "Player name is required"),
            GameError::DuplicateName(name) => {
                write!(f, "A player named '{}' already exists", name)
            }
            GameError::InvalidWinningScore(score) => {
                write!(f, "Winning score must be greater than 0 (got {})", score)
            }
            GameError::PlayerNotFound(id) => write!(f, "Player {} is not in this game", id),
        }
    }
}

impl std::error::Error for GameError {}

/// Derived phase of a session. The Empty phase is the absence of a session.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Active,
    Finished,
}

/// Full state of the game in progress: roster, round history and outcome.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSession {
    pub id: String,
    /// Roster in insertion order.
    pub players: Vec<Player>,
    pub rounds: Vec<Round>,
    #[serde(default)]
    pub player_added_events: Vec<PlayerAddedEvent>,
    pub winner: Option<Player>,
    pub started_at: DateTime<Utc>,
    /// Present iff `winner` is.
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(default = "default_winning_score")]
    pub winning_score: Score,
}

impl GameSession {
    pub fn status(&self) -> SessionStatus {
        if self.winner.is_some() {
            SessionStatus::Finished
        } else {
            SessionStatus::Active
        }
    }

    pub fn is_finished(&self) -> bool {
        self.status() == SessionStatus::Finished
    }

    pub fn get_player(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Latest timestamp recorded in the session (start, rounds, or join events).
    pub fn last_timestamp(&self) -> DateTime<Utc> {
        let rounds = self.rounds.iter().map(|r| r.timestamp);
        let events = self.player_added_events.iter().map(|e| e.timestamp);
        rounds
            .chain(events)
            .fold(self.started_at, |latest, t| latest.max(t))
    }

    /// Timestamp for a new round or join event: `now`, bumped past the latest
    /// recorded timestamp so that events stay strictly ordered.
    pub fn next_timestamp(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let last = self.last_timestamp();
        if now > last {
            now
        } else {
            last + chrono::Duration::microseconds(1)
        }
    }

    /// Players sorted by total score (highest first); ties keep roster order.
    pub fn standings(&self) -> Vec<&Player> {
        let mut sorted: Vec<&Player> = self.players.iter().collect();
        sorted.sort_by(|a, b| b.total_score.cmp(&a.total_score));
        sorted
    }

    /// Points each player still needs to reach the winning score exactly.
    pub fn points_remaining(&self, player_id: &str) -> Option<Score> {
        self.get_player(player_id)
            .map(|p| self.winning_score.saturating_sub(p.total_score))
    }

    /// Default baseline offered to a late joiner: the average total, rounded to the nearest 5.
    /// Halves round up (towards positive infinity), also for negative averages.
    pub fn suggested_initial_score(&self) -> Score {
        if self.players.is_empty() {
            return 0;
        }
        let sum: i64 = self.players.iter().map(|p| i64::from(p.total_score)).sum();
        let average = round_half_up(sum as f64 / self.players.len() as f64);
        (round_half_up(average / 5.0) * 5.0) as Score
    }
}

fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}
