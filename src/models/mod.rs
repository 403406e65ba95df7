//! Data structures for the scorekeeper: players, rounds, the game session and history.

mod history;
mod player;
mod round;
mod session;

pub use history::{CompletedGame, GameStats, HISTORY_LIMIT};
pub use player::{generate_id, Player, PlayerAddedEvent, PlayerId};
pub use round::{Round, RoundId, Score};
pub use session::{GameError, GameSession, SessionStatus, DEFAULT_WINNING_SCORE};
