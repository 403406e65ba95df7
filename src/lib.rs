//! Card game scorekeeper: library with models, scoring logic, persistence and the game controller.

pub mod config;
pub mod controller;
pub mod export;
pub mod logic;
pub mod models;
pub mod storage;

pub use config::AppConfig;
pub use controller::GameController;
pub use export::history_to_csv;
pub use logic::{
    add_player, append_round, apply_action, calculate_ignored_scores, calculate_totals,
    detect_winner, leading_player, player_total, start_new_game, undo_last_round, GameAction,
    Transition,
};
pub use models::{
    generate_id, CompletedGame, GameError, GameSession, GameStats, Player, PlayerAddedEvent,
    PlayerId, Round, RoundId, Score, SessionStatus, DEFAULT_WINNING_SCORE, HISTORY_LIMIT,
};
pub use storage::{FileStore, GameStorage, KeyValueStore, MemoryStore, StorageError};
