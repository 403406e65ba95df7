//! Game repository: current-session snapshot and completed-game statistics.
//!
//! Reads never fail: missing or unreadable data falls back to "nothing saved".

use crate::models::{CompletedGame, GameSession, GameStats};
use crate::storage::{KeyValueStore, StorageError};

/// Key holding the in-progress session snapshot.
pub const CURRENT_GAME_KEY: &str = "current_game";
/// Key holding games played and the history.
pub const STATS_KEY: &str = "stats";

/// Typed access to the saved game and statistics over any `KeyValueStore`.
#[derive(Clone, Debug)]
pub struct GameStorage<S> {
    store: S,
}

impl<S: KeyValueStore> GameStorage<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Could not read '{}': {}", key, e);
                None
            }
        }
    }

    /// Last saved in-progress session. Older snapshots get a 500 target and
    /// empty `ignoredScores` maps where those fields are missing.
    pub fn load_current_session(&self) -> Option<GameSession> {
        let raw = self.read(CURRENT_GAME_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                log::warn!("Ignoring corrupt saved game: {}", e);
                None
            }
        }
    }

    pub fn has_saved_session(&self) -> bool {
        self.load_current_session().is_some()
    }

    /// Overwrite the saved snapshot.
    pub fn save_current_session(&mut self, session: &GameSession) -> Result<(), StorageError> {
        let json = serde_json::to_string(session)?;
        self.store.set(CURRENT_GAME_KEY, &json)
    }

    pub fn clear_current_session(&mut self) -> Result<(), StorageError> {
        self.store.remove(CURRENT_GAME_KEY)
    }

    /// Saved statistics, or zero games played if none are saved (or they are unreadable).
    pub fn load_stats(&self) -> GameStats {
        let Some(raw) = self.read(STATS_KEY) else {
            return GameStats::default();
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            log::warn!("Ignoring corrupt stats: {}", e);
            GameStats::default()
        })
    }

    fn save_stats(&mut self, stats: &GameStats) -> Result<(), StorageError> {
        let json = serde_json::to_string(stats)?;
        self.store.set(STATS_KEY, &json)
    }

    /// Add a completed game to the history. Returns false if it was already recorded.
    pub fn append_completed_game(&mut self, game: CompletedGame) -> Result<bool, StorageError> {
        let mut stats = self.load_stats();
        let id = game.id.clone();
        if !stats.record(game) {
            log::debug!("Game {} already in history", id);
            return Ok(false);
        }
        self.save_stats(&stats)?;
        log::info!("Game {} added to history ({} played)", id, stats.games_played);
        Ok(true)
    }

    pub fn clear_stats(&mut self) -> Result<(), StorageError> {
        self.store.remove(STATS_KEY)
    }

    /// Delete one game from the history. Returns false if no game had that id.
    pub fn delete_game(&mut self, id: &str) -> Result<bool, StorageError> {
        let mut stats = self.load_stats();
        let removed = stats.remove(id);
        self.save_stats(&stats)?;
        Ok(removed)
    }
}
