//! Owner of the single active game.
//!
//! Every action goes through `apply_action`; the resulting snapshot replaces the
//! in-memory state and is then mirrored to storage. Storage failures are logged and
//! never undo the in-memory change.

use crate::logic::{apply_action, GameAction, Transition};
use crate::models::{GameError, GameSession, GameStats, PlayerId, Score};
use crate::storage::{GameStorage, KeyValueStore, StorageError};
use chrono::Utc;
use std::collections::HashMap;

pub struct GameController<S> {
    session: Option<GameSession>,
    storage: GameStorage<S>,
}

fn log_storage_error<T>(what: &str, result: Result<T, StorageError>) {
    if let Err(e) = result {
        log::warn!("Could not {}: {}", what, e);
    }
}

impl<S: KeyValueStore> GameController<S> {
    /// Start in the Empty state. A saved game is only picked up by `load_saved_game`.
    pub fn new(store: S) -> Self {
        Self {
            session: None,
            storage: GameStorage::new(store),
        }
    }

    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    pub fn storage(&self) -> &GameStorage<S> {
        &self.storage
    }

    /// Apply one action and persist the outcome. On error nothing changes.
    pub fn dispatch(&mut self, action: GameAction) -> Result<Option<&GameSession>, GameError> {
        let is_reset = matches!(action, GameAction::Reset);
        let Transition { session, completed } =
            apply_action(self.session.as_ref(), action, Utc::now())?;
        self.session = session;

        if let Some(game) = completed {
            log_storage_error(
                "record completed game",
                self.storage.append_completed_game(game),
            );
            log_storage_error("clear saved game", self.storage.clear_current_session());
        } else if let Some(s) = &self.session {
            log_storage_error("save game", self.storage.save_current_session(s));
        } else if is_reset {
            log_storage_error("clear saved game", self.storage.clear_current_session());
        }

        Ok(self.session.as_ref())
    }

    pub fn start_new_game(
        &mut self,
        player_names: Vec<String>,
        winning_score: Score,
    ) -> Result<Option<&GameSession>, GameError> {
        self.dispatch(GameAction::StartNewGame {
            player_names,
            winning_score,
        })
    }

    pub fn add_round(
        &mut self,
        scores: HashMap<PlayerId, Score>,
    ) -> Result<Option<&GameSession>, GameError> {
        self.dispatch(GameAction::AddRound { scores })
    }

    pub fn add_player(
        &mut self,
        name: impl Into<String>,
        initial_score: Score,
    ) -> Result<Option<&GameSession>, GameError> {
        self.dispatch(GameAction::AddPlayer {
            name: name.into(),
            initial_score,
        })
    }

    pub fn undo_last_round(&mut self) -> Result<Option<&GameSession>, GameError> {
        self.dispatch(GameAction::UndoRound)
    }

    pub fn reset(&mut self) {
        if let Err(e) = self.dispatch(GameAction::Reset) {
            log::warn!("Could not reset game: {}", e);
        }
    }

    /// End the game now with the current leader as winner, record it, and return to Empty.
    pub fn finish_game(&mut self) -> Result<(), GameError> {
        self.dispatch(GameAction::FinishManually).map(|_| ())
    }

    pub fn has_saved_game(&self) -> bool {
        self.storage.has_saved_session()
    }

    /// Resume the saved game. Returns Ok(None) if nothing usable is saved.
    pub fn load_saved_game(&mut self) -> Result<Option<&GameSession>, GameError> {
        if self.session.is_some() {
            return Err(GameError::InvalidState);
        }
        match self.storage.load_current_session() {
            Some(saved) => self.dispatch(GameAction::LoadSession(saved)),
            None => Ok(None),
        }
    }

    pub fn stats(&self) -> GameStats {
        self.storage.load_stats()
    }

    pub fn clear_stats(&mut self) -> Result<(), StorageError> {
        log::info!("Clearing game statistics");
        self.storage.clear_stats()
    }

    pub fn delete_game(&mut self, id: &str) -> Result<bool, StorageError> {
        self.storage.delete_game(id)
    }
}
