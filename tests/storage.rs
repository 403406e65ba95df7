//! Integration tests for persistence and the game controller.

use chrono::Utc;
use ron_scorekeeper_web::storage::CURRENT_GAME_KEY;
use ron_scorekeeper_web::{
    CompletedGame, GameController, GameError, GameStorage, KeyValueStore, MemoryStore, Player,
    Score, SessionStatus, StorageError, DEFAULT_WINNING_SCORE, HISTORY_LIMIT,
};
use std::collections::HashMap;

fn completed(id: &str) -> CompletedGame {
    let winner = Player::new("Winner");
    CompletedGame {
        id: id.to_string(),
        players: vec![winner.clone()],
        winner,
        rounds: 3,
        started_at: Utc::now(),
        finished_at: Utc::now(),
    }
}

fn controller_with_game(winning_score: Score) -> GameController<MemoryStore> {
    let mut c = GameController::new(MemoryStore::new());
    c.start_new_game(vec!["Ana".into(), "Bo".into()], winning_score)
        .unwrap();
    c
}

fn scores(c: &GameController<MemoryStore>, entries: &[(&str, Score)]) -> HashMap<String, Score> {
    let session = c.session().unwrap();
    entries
        .iter()
        .map(|(name, s)| {
            let id = session.players.iter().find(|p| p.name == *name).unwrap().id.clone();
            (id, *s)
        })
        .collect()
}

fn saved_raw(c: &GameController<MemoryStore>) -> Option<String> {
    c.storage().store().get(CURRENT_GAME_KEY).unwrap()
}

#[test]
fn old_snapshot_gets_defaults() {
    let json = r#"{
        "id": "abc123",
        "players": [
            {"id": "p1", "name": "Ana", "totalScore": 40},
            {"id": "p2", "name": "Bo", "totalScore": 0}
        ],
        "rounds": [
            {"id": "r1", "roundNumber": 1, "scores": {"p1": 40, "p2": 0},
             "timestamp": "2025-12-01T20:00:00.000Z"}
        ],
        "winner": null,
        "startedAt": "2025-12-01T19:55:00.000Z",
        "finishedAt": null
    }"#;
    let mut store = MemoryStore::new();
    store.set(CURRENT_GAME_KEY, json).unwrap();
    let storage = GameStorage::new(store);

    let session = storage.load_current_session().unwrap();
    assert_eq!(session.winning_score, DEFAULT_WINNING_SCORE);
    assert!(session.rounds[0].ignored_scores.is_empty());
    assert!(session.player_added_events.is_empty());
    assert_eq!(session.players[0].total_score, 40);
}

#[test]
fn snapshot_without_totals_resumes_with_recomputed_totals() {
    let json = r#"{
        "id": "abc123",
        "players": [
            {"id": "p1", "name": "Ana"},
            {"id": "p2", "name": "Bo"}
        ],
        "rounds": [
            {"id": "r1", "roundNumber": 1, "scores": {"p1": 40, "p2": 15},
             "timestamp": "2025-12-01T20:00:00.000Z"}
        ],
        "winner": null,
        "startedAt": "2025-12-01T19:55:00.000Z",
        "finishedAt": null,
        "winningScore": 100
    }"#;
    let mut store = MemoryStore::new();
    store.set(CURRENT_GAME_KEY, json).unwrap();
    let mut c = GameController::new(store);

    let session = c.load_saved_game().unwrap().unwrap();
    let totals: Vec<Score> = session.players.iter().map(|p| p.total_score).collect();
    assert_eq!(totals, [40, 15]);
}

#[test]
fn corrupt_data_reads_as_absent() {
    let mut store = MemoryStore::new();
    store.set(CURRENT_GAME_KEY, "{not json").unwrap();
    store.set("stats", "[1, 2").unwrap();
    let storage = GameStorage::new(store);
    assert!(storage.load_current_session().is_none());
    assert!(!storage.has_saved_session());
    let stats = storage.load_stats();
    assert_eq!(stats.games_played, 0);
    assert!(stats.games_history.is_empty());
}

#[test]
fn snapshot_round_trips_through_storage() {
    let mut c = controller_with_game(100);
    let s = scores(&c, &[("Ana", 70), ("Bo", 10)]);
    c.add_round(s).unwrap();
    let s = scores(&c, &[("Ana", 40)]);
    c.add_round(s).unwrap();
    c.add_player("Cy", 25).unwrap();

    let loaded = c.storage().load_current_session().unwrap();
    assert_eq!(Some(&loaded), c.session());
}

#[test]
fn append_completed_game_is_idempotent() {
    let mut storage = GameStorage::new(MemoryStore::new());
    assert!(storage.append_completed_game(completed("g1")).unwrap());
    assert!(!storage.append_completed_game(completed("g1")).unwrap());
    let stats = storage.load_stats();
    assert_eq!(stats.games_played, 1);
    assert_eq!(stats.games_history.len(), 1);
}

#[test]
fn history_is_capped_newest_first() {
    let mut storage = GameStorage::new(MemoryStore::new());
    for i in 0..=HISTORY_LIMIT {
        storage.append_completed_game(completed(&format!("g{i}"))).unwrap();
    }
    let stats = storage.load_stats();
    assert_eq!(stats.games_played, HISTORY_LIMIT as u32 + 1);
    assert_eq!(stats.games_history.len(), HISTORY_LIMIT);
    assert_eq!(stats.games_history[0].id, format!("g{HISTORY_LIMIT}"));
    assert!(!stats.contains("g0"));
}

#[test]
fn delete_game_only_counts_real_removals() {
    let mut storage = GameStorage::new(MemoryStore::new());
    storage.append_completed_game(completed("g1")).unwrap();
    storage.append_completed_game(completed("g2")).unwrap();

    assert!(!storage.delete_game("missing").unwrap());
    assert_eq!(storage.load_stats().games_played, 2);

    assert!(storage.delete_game("g1").unwrap());
    let stats = storage.load_stats();
    assert_eq!(stats.games_played, 1);
    assert_eq!(stats.games_history[0].id, "g2");

    storage.clear_stats().unwrap();
    assert_eq!(storage.load_stats().games_played, 0);
}

#[test]
fn controller_saves_after_each_action() {
    let mut c = controller_with_game(100);
    assert!(c.has_saved_game());
    let s = scores(&c, &[("Ana", 30)]);
    c.add_round(s).unwrap();
    let saved = c.storage().load_current_session().unwrap();
    assert_eq!(saved.rounds.len(), 1);
}

#[test]
fn rejected_action_leaves_state_and_storage_alone() {
    let mut c = controller_with_game(100);
    let before_state = c.session().cloned();
    let before_saved = saved_raw(&c);
    assert_eq!(
        c.add_player("ana", 0).unwrap_err(),
        GameError::DuplicateName("ana".into())
    );
    assert_eq!(c.session().cloned(), before_state);
    assert_eq!(saved_raw(&c), before_saved);
}

#[test]
fn win_is_recorded_once_and_clears_saved_game() {
    let mut c = controller_with_game(100);
    let s = scores(&c, &[("Ana", 100)]);
    let session = c.add_round(s).unwrap().unwrap();
    assert_eq!(session.status(), SessionStatus::Finished);
    let game_id = session.id.clone();

    assert!(saved_raw(&c).is_none());
    let stats = c.stats();
    assert_eq!(stats.games_played, 1);
    assert_eq!(stats.games_history[0].id, game_id);

    // Undo reopens the game and saves it again; winning again does not duplicate.
    c.undo_last_round().unwrap();
    assert!(c.has_saved_game());
    let s = scores(&c, &[("Ana", 100)]);
    c.add_round(s).unwrap();
    let stats = c.stats();
    assert_eq!(stats.games_played, 1);
    assert_eq!(stats.games_history.len(), 1);
}

#[test]
fn manual_finish_records_leader_and_empties() {
    let mut c = controller_with_game(500);
    let s = scores(&c, &[("Ana", 120), ("Bo", 200)]);
    c.add_round(s).unwrap();
    c.finish_game().unwrap();

    assert!(c.session().is_none());
    assert!(!c.has_saved_game());
    let stats = c.stats();
    assert_eq!(stats.games_played, 1);
    assert_eq!(stats.games_history[0].winner.name, "Bo");
    assert_eq!(stats.games_history[0].rounds, 1);

    // Nothing in progress: finishing again is a no-op.
    c.finish_game().unwrap();
    assert_eq!(c.stats().games_played, 1);
}

#[test]
fn reset_clears_saved_game() {
    let mut c = controller_with_game(100);
    c.reset();
    assert!(c.session().is_none());
    assert!(!c.has_saved_game());
    assert_eq!(c.stats().games_played, 0);
}

#[test]
fn reset_without_game_stays_empty() {
    let mut c = GameController::new(MemoryStore::new());
    c.reset();
    assert!(c.session().is_none());
    assert!(!c.has_saved_game());
}

#[test]
fn saved_game_can_be_resumed_by_new_controller() {
    let mut c = controller_with_game(100);
    let s = scores(&c, &[("Bo", 45)]);
    c.add_round(s).unwrap();
    let expected = c.session().cloned();

    let store = c.storage().store().clone();
    let mut resumed = GameController::new(store);
    assert!(resumed.session().is_none());
    assert!(resumed.has_saved_game());
    let session = resumed.load_saved_game().unwrap().cloned();
    assert_eq!(session, expected);

    // Loading on top of an active game is refused.
    assert_eq!(resumed.load_saved_game(), Err(GameError::InvalidState));
}

#[test]
fn load_without_saved_game_is_none() {
    let mut c = GameController::new(MemoryStore::new());
    assert_eq!(c.load_saved_game(), Ok(None));
}

/// Store whose writes always fail.
#[derive(Default)]
struct ReadOnlyStore;

impl KeyValueStore for ReadOnlyStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Io(std::io::Error::other("read-only")))
    }

    fn remove(&mut self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Io(std::io::Error::other("read-only")))
    }
}

#[test]
fn storage_failures_do_not_roll_back_state() {
    let mut c = GameController::new(ReadOnlyStore);
    c.start_new_game(vec!["Ana".into(), "Bo".into()], 100).unwrap();
    let ana = c.session().unwrap().players[0].id.clone();
    let s: HashMap<String, Score> = [(ana, 60)].into_iter().collect();
    let session = c.add_round(s).unwrap().unwrap();
    assert_eq!(session.players[0].total_score, 60);
    assert!(c.clear_stats().is_err());
}
