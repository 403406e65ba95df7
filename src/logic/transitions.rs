//! Session state machine: every action is a pure function from the previous
//! snapshot to the next one.
//!
//! States: Empty (`None`), Active (no winner) and Finished (winner present).
//! The previous snapshot is never modified; transitions work on a clone.

use crate::logic::ledger::{append_round, undo_last_round};
use crate::logic::roster::{add_player, validate_starting_names};
use crate::logic::scoring::calculate_totals;
use crate::logic::winner::{detect_winner, leading_player};
use crate::models::{
    generate_id, CompletedGame, GameError, GameSession, Player, PlayerId, Score,
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Everything a caller can ask the game to do.
#[derive(Clone, Debug, PartialEq)]
pub enum GameAction {
    StartNewGame {
        player_names: Vec<String>,
        winning_score: Score,
    },
    AddRound {
        scores: HashMap<PlayerId, Score>,
    },
    AddPlayer {
        name: String,
        initial_score: Score,
    },
    UndoRound,
    Reset,
    FinishManually,
    LoadSession(GameSession),
}

/// Result of applying an action.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    /// Next state; `None` is the Empty state.
    pub session: Option<GameSession>,
    /// History record produced by this transition (a win or a manual finish).
    pub completed: Option<CompletedGame>,
}

impl Transition {
    fn to(session: GameSession) -> Self {
        let completed = CompletedGame::from_session(&session);
        Self {
            session: Some(session),
            completed,
        }
    }

    fn empty() -> Self {
        Self {
            session: None,
            completed: None,
        }
    }
}

/// Fresh session with the given players, all at 0.
pub fn start_new_game(
    player_names: &[String],
    winning_score: Score,
    now: DateTime<Utc>,
) -> Result<GameSession, GameError> {
    if winning_score <= 0 {
        return Err(GameError::InvalidWinningScore(winning_score));
    }
    let names = validate_starting_names(player_names)?;
    Ok(GameSession {
        id: generate_id(),
        players: names.into_iter().map(Player::new).collect(),
        rounds: Vec::new(),
        player_added_events: Vec::new(),
        winner: None,
        started_at: now,
        finished_at: None,
        winning_score,
    })
}

/// Recompute every total from the history, then declare (or clear) the winner.
/// An existing finish time is kept while the game stays won.
fn settle(session: &mut GameSession, now: DateTime<Utc>) {
    session.players = calculate_totals(
        &session.players,
        &session.rounds,
        &session.player_added_events,
        session.winning_score,
    );
    match detect_winner(&session.players, session.winning_score).cloned() {
        Some(winner) => {
            if session.finished_at.is_none() {
                log::info!(
                    "Game {}: {} reached {} and wins",
                    session.id,
                    winner.name,
                    session.winning_score
                );
                session.finished_at = Some(now);
            }
            session.winner = Some(winner);
        }
        None => {
            session.winner = None;
            session.finished_at = None;
        }
    }
}

fn active_session(current: Option<&GameSession>) -> Result<&GameSession, GameError> {
    match current {
        Some(s) if !s.is_finished() => Ok(s),
        _ => Err(GameError::InvalidState),
    }
}

/// Apply `action` to `current` at time `now`.
///
/// Validation failures return an error and produce no state change.
pub fn apply_action(
    current: Option<&GameSession>,
    action: GameAction,
    now: DateTime<Utc>,
) -> Result<Transition, GameError> {
    match action {
        GameAction::StartNewGame {
            player_names,
            winning_score,
        } => {
            let session = start_new_game(&player_names, winning_score, now)?;
            log::info!(
                "Game {} started with {} players, target {}",
                session.id,
                session.players.len(),
                session.winning_score
            );
            Ok(Transition::to(session))
        }

        GameAction::AddRound { scores } => {
            let mut session = active_session(current)?.clone();
            append_round(&mut session, scores, now)?;
            settle(&mut session, now);
            Ok(Transition::to(session))
        }

        GameAction::AddPlayer {
            name,
            initial_score,
        } => {
            let mut session = current.ok_or(GameError::InvalidState)?.clone();
            let player = add_player(&mut session, &name, initial_score, now)?;
            log::info!(
                "Game {}: {} joined with {} points",
                session.id,
                player.name,
                initial_score
            );
            settle(&mut session, now);
            Ok(Transition::to(session))
        }

        GameAction::UndoRound => {
            let mut session = current.ok_or(GameError::InvalidState)?.clone();
            if undo_last_round(&mut session) {
                session.players = calculate_totals(
                    &session.players,
                    &session.rounds,
                    &session.player_added_events,
                    session.winning_score,
                );
            }
            Ok(Transition::to(session))
        }

        GameAction::Reset => {
            if let Some(s) = current {
                log::info!("Game {} reset", s.id);
            }
            Ok(Transition::empty())
        }

        GameAction::FinishManually => {
            let Some(session) = current else {
                return Ok(Transition::empty());
            };
            if session.is_finished() {
                return Err(GameError::InvalidState);
            }
            let Some(leader) = leading_player(&session.players).cloned() else {
                return Ok(Transition::to(session.clone()));
            };
            let mut finished = session.clone();
            log::info!(
                "Game {} finished manually, {} leads with {}",
                finished.id,
                leader.name,
                leader.total_score
            );
            finished.winner = Some(leader);
            finished.finished_at = Some(now);
            Ok(Transition {
                session: None,
                completed: CompletedGame::from_session(&finished),
            })
        }

        GameAction::LoadSession(mut saved) => {
            if current.is_some() {
                return Err(GameError::InvalidState);
            }
            // Stored totals are not trusted; rounds and join events are.
            saved.players = calculate_totals(
                &saved.players,
                &saved.rounds,
                &saved.player_added_events,
                saved.winning_score,
            );
            log::info!("Game {} loaded with {} rounds", saved.id, saved.rounds.len());
            Ok(Transition {
                session: Some(saved),
                completed: None,
            })
        }
    }
}
