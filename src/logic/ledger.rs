//! Round ledger: append a round, undo the most recent one.

use crate::logic::scoring::calculate_ignored_scores;
use crate::models::{generate_id, GameError, GameSession, PlayerId, Round, Score};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Append a round with the given scores. Every key must be a player in the roster;
/// players without an entry scored 0. The bust decision is frozen into `ignored_scores`.
pub fn append_round(
    session: &mut GameSession,
    scores: HashMap<PlayerId, Score>,
    now: DateTime<Utc>,
) -> Result<(), GameError> {
    if let Some(unknown) = scores.keys().find(|id| session.get_player(id).is_none()) {
        return Err(GameError::PlayerNotFound(unknown.clone()));
    }

    let ignored_scores = calculate_ignored_scores(
        &session.players,
        &session.rounds,
        &session.player_added_events,
        &scores,
        session.winning_score,
    );
    let round = Round {
        id: generate_id(),
        round_number: session.rounds.len() + 1,
        scores,
        timestamp: session.next_timestamp(now),
        ignored_scores,
    };
    log::debug!(
        "Game {}: round {} recorded ({} ignored)",
        session.id,
        round.round_number,
        round.ignored_scores.len()
    );
    session.rounds.push(round);
    Ok(())
}

/// Remove the most recent round and drop any declared winner.
/// Returns false (and leaves the session untouched) when there are no rounds.
pub fn undo_last_round(session: &mut GameSession) -> bool {
    let Some(round) = session.rounds.pop() else {
        return false;
    };
    log::debug!("Game {}: round {} undone", session.id, round.round_number);
    session.winner = None;
    session.finished_at = None;
    true
}
