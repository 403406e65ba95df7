//! Score accumulation with the bust rule.
//!
//! Totals are never stored incrementally: every call recomputes them from the
//! round history and the join events, so the result depends only on its inputs.

use crate::models::{Player, PlayerAddedEvent, PlayerId, Round, Score};
use std::collections::HashMap;

/// Total for one player.
///
/// 1. Start from the join event's `initial_score` (late joiner) or 0.
/// 2. Walk rounds in order, skipping those stamped before the join.
/// 3. Add each delta unless the result would exceed `winning_score`, in which case
///    the delta is dropped and the total stays where it was.
pub fn player_total(
    player_id: &str,
    rounds: &[Round],
    added_events: &[PlayerAddedEvent],
    winning_score: Score,
) -> Score {
    let joined = added_events.iter().find(|e| e.player_id == player_id);
    let (mut total, joined_at) = match joined {
        Some(event) => (event.initial_score, Some(event.timestamp)),
        None => (0, None),
    };

    for round in rounds {
        if joined_at.is_some_and(|t| round.timestamp < t) {
            continue;
        }
        let candidate = total.saturating_add(round.score_for(player_id));
        if candidate > winning_score {
            continue;
        }
        total = candidate;
    }
    total
}

/// Players with `total_score` recomputed from the full history. Roster order is kept.
pub fn calculate_totals(
    players: &[Player],
    rounds: &[Round],
    added_events: &[PlayerAddedEvent],
    winning_score: Score,
) -> Vec<Player> {
    players
        .iter()
        .map(|p| Player {
            total_score: player_total(&p.id, rounds, added_events, winning_score),
            ..p.clone()
        })
        .collect()
}

/// Which players' deltas in `new_scores` would push them over `winning_score`,
/// judged against the totals before the new round. Only busting players get an entry.
pub fn calculate_ignored_scores(
    players: &[Player],
    existing_rounds: &[Round],
    added_events: &[PlayerAddedEvent],
    new_scores: &HashMap<PlayerId, Score>,
    winning_score: Score,
) -> HashMap<PlayerId, bool> {
    players
        .iter()
        .filter_map(|p| {
            let current = player_total(&p.id, existing_rounds, added_events, winning_score);
            let delta = new_scores.get(&p.id).copied().unwrap_or(0);
            (current.saturating_add(delta) > winning_score).then(|| (p.id.clone(), true))
        })
        .collect()
}
