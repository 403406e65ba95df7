//! Winner detection: exact match on the target, or highest total on manual finish.

use crate::models::{Player, Score};

/// First player (roster order) whose total equals `winning_score` exactly.
pub fn detect_winner(players: &[Player], winning_score: Score) -> Option<&Player> {
    players.iter().find(|p| p.total_score == winning_score)
}

/// Player with the strictly highest total; on a tie the earliest in the roster wins.
pub fn leading_player(players: &[Player]) -> Option<&Player> {
    players.iter().fold(None, |best: Option<&Player>, p| match best {
        Some(b) if b.total_score >= p.total_score => Some(b),
        _ => Some(p),
    })
}
