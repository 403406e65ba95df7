//! Player roster: name validation and mid-game additions.

use crate::models::{generate_id, GameError, GameSession, Player, PlayerAddedEvent, Score};
use chrono::{DateTime, Utc};

/// Trim starting names, drop blanks, and check there are at least 2 unique ones.
pub fn validate_starting_names(names: &[String]) -> Result<Vec<String>, GameError> {
    let trimmed: Vec<String> = names
        .iter()
        .map(|n| n.trim())
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .collect();
    if trimmed.len() < 2 {
        return Err(GameError::NotEnoughPlayers);
    }
    for (i, name) in trimmed.iter().enumerate() {
        let lower = name.to_lowercase();
        if trimmed[..i].iter().any(|earlier| earlier.to_lowercase() == lower) {
            return Err(GameError::DuplicateName(name.clone()));
        }
    }
    Ok(trimmed)
}

/// Trimmed name if it is non-empty and not already taken (case-insensitive).
pub fn validate_new_name(session: &GameSession, name: &str) -> Result<String, GameError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(GameError::EmptyName);
    }
    if session.players.iter().any(|p| p.has_name(name)) {
        return Err(GameError::DuplicateName(name.to_string()));
    }
    Ok(name.to_string())
}

/// Add a player mid-game starting from `initial_score`. Rounds recorded before
/// the join event never count for this player.
pub fn add_player(
    session: &mut GameSession,
    name: &str,
    initial_score: Score,
    now: DateTime<Utc>,
) -> Result<Player, GameError> {
    let name = validate_new_name(session, name)?;
    let player = Player {
        total_score: initial_score,
        ..Player::new(name)
    };
    let event = PlayerAddedEvent {
        id: generate_id(),
        player_id: player.id.clone(),
        player_name: player.name.clone(),
        initial_score,
        timestamp: session.next_timestamp(now),
    };
    session.player_added_events.push(event);
    session.players.push(player.clone());
    Ok(player)
}
