//! CSV export of the completed-game history.

use crate::models::GameStats;

/// One row per completed game, newest first, with a header row.
pub fn history_to_csv(stats: &GameStats) -> Result<String, csv::Error> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record([
        "id",
        "winner",
        "winner_score",
        "rounds",
        "players",
        "started_at",
        "finished_at",
        "scores",
    ])?;
    for game in &stats.games_history {
        let scores = game
            .players
            .iter()
            .map(|p| format!("{}:{}", p.name, p.total_score))
            .collect::<Vec<_>>()
            .join("; ");
        wtr.write_record([
            game.id.clone(),
            game.winner.name.clone(),
            game.winner.total_score.to_string(),
            game.rounds.to_string(),
            game.players.len().to_string(),
            game.started_at.to_rfc3339(),
            game.finished_at.to_rfc3339(),
            scores,
        ])?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
