//! Runtime configuration from environment variables.

use crate::models::{Score, DEFAULT_WINNING_SCORE};
use std::env;
use std::path::PathBuf;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Directory for the saved game and statistics files.
    pub data_dir: PathBuf,
    /// Target used when a new game request does not specify one.
    pub default_winning_score: Score,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            data_dir: PathBuf::from("data"),
            default_winning_score: DEFAULT_WINNING_SCORE,
        }
    }
}

impl AppConfig {
    /// Read HOST, PORT, DATA_DIR and DEFAULT_WINNING_SCORE; anything unset or unparseable keeps its default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            data_dir: lookup("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            default_winning_score: lookup("DEFAULT_WINNING_SCORE")
                .and_then(|s| s.parse().ok())
                .filter(|s: &Score| *s > 0)
                .unwrap_or(defaults.default_winning_score),
        }
    }
}
