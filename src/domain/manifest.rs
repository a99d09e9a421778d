use crate::domain::game::Game;
use chrono::Local;
use serde::{Deserialize, Serialize};

/// Canonical feed written by `publish`. It is itself a valid `games` feed.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub total_games: usize,
    pub total_updates: usize,
    pub last_updated: String,
    pub games: Vec<Game>,
    pub metadata: ManifestMetadata,
}

#[derive(Default, Debug, Clone, Serialize, Deserialize)]
pub struct ManifestMetadata {
    pub source: String,
    pub version: String,
}

impl Manifest {
    pub fn new(games: Vec<Game>, source: impl Into<String>) -> Self {
        Self {
            total_games: games.len(),
            total_updates: games.iter().map(|g| g.updates.len()).sum(),
            last_updated: Local::now().to_rfc3339(),
            games,
            metadata: ManifestMetadata {
                source: source.into(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }
}
