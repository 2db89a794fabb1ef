//! Best score per player, persisted as a small JSON file.
//!
//! Lives outside the engine: the front-end feeds it the final score carried by
//! [`crate::GameEvent::GameOver`].

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::HighScoreError;

pub const DEFAULT_HIGH_SCORE_FILE: &str = "highscores.json";

#[derive(Clone, Default, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HighScores {
    scores: BTreeMap<String, u64>,
}

impl HighScores {
    /// Loads the table at `path`. A missing file is an empty table.
    pub fn load(path: &Path) -> Result<Self, HighScoreError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("no high score file at {}", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(HighScoreError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        serde_json::from_str(&text).map_err(|source| HighScoreError::Format {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), HighScoreError> {
        let text = serde_json::to_string_pretty(self).map_err(|source| HighScoreError::Format {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, text).map_err(|source| HighScoreError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn best(&self, player: &str) -> u64 {
        self.scores.get(player).copied().unwrap_or(0)
    }

    /// Stores `score` if it beats the player's best. Returns whether it did.
    pub fn record(&mut self, player: &str, score: u64) -> bool {
        if score <= self.best(player) {
            return false;
        }
        info!("new best score for {player}: {score}");
        self.scores.insert(player.to_string(), score);
        true
    }
}

/// [`HighScores`] bound to the file it was loaded from.
pub struct HighScoreStore {
    path: PathBuf,
    scores: HighScores,
}

impl HighScoreStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, HighScoreError> {
        let path = path.into();
        let scores = HighScores::load(&path)?;
        Ok(Self { path, scores })
    }

    pub fn best(&self, player: &str) -> u64 {
        self.scores.best(player)
    }

    /// Records the score and writes the file when it is a new best.
    pub fn submit(&mut self, player: &str, score: u64) -> Result<bool, HighScoreError> {
        if !self.scores.record(player, score) {
            return Ok(false);
        }
        self.scores.save(&self.path)?;
        Ok(true)
    }
}
