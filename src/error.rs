use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum ConfigError {
    #[error("board sides must be between {min} and {max} cells, got {width}x{height}")]
    InvalidDimensions {
        width: usize,
        height: usize,
        min: usize,
        max: usize,
    },
}

#[derive(Debug, Error)]
pub enum HighScoreError {
    #[error("failed to access high score file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("high score file {path} is not valid JSON")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
