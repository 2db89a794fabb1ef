//! Falling-block puzzle engine.
//!
//! [`Game`] owns the board, the active and queued pieces and the score state.
//! A front-end feeds it [`Command`]s plus elapsed time through
//! [`Game::tick`], then drains [`GameEvent`]s with [`Game::take_events`].

pub mod config;
pub mod error;
pub mod game;
pub mod generator;
pub mod grid;
pub mod highscore;
pub mod piece;

pub use config::{GameConfig, GRID_HEIGHT, GRID_WIDTH, MAX_GRID_DIMENSION};
pub use error::{ConfigError, HighScoreError};
pub use game::{Command, EngineState, Game, GameEvent, GameState, SCORE_TABLE};
pub use generator::{PieceGenerator, PieceProvider, RandomPieceProvider, SequencePieceProvider};
pub use grid::{CellState, Grid};
pub use highscore::{HighScoreStore, HighScores};
pub use piece::{Matrix, Position, Tetromino, TetrominoType};
