use crate::error::ConfigError;
use crate::piece::MAX_TEMPLATE_SIZE;

pub const GRID_WIDTH: usize = 10;
pub const GRID_HEIGHT: usize = 20;

/// Largest board side. Piece coordinates are `i16` and stay in range with room
/// for a template hanging past either edge.
pub const MAX_GRID_DIMENSION: usize = i16::MAX as usize / 2;

/// Construction options for a [`crate::Game`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct GameConfig {
    pub width: usize,
    pub height: usize,
    /// Seed for the piece generator; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl GameConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Every template has to fit inside the board, and every cell must be
    /// addressable by a piece position.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let range = MAX_TEMPLATE_SIZE..=MAX_GRID_DIMENSION;
        if !range.contains(&self.width) || !range.contains(&self.height) {
            return Err(ConfigError::InvalidDimensions {
                width: self.width,
                height: self.height,
                min: MAX_TEMPLATE_SIZE,
                max: MAX_GRID_DIMENSION,
            });
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: GRID_WIDTH,
            height: GRID_HEIGHT,
            seed: None,
        }
    }
}
