use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::piece::{Tetromino, TetrominoType};

// ============================================================================
// Piece Provider Trait
// ============================================================================

/// Source of piece types. Each call yields the type of the next piece.
pub trait PieceProvider {
    fn next_piece(&mut self) -> TetrominoType;
}

/// Uniform, independent draws over the seven types.
pub struct RandomPieceProvider<R = StdRng> {
    rng: R,
}

impl RandomPieceProvider<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> RandomPieceProvider<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> PieceProvider for RandomPieceProvider<R> {
    fn next_piece(&mut self) -> TetrominoType {
        TetrominoType::ALL[self.rng.gen_range(0..TetrominoType::ALL.len())]
    }
}

/// Replays a fixed list of types, wrapping around at the end.
pub struct SequencePieceProvider {
    pieces: Vec<TetrominoType>,
    index: usize,
}

impl SequencePieceProvider {
    /// Returns `None` for an empty list, which has nothing to replay.
    pub fn new(pieces: Vec<TetrominoType>) -> Option<Self> {
        if pieces.is_empty() {
            return None;
        }
        Some(Self { pieces, index: 0 })
    }
}

impl PieceProvider for SequencePieceProvider {
    fn next_piece(&mut self) -> TetrominoType {
        let piece = self.pieces[self.index % self.pieces.len()];
        self.index += 1;
        piece
    }
}

// ============================================================================
// Generator
// ============================================================================

/// Turns provider draws into pieces placed at the spawn position.
pub struct PieceGenerator {
    provider: Box<dyn PieceProvider>,
    grid_width: usize,
}

impl PieceGenerator {
    pub fn new(provider: Box<dyn PieceProvider>, grid_width: usize) -> Self {
        Self {
            provider,
            grid_width,
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Tetromino {
        Tetromino::new(self.provider.next_piece(), self.grid_width)
    }
}
