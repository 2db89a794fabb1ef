use log::{debug, info};

use crate::config::GameConfig;
use crate::error::ConfigError;
use crate::generator::{PieceGenerator, PieceProvider, RandomPieceProvider};
use crate::grid::{CellState, Grid};
use crate::piece::{Matrix, Position, Tetromino};

// ============================================================================
// Configuration
// ============================================================================

/// Base points per lock, indexed by the number of rows it cleared.
pub const SCORE_TABLE: [u64; 5] = [0, 40, 100, 300, 1200];
pub const LINES_PER_LEVEL: u32 = 10;

// Timing (in milliseconds)
pub const BASE_DROP_INTERVAL_MS: f64 = 1000.0;

pub fn level_for_lines(lines: u32) -> u32 {
    lines / LINES_PER_LEVEL + 1
}

pub fn drop_interval_for_level(level: u32) -> f64 {
    BASE_DROP_INTERVAL_MS / level as f64
}

pub fn score_for_lines(count: u32, level: u32) -> u64 {
    SCORE_TABLE[count.min(4) as usize] * level as u64
}

// ============================================================================
// Types
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameState {
    Running,
    Paused,
    GameOver,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Command {
    MoveLeft,
    MoveRight,
    SoftDrop,
    HardDrop,
    Rotate,
    TogglePause,
    Reset,
    Tick(f64),
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum GameEvent {
    PieceLocked { matrix: Matrix, position: Position },
    LinesCleared { count: u32 },
    StatsChanged { score: u64, lines: u32, level: u32 },
    LevelUp(u32),
    Paused,
    Resumed,
    GameReset,
    GameOver { final_score: u64 },
}

/// Score, progression and timing of one game.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct EngineState {
    pub score: u64,
    pub lines: u32,
    pub level: u32,
    pub drop_interval_ms: f64,
    /// Time accumulated towards the next gravity step.
    pub drop_counter_ms: f64,
    pub state: GameState,
}

impl EngineState {
    fn new() -> Self {
        Self {
            score: 0,
            lines: 0,
            level: 1,
            drop_interval_ms: BASE_DROP_INTERVAL_MS,
            drop_counter_ms: 0.0,
            state: GameState::Running,
        }
    }
}

// ============================================================================
// Game
// ============================================================================

pub struct Game {
    grid: Grid,
    current_piece: Tetromino,
    next_piece: Tetromino,
    stats: EngineState,
    generator: PieceGenerator,
    events: Vec<GameEvent>,
}

// ============================================================================
// Game Logic
// ============================================================================

impl Game {
    /// Standard 10x20 board fed by an unseeded random generator.
    pub fn new() -> Self {
        let config = GameConfig::default();
        Self::start(
            Grid::new(config.width, config.height),
            Box::new(RandomPieceProvider::from_entropy()),
        )
    }

    pub fn with_config(config: GameConfig) -> Result<Self, ConfigError> {
        let provider: Box<dyn PieceProvider> = match config.seed {
            Some(seed) => Box::new(RandomPieceProvider::seeded(seed)),
            None => Box::new(RandomPieceProvider::from_entropy()),
        };
        Self::with_provider(config, provider)
    }

    /// The config's seed is ignored; `provider` supplies every piece.
    pub fn with_provider(
        config: GameConfig,
        provider: Box<dyn PieceProvider>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::start(Grid::new(config.width, config.height), provider))
    }

    /// Game resumed from an arbitrary board with `current_piece` already in play.
    /// A piece that overlaps the board starts the game over, as a blocked spawn would.
    pub fn with_grid(
        grid: Grid,
        current_piece: Tetromino,
        provider: Box<dyn PieceProvider>,
    ) -> Self {
        let mut generator = PieceGenerator::new(provider, grid.width());
        let next_piece = generator.next();
        let mut game = Self {
            grid,
            current_piece,
            next_piece,
            stats: EngineState::new(),
            generator,
            events: Vec::new(),
        };
        game.check_spawn();
        game
    }

    fn start(grid: Grid, provider: Box<dyn PieceProvider>) -> Self {
        let mut generator = PieceGenerator::new(provider, grid.width());
        let current_piece = generator.next();
        let next_piece = generator.next();
        debug!(
            "new {}x{} game, first piece {:?}",
            grid.width(),
            grid.height(),
            current_piece.tetromino_type
        );
        Self {
            grid,
            current_piece,
            next_piece,
            stats: EngineState::new(),
            generator,
            events: Vec::new(),
        }
    }

    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::MoveLeft => self.move_horizontal(-1),
            Command::MoveRight => self.move_horizontal(1),
            Command::SoftDrop => self.soft_drop(),
            Command::HardDrop => self.hard_drop(),
            Command::Rotate => self.rotate(),
            Command::TogglePause => self.toggle_pause(),
            Command::Reset => {
                self.reset();
                true
            }
            Command::Tick(elapsed_ms) => self.tick(elapsed_ms),
        }
    }

    fn is_running(&self) -> bool {
        self.stats.state == GameState::Running
    }

    fn try_move(&mut self, dx: i16, dy: i16) -> bool {
        let moved = self.current_piece.moved(dx, dy);
        if self.grid.collides(&moved) {
            return false;
        }
        self.current_piece = moved;
        true
    }

    pub fn move_horizontal(&mut self, dx: i16) -> bool {
        if !self.is_running() {
            return false;
        }
        self.try_move(dx, 0)
    }

    /// Returns true when the piece moved down; false when it locked instead.
    pub fn soft_drop(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        if self.try_move(0, 1) {
            return true;
        }
        self.lock_and_spawn();
        false
    }

    pub fn hard_drop(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        while self.try_move(0, 1) {}
        self.lock_and_spawn();
        true
    }

    /// Clockwise turn at the current position, rejected if it would collide.
    pub fn rotate(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        let rotated = self.current_piece.rotated();
        if self.grid.collides(&rotated) {
            return false;
        }
        self.current_piece = rotated;
        true
    }

    /// Advances the gravity timer and reports whether a gravity step ran.
    ///
    /// The counter restarts from zero after each step, so time past the
    /// interval is dropped rather than carried into the next one. Negative or
    /// non-finite elapsed times are ignored.
    pub fn tick(&mut self, elapsed_ms: f64) -> bool {
        if !self.is_running() || !elapsed_ms.is_finite() || elapsed_ms < 0.0 {
            return false;
        }
        self.stats.drop_counter_ms += elapsed_ms;
        if self.stats.drop_counter_ms > self.stats.drop_interval_ms {
            self.soft_drop();
            self.stats.drop_counter_ms = 0.0;
            return true;
        }
        false
    }

    pub fn toggle_pause(&mut self) -> bool {
        match self.stats.state {
            GameState::Running => {
                self.stats.state = GameState::Paused;
                self.events.push(GameEvent::Paused);
                true
            }
            GameState::Paused => {
                self.stats.state = GameState::Running;
                self.events.push(GameEvent::Resumed);
                true
            }
            GameState::GameOver => false,
        }
    }

    pub fn reset(&mut self) {
        self.grid = Grid::new(self.grid.width(), self.grid.height());
        self.stats = EngineState::new();
        self.next_piece = self.generator.next();
        self.spawn_next_piece();

        info!("game reset");
        self.events.push(GameEvent::GameReset);
        self.push_stats();
    }

    /// Lock, clear and spawn run back to back so no caller sees a half-landed piece.
    fn lock_and_spawn(&mut self) {
        self.grid.lock(&self.current_piece);
        debug!(
            "locked {:?} at {:?}",
            self.current_piece.tetromino_type, self.current_piece.position
        );
        self.events.push(GameEvent::PieceLocked {
            matrix: self.current_piece.matrix.clone(),
            position: self.current_piece.position,
        });

        self.clear_lines();
        self.spawn_next_piece();
    }

    /// Removes full rows and credits them to score, lines and level.
    pub fn clear_lines(&mut self) -> u32 {
        let count = self.grid.clear_lines();
        if count == 0 {
            return 0;
        }

        let previous_level = self.stats.level;
        self.stats.lines += count;
        self.stats.score += score_for_lines(count, previous_level);
        self.stats.level = level_for_lines(self.stats.lines);
        self.stats.drop_interval_ms = drop_interval_for_level(self.stats.level);

        info!(
            "cleared {} line(s), score {} lines {}",
            count, self.stats.score, self.stats.lines
        );
        self.events.push(GameEvent::LinesCleared { count });
        if self.stats.level > previous_level {
            info!("level up to {}", self.stats.level);
            self.events.push(GameEvent::LevelUp(self.stats.level));
        }
        self.push_stats();

        count
    }

    fn push_stats(&mut self) {
        self.events.push(GameEvent::StatsChanged {
            score: self.stats.score,
            lines: self.stats.lines,
            level: self.stats.level,
        });
    }

    /// Promotes the queued piece and queues a fresh one. A blocked spawn ends the game.
    pub fn spawn_next_piece(&mut self) {
        let queued = self.generator.next();
        self.current_piece = std::mem::replace(&mut self.next_piece, queued);
        debug!(
            "spawned {:?}, next {:?}",
            self.current_piece.tetromino_type, self.next_piece.tetromino_type
        );
        self.check_spawn();
    }

    fn check_spawn(&mut self) {
        if self.grid.collides(&self.current_piece) {
            self.stats.state = GameState::GameOver;
            info!("game over, final score {}", self.stats.score);
            self.events.push(GameEvent::GameOver {
                final_score: self.stats.score,
            });
        }
    }

    /// Where the active piece would come to rest if dropped now.
    pub fn ghost_position(&self) -> Position {
        let mut ghost = self.current_piece.clone();
        while !self.grid.collides(&ghost) {
            ghost.position.y += 1;
        }
        ghost.position.y -= 1;
        ghost.position
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn current_piece(&self) -> &Tetromino {
        &self.current_piece
    }

    pub fn next_piece(&self) -> &Tetromino {
        &self.next_piece
    }

    pub fn stats(&self) -> &EngineState {
        &self.stats
    }

    pub fn state(&self) -> GameState {
        self.stats.state
    }

    pub fn score(&self) -> u64 {
        self.stats.score
    }

    pub fn lines(&self) -> u32 {
        self.stats.lines
    }

    pub fn level(&self) -> u32 {
        self.stats.level
    }

    pub fn drop_interval_ms(&self) -> f64 {
        self.stats.drop_interval_ms
    }

    pub fn is_game_over(&self) -> bool {
        self.stats.state == GameState::GameOver
    }

    /// Returns the visual grid state with the current piece overlaid
    pub fn render_grid(&self) -> Vec<Vec<CellState>> {
        let mut visual_grid = self.grid.rows().to_vec();
        let cell = CellState::Filled(self.current_piece.tetromino_type);

        for block in self.current_piece.blocks() {
            if block.y >= 0
                && block.x >= 0
                && (block.y as usize) < self.grid.height()
                && (block.x as usize) < self.grid.width()
            {
                visual_grid[block.y as usize][block.x as usize] = cell;
            }
        }

        visual_grid
    }

    /// Takes and clears all pending events
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

pub mod test_helpers {
    use super::*;
    use crate::config::{GRID_HEIGHT, GRID_WIDTH};
    use crate::piece::TetrominoType;

    pub fn empty_grid() -> Grid {
        Grid::new(GRID_WIDTH, GRID_HEIGHT)
    }

    pub fn fill_row(grid: &mut Grid, y: usize) {
        for x in 0..grid.width() {
            grid.set(x, y, CellState::Filled(TetrominoType::T));
        }
    }

    pub fn fill_row_with_gap(grid: &mut Grid, y: usize, gap_x: usize) {
        for x in 0..grid.width() {
            if x != gap_x {
                grid.set(x, y, CellState::Filled(TetrominoType::T));
            }
        }
    }
}
