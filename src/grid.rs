use crate::piece::{Tetromino, TetrominoType};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum CellState {
    #[default]
    Empty,
    Filled(TetrominoType),
}

impl CellState {
    pub fn is_filled(self) -> bool {
        self != CellState::Empty
    }

    /// Numeric cell value: 0 for empty, the piece type id otherwise.
    pub fn value(self) -> u8 {
        match self {
            CellState::Empty => 0,
            CellState::Filled(t) => t.id(),
        }
    }
}

/// Board of locked cells. Dimensions are fixed at construction.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Grid {
    width: usize,
    height: usize,
    rows: Vec<Vec<CellState>>,
}

impl Grid {
    /// Callers validate dimensions through [`crate::GameConfig`] first.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            rows: vec![vec![CellState::Empty; width]; height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn rows(&self) -> &[Vec<CellState>] {
        &self.rows
    }

    pub fn get(&self, x: usize, y: usize) -> CellState {
        self.rows[y][x]
    }

    pub fn set(&mut self, x: usize, y: usize, cell: CellState) {
        self.rows[y][x] = cell;
    }

    /// True when any occupied cell of `piece` leaves the side walls, passes the
    /// floor, or overlaps a locked cell. Cells above row 0 only meet the walls.
    pub fn collides(&self, piece: &Tetromino) -> bool {
        piece.blocks().into_iter().any(|block| {
            if block.x < 0 || block.x >= self.width as i16 || block.y >= self.height as i16 {
                return true;
            }
            block.y >= 0 && self.rows[block.y as usize][block.x as usize].is_filled()
        })
    }

    /// Writes the piece's cells into the board, skipping any outside it.
    pub fn lock(&mut self, piece: &Tetromino) {
        let cell = CellState::Filled(piece.tetromino_type);
        for block in piece.blocks() {
            if block.x >= 0
                && block.y >= 0
                && (block.x as usize) < self.width
                && (block.y as usize) < self.height
            {
                self.rows[block.y as usize][block.x as usize] = cell;
            }
        }
    }

    /// Removes every full row bottom-up, inserting an empty row on top for each,
    /// and returns how many were removed.
    pub fn clear_lines(&mut self) -> u32 {
        let mut cleared = 0;
        let mut y = self.height;

        while y > 0 {
            if self.is_row_complete(y - 1) {
                self.rows.remove(y - 1);
                self.rows.insert(0, vec![CellState::Empty; self.width]);
                cleared += 1;
                // Re-examine the same index: the row above has shifted into it.
            } else {
                y -= 1;
            }
        }

        cleared
    }

    pub fn is_row_complete(&self, y: usize) -> bool {
        self.rows[y].iter().all(|cell| cell.is_filled())
    }

    pub fn filled_count_in_row(&self, y: usize) -> usize {
        self.rows[y].iter().filter(|cell| cell.is_filled()).count()
    }

    pub fn total_filled_cells(&self) -> usize {
        self.rows.iter().flatten().filter(|cell| cell.is_filled()).count()
    }
}
