use crate::grid::CellState;

/// Square cell matrix of a piece, indexed `matrix[row][column]`.
pub type Matrix = Vec<Vec<CellState>>;

/// Edge length of the largest template (the I piece).
pub const MAX_TEMPLATE_SIZE: usize = 4;

// ============================================================================
// Types
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Position {
    pub x: i16,
    pub y: i16,
}

/// The seven shape templates, numbered 1..=7 in declaration order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum TetrominoType {
    I,
    O,
    T,
    J,
    L,
    S,
    Z,
}

impl TetrominoType {
    pub const ALL: [TetrominoType; 7] = [
        TetrominoType::I,
        TetrominoType::O,
        TetrominoType::T,
        TetrominoType::J,
        TetrominoType::L,
        TetrominoType::S,
        TetrominoType::Z,
    ];

    /// Cell value written into the grid for this type.
    pub fn id(self) -> u8 {
        match self {
            TetrominoType::I => 1,
            TetrominoType::O => 2,
            TetrominoType::T => 3,
            TetrominoType::J => 4,
            TetrominoType::L => 5,
            TetrominoType::S => 6,
            TetrominoType::Z => 7,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1..=7 => Some(Self::ALL[id as usize - 1]),
            _ => None,
        }
    }

    /// Occupancy of the spawn orientation, row by row.
    pub fn template(self) -> &'static [&'static [u8]] {
        match self {
            TetrominoType::I => &[&[0, 0, 0, 0], &[1, 1, 1, 1], &[0, 0, 0, 0], &[0, 0, 0, 0]],
            TetrominoType::O => &[&[1, 1], &[1, 1]],
            TetrominoType::T => &[&[0, 1, 0], &[1, 1, 1], &[0, 0, 0]],
            TetrominoType::J => &[&[1, 0, 0], &[1, 1, 1], &[0, 0, 0]],
            TetrominoType::L => &[&[0, 0, 1], &[1, 1, 1], &[0, 0, 0]],
            TetrominoType::S => &[&[0, 1, 1], &[1, 1, 0], &[0, 0, 0]],
            TetrominoType::Z => &[&[1, 1, 0], &[0, 1, 1], &[0, 0, 0]],
        }
    }

    pub fn size(self) -> usize {
        self.template().len()
    }

    /// Template copy with every occupied cell stamped with this type.
    pub fn matrix(self) -> Matrix {
        self.template()
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&cell| {
                        if cell != 0 {
                            CellState::Filled(self)
                        } else {
                            CellState::Empty
                        }
                    })
                    .collect()
            })
            .collect()
    }
}

/// Quarter turn clockwise: `out[x][n - 1 - y] = input[y][x]`.
pub fn rotate_matrix(matrix: &Matrix) -> Matrix {
    let n = matrix.len();
    let mut rotated = vec![vec![CellState::Empty; n]; n];
    for (y, row) in matrix.iter().enumerate() {
        for (x, &cell) in row.iter().enumerate() {
            rotated[x][n - 1 - y] = cell;
        }
    }
    rotated
}

// ============================================================================
// Tetromino
// ============================================================================

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Tetromino {
    pub tetromino_type: TetrominoType,
    pub matrix: Matrix,
    pub position: Position,
}

impl Tetromino {
    /// Spawn placement: horizontally centred on a board `grid_width` wide, row 0.
    pub fn new(tetromino_type: TetrominoType, grid_width: usize) -> Self {
        let x = (grid_width / 2) as i16 - (tetromino_type.size() / 2) as i16;
        Self::new_at(tetromino_type, x, 0)
    }

    pub fn new_at(tetromino_type: TetrominoType, x: i16, y: i16) -> Self {
        Self {
            tetromino_type,
            matrix: tetromino_type.matrix(),
            position: Position { x, y },
        }
    }

    pub fn size(&self) -> usize {
        self.matrix.len()
    }

    /// Absolute positions of the occupied cells.
    pub fn blocks(&self) -> Vec<Position> {
        let mut blocks = Vec::with_capacity(4);
        for (dy, row) in self.matrix.iter().enumerate() {
            for (dx, cell) in row.iter().enumerate() {
                if cell.is_filled() {
                    blocks.push(Position {
                        x: self.position.x + dx as i16,
                        y: self.position.y + dy as i16,
                    });
                }
            }
        }
        blocks
    }

    /// Candidate turned clockwise in place; the position is kept.
    pub fn rotated(&self) -> Self {
        Self {
            tetromino_type: self.tetromino_type,
            matrix: rotate_matrix(&self.matrix),
            position: self.position,
        }
    }

    pub fn moved(&self, dx: i16, dy: i16) -> Self {
        Self {
            tetromino_type: self.tetromino_type,
            matrix: self.matrix.clone(),
            position: Position {
                x: self.position.x + dx,
                y: self.position.y + dy,
            },
        }
    }
}
