//! Property tests for the engine.
//!
//! Invariants covered:
//! - Rotation has order four for every template and position.
//! - Cells above row 0 never collide with board contents.
//! - Line clearing removes exactly the full rows and keeps the board height.
//! - Over seeded rollouts, score and lines never decrease and level and drop
//!   interval stay functions of lines.

use proptest::prelude::*;

use blocktris::game::{drop_interval_for_level, level_for_lines};
use blocktris::{
    CellState, Command, Game, GameConfig, GameState, Grid, Tetromino, TetrominoType, GRID_HEIGHT,
    GRID_WIDTH,
};

fn piece_type() -> impl Strategy<Value = TetrominoType> {
    prop::sample::select(TetrominoType::ALL.to_vec())
}

fn board() -> impl Strategy<Value = Vec<Vec<bool>>> {
    // Rows biased towards full so clears actually happen.
    prop::collection::vec(
        prop_oneof![
            Just(vec![true; GRID_WIDTH]),
            prop::collection::vec(any::<bool>(), GRID_WIDTH),
        ],
        GRID_HEIGHT,
    )
}

fn grid_from(cells: &[Vec<bool>]) -> Grid {
    let mut grid = Grid::new(GRID_WIDTH, GRID_HEIGHT);
    for (y, row) in cells.iter().enumerate() {
        for (x, &filled) in row.iter().enumerate() {
            if filled {
                grid.set(x, y, CellState::Filled(TetrominoType::Z));
            }
        }
    }
    grid
}

fn command(index: u8) -> Command {
    match index % 7 {
        0 => Command::MoveLeft,
        1 => Command::MoveRight,
        2 => Command::SoftDrop,
        3 => Command::HardDrop,
        4 => Command::Rotate,
        5 => Command::Tick(400.0),
        _ => Command::Tick(1200.0),
    }
}

proptest! {
    #[test]
    fn rotation_has_order_four(t in piece_type(), x in -3i16..10, y in -3i16..20) {
        let piece = Tetromino::new_at(t, x, y);
        let turned = piece.rotated().rotated().rotated().rotated();
        prop_assert_eq!(turned, piece);
    }

    #[test]
    fn hidden_cells_never_hit_the_board(
        cells in board(),
        t in piece_type(),
        turns in 0usize..4,
        x in 0i16..6,
    ) {
        let grid = grid_from(&cells);
        let mut piece = Tetromino::new_at(t, x, 0);
        for _ in 0..turns {
            piece = piece.rotated();
        }
        // Lift the piece until every cell sits above row 0.
        piece.position.y = -(piece.size() as i16);

        let in_columns = piece
            .blocks()
            .iter()
            .all(|b| b.x >= 0 && b.x < GRID_WIDTH as i16);
        prop_assert_eq!(grid.collides(&piece), !in_columns);
    }

    #[test]
    fn collision_matches_cell_overlap(
        cells in board(),
        t in piece_type(),
        x in -2i16..10,
        y in 0i16..20,
    ) {
        let grid = grid_from(&cells);
        let piece = Tetromino::new_at(t, x, y);

        let expected = piece.blocks().iter().any(|b| {
            b.x < 0
                || b.x >= GRID_WIDTH as i16
                || b.y >= GRID_HEIGHT as i16
                || cells[b.y as usize][b.x as usize]
        });
        prop_assert_eq!(grid.collides(&piece), expected);
    }

    #[test]
    fn clear_lines_removes_exactly_full_rows(cells in board()) {
        let mut grid = grid_from(&cells);
        let full = cells.iter().filter(|row| row.iter().all(|&c| c)).count();
        let survivors: Vec<Vec<bool>> = cells
            .iter()
            .filter(|row| !row.iter().all(|&c| c))
            .cloned()
            .collect();

        let cleared = grid.clear_lines();

        prop_assert_eq!(cleared as usize, full);
        prop_assert_eq!(grid.rows().len(), GRID_HEIGHT);
        for y in 0..GRID_HEIGHT {
            prop_assert!(!grid.is_row_complete(y));
        }
        // Empty rows on top, the remaining rows below in their original order.
        for y in 0..full {
            prop_assert_eq!(grid.filled_count_in_row(y), 0);
        }
        for (i, row) in survivors.iter().enumerate() {
            let actual: Vec<bool> = grid.rows()[full + i].iter().map(|c| c.is_filled()).collect();
            prop_assert_eq!(&actual, row);
        }
    }

    #[test]
    fn rollout_keeps_stats_consistent(
        seed in any::<u64>(),
        commands in prop::collection::vec(any::<u8>(), 1..200),
    ) {
        let mut game = Game::with_config(GameConfig::with_seed(seed)).unwrap();

        for index in commands {
            let before = *game.stats();
            game.apply(command(index));
            let after = *game.stats();

            prop_assert!(after.score >= before.score);
            prop_assert!(after.lines >= before.lines);
            prop_assert!(after.lines - before.lines <= 4);
            prop_assert_eq!(after.level, level_for_lines(after.lines));
            prop_assert_eq!(after.drop_interval_ms, drop_interval_for_level(after.level));
            prop_assert_eq!(game.grid().rows().len(), GRID_HEIGHT);
            prop_assert!(game.grid().rows().iter().all(|row| row.len() == GRID_WIDTH));

            if game.state() == GameState::GameOver {
                prop_assert!(game.grid().collides(game.current_piece()));
                break;
            }
            // A live piece never overlaps the board.
            prop_assert!(!game.grid().collides(game.current_piece()));
            let ghost = game.ghost_position();
            prop_assert_eq!(ghost.x, game.current_piece().position.x);
            prop_assert!(ghost.y >= game.current_piece().position.y);
        }
    }
}
