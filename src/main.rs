use std::{
    error::Error,
    fs::File,
    io::{self, stdout, Stdout},
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use log::warn;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};

use blocktris::{
    highscore::DEFAULT_HIGH_SCORE_FILE, CellState, Command, Game, GameConfig, GameEvent,
    GameState, HighScoreStore, TetrominoType, GRID_HEIGHT, GRID_WIDTH,
};

// ============================================================================
// Command Line
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "blocktris", about = "Falling-block puzzle in the terminal")]
struct Args {
    /// Seed for the piece sequence (random when omitted).
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, default_value_t = GRID_WIDTH)]
    width: usize,
    #[arg(long, default_value_t = GRID_HEIGHT)]
    height: usize,
    /// Name the best score is kept under.
    #[arg(long, default_value = "player")]
    player: String,
    #[arg(long, default_value = DEFAULT_HIGH_SCORE_FILE)]
    scores_file: PathBuf,
    /// Write logs here (filtered by RUST_LOG); nothing is logged otherwise.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

// ============================================================================
// Visual Constants
// ============================================================================

const CELL_WIDTH: u16 = 2;
const BLOCK_CHAR: &str = "██";
const GHOST_CHAR: &str = "░░";
const EMPTY_CHAR: &str = "  ";
const FRAME_MS: u64 = 16;

// ============================================================================
// Color Mapping
// ============================================================================

fn tetromino_color(t: TetrominoType) -> Color {
    match t {
        TetrominoType::I => Color::Rgb(255, 0, 85),
        TetrominoType::O => Color::Rgb(0, 170, 255),
        TetrominoType::T => Color::Rgb(0, 255, 102),
        TetrominoType::J => Color::Rgb(255, 0, 255),
        TetrominoType::L => Color::Rgb(255, 128, 0),
        TetrominoType::S => Color::Rgb(255, 255, 0),
        TetrominoType::Z => Color::Rgb(68, 68, 255),
    }
}

// ============================================================================
// Rendering
// ============================================================================

struct Hud<'a> {
    player: &'a str,
    best: u64,
}

fn render(frame: &mut Frame, game: &Game, hud: &Hud) {
    let area = frame.size();

    render_game(frame, game, hud, area);
    match game.state() {
        GameState::Running => {}
        GameState::Paused => render_paused(frame, area),
        GameState::GameOver => render_game_over(frame, game, hud, area),
    }
}

fn render_game(frame: &mut Frame, game: &Game, hud: &Hud, area: Rect) {
    let grid_display_width = (game.grid().width() as u16 * CELL_WIDTH) + 2;
    let grid_display_height = game.grid().height() as u16 + 2;
    let preview_width = 12;
    let info_width = 16;
    let total_width = grid_display_width + preview_width + info_width + 4;
    let total_height = grid_display_height + 3;

    let main_area = centered_rect(total_width, total_height, area);

    let vertical = Layout::vertical([
        Constraint::Length(grid_display_height),
        Constraint::Fill(1),
    ])
    .split(main_area);

    let game_row = vertical[0];

    // Layout: [Grid][Preview][Info]
    let horizontal = Layout::horizontal([
        Constraint::Length(grid_display_width),
        Constraint::Length(preview_width),
        Constraint::Length(info_width),
    ])
    .split(game_row);

    render_grid(frame, game, horizontal[0]);
    render_preview(frame, game, horizontal[1]);
    render_info(frame, game, hud, horizontal[2]);

    let controls_area = Rect {
        x: area.x,
        y: game_row.y + game_row.height,
        width: area.width,
        height: 2,
    };

    if controls_area.y + 1 < area.height {
        let controls = Paragraph::new(vec![Line::from(
            "←→/AD: Move | ↑/W: Rotate | ↓/S: Drop | R/Space: Hard drop | P: Pause | N: New | Q: Quit",
        )])
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(controls, controls_area);
    }
}

fn render_grid(frame: &mut Frame, game: &Game, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Blocktris ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let visual_grid = game.render_grid();

    let piece = game.current_piece();
    let mut ghost = piece.clone();
    ghost.position = game.ghost_position();
    let ghost_blocks = ghost.blocks();
    let ghost_style = Style::default().fg(tetromino_color(piece.tetromino_type));

    let mut lines: Vec<Line> = Vec::new();

    for (y, row) in visual_grid.iter().enumerate() {
        let mut spans: Vec<Span> = Vec::new();

        for (x, cell) in row.iter().enumerate() {
            let (symbol, style) = match cell {
                CellState::Filled(piece_type) => {
                    (BLOCK_CHAR, Style::default().fg(tetromino_color(*piece_type)))
                }
                CellState::Empty
                    if ghost_blocks
                        .iter()
                        .any(|b| b.x == x as i16 && b.y == y as i16) =>
                {
                    (GHOST_CHAR, ghost_style)
                }
                CellState::Empty => (EMPTY_CHAR, Style::default()),
            };

            spans.push(Span::styled(symbol, style));
        }

        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_preview(frame: &mut Frame, game: &Game, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Next ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let next = game.next_piece();
    let color = tetromino_color(next.tetromino_type);

    let mut lines: Vec<Line> = vec![Line::from("")];
    for row in next.matrix.iter().filter(|row| row.iter().any(|c| c.is_filled())) {
        let mut spans: Vec<Span> = vec![Span::raw(" ")];
        for cell in row {
            if cell.is_filled() {
                spans.push(Span::styled(BLOCK_CHAR, Style::default().fg(color)));
            } else {
                spans.push(Span::raw(EMPTY_CHAR));
            }
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_info(frame: &mut Frame, game: &Game, hud: &Hud, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Info ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        Line::from(hud.player.to_string()),
        Line::from(""),
        Line::from(Span::styled("Score", Style::default().fg(Color::Yellow))),
        Line::from(format!("{}", game.score())),
        Line::from(""),
        Line::from(Span::styled("Lines", Style::default().fg(Color::Cyan))),
        Line::from(format!("{}", game.lines())),
        Line::from(""),
        Line::from(Span::styled("Level", Style::default().fg(Color::Green))),
        Line::from(format!("{}", game.level())),
        Line::from(""),
        Line::from(Span::styled("Best", Style::default().fg(Color::Magenta))),
        Line::from(format!("{}", hud.best)),
    ];

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}

fn render_game_over(frame: &mut Frame, game: &Game, hud: &Hud, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("GAME OVER", Style::default().fg(Color::Red))),
        Line::from(""),
        Line::from(format!("Score: {}", game.score())),
        Line::from(format!("Best: {}", hud.best)),
        Line::from(""),
        Line::from(Span::styled(
            "N: new game",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(
            "Q/ESC: quit",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Game Over ")
            .title_alignment(Alignment::Center)
            .style(Style::default().bg(Color::Black)),
    );

    let popup_area = centered_rect(24, 12, area);
    frame.render_widget(paragraph, popup_area);
}

fn render_paused(frame: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("PAUSED", Style::default().fg(Color::Yellow))),
        Line::from(""),
        Line::from(Span::styled(
            "Press P to continue",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(
            "Press ESC to quit",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Paused ")
            .title_alignment(Alignment::Center)
            .style(Style::default().bg(Color::Black)),
    );

    let popup_area = centered_rect(24, 10, area);
    frame.render_widget(paragraph, popup_area);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let horizontal = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(width.min(area.width)),
        Constraint::Fill(1),
    ])
    .split(area);

    let vertical = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height.min(area.height)),
        Constraint::Fill(1),
    ])
    .split(horizontal[1]);

    vertical[1]
}

// ============================================================================
// Input
// ============================================================================

enum Input {
    Quit,
    Command(Command),
}

fn map_key(code: KeyCode) -> Option<Input> {
    let command = match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => return Some(Input::Quit),
        KeyCode::Char('p') | KeyCode::Char('P') => Command::TogglePause,
        KeyCode::Char('n') | KeyCode::Char('N') => Command::Reset,
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Command::MoveLeft,
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Command::MoveRight,
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Command::SoftDrop,
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Command::Rotate,
        KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::Char(' ') => Command::HardDrop,
        _ => return None,
    };
    Some(Input::Command(command))
}

// ============================================================================
// Main Loop
// ============================================================================

fn init_logging(path: Option<&Path>) -> io::Result<()> {
    if let Some(path) = path {
        let file = File::create(path)?;
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .target(env_logger::Target::Pipe(Box::new(file)))
            .init();
    }
    Ok(())
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    game: &mut Game,
    scores: &mut HighScoreStore,
    player: &str,
) -> io::Result<()> {
    let frame_duration = Duration::from_millis(FRAME_MS);
    let mut last_frame = Instant::now();
    let mut best = scores.best(player);

    loop {
        terminal.draw(|frame| render(frame, game, &Hud { player, best }))?;

        let timeout = frame_duration
            .checked_sub(last_frame.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match map_key(key.code) {
                        Some(Input::Quit) => break,
                        Some(Input::Command(command)) => {
                            game.apply(command);
                        }
                        None => {}
                    }
                }
            }
        }

        let elapsed = last_frame.elapsed();
        if elapsed >= frame_duration {
            game.tick(elapsed.as_secs_f64() * 1000.0);
            last_frame = Instant::now();
        }

        for event in game.take_events() {
            if let GameEvent::GameOver { final_score } = event {
                if let Err(err) = scores.submit(player, final_score) {
                    warn!("could not save high score: {err}");
                }
                best = scores.best(player);
            }
        }
    }

    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let config = GameConfig {
        width: args.width,
        height: args.height,
        seed: args.seed,
    };
    let mut game = Game::with_config(config)?;
    let mut scores = HighScoreStore::open(&args.scores_file)?;

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut game, &mut scores, &args.player);

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    Ok(result?)
}
