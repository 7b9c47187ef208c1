use std::{
    fs::File,
    io::{self, stdout, Stdout},
    path::{Path, PathBuf},
    sync::Mutex,
    time::{Duration, Instant},
};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use tracing_subscriber::EnvFilter;

use voxtris::{
    GameConfig, GameSession, Intent, Mode, OccupancyGrid, Position, RandomShapeProvider, Snapshot,
    VoxelShape,
};

// ============================================================================
// Visual Constants
// ============================================================================

const CELL_WIDTH: u16 = 2;
const EMPTY_CHAR: &str = "  ";
const PIECE_CHAR: &str = "██";
// Settled mass, nearest first.
const DEPTH_CHARS: [&str; 4] = ["██", "▓▓", "▒▒", "░░"];
const PIECE_COLOR: Color = Color::Cyan;
const MASS_COLOR: Color = Color::Gray;
// Rows drawn above the grid so a freshly spawned piece is visible.
const HEADROOM: i32 = 2;
const FRAME: Duration = Duration::from_millis(16);

// ============================================================================
// Command Line
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "voxtris", about = "Falling blocks in a 3D voxel grid")]
struct Cli {
    /// TOML config file; falls back to $VOXTRIS_CONFIG, then built-in defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for piece selection
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file (filter with RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "voxtris=info".into()),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

// ============================================================================
// Rendering
// ============================================================================

fn render(frame: &mut Frame, snapshot: &Snapshot) {
    let area = frame.size();

    match snapshot.mode {
        Mode::Title => render_title(frame, snapshot, area),
        Mode::Playing => render_game(frame, snapshot, area),
        Mode::GameOver => render_game_over(frame, snapshot, area),
    }
}

fn render_game(frame: &mut Frame, snapshot: &Snapshot, area: Rect) {
    let size = snapshot.grid.size();
    let rows = (size.y + HEADROOM) as u16;
    let front_width = size.x as u16 * CELL_WIDTH + 2;
    let side_width = size.z as u16 * CELL_WIDTH + 2;
    let top_width = size.x as u16 * CELL_WIDTH + 2;
    let panel_width = 16;
    let total_width = front_width + side_width + top_width + panel_width;
    let total_height = rows + 2 + 2;

    let main_area = centered_rect(total_width, total_height, area);

    let vertical = Layout::vertical([Constraint::Length(rows + 2), Constraint::Fill(1)])
        .split(main_area);

    let game_row = vertical[0];

    // Layout: [Front][Side][Top][Next/Info]
    let horizontal = Layout::horizontal([
        Constraint::Length(front_width),
        Constraint::Length(side_width),
        Constraint::Length(top_width),
        Constraint::Length(panel_width),
    ])
    .split(game_row);

    render_front(frame, snapshot, horizontal[0]);
    render_side(frame, snapshot, horizontal[1]);
    render_top(frame, snapshot, horizontal[2]);

    let panels = Layout::vertical([Constraint::Length(8), Constraint::Fill(1)])
        .split(horizontal[3]);
    render_next(frame, snapshot.next_shape, panels[0]);
    render_info(frame, snapshot, panels[1]);

    let controls_area = Rect {
        x: area.x,
        y: game_row.y + game_row.height,
        width: area.width,
        height: 2,
    };

    if controls_area.y + 1 < area.height {
        let controls = Paragraph::new(vec![Line::from(
            "Arrows: Move | Q/E: Turn | A/D: Roll | ESC: Quit",
        )])
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(controls, controls_area);
    }
}

/// Draws a projection of the volume onto a vertical plane. `cell(col, y, d)`
/// maps a screen column, a layer and a depth step to a grid position.
fn render_projection(
    frame: &mut Frame,
    snapshot: &Snapshot,
    area: Rect,
    title: &str,
    columns: i32,
    depth: i32,
    cell: impl Fn(i32, i32, i32) -> Position,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let size = snapshot.grid.size();
    let piece: &[Position] = snapshot
        .piece
        .as_ref()
        .map(|p| p.voxels.as_slice())
        .unwrap_or_default();

    let mut lines: Vec<Line> = Vec::new();

    for y in (0..size.y + HEADROOM).rev() {
        let mut spans: Vec<Span> = Vec::new();

        for col in 0..columns {
            let in_piece = (0..depth).any(|d| piece.contains(&cell(col, y, d)));
            let nearest = (0..depth).find(|&d| snapshot.grid.is_mass(cell(col, y, d)));

            let span = match (in_piece, nearest) {
                (true, _) => Span::styled(PIECE_CHAR, Style::default().fg(PIECE_COLOR)),
                (false, Some(d)) => {
                    let shade = DEPTH_CHARS[(d as usize).min(DEPTH_CHARS.len() - 1)];
                    Span::styled(shade, Style::default().fg(MASS_COLOR))
                }
                (false, None) if y >= size.y => Span::raw(EMPTY_CHAR),
                (false, None) => Span::styled("··", Style::default().fg(Color::DarkGray)),
            };
            spans.push(span);
        }

        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_front(frame: &mut Frame, snapshot: &Snapshot, area: Rect) {
    let size = snapshot.grid.size();
    render_projection(frame, snapshot, area, " Front ", size.x, size.z, |x, y, d| {
        Position::new(x, y, d)
    });
}

fn render_side(frame: &mut Frame, snapshot: &Snapshot, area: Rect) {
    let size = snapshot.grid.size();
    render_projection(frame, snapshot, area, " Side ", size.z, size.x, |z, y, d| {
        Position::new(size.x - 1 - d, y, z)
    });
}

/// Top-down view: column heights as digits, the piece's footprint on top.
fn render_top(frame: &mut Frame, snapshot: &Snapshot, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Top ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let grid: &OccupancyGrid = snapshot.grid;
    let size = grid.size();
    let piece: &[Position] = snapshot
        .piece
        .as_ref()
        .map(|p| p.voxels.as_slice())
        .unwrap_or_default();

    let mut lines: Vec<Line> = Vec::new();

    for z in (0..size.z).rev() {
        let mut spans: Vec<Span> = Vec::new();

        for x in 0..size.x {
            if piece.iter().any(|p| p.x == x && p.z == z) {
                spans.push(Span::styled(PIECE_CHAR, Style::default().fg(PIECE_COLOR)));
                continue;
            }
            let height = grid.column_height(x, z);
            let span = if height == 0 {
                Span::styled("··", Style::default().fg(Color::DarkGray))
            } else {
                Span::styled(format!("{height:>2}"), Style::default().fg(MASS_COLOR))
            };
            spans.push(span);
        }

        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_next(frame: &mut Frame, shape: &VoxelShape, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Next ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let size = shape.size();
    let mut lines: Vec<Line> = vec![Line::from(shape.name().to_string())];

    // Footprint seen from above.
    for z in (0..size.z).rev() {
        let mut spans: Vec<Span> = vec![Span::raw(" ")];
        for x in 0..size.x {
            let filled = shape.voxels().any(|p| p.x == x && p.z == z);
            spans.push(if filled {
                Span::styled(PIECE_CHAR, Style::default().fg(PIECE_COLOR))
            } else {
                Span::raw(EMPTY_CHAR)
            });
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_info(frame: &mut Frame, snapshot: &Snapshot, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Info ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let facing = snapshot.piece.as_ref().map_or_else(String::new, |p| {
        format!("{:?}/{:?}", p.orientation.forward(), p.orientation.up())
    });

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("Score", Style::default().fg(Color::Yellow))),
        Line::from(format!("{}", snapshot.score)),
        Line::from(""),
        Line::from(Span::styled("Layers", Style::default().fg(Color::Cyan))),
        Line::from(format!("{}", snapshot.layers_cleared)),
        Line::from(""),
        Line::from(Span::styled("Facing", Style::default().fg(Color::Green))),
        Line::from(facing),
    ];

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}

fn render_title(frame: &mut Frame, snapshot: &Snapshot, area: Rect) {
    let mut text = vec![
        Line::from(""),
        Line::from(Span::styled("VOXTRIS", Style::default().fg(Color::Cyan))),
        Line::from(""),
        Line::from("Press ENTER to start"),
    ];

    if snapshot.score > 0 {
        text.push(Line::from(""));
        text.push(Line::from(format!("Last score: {}", snapshot.score)));
    }

    text.push(Line::from(""));
    text.push(Line::from(Span::styled(
        "Press ESC to quit",
        Style::default().fg(Color::DarkGray),
    )));

    let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Title ")
            .title_alignment(Alignment::Center),
    );

    frame.render_widget(paragraph, centered_rect(28, 11, area));
}

fn render_game_over(frame: &mut Frame, snapshot: &Snapshot, area: Rect) {
    // First render the game in background
    render_game(frame, snapshot, area);

    // Then overlay game over popup
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("GAME OVER", Style::default().fg(Color::Red))),
        Line::from(""),
        Line::from(format!("Score: {}", snapshot.score)),
        Line::from(format!("Layers: {}", snapshot.layers_cleared)),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Game Over ")
            .title_alignment(Alignment::Center)
            .style(Style::default().bg(Color::Black)),
    );

    let popup_area = centered_rect(24, 8, area);
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

fn key_intent(code: KeyCode) -> Option<Intent> {
    let intent = match code {
        KeyCode::Left => Intent::MoveLeft,
        KeyCode::Right => Intent::MoveRight,
        KeyCode::Up => Intent::MoveForward,
        KeyCode::Down => Intent::MoveBack,
        KeyCode::Char('q') | KeyCode::Char('Q') => Intent::RotateForwardCcw,
        KeyCode::Char('e') | KeyCode::Char('E') => Intent::RotateForwardCw,
        KeyCode::Char('a') | KeyCode::Char('A') => Intent::RotateUpCcw,
        KeyCode::Char('d') | KeyCode::Char('D') => Intent::RotateUpCw,
        KeyCode::Enter | KeyCode::Char(' ') => Intent::Start,
        _ => return None,
    };
    Some(intent)
}

// ============================================================================
// Main Loop
// ============================================================================

fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    session: &mut GameSession,
) -> io::Result<()> {
    let mut last_step = Instant::now();
    let mut intents = Vec::new();

    loop {
        terminal.draw(|frame| render(frame, &session.snapshot()))?;

        let timeout = FRAME.checked_sub(last_step.elapsed()).unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if key.code == KeyCode::Esc {
                        return Ok(());
                    }
                    intents.extend(key_intent(key.code));
                }
            }
        }

        if last_step.elapsed() >= FRAME {
            let elapsed = last_step.elapsed();
            last_step = Instant::now();
            session.step(elapsed, &intents);
            intents.clear();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let config = match &cli.config {
        Some(path) => GameConfig::load(path),
        None => GameConfig::from_env(),
    }
    .context("failed to load config")?;

    let provider = match cli.seed {
        Some(seed) => RandomShapeProvider::seeded(seed),
        None => RandomShapeProvider::new(),
    };
    let mut session =
        GameSession::with_provider(&config, Box::new(provider)).context("invalid config")?;

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut session);

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result.context("terminal error")
}
