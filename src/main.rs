use std::fs::File;
use std::io;
use std::io::Write;
use std::sync::Mutex;
use std::time::Instant;

use anyhow::Context;
use crossterm::cursor;
use crossterm::event;
use crossterm::execute;
use crossterm::queue;
use crossterm::style;
use crossterm::terminal;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use sparselife::board::Board;
use sparselife::config::Config;
use sparselife::config::ConfigError;
use sparselife::config::USAGE;
use sparselife::controller::Controller;
use sparselife::coord::Coord;
use sparselife::events::Event;
use sparselife::input;
use sparselife::parse_rle::read_rle;
use sparselife::render::Frame;
use sparselife::viewport::Viewport;

/// Seed used when no pattern is given
const R_PENTOMINO: [(i64, i64); 5] = [(25, 15), (26, 15), (24, 16), (25, 16), (25, 17)];

/// Raw mode, alternate screen and mouse capture for as long as it lives.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let guard = Self;

        execute!(
            io::stdout(),
            terminal::EnterAlternateScreen,
            terminal::Clear(terminal::ClearType::All),
            cursor::Hide,
            event::EnableMouseCapture,
        )?;

        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // nothing left to report errors to
        let _ = execute!(
            io::stdout(),
            event::DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen,
        );
        let _ = terminal::disable_raw_mode();
    }
}

fn load_board(config: &Config) -> anyhow::Result<Board> {
    let Some(path) = &config.pattern else {
        let mut board = Board::with_rules(config.rules.unwrap_or_default());
        board.extend(R_PENTOMINO.map(Coord::from));

        return Ok(board);
    };

    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;

    let mut cells = Vec::new();
    let file = read_rle(&bytes, |x, y| cells.push(Coord::new(x, y)))
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    let mut board = Board::with_rules(config.rules.unwrap_or(file.rules()));
    board.extend(cells);

    info!(
        path = %path.display(),
        population = board.population(),
        rules = %board.rules(),
        "loaded pattern"
    );

    Ok(board)
}

fn draw<W: Write>(out: &mut W, controller: &Controller, frame: &mut Frame) -> io::Result<()> {
    let viewport = controller.viewport();

    frame.resize(viewport.width(), viewport.height());
    frame.reset();
    frame.draw(&controller.visible_cells());

    for (row, line) in frame.render().lines().enumerate() {
        queue!(out, cursor::MoveTo(0, row as u16), style::Print(line))?;
    }

    out.flush()
}

fn run(config: &Config, board: Board) -> anyhow::Result<()> {
    let _guard = TerminalGuard::enter().context("Failed to set up the terminal")?;
    let mut stdout = io::stdout();

    // Get the width and height of the terminal
    let (cols, rows) = terminal::size()?;
    let (cw, ch) = config.mode.cells_per_char();
    let viewport = Viewport::new(cols.saturating_mul(cw), rows.saturating_mul(ch));

    let mut frame = Frame::new(viewport.width(), viewport.height(), config.mode);
    let mut controller = Controller::new(board, viewport).paused(config.paused);

    info!(
        cols,
        rows,
        tick_ms = config.tick.as_millis() as u64,
        paused = config.paused,
        "starting"
    );

    draw(&mut stdout, &controller, &mut frame)?;
    let mut last_tick = Instant::now();

    while controller.is_running() {
        // Poll for as long as there's time left before the next tick
        let timeout = config.tick.saturating_sub(last_tick.elapsed());

        if event::poll(timeout)? {
            if let Some(event) = input::convert_event(event::read()?, config.mode) {
                if let Event::Resize { .. } = event {
                    execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
                }

                controller.handle(event);
            }
        }

        if last_tick.elapsed() >= config.tick {
            controller.handle(Event::Tick);
            last_tick = Instant::now();
        }

        if controller.is_running() {
            draw(&mut stdout, &controller, &mut frame)?;
        }
    }

    Ok(())
}

/// Log to the file given with `--log`, or to stderr.
fn init_logging(config: &Config) -> anyhow::Result<()> {
    let writer = match &config.log {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;

            BoxMakeWriter::new(Mutex::new(file))
        }
        None => BoxMakeWriter::new(io::stderr),
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(config.log.is_none())
        .init();

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let config = match Config::from_args(std::env::args().skip(1)) {
        Ok(config) => config,
        Err(ConfigError::Help) => {
            println!("{USAGE}");
            return Ok(());
        }
        Err(e) => return Err(e).context("Invalid arguments, see --help"),
    };

    init_logging(&config)?;

    let board = load_board(&config)?;

    run(&config, board)
}
