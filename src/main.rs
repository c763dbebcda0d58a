//! BLOCKFALL - a falling-block puzzle for the terminal
//!
//! 22 columns, 40 rows, eight shapes, one piece at a time.

mod app;
mod audio;
mod background;
mod board;
mod game;
mod generator;
mod input;
mod menu;
mod piece;
mod settings;
mod tetromino;
mod ui;

use app::{App, Flow};
use audio::AudioManager;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use game::Game;
use ratatui::{Terminal, backend::CrosstermBackend};
use settings::Settings;
use std::{
    io::{self, stdout},
    time::{Duration, Instant},
};

/// Target frame rate
const TARGET_FPS: u64 = 60;
const FRAME_DURATION: Duration = Duration::from_micros(1_000_000 / TARGET_FPS);

/// Get the blockfall temp directory, creating it if needed
fn blockfall_temp_dir() -> std::path::PathBuf {
    let dir = std::env::temp_dir().join("blockfall");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

fn main() -> io::Result<()> {
    // Session ID keeps logs from separate runs apart
    let session_id: u32 = rand::random();

    let log_dir = blockfall_temp_dir();
    let log_file = format!("{:08x}.log", session_id);

    // Log to a file so output never lands on the game screen
    let file_appender = tracing_appender::rolling::never(&log_dir, &log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "blockfall=debug".parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(filter)
        .with_ansi(false)
        .init();

    tracing::info!(
        "BLOCKFALL starting up, session={:08x}, log={}",
        session_id,
        log_dir.join(&log_file).display()
    );

    let settings_path = Settings::settings_path();
    let settings = settings_path
        .as_deref()
        .map(Settings::load_from)
        .unwrap_or_default();

    // Game works without audio
    let audio = AudioManager::new();

    let mut app = App::new(Game::new(), settings, audio, settings_path);

    // Setup terminal
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen, DisableMouseCapture)?;

    if let Err(e) = &result {
        tracing::error!("Exiting on terminal error: {}", e);
    }
    tracing::info!("BLOCKFALL shutting down");
    println!("\nThanks for playing BLOCKFALL!");

    result
}

/// Frame loop: draw, poll input for up to one frame, then advance the
/// simulation by the real time that passed
fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> io::Result<()> {
    let size = terminal.size()?;
    app.resize(size.width, size.height);

    let mut last_frame = Instant::now();

    loop {
        terminal.draw(|frame| app.draw(frame))?;

        if event::poll(FRAME_DURATION)? {
            let flow = match event::read()? {
                Event::Key(key) => app.handle_key(key),
                Event::Mouse(mouse) => {
                    app.handle_mouse(mouse);
                    Flow::Continue
                }
                Event::Resize(width, height) => {
                    app.resize(width, height);
                    Flow::Continue
                }
                _ => Flow::Continue,
            };
            if flow == Flow::Quit {
                return Ok(());
            }
        }

        let now = Instant::now();
        app.tick(now.duration_since(last_frame));
        last_frame = now;
    }
}
