mod app;
mod event;
mod game;
mod scheduler;
mod scores;
mod settings;
mod ui;

use std::fs::OpenOptions;
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::time::Instant;

use crossterm::{
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use log::{error, info, LevelFilter};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use app::App;
use event::{Event, EventHandler};
use settings::Settings;

const LOG_FILE: &str = "star-catcher.log";

fn log_path() -> PathBuf {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            return dir.join(LOG_FILE);
        }
    }
    PathBuf::from(LOG_FILE)
}

// stdout belongs to the TUI, so logs go to a file. RUST_LOG overrides the level.
fn init_logging() {
    let Ok(file) = OpenOptions::new().create(true).append(true).open(log_path()) else {
        return;
    };
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
}

fn main() -> io::Result<()> {
    init_logging();
    info!("Star Catcher starting...");
    let settings = Settings::load();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let releases_reported = supports_keyboard_enhancement().unwrap_or(false);
    if releases_reported {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    }
    info!("key release events reported: {}", releases_reported);
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut app = App::new(&settings, releases_reported);
    let result = run(&mut terminal, &mut app);

    // Restore terminal
    if releases_reported {
        let _ = execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags);
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    match &result {
        Ok(()) => info!("Star Catcher exited"),
        Err(e) => error!("Star Catcher exited with error: {}", e),
    }
    result
}

fn run(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> io::Result<()> {
    let events = EventHandler::new();

    loop {
        terminal.draw(|frame| ui::render(frame, &app.game))?;

        match events.next_timeout(app.time_until_next())? {
            Some(Event::Key(key)) => app.on_key(key),
            Some(Event::Resize) | None => {}
        }
        app.on_due(Instant::now());

        if app.should_quit {
            return Ok(());
        }
    }
}
