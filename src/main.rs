//! Crisis Response: Save the World, One Questionable Fix at a Time
//!
//! Usage: crisis-response [config.json]
//!
//! Set `CRISIS_LOG` (e.g. `CRISIS_LOG=debug`) to write a log file next to
//! where the game was started.

use anyhow::Context;
use crisis_response::tui::App;
use crisis_response::{GameConfig, Session};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::fs::File;
use std::io::stdout;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "CRISIS_LOG";
const LOG_FILE: &str = "crisis-response.log";

fn init_logging() -> crisis_response::Result<()> {
    // stdout belongs to the TUI, so logs only go to a file and only on request
    let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) else {
        return Ok(());
    };
    let file = File::create(LOG_FILE).with_context(|| format!("creating {}", LOG_FILE))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> crisis_response::Result<()> {
    init_logging()?;

    // Everything that can fail on bad config fails before the terminal is touched
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = GameConfig::load(config_path.as_deref()).context("loading config")?;
    let session = Session::from_config(config).context("starting session")?;
    tracing::info!(version = crisis_response::VERSION, "Starting Crisis Response");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(session);

    // Main loop
    let outcome = (|| -> std::io::Result<()> {
        while app.running {
            terminal.draw(|frame| app.render(frame))?;
            if !app.handle_input()? {
                break;
            }
        }
        Ok(())
    })();

    // Cleanup
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    outcome?;

    let saved = app.session.state().today_saved_count;
    println!("\n╔════════════════════════════════════════════════════════╗");
    println!("║  Thanks for playing Crisis Response!                   ║");
    println!("║  You saved the world {:>4} times this session.         ║", saved);
    println!("║                                                        ║");
    println!("║  The world will need you again tomorrow.               ║");
    println!("╚════════════════════════════════════════════════════════╝\n");

    Ok(())
}
