//! NewsDesk admin console
#![forbid(unsafe_code)]

use std::io;
use std::path::Path;

use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use newsdesk_core::Config;
use newsdesk_tui::App;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Get configuration; a missing config file is not fatal.
    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });

    // Logs go to a file; the terminal belongs to the UI.
    let _log_guard = init_logging(&config);

    let rt = tokio::runtime::Handle::current();
    let mut app = App::new(config, rt)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // The UI loop blocks; keep it off the async workers.
    let result = tokio::task::block_in_place(|| app.run(&mut terminal));

    // Cleanup terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result?;
    Ok(())
}

/// Route tracing output to the configured log file
fn init_logging(config: &Config) -> tracing_appender::non_blocking::WorkerGuard {
    let directory = config
        .logging
        .file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = config
        .logging
        .file
        .file_name()
        .map_or_else(|| "newsdesk.log".into(), std::ffi::OsStr::to_os_string);

    let appender = tracing_appender::rolling::never(directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&config.logging.level))
        .with_writer(writer)
        .with_ansi(false)
        .init();
    guard
}
