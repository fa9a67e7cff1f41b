//! Brief TUI Entry Point
//!
//! Usage:
//!   brief-tui [OPTIONS] [REPORT]
//!
//! Options:
//!   --config <FILE>         Configuration file (env: BRIEF_CONFIG)
//!   --print                 Print the parsed report as JSON and exit
//!   --no-normalize          Parse nested sub-bullets as written
//!   --reveal-speed-ms <MS>  Paragraph reveal speed
//!   --seed <SEED>           Reproducible decoys and scrambles

use std::fs::File;
use std::io::{self, IsTerminal};
use std::panic;
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use brief_tui::{App, Cli};

/// Log file name inside the temp directory
const LOG_FILE: &str = "brief-tui.log";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let cli = Cli::parse();
    let config = cli.load_config()?;
    let raw = cli.read_report()?;
    let summary = cli.parse_report(&raw);

    if cli.print {
        let json = serde_json::to_string_pretty(&summary).context("Failed to encode report")?;
        println!("{json}");
        return Ok(());
    }

    // The event loop needs a real terminal to draw on
    if !io::stdout().is_terminal() {
        eprintln!("Error: brief-tui requires a terminal (TTY) on standard output");
        eprintln!();
        eprintln!("Use --print to emit the parsed report as JSON instead.");
        std::process::exit(1);
    }

    if summary.is_empty() {
        tracing::warn!("Report has no recognizable sections");
    }

    let mut app = App::new(&summary, &config, cli.seed)?;

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Restore terminal before printing panic
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run the app
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    // Propagate any errors
    result
}

/// Send logs to a file so they never draw over the alternate screen
fn init_logging() {
    let path = std::env::temp_dir().join(LOG_FILE);
    let Ok(file) = File::create(&path) else {
        // Logging stays off without a writable temp dir
        return;
    };

    let filter = EnvFilter::try_from_env("BRIEF_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(filter)
        .init();
}
