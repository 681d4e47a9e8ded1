//! ClaimGuard: Claim likelihood prediction
//!
//! Main entry point for the terminal application.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::IsTerminal;
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use claimguard::adapters::sanitize::SanitizingMakeWriter;
use claimguard::config::AppConfig;
use claimguard::tui::App;

fn main() -> Result<()> {
    let config = AppConfig::from_env()?;

    // Writing logs to the terminal would corrupt the TUI (alternate screen):
    // - interactive TTY: log to a file
    // - non-interactive: log to stdout
    let interactive = std::io::stdout().is_terminal();

    let (writer, _guard) = if config.log_mode.use_file(interactive) {
        let file = open_log_file(&config.log_file)?;
        tracing_appender::non_blocking(file)
    } else {
        tracing_appender::non_blocking(std::io::stdout())
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(SanitizingMakeWriter::new(writer)),
        )
        .init();

    tracing::info!("Starting ClaimGuard...");

    let mut app = App::new(&config)?;
    app.run()?;

    tracing::info!("ClaimGuard shutdown complete.");
    Ok(())
}

/// Open the log file for appending, creating its directory first.
///
/// Runs before the subscriber exists, so failures are reported through the
/// returned error rather than logged.
fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {parent:?}"))?;
    }

    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {path:?}"))
}
