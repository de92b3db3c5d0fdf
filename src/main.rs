//! Lingosub - Translated, Profanity-Filtered Subtitle Generation
//!
//! Entry point: parses the command line, initializes logging, loads the
//! configuration, asks the user for a target language, and runs the
//! subtitle generation pipeline.

use anyhow::Result;
use clap::Parser;
use std::io;
use tracing::{Level, info};
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use lingosub::cli::Args;
use lingosub::config::{Config, LoggingConfig};
use lingosub::lang::{self, LanguageTable};
use lingosub::workflow::Workflow;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            if std::path::Path::new("lingosub.toml").exists() {
                Config::from_file("lingosub.toml")?
            } else {
                Config::default()
            }
        }
    };
    config.logging.verbose |= args.verbose;

    setup_logging(&config.logging)?;
    info!("Starting Lingosub subtitle generation");

    // The interactive prompt is the one place that blocks on the terminal;
    // the pipeline itself only ever sees the validated selection.
    let table = LanguageTable::builtin();
    let target = lang::prompt_selection(&table, io::stdin().lock(), io::stdout())?;

    let workflow = Workflow::new(config)?;
    let subtitle_path = workflow.run(&args.input, &target).await?;

    info!("Done. Final subtitle file: {}", subtitle_path.display());
    println!("Process completed! Final subtitle file: {}", subtitle_path.display());
    Ok(())
}

/// Setup logging to both console and file from the explicit logging
/// configuration (no process-wide verbosity toggle).
fn setup_logging(config: &LoggingConfig) -> Result<()> {
    std::fs::create_dir_all(&config.log_dir)?;

    // Daily-rolling file appender; the guard must outlive the program
    let file_appender = rolling::daily(&config.log_dir, "lingosub.log");
    let (non_blocking_file, guard) = non_blocking(file_appender);
    std::mem::forget(guard);

    let log_level = if config.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let console_layer = fmt::layer().with_target(false);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
