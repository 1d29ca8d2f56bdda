//! fxlens - currency annotation for text documents
//!
//! Main entry point for the fxlens CLI.

mod cli;
mod cmd_config;
mod cmd_convert;
mod cmd_providers;
mod cmd_scan;
mod cmd_session;
mod page;
mod paths;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::warn;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use fxlens_config::{ConfigLoader, ConfigValidator, LoggingConfig};

use cli::{Cli, Commands};
use cmd_session::SessionOptions;

/// Pick the filter: `--log-level`, then `RUST_LOG`, then the configured level.
fn env_filter(logging: &LoggingConfig, log_level: Option<&str>) -> EnvFilter {
    match log_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&logging.level)),
    }
}

fn init_tracing(logging: &LoggingConfig, log_level: Option<&str>) -> anyhow::Result<()> {
    let file_layer = if logging.file {
        let log_dir = logging
            .dir
            .as_deref()
            .map(|dir| PathBuf::from(ConfigLoader::expand_path(dir)))
            .unwrap_or_else(paths::default_log_dir);
        std::fs::create_dir_all(&log_dir)
            .with_context(|| format!("failed to create {}", log_dir.display()))?;

        let file_appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix("fxlens")
            .filename_suffix("log")
            .max_log_files(14)
            .build(&log_dir)?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        // flushes pending lines when the process exits
        static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
            std::sync::OnceLock::new();
        let _ = GUARD.set(guard);

        Some(fmt::layer().with_writer(non_blocking).with_ansi(false))
    } else {
        None
    };

    // stdout carries command output, so the console layer writes to stderr
    tracing_subscriber::registry()
        .with(env_filter(logging, log_level))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_ansi(true),
        )
        .with(file_layer)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = ConfigLoader::load_or_default(cli.config.as_deref())
        .context("failed to load configuration")?;
    init_tracing(&config.logging, cli.log_level.as_deref())?;

    // `config check` reports problems itself
    if !matches!(cli.command, Commands::Config { .. }) {
        for warning in ConfigValidator::validate(&config).into_result()? {
            warn!("{}: {}", warning.path, warning.message);
        }
    }

    match cli.command {
        Commands::Convert { amount, from, to } => {
            cmd_convert::run_convert(&config, amount, &from, to.as_deref()).await
        }
        Commands::Scan { file, to, json } => {
            cmd_scan::run_scan(&config, &file, to.as_deref(), json).await
        }
        Commands::Session {
            document,
            settings,
            no_persist,
        } => {
            let options = SessionOptions {
                document,
                settings,
                no_persist,
            };
            cmd_session::run_session(&config, options).await
        }
        Commands::Providers { format } => cmd_providers::run_providers(&config, &format),
        Commands::Config { action } => {
            cmd_config::handle_config_command(action, &config, cli.config.as_deref())
        }
    }
}
