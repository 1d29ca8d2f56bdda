//! CLI definitions for fxlens.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// fxlens CLI.
#[derive(Parser)]
#[command(name = "fxlens")]
#[command(about = "Annotate foreign-currency amounts with converted values")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (default: ~/.fxlens/config.toml)
    #[arg(short, long, global = true, env = "FXLENS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log filter, overrides RUST_LOG and the configured level
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Convert one amount through the provider chain
    Convert {
        /// Amount to convert
        amount: f64,

        /// Source currency code or symbol (e.g. EUR or €)
        from: String,

        /// Target currency (default: configured target)
        #[arg(long)]
        to: Option<String>,
    },

    /// Annotate a text file (one paragraph per line) and print the result
    Scan {
        /// Input file
        file: PathBuf,

        /// Target currency (default: configured target)
        #[arg(long)]
        to: Option<String>,

        /// Print stats as JSON after the annotated text
        #[arg(long)]
        json: bool,
    },

    /// Run a live session driven by JSON lines on stdin
    Session {
        /// Initial document (one paragraph per line)
        #[arg(long)]
        document: Option<PathBuf>,

        /// Settings file (default: ~/.fxlens/settings.toml)
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Keep settings updates in memory only
        #[arg(long)]
        no_persist: bool,
    },

    /// List rate providers in priority order
    Providers {
        /// Output format (table, json)
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Load and validate the configuration
    Check,

    /// Print the effective configuration with credentials masked
    Show,
}
