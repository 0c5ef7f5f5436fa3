//! Argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pagewatch_core::{AppConfig, ConfigError};

/// pagewatch - detect when a website changes since it was last pulled
#[derive(Parser, Debug)]
#[command(name = "pagewatch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Cache directory (overrides PAGEWATCH_CACHE_DIR)
    #[arg(long, global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Request timeout in milliseconds (overrides PAGEWATCH_TIMEOUT_MS)
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Emit JSON logs and JSON command output
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch a page and report whether it changed since the last pull
    Check {
        url: String,

        /// Do not store a changed page as the new baseline
        #[arg(long)]
        no_save: bool,
    },

    /// Fetch a page and overwrite its cached baseline
    Pull { url: String },

    /// Print the cached baseline for a page
    Show { url: String },

    /// Print cache location, presence and digest for a page
    Status { url: String },

    /// Compare content read from stdin against the cached baseline
    DiffStdin {
        url: String,

        /// Store the content as the new baseline if it changed
        #[arg(long)]
        save: bool,
    },
}

impl Cli {
    /// Load layered configuration and apply command-line overrides.
    pub fn config(&self) -> Result<AppConfig, ConfigError> {
        let mut config = AppConfig::load()?;

        if let Some(dir) = &self.cache_dir {
            config.cache_dir = dir.clone();
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.timeout_ms = timeout_ms;
        }

        config.validate()?;
        Ok(config)
    }
}
