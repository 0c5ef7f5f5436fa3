//! pagewatch command-line entry point.
//!
//! Logging goes to stderr so command output on stdout stays pipeable.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod report;

use cli::Cli;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);
    if cli.json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let config = cli.config()?;
    tracing::debug!(cache_dir = %config.cache_dir.display(), "loaded configuration");

    commands::run(cli.command, &config, cli.json).await
}
