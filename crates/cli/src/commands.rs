//! Subcommand implementations.
//!
//! Exit codes for change checks: 0 unchanged, 1 changed, 2 changed but the
//! new baseline could not be saved.

use std::io::{Read, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use pagewatch_client::{FetchClient, FetchConfig, PageWatcher};
use pagewatch_core::{AppConfig, CacheKey, Error, PageCache, RefreshOutcome};

use crate::cli::Command;
use crate::report::StatusReport;

pub async fn run(command: Command, config: &AppConfig, json: bool) -> Result<ExitCode> {
    let cache = config.open_cache();

    match command {
        Command::Check { url, no_save } => {
            let watcher = watcher(config, cache)?;
            let save = config.save_on_change && !no_save;
            let (outcome, fetch_error) = match watcher.check(&url, save).await {
                Ok(outcome) => (outcome, None),
                Err(e) => {
                    tracing::error!(url, error = %e, "could not fetch the requested page; assuming changed");
                    (RefreshOutcome::Changed, Some(e))
                }
            };
            report_outcome(&url, &outcome, fetch_error.as_ref(), json);
            Ok(ExitCode::from(exit_status(&outcome)))
        }
        Command::Pull { url } => {
            let watcher = watcher(config, cache)?;
            watcher.pull(&url).await.with_context(|| format!("failed to pull {url}"))?;
            tracing::info!(url, location = %watcher.cache().location(&url).display(), "stored page");
            Ok(ExitCode::SUCCESS)
        }
        Command::Show { url } => {
            let content = cache.fetch(&url)?;
            std::io::stdout().write_all(content.as_bytes())?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Status { url } => {
            let report = StatusReport::collect(&cache, &url)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{report}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::DiffStdin { url, save } => {
            let mut body = String::new();
            std::io::stdin().read_to_string(&mut body).context("failed to read stdin")?;
            let outcome = cache.refresh(&url, &body, save);
            report_outcome(&url, &outcome, None, json);
            Ok(ExitCode::from(exit_status(&outcome)))
        }
    }
}

fn watcher(config: &AppConfig, cache: PageCache) -> Result<PageWatcher> {
    let client = FetchClient::new(FetchConfig::from(config))?;
    Ok(PageWatcher::new(client, cache))
}

fn report_outcome(url: &str, outcome: &RefreshOutcome, fetch_error: Option<&Error>, json: bool) {
    if let RefreshOutcome::SaveFailed(e) = outcome {
        tracing::error!(url, error = %e, "page changed but the new baseline was not saved");
    }

    if json {
        println!("{}", outcome_json(url, outcome, fetch_error));
    } else {
        println!("{}", if outcome.changed() { "changed" } else { "unchanged" });
    }
}

/// JSON summary of a change check. `error` carries the code of a fetch
/// failure or of a failed save.
fn outcome_json(url: &str, outcome: &RefreshOutcome, fetch_error: Option<&Error>) -> serde_json::Value {
    let error = match outcome {
        RefreshOutcome::SaveFailed(e) => Some(e),
        _ => fetch_error,
    };

    serde_json::json!({
        "url": url,
        "key": CacheKey::derive(url).as_str(),
        "changed": outcome.changed(),
        "outcome": outcome.as_str(),
        "error": error.map(|e| serde_json::json!({ "code": e.code(), "message": e.to_string() })),
    })
}

fn exit_status(outcome: &RefreshOutcome) -> u8 {
    match outcome {
        RefreshOutcome::Unchanged => 0,
        RefreshOutcome::Changed | RefreshOutcome::Saved => 1,
        RefreshOutcome::SaveFailed(_) => 2,
    }
}
