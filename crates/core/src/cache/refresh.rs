//! Compare-then-persist refresh protocol.
//!
//! Fetchers hand a freshly retrieved body to [`PageCache::refresh`]. The
//! change verdict comes from the digest comparison alone; a failed save
//! never turns a change into "unchanged".

use super::PageCache;
use crate::Error;

/// Result of comparing a fetched body against the cached baseline.
#[derive(Debug)]
pub enum RefreshOutcome {
    /// Body matches the baseline.
    Unchanged,
    /// Body differs and persistence was not requested.
    Changed,
    /// Body differs and is now the baseline.
    Saved,
    /// Body differs but could not be stored.
    SaveFailed(Error),
}

impl RefreshOutcome {
    /// Whether the body differs from the baseline.
    pub fn changed(&self) -> bool {
        !matches!(self, RefreshOutcome::Unchanged)
    }

    /// Short label for logs and CLI output.
    pub fn as_str(&self) -> &'static str {
        match self {
            RefreshOutcome::Unchanged => "unchanged",
            RefreshOutcome::Changed => "changed",
            RefreshOutcome::Saved => "changed (saved)",
            RefreshOutcome::SaveFailed(_) => "changed (save failed)",
        }
    }

    /// Collapse into the change verdict, surfacing a failed save as an error.
    pub fn into_result(self) -> Result<bool, Error> {
        match self {
            RefreshOutcome::SaveFailed(e) => Err(e),
            other => Ok(other.changed()),
        }
    }
}

impl PageCache {
    /// Compare `body` with the baseline for `identifier`, storing it if it changed and `persist` is set.
    pub fn refresh(&self, identifier: &str, body: &str, persist: bool) -> RefreshOutcome {
        if !self.has_changed(body, identifier) {
            tracing::debug!(identifier, "page unchanged since last pull");
            return RefreshOutcome::Unchanged;
        }

        if !persist {
            return RefreshOutcome::Changed;
        }

        match self.store(identifier, body) {
            Ok(()) => RefreshOutcome::Saved,
            Err(e) => {
                tracing::error!(identifier, error = %e, "could not cache the page locally");
                RefreshOutcome::SaveFailed(e)
            }
        }
    }
}
