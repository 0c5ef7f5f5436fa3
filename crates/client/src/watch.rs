//! Change detection for remote pages.
//!
//! [`PageWatcher`] pairs a [`PageSource`] with a [`PageCache`]: it pulls the
//! current body of a page and asks the cache whether it differs from the
//! last pulled version. The cache key is the identifier exactly as the
//! caller passed it.

use pagewatch_core::{Error, PageCache, RefreshOutcome};

use crate::fetch::{FetchClient, PageSource};

/// Fetches pages and tracks whether they changed since the last pull.
pub struct PageWatcher<S = FetchClient> {
    source: S,
    cache: PageCache,
}

impl<S: PageSource> PageWatcher<S> {
    pub fn new(source: S, cache: PageCache) -> Self {
        Self { source, cache }
    }

    /// The cache backing this watcher.
    pub fn cache(&self) -> &PageCache {
        &self.cache
    }

    /// Fetch `url` and compare it with the cached baseline.
    ///
    /// With `save`, a changed body becomes the new baseline. Fetch failures
    /// are returned as errors; a failed save is reported through
    /// [`RefreshOutcome::SaveFailed`].
    pub async fn check(&self, url: &str, save: bool) -> Result<RefreshOutcome, Error> {
        let body = self.source.get_page(url).await?;
        Ok(self.cache.refresh(url, &body, save))
    }

    /// Whether `url` changed since the last pull.
    ///
    /// Returns true when the page could not be fetched or a changed body
    /// could not be saved, since the site may have gone away.
    pub async fn site_has_changed(&self, url: &str, save: bool) -> bool {
        match self.check(url, save).await.and_then(RefreshOutcome::into_result) {
            Ok(changed) => {
                tracing::info!(url, changed, "checked page");
                changed
            }
            Err(e) => {
                tracing::error!(url, error = %e, code = e.code(), "page check failed; assuming changed");
                true
            }
        }
    }

    /// Fetch `url` and store it as the baseline without comparing.
    pub async fn pull(&self, url: &str) -> Result<(), Error> {
        let body = self.source.get_page(url).await.inspect_err(|e| {
            tracing::error!(url, error = %e, "could not fetch the requested page");
        })?;
        self.cache.store(url, &body)
    }
}
