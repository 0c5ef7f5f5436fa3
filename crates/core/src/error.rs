//! Unified error types for pagewatch.
//!
//! Not-found is never an error anywhere in the cache: it surfaces as empty
//! content, `false`, or the empty digest. Everything here is a real failure
//! that the caller decides how to handle.

use std::io;
use std::path::PathBuf;

/// Unified error types for the pagewatch cache and fetch pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading a cached entry failed for a reason other than absence.
    #[error("CACHE_READ: {}: {source}", path.display())]
    CacheRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing or removing a cached entry failed.
    #[error("CACHE_WRITE: {}: {source}", path.display())]
    CacheWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An entry is present but could not be digested.
    #[error("CACHE_UNREADABLE: {}: {source}", path.display())]
    CacheUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Invalid URL handed to the fetch pipeline.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// Fetch timeout.
    #[error("FETCH_TIMEOUT: {0}")]
    FetchTimeout(String),

    /// Fetch response too large.
    #[error("FETCH_TOO_LARGE: {0}")]
    FetchTooLarge(String),

    /// HTTP error response or transport failure.
    #[error("HTTP_ERROR: {0}")]
    HttpError(String),
}

impl Error {
    /// Short machine-readable code, matching the display prefix.
    pub fn code(&self) -> &'static str {
        match self {
            Error::CacheRead { .. } => "CACHE_READ",
            Error::CacheWrite { .. } => "CACHE_WRITE",
            Error::CacheUnreadable { .. } => "CACHE_UNREADABLE",
            Error::InvalidUrl(_) => "INVALID_URL",
            Error::FetchTimeout(_) => "FETCH_TIMEOUT",
            Error::FetchTooLarge(_) => "FETCH_TOO_LARGE",
            Error::HttpError(_) => "HTTP_ERROR",
        }
    }
}
