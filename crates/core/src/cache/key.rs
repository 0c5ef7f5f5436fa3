//! Cache key derivation.
//!
//! Keys are site-granular: every URL on a host maps to the same key. Path,
//! query, fragment and scheme are dropped. Identifiers that do not parse as
//! a URL with a host are used verbatim, with path separators flattened so
//! the entry stays a direct child of the cache root. Empty, `.` and `..`
//! get a `_` prefix for the same reason.

use std::fmt;
use std::path::{Path, PathBuf};

use url::Url;

/// Deterministic name of a cache entry, relative to the cache root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derive the key for a resource identifier.
    ///
    /// Never fails. A URL yields its host (plus an explicit non-default
    /// port); anything else yields the raw identifier.
    pub fn derive(identifier: &str) -> Self {
        match Url::parse(identifier) {
            Ok(url) => match url.host_str() {
                Some(host) if !host.is_empty() => match url.port() {
                    Some(port) => Self(format!("{host}:{port}")),
                    None => Self(host.to_string()),
                },
                _ => Self::raw(identifier),
            },
            Err(_) => Self::raw(identifier),
        }
    }

    fn raw(identifier: &str) -> Self {
        let flat = identifier.replace(['/', '\\'], "_");
        match flat.as_str() {
            // would name the root itself or its parent
            "" | "." | ".." => Self(format!("_{flat}")),
            _ => Self(flat),
        }
    }

    /// The key as a file name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Join this key onto a cache root.
    pub fn location(&self, root: &Path) -> PathBuf {
        root.join(&self.0)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
