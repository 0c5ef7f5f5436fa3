//! File-backed cache for fetched pages.
//!
//! One file per site lives under a single root directory. The file name is
//! the URL host, so every page of a site shares one baseline. Digests are
//! recomputed from stored bytes on every read and never persisted.
//!
//! - [`key`]: identifier to storage location
//! - [`store`]: store, fetch, exists, remove
//! - [`digest`]: content digests and change detection
//! - [`refresh`]: compare-then-persist protocol used by fetchers

pub mod digest;
pub mod key;
pub mod refresh;
pub mod store;

use std::fs;
use std::path::{Path, PathBuf};

pub use crate::Error;

pub use digest::Digest;
pub use key::CacheKey;
pub use refresh::RefreshOutcome;
pub use store::CacheEntry;

/// Default cache root, relative to the working directory.
pub const DEFAULT_CACHE_DIR: &str = "scraped_pages";

/// Handle to an on-disk page cache.
///
/// Holds only the root directory; every operation goes straight to the
/// filesystem, so handles are cheap to clone and carry no state that could
/// drift from what is on disk.
#[derive(Clone, Debug)]
pub struct PageCache {
    root: PathBuf,
}

impl PageCache {
    /// Open a cache rooted at `root`.
    ///
    /// The root directory is created if missing. Creation failures are
    /// logged and otherwise ignored: reads against a missing root still
    /// report "absent", and writes surface their own error.
    pub fn open(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        if let Err(e) = fs::create_dir_all(&root) {
            tracing::debug!(root = %root.display(), error = %e, "could not create cache root");
        }
        Self { root }
    }

    /// Root directory of this cache.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Storage location for an identifier.
    pub fn location(&self, identifier: &str) -> PathBuf {
        CacheKey::derive(identifier).location(&self.root)
    }
}

impl Default for PageCache {
    fn default() -> Self {
        Self::open(DEFAULT_CACHE_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_creates_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("scraped_pages");
        assert!(!root.exists());

        let cache = PageCache::open(&root);
        assert!(root.is_dir());
        assert_eq!(cache.root(), root.as_path());
    }

    #[test]
    fn test_open_existing_root_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let _first = PageCache::open(dir.path());
        let second = PageCache::open(dir.path());
        assert!(second.root().is_dir());
    }

    #[test]
    fn test_open_unusable_root_does_not_fail() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "not a directory").unwrap();

        let cache = PageCache::open(blocker.join("nested"));
        assert!(!cache.exists("https://example.com"));
        assert_eq!(cache.fetch("https://example.com").unwrap_or_default(), "");
    }

    #[test]
    fn test_location_under_root() {
        let dir = tempfile::tempdir().unwrap();
        let cache = PageCache::open(dir.path());
        assert_eq!(cache.location("https://example.com/a?b=c"), dir.path().join("example.com"));
    }
}
