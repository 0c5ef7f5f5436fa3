//! Store, fetch and existence checks for cached pages.

use std::fs;
use std::io;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::digest::baseline_digest;
use super::{Digest, PageCache};
use crate::Error;

/// A cached page as read back from disk.
///
/// `digest` follows [`PageCache::digest_of_stored`]: empty for a zero-byte entry.
#[derive(Debug, Clone, Serialize)]
pub struct CacheEntry {
    pub location: PathBuf,
    pub content: String,
    pub digest: Digest,
    pub len: u64,
    pub modified: Option<DateTime<Utc>>,
}

impl PageCache {
    /// Write `content` as the entry for `identifier`, replacing any previous entry.
    ///
    /// No retries are attempted; the I/O error is returned as is.
    pub fn store(&self, identifier: &str, content: &str) -> Result<(), Error> {
        let path = self.location(identifier);
        fs::write(&path, content.as_bytes()).map_err(|source| Error::CacheWrite { path: path.clone(), source })?;
        tracing::debug!(path = %path.display(), bytes = content.len(), "stored page");
        Ok(())
    }

    /// Read the entry for `identifier`.
    ///
    /// Returns an empty string if nothing was ever stored. Any other read
    /// failure is logged and returned.
    pub fn fetch(&self, identifier: &str) -> Result<String, Error> {
        let path = self.location(identifier);
        match fs::read(&path) {
            Ok(bytes) => Ok(into_text(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
            Err(source) => {
                tracing::error!(
                    path = %path.display(),
                    error = %source,
                    "could not fetch page from cache for an unexpected reason"
                );
                Err(Error::CacheRead { path, source })
            }
        }
    }

    /// Whether an entry is present for `identifier`.
    ///
    /// Any stat failure counts as absent.
    pub fn exists(&self, identifier: &str) -> bool {
        fs::metadata(self.location(identifier))
            .map(|meta| meta.is_file())
            .unwrap_or(false)
    }

    /// Read the full entry for `identifier`, including its digest and modification time.
    ///
    /// Returns None if nothing was ever stored.
    pub fn entry(&self, identifier: &str) -> Result<Option<CacheEntry>, Error> {
        let location = self.location(identifier);
        let bytes = match fs::read(&location) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(Error::CacheRead { path: location, source }),
        };

        let modified = fs::metadata(&location)
            .and_then(|meta| meta.modified())
            .ok()
            .map(DateTime::<Utc>::from);

        let digest = baseline_digest(&location, &bytes);
        let len = bytes.len() as u64;

        Ok(Some(CacheEntry { location, content: into_text(bytes), digest, len, modified }))
    }

    /// Delete the entry for `identifier`.
    ///
    /// Returns whether an entry was removed. The cache never calls this on
    /// its own.
    pub fn remove(&self, identifier: &str) -> Result<bool, Error> {
        let path = self.location(identifier);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(Error::CacheWrite { path, source }),
        }
    }
}

fn into_text(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://some.fake.url";

    fn test_cache() -> (tempfile::TempDir, PageCache) {
        let dir = tempfile::tempdir().unwrap();
        let cache = PageCache::open(dir.path().join("scraped_pages"));
        (dir, cache)
    }

    #[test]
    fn test_store_creates_file() {
        let (_dir, cache) = test_cache();
        cache.store(URL, "Some Fake Content").unwrap();
        assert!(cache.location(URL).is_file());
    }

    #[test]
    fn test_store_and_fetch() {
        let (_dir, cache) = test_cache();
        cache.store(URL, "Some Fake Content").unwrap();
        assert_eq!(cache.fetch(URL).unwrap(), "Some Fake Content");
    }

    #[test]
    fn test_fetch_missing_is_empty() {
        let (_dir, cache) = test_cache();
        let content = cache.fetch("https://does.not.exist").unwrap();
        assert!(content.is_empty());
    }

    #[test]
    fn test_store_overwrites() {
        let (_dir, cache) = test_cache();
        cache.store(URL, "a much longer first version").unwrap();
        cache.store(URL, "short").unwrap();
        assert_eq!(cache.fetch(URL).unwrap(), "short");
    }

    #[test]
    fn test_store_shares_entry_per_host() {
        let (_dir, cache) = test_cache();
        cache.store("https://example.com/one", "one").unwrap();
        assert_eq!(cache.fetch("https://example.com/two?x=1").unwrap(), "one");
    }

    #[test]
    fn test_exists() {
        let (_dir, cache) = test_cache();
        assert!(!cache.exists(URL));
        cache.store(URL, "Some Fake Content").unwrap();
        assert!(cache.exists(URL));
        assert!(!cache.exists("https://does.not.exist"));
    }

    #[test]
    fn test_malformed_identifier_round_trip() {
        let (_dir, cache) = test_cache();
        let id = "not a url";
        assert_eq!(cache.location(id), cache.location(id));

        cache.store(id, "odd key").unwrap();
        assert!(cache.exists(id));
        assert_eq!(cache.fetch(id).unwrap(), "odd key");
    }

    #[test]
    fn test_special_identifiers_round_trip() {
        let (_dir, cache) = test_cache();
        for id in ["", ".", ".."] {
            assert_eq!(cache.location(id).parent(), Some(cache.root()));
            cache.store(id, id).unwrap();
            assert!(cache.exists(id));
            assert_eq!(cache.fetch(id).unwrap(), id);
        }
    }

    #[test]
    fn test_fetch_directory_is_error() {
        let (_dir, cache) = test_cache();
        fs::create_dir(cache.location(URL)).unwrap();

        let result = cache.fetch(URL);
        assert!(matches!(result, Err(Error::CacheRead { .. })));
        assert!(!cache.exists(URL));
    }

    #[test]
    fn test_store_into_missing_root_fails() {
        let dir = tempfile::tempdir().unwrap();
        let cache = PageCache::open(dir.path().join("root"));
        fs::remove_dir(cache.root()).unwrap();

        let result = cache.store(URL, "content");
        assert!(matches!(result, Err(Error::CacheWrite { .. })));
    }

    #[test]
    fn test_fetch_invalid_utf8_is_lossy() {
        let (_dir, cache) = test_cache();
        fs::write(cache.location(URL), [b'o', b'k', 0xff]).unwrap();
        assert_eq!(cache.fetch(URL).unwrap(), "ok\u{fffd}");
    }

    #[test]
    fn test_entry() {
        let (_dir, cache) = test_cache();
        assert!(cache.entry(URL).unwrap().is_none());

        cache.store(URL, "Some Fake Content").unwrap();
        let entry = cache.entry(URL).unwrap().unwrap();
        assert_eq!(entry.content, "Some Fake Content");
        assert_eq!(entry.digest, Digest::of_str("Some Fake Content"));
        assert_eq!(entry.len, 17);
        assert_eq!(entry.location, cache.location(URL));
        assert!(entry.modified.is_some());
    }

    #[test]
    fn test_entry_zero_bytes_has_no_baseline() {
        let (_dir, cache) = test_cache();
        cache.store(URL, "").unwrap();

        let entry = cache.entry(URL).unwrap().unwrap();
        assert_eq!(entry.len, 0);
        assert!(entry.digest.is_empty());
        assert_ne!(entry.digest, Digest::of_str(""));
    }

    #[test]
    fn test_remove() {
        let (_dir, cache) = test_cache();
        assert!(!cache.remove(URL).unwrap());

        cache.store(URL, "content").unwrap();
        assert!(cache.remove(URL).unwrap());
        assert!(!cache.exists(URL));
    }
}
