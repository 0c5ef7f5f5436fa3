//! Content digests and change detection.
//!
//! Digests are SHA-256 over raw bytes, hex encoded. They exist only for
//! equality checks. The empty digest is reserved for "no usable baseline"
//! and never equals the digest of any content, including empty content.

use std::fs;
use std::io;
use std::path::Path;

use serde::Serialize;
use sha2::{Digest as _, Sha256};

use super::PageCache;
use crate::Error;

/// Fixed-length content fingerprint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Digest(String);

impl Digest {
    /// Digest raw bytes.
    pub fn of(content: &[u8]) -> Self {
        Self(hex::encode(Sha256::digest(content)))
    }

    /// Digest in-memory text. Same result as [`Digest::of`] on its bytes.
    pub fn of_str(content: &str) -> Self {
        Self::of(content.as_bytes())
    }

    /// The "no baseline" value.
    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Digest of bytes read back from the cache.
///
/// A zero-byte entry is not a usable baseline (typically an interrupted
/// write), so it yields the empty digest. Every stored-content path goes
/// through here.
pub(super) fn baseline_digest(path: &Path, bytes: &[u8]) -> Digest {
    if bytes.is_empty() {
        tracing::warn!(path = %path.display(), "cached page is empty; treating as no baseline");
        return Digest::empty();
    }
    Digest::of(bytes)
}

impl PageCache {
    /// Digest of the stored entry for `identifier`.
    ///
    /// Returns the empty digest when there is no entry, when the entry is
    /// zero bytes long (logged as a warning), or when it cannot be read
    /// (logged as an error). Use [`PageCache::try_digest_of_stored`] to tell
    /// the last case apart.
    pub fn digest_of_stored(&self, identifier: &str) -> Digest {
        match self.try_digest_of_stored(identifier) {
            Ok(digest) => digest,
            Err(e) => {
                tracing::error!(error = %e, "unable to digest cached page");
                Digest::empty()
            }
        }
    }

    /// Digest of the stored entry, failing if it exists but cannot be read.
    ///
    /// Absent and zero-byte entries still yield the empty digest.
    pub fn try_digest_of_stored(&self, identifier: &str) -> Result<Digest, Error> {
        let path = self.location(identifier);
        match fs::read(&path) {
            Ok(bytes) => Ok(baseline_digest(&path, &bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Digest::empty()),
            Err(source) => Err(Error::CacheUnreadable { path, source }),
        }
    }

    /// Whether `content` differs from the stored baseline for `identifier`.
    ///
    /// True when there is no usable baseline.
    pub fn has_changed(&self, content: &str, identifier: &str) -> bool {
        self.digest_of_stored(identifier) != Digest::of_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://some.fake.url";
    const FAKE_CONTENT_SHA256: &str = "eef4ea2fbf6a46b668491d8090e79665d44687788c485fcafe4521391de225a9";

    fn test_cache() -> (tempfile::TempDir, PageCache) {
        let dir = tempfile::tempdir().unwrap();
        let cache = PageCache::open(dir.path());
        (dir, cache)
    }

    #[test]
    fn test_digest_known_value() {
        assert_eq!(Digest::of_str("Some Fake Content").as_str(), FAKE_CONTENT_SHA256);
    }

    #[test]
    fn test_digest_format() {
        let digest = Digest::of_str("hello");
        assert_eq!(digest.as_str().len(), 64);
        assert!(digest.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_digest_of_empty_content_is_not_empty_digest() {
        assert!(!Digest::of_str("").is_empty());
        assert_ne!(Digest::of_str(""), Digest::empty());
    }

    #[test]
    fn test_digest_serializes_as_string() {
        let json = serde_json::to_string(&Digest::of_str("Some Fake Content")).unwrap();
        assert_eq!(json, format!("\"{FAKE_CONTENT_SHA256}\""));
    }

    #[test]
    fn test_digest_of_stored_missing() {
        let (_dir, cache) = test_cache();
        assert!(cache.digest_of_stored("https://does.not.exist").is_empty());
    }

    #[test]
    fn test_digest_of_stored_matches_in_memory() {
        let (_dir, cache) = test_cache();
        cache.store(URL, "Some Fake Content").unwrap();
        assert_eq!(cache.digest_of_stored(URL), Digest::of_str("Some Fake Content"));
        assert_eq!(cache.digest_of_stored(URL).as_str(), FAKE_CONTENT_SHA256);
    }

    #[test]
    fn test_digest_of_stored_zero_bytes() {
        let (_dir, cache) = test_cache();
        fs::write(cache.location(URL), b"").unwrap();
        assert!(cache.exists(URL));
        assert!(cache.digest_of_stored(URL).is_empty());
        assert!(cache.try_digest_of_stored(URL).unwrap().is_empty());
    }

    #[test]
    fn test_entry_digest_agrees_with_stored_digest() {
        let (_dir, cache) = test_cache();
        for content in ["", "Some Fake Content"] {
            cache.store(URL, content).unwrap();
            let entry = cache.entry(URL).unwrap().unwrap();
            assert_eq!(entry.digest, cache.digest_of_stored(URL), "content {content:?}");
        }
    }

    #[test]
    fn test_digest_of_stored_unreadable() {
        let (_dir, cache) = test_cache();
        fs::create_dir(cache.location(URL)).unwrap();

        assert!(cache.digest_of_stored(URL).is_empty());
        assert!(matches!(cache.try_digest_of_stored(URL), Err(Error::CacheUnreadable { .. })));
    }

    #[test]
    fn test_has_changed() {
        let (_dir, cache) = test_cache();
        cache.store(URL, "Some Fake Content").unwrap();

        assert!(!cache.has_changed("Some Fake Content", URL));
        assert!(cache.has_changed("This content shouldn't match", URL));
    }

    #[test]
    fn test_has_changed_without_baseline() {
        let (_dir, cache) = test_cache();
        assert!(cache.has_changed("anything", URL));
        assert!(cache.has_changed("", URL));
    }

    #[test]
    fn test_has_changed_against_zero_byte_baseline() {
        let (_dir, cache) = test_cache();
        cache.store(URL, "").unwrap();
        assert!(cache.has_changed("", URL));
    }

    #[test]
    fn test_has_changed_follows_digest_equality() {
        let (_dir, cache) = test_cache();
        let versions = ["v1", "v2", "v1", "<html></html>"];
        for stored in versions {
            cache.store(URL, stored).unwrap();
            for candidate in versions {
                let expected = Digest::of_str(stored) != Digest::of_str(candidate);
                assert_eq!(cache.has_changed(candidate, URL), expected, "{stored} vs {candidate}");
            }
        }
    }
}
