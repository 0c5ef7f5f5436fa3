//! Cache status report for a single identifier.

use std::fmt;
use std::path::PathBuf;

use pagewatch_core::{CacheKey, Digest, Error, PageCache};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub identifier: String,
    pub key: String,
    pub location: PathBuf,
    pub exists: bool,
    pub len: Option<u64>,
    pub modified: Option<String>,
    /// Empty when there is no usable baseline.
    pub baseline: Digest,
}

impl StatusReport {
    pub fn collect(cache: &PageCache, identifier: &str) -> Result<Self, Error> {
        let entry = cache.entry(identifier)?;

        Ok(Self {
            identifier: identifier.to_string(),
            key: CacheKey::derive(identifier).to_string(),
            location: cache.location(identifier),
            exists: entry.is_some(),
            len: entry.as_ref().map(|e| e.len),
            modified: entry.as_ref().and_then(|e| e.modified).map(|t| t.to_rfc3339()),
            baseline: entry.map(|e| e.digest).unwrap_or_default(),
        })
    }
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "key:      {}", self.key)?;
        writeln!(f, "location: {}", self.location.display())?;
        writeln!(f, "exists:   {}", self.exists)?;
        if let Some(len) = self.len {
            writeln!(f, "bytes:    {len}")?;
        }
        if let Some(modified) = &self.modified {
            writeln!(f, "modified: {modified}")?;
        }
        let baseline = if self.baseline.is_empty() { "none" } else { self.baseline.as_str() };
        writeln!(f, "baseline: {baseline}")
    }
}
