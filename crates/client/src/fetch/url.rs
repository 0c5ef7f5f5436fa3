//! URL validation for the fetch pipeline.
//!
//! Only the request URL is normalized here. Cache keys are derived from the
//! caller's identifier by the core, not from this parsed form.

/// Error type for fetch URL validation failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Parse a URL string for fetching.
///
/// Normalization steps:
/// 1. Trim leading/trailing whitespace
/// 2. Require an `http` or `https` scheme
/// 3. Remove fragment (#...)
/// 4. Keep query string intact (do not reorder)
pub fn parse_fetch_url(input: &str) -> Result<url::Url, UrlError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let mut parsed = url::Url::parse(trimmed).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }

    parsed.set_fragment(None);

    Ok(parsed)
}
