//! Client code for pagewatch.
//!
//! This crate provides the HTTP fetch pipeline and the page watcher that
//! runs fetched bodies through the core cache's refresh protocol.

pub mod fetch;
pub mod watch;

pub use fetch::{FetchClient, FetchConfig, FetchResponse, PageSource, UrlError, parse_fetch_url};
pub use watch::PageWatcher;
