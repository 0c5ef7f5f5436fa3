//! Core types and shared functionality for pagewatch.
//!
//! This crate provides:
//! - A file-backed page cache keyed by site host
//! - Content digests and staleness checks
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{CacheEntry, CacheKey, Digest, PageCache, RefreshOutcome};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
