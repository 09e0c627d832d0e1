//! Error types for the duck-cache crate
//!
//! This module contains all error types that can be returned while
//! bootstrapping the cache manager.

use cache_system::CacheError;
use config::{CacheType, ConfigError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DuckCacheError {
    /// No provider produced a cache manager
    #[error(
        "No cache manager could be auto-configured, check your configuration (caching type is '{}')",
        display_cache_type(.cache_type)
    )]
    Configuration { cache_type: Option<CacheType> },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
}

fn display_cache_type(cache_type: &Option<CacheType>) -> String {
    match cache_type {
        Some(cache_type) => cache_type.to_string(),
        None => "unspecified".to_string(),
    }
}
