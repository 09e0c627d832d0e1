//! Cache system for Redis-based caching
//!
//! This crate provides named Redis caches with per-cache settings
//! (expiry, key prefixing, null-value handling, serialization), the
//! manager that owns them, and the writer that talks to Redis.

#[cfg(feature = "debug-logging")]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

// Disabled events still type-check their fields
#[cfg(not(feature = "debug-logging"))]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        if false {
            tracing::debug!($($arg)*)
        }
    };
}

#[cfg(feature = "debug-logging")]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        if false {
            tracing::trace!($($arg)*)
        }
    };
}

pub mod cache;
pub mod configuration;
pub mod errors;
pub mod manager;
pub mod prelude;
pub mod serializer;
pub mod statistics;
#[cfg(any(test, feature = "test-util"))]
pub mod testing;
pub mod writer;

// Re-export centralized config
pub use config::RedisConnectionConfig;

pub use cache::RedisCache;
pub use configuration::{CacheKeyPrefix, RedisCacheConfiguration};
pub use errors::CacheError;
pub use manager::{CacheManager, RedisCacheManager, RedisCacheManagerBuilder};
pub use serializer::ValueSerializer;
pub use statistics::CacheStatisticsSnapshot;
pub use writer::{CacheWriter, RedisCacheWriter};
