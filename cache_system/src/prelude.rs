//! Convenience re-exports for common cache-system usage

// Core cache system components
pub use crate::cache::RedisCache;
pub use crate::configuration::{CacheKeyPrefix, RedisCacheConfiguration};
pub use crate::errors::CacheError;
pub use crate::manager::{CacheManager, RedisCacheManager, RedisCacheManagerBuilder};
pub use crate::serializer::ValueSerializer;
pub use crate::statistics::CacheStatisticsSnapshot;
pub use crate::writer::{CacheWriter, RedisCacheWriter};

// Re-export centralized config
pub use config::RedisConnectionConfig;

// Common external dependencies
pub use async_trait::async_trait;
pub use redis;
pub use serde::{Deserialize, Serialize};
pub use serde_json;
pub use tokio;
