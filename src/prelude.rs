//! Convenience re-exports for common duck-cache usage
//!
//! # Example
//!
//! ```rust
//! use duck_cache::prelude::*;
//!
//! let bootstrap = CacheBootstrap::new(AppConfig::default());
//! assert_eq!(bootstrap.provider_names(), vec!["redis"]);
//! ```

// Core bootstrap components
pub use crate::core::CacheBootstrap;
pub use crate::customizers::{BuilderCustomizers, CacheManagerCustomizers};
pub use crate::errors::DuckCacheError;
pub use crate::factory::RedisCacheManagerFactory;
pub use crate::provider::{BootContext, Provider};

// Re-export centralized config
pub use config::{
    AppConfig, CacheProperties, CacheType, DuckCacheProperties, RedisCacheProperties,
    RedisConnectionConfig,
};

// Re-export cache system
pub use cache_system::prelude::*;
