//! # duck-cache
//!
//! Startup-time assembly of a Redis-backed cache manager with per-cache
//! settings. Besides the global default under `[cache.redis]`, operators can
//! declare named caches under `[duck.cache.redis.<name>]`, each with its own
//! time-to-live, key prefix, null-value caching and key-prefixing behavior.
//! Those caches are registered into the manager when the application boots.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use duck_cache::prelude::*;
//!
//! #[derive(Debug, Serialize, Deserialize)]
//! struct User {
//!     id: u64,
//!     name: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::from_toml_str(
//!         r#"
//!         [redis]
//!         url = "redis://localhost:6379"
//!
//!         [cache]
//!         cache_names = ["users", "orders"]
//!
//!         [cache.redis]
//!         time_to_live = "10m"
//!
//!         [duck.cache.redis.users]
//!         time_to_live = "30s"
//!         cache_null_values = false
//!         "#,
//!     )?;
//!
//!     let manager = CacheBootstrap::new(config).boot()?;
//!     let users = manager.get_cache("users").expect("users cache is pre-created");
//!
//!     let user: Option<User> = users
//!         .get_or_compute("42", || async {
//!             Ok::<_, CacheError>(Some(User { id: 42, name: "Ada".to_string() }))
//!         })
//!         .await?;
//!     println!("Loaded user: {:?}", user);
//!
//!     Ok(())
//! }
//! ```

/// Conditional debug logging macros
/// These macros only emit events when the `debug-logging` feature is enabled;
/// otherwise their fields are type-checked but never evaluated
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        if false {
            tracing::debug!($($arg)*)
        }
    };
}

#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        if false {
            tracing::trace!($($arg)*)
        }
    };
}

pub mod core;
pub mod customizers;
pub mod errors;
pub mod factory;
pub mod prelude;
pub mod provider;
pub mod resolver;
pub mod validator;

// Re-export the main public types for convenience
pub use crate::core::CacheBootstrap;
pub use crate::errors::DuckCacheError;
pub use crate::factory::RedisCacheManagerFactory;
pub use crate::provider::{BootContext, Provider};

// Re-export centralized config
pub use config::{
    AppConfig, CacheProperties, CacheType, DuckCacheProperties, RedisCacheProperties,
    RedisConnectionConfig,
};

// Re-export internal crates used in the public API
pub use cache_system;
pub use config;

// Re-export external dependencies used in public API
pub use async_trait;
pub use redis;
