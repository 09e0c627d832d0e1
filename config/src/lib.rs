//! # Configuration Management for duck-cache
//!
//! This crate provides the configuration structures consumed by the cache
//! bootstrap: the Redis connection, the global cache defaults and the
//! per-cache overrides declared under the `duck.cache` namespace.
//!
//! ## TOML File Configuration
//! ```toml
//! [redis]
//! url = "redis://localhost:6379"
//!
//! [cache]
//! type = "redis"
//! cache_names = ["users", "orders", "sessions"]
//!
//! [cache.redis]
//! time_to_live = "10m"
//! key_prefix = "app:"
//! cache_null_values = true
//! use_key_prefix = true
//! enable_statistics = false
//!
//! [duck.cache.redis.users]
//! time_to_live = "30s"
//! cache_null_values = false
//!
//! [duck.cache.redis.sessions]
//! use_key_prefix = false
//! ```
//!
//! Load configuration:
//! ```rust,no_run
//! use config::AppConfig;
//!
//! // Load from DUCK_CACHE_CONFIG or ./duck-cache.toml
//! let config = AppConfig::load()?;
//!
//! // Or load from custom path
//! let config = AppConfig::from_file("config/production.toml")?;
//! # Ok::<(), config::ConfigError>(())
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;
use std::{env, path::Path};
use thiserror::Error;

const DEFAULT_CONFIG_PATH: &str = "./duck-cache.toml";

/// Environment variable holding the path of the configuration file
pub const CONFIG_PATH_ENV: &str = "DUCK_CACHE_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Environment variable error: {0}")]
    Env(#[from] env::VarError),
    #[error("Dotenvy error: {0}")]
    Dotenvy(#[from] dotenvy::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Redis connection used to back the cache manager, if any
    pub redis: Option<RedisConnectionConfig>,
    /// Global cache settings
    pub cache: CacheProperties,
    /// Extension namespace (`duck.*`)
    pub duck: DuckProperties,
}

/// Redis connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedisConnectionConfig {
    pub url: String,
}

/// Cache backend declared by the operator.
///
/// Only `redis` has a built-in provider. The other variants parse so that a
/// bootstrap without a matching custom provider fails with a configuration
/// error naming the declared type. `none` does not disable caching by
/// itself; register a provider for it (see `duck_cache::Provider`) to boot
/// without a cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheType {
    Generic,
    Redis,
    Simple,
    None,
}

impl fmt::Display for CacheType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CacheType::Generic => "GENERIC",
            CacheType::Redis => "REDIS",
            CacheType::Simple => "SIMPLE",
            CacheType::None => "NONE",
        };
        f.write_str(name)
    }
}

/// Global cache configuration (`[cache]`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheProperties {
    /// Declared cache type; auto-detected from the available backends when absent
    #[serde(rename = "type")]
    pub cache_type: Option<CacheType>,

    /// Cache names to create on startup
    pub cache_names: Vec<String>,

    /// Default Redis settings, used for every cache without an override
    pub redis: RedisCacheProperties,
}

/// Redis settings for one cache, or for the global default
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisCacheProperties {
    /// Entry expiration; entries never expire when absent
    #[serde(with = "duration_serde", skip_serializing_if = "Option::is_none")]
    pub time_to_live: Option<Duration>,

    /// Prefix placed before the cache name in every key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_prefix: Option<String>,

    /// Allow caching null values
    pub cache_null_values: bool,

    /// Whether to use the key prefix when writing to Redis
    pub use_key_prefix: bool,

    /// Collect cache statistics. Only read from the global block.
    pub enable_statistics: bool,
}

impl Default for RedisCacheProperties {
    fn default() -> Self {
        Self {
            time_to_live: None,
            key_prefix: None,
            cache_null_values: true,
            use_key_prefix: true,
            enable_statistics: false,
        }
    }
}

/// The `duck` namespace
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DuckProperties {
    pub cache: DuckCacheProperties,
}

/// Per-cache overrides under `duck.cache`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DuckCacheProperties {
    /// Redis settings keyed by cache name
    pub redis: HashMap<String, RedisCacheProperties>,
}

impl DuckCacheProperties {
    /// Configuration namespace of the per-cache overrides
    pub const PREFIX: &'static str = "duck.cache";
}

impl AppConfig {
    /// Load configuration from the TOML file named in the environment or the default path
    pub fn load() -> Result<Self, ConfigError> {
        // A missing .env file is fine, a malformed one is not
        if let Err(err) = dotenvy::dotenv() {
            if !err.not_found() {
                return Err(err.into());
            }
        }

        if let Ok(config_path) = env::var(CONFIG_PATH_ENV) {
            Self::from_file(&config_path)
        } else if Path::new(DEFAULT_CONFIG_PATH).exists() {
            Self::from_file(DEFAULT_CONFIG_PATH)
        } else {
            Err(ConfigError::Invalid(format!(
                "Config path must be specified in the {} environment variable or in {} file",
                CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH
            )))
        }
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(redis) = &self.redis {
            if redis.url.trim().is_empty() {
                return Err(ConfigError::Invalid("Redis URL cannot be empty".to_string()));
            }
        }

        if self.cache.cache_names.iter().any(|name| name.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "Cache names cannot be empty".to_string(),
            ));
        }

        if self.duck.cache.redis.keys().any(|name| name.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "Cache names under {}.redis cannot be empty",
                DuckCacheProperties::PREFIX
            )));
        }

        Ok(())
    }
}

impl RedisConnectionConfig {
    /// Create a new Redis connection configuration
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl RedisCacheProperties {
    pub fn with_time_to_live(mut self, ttl: Duration) -> Self {
        self.time_to_live = Some(ttl);
        self
    }

    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    pub fn with_cache_null_values(mut self, cache_null_values: bool) -> Self {
        self.cache_null_values = cache_null_values;
        self
    }

    pub fn with_use_key_prefix(mut self, use_key_prefix: bool) -> Self {
        self.use_key_prefix = use_key_prefix;
        self
    }

    pub fn with_enable_statistics(mut self, enable_statistics: bool) -> Self {
        self.enable_statistics = enable_statistics;
        self
    }
}

/// Human-readable durations (`30s`, `10m`, `1h 30m`)
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(duration) => {
                serializer.serialize_str(&humantime::format_duration(*duration).to_string())
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.map(|text| humantime::parse_duration(text.trim()).map_err(serde::de::Error::custom))
            .transpose()
    }
}
