//! Cache manager implementation
//!
//! This module provides the `CacheManager` capability and the Redis-backed
//! `RedisCacheManager`, assembled through `RedisCacheManagerBuilder`.

use crate::cache::RedisCache;
use crate::configuration::RedisCacheConfiguration;
use crate::errors::CacheError;
use crate::writer::{CacheWriter, RedisCacheWriter};
use config::RedisConnectionConfig;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Debug;
use std::sync::{Arc, PoisonError, RwLock};

/// Named caches handed to application code
pub trait CacheManager: Send + Sync + Debug {
    /// Cache registered under `name`, if the manager has or may create one
    fn get_cache(&self, name: &str) -> Option<Arc<RedisCache>>;

    /// Names of every cache created so far, sorted
    fn cache_names(&self) -> Vec<String>;
}

/// Redis-based cache manager
pub struct RedisCacheManager {
    writer: Arc<dyn CacheWriter>,
    default_config: RedisCacheConfiguration,
    caches: RwLock<HashMap<String, Arc<RedisCache>>>,
    allow_in_flight_cache_creation: bool,
    enable_statistics: bool,
}

impl Debug for RedisCacheManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCacheManager")
            .field("writer", &self.writer)
            .field("default_config", &self.default_config)
            .field("caches", &self.cache_names())
            .field(
                "allow_in_flight_cache_creation",
                &self.allow_in_flight_cache_creation,
            )
            .field("enable_statistics", &self.enable_statistics)
            .finish()
    }
}

impl RedisCacheManager {
    /// Start building a manager over `writer`
    pub fn builder(writer: Arc<dyn CacheWriter>) -> RedisCacheManagerBuilder {
        RedisCacheManagerBuilder::new(writer)
    }

    /// Start building a manager over a Redis connection. Only parses the URL.
    pub fn builder_from_config(
        config: &RedisConnectionConfig,
    ) -> Result<RedisCacheManagerBuilder, CacheError> {
        let writer = RedisCacheWriter::from_config(config)?;
        Ok(RedisCacheManagerBuilder::new(Arc::new(writer)))
    }

    /// Configuration applied to caches without their own
    pub fn default_configuration(&self) -> &RedisCacheConfiguration {
        &self.default_config
    }

    /// Configuration of every cache created so far
    pub fn cache_configurations(&self) -> BTreeMap<String, RedisCacheConfiguration> {
        self.caches
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(name, cache)| (name.clone(), cache.configuration().clone()))
            .collect()
    }

    pub fn allows_in_flight_cache_creation(&self) -> bool {
        self.allow_in_flight_cache_creation
    }

    pub fn statistics_enabled(&self) -> bool {
        self.enable_statistics
    }

    fn create_cache(&self, name: &str, config: RedisCacheConfiguration) -> Arc<RedisCache> {
        Arc::new(RedisCache::new(
            name,
            self.writer.clone(),
            config,
            self.enable_statistics,
        ))
    }
}

impl CacheManager for RedisCacheManager {
    fn get_cache(&self, name: &str) -> Option<Arc<RedisCache>> {
        if let Some(cache) = self
            .caches
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
        {
            return Some(cache.clone());
        }

        if !self.allow_in_flight_cache_creation {
            return None;
        }

        let mut caches = self.caches.write().unwrap_or_else(PoisonError::into_inner);
        let cache = caches
            .entry(name.to_string())
            .or_insert_with(|| {
                debug_log!(cache = name, "creating cache with default configuration");
                self.create_cache(name, self.default_config.clone())
            })
            .clone();
        Some(cache)
    }

    fn cache_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .caches
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }
}

/// Builder for [`RedisCacheManager`]
#[derive(Debug)]
pub struct RedisCacheManagerBuilder {
    writer: Arc<dyn CacheWriter>,
    default_config: RedisCacheConfiguration,
    initial_caches: HashMap<String, RedisCacheConfiguration>,
    allow_in_flight_cache_creation: bool,
    enable_statistics: bool,
}

impl RedisCacheManagerBuilder {
    pub fn new(writer: Arc<dyn CacheWriter>) -> Self {
        Self {
            writer,
            default_config: RedisCacheConfiguration::default_cache_config(),
            initial_caches: HashMap::new(),
            allow_in_flight_cache_creation: true,
            enable_statistics: false,
        }
    }

    /// Configuration used for every cache without its own
    pub fn cache_defaults(mut self, config: RedisCacheConfiguration) -> Self {
        self.default_config = config;
        self
    }

    /// Pre-create caches using the default configuration.
    ///
    /// Call after [`Self::cache_defaults`]; names already registered keep their configuration.
    pub fn initial_cache_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            let default_config = self.default_config.clone();
            self.initial_caches
                .entry(name.into())
                .or_insert(default_config);
        }
        self
    }

    /// Register per-cache configurations, replacing any earlier entry for the same name
    pub fn with_initial_cache_configurations(
        mut self,
        configs: HashMap<String, RedisCacheConfiguration>,
    ) -> Self {
        self.initial_caches.extend(configs);
        self
    }

    /// Only the pre-created caches exist; unknown names yield `None`
    pub fn disable_create_on_missing_cache(mut self) -> Self {
        self.allow_in_flight_cache_creation = false;
        self
    }

    pub fn enable_statistics(mut self) -> Self {
        self.enable_statistics = true;
        self
    }

    /// Names of the caches that will be pre-created, sorted
    pub fn configured_cache_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.initial_caches.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn build(self) -> RedisCacheManager {
        let manager = RedisCacheManager {
            writer: self.writer,
            default_config: self.default_config,
            caches: RwLock::new(HashMap::new()),
            allow_in_flight_cache_creation: self.allow_in_flight_cache_creation,
            enable_statistics: self.enable_statistics,
        };

        let caches: HashMap<String, Arc<RedisCache>> = self
            .initial_caches
            .into_iter()
            .map(|(name, config)| {
                let cache = manager.create_cache(&name, config);
                (name, cache)
            })
            .collect();

        debug_log!(caches = caches.len(), "redis cache manager built");
        *manager.caches.write().unwrap_or_else(PoisonError::into_inner) = caches;
        manager
    }
}
