//! Named Redis cache
//!
//! A `RedisCache` applies one [`RedisCacheConfiguration`] (key prefix, TTL,
//! null handling, serializer) on top of a shared [`CacheWriter`].

use crate::configuration::RedisCacheConfiguration;
use crate::errors::CacheError;
use crate::serializer::NULL_VALUE;
use crate::statistics::{CacheStatistics, CacheStatisticsSnapshot};
use crate::writer::CacheWriter;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use std::future::Future;
use std::sync::Arc;

pub struct RedisCache {
    name: String,
    writer: Arc<dyn CacheWriter>,
    config: RedisCacheConfiguration,
    statistics: Option<CacheStatistics>,
}

impl Debug for RedisCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCache")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("statistics", &self.statistics.as_ref().map(|s| s.snapshot()))
            .finish()
    }
}

impl RedisCache {
    pub fn new(
        name: impl Into<String>,
        writer: Arc<dyn CacheWriter>,
        config: RedisCacheConfiguration,
        enable_statistics: bool,
    ) -> Self {
        Self {
            name: name.into(),
            writer,
            config,
            statistics: enable_statistics.then(CacheStatistics::new),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn configuration(&self) -> &RedisCacheConfiguration {
        &self.config
    }

    /// Key written to the backing store for `key`
    pub fn create_cache_key(&self, key: &str) -> String {
        match self.config.key_prefix_for(&self.name) {
            Some(prefix) => format!("{}{}", prefix, key),
            None => key.to_string(),
        }
    }

    /// Look up `key`.
    ///
    /// `None` is a miss, `Some(None)` a cached "no result", `Some(Some(v))` a hit.
    pub async fn get<T>(&self, key: &str) -> Result<Option<Option<T>>, CacheError>
    where
        T: DeserializeOwned,
    {
        let cache_key = self.create_cache_key(key);
        let bytes = self.writer.get(&self.name, &cache_key).await?;

        match bytes {
            Some(bytes) => {
                self.with_statistics(CacheStatistics::record_hit);
                Ok(Some(self.deserialize(&bytes)?))
            }
            None => {
                self.with_statistics(CacheStatistics::record_miss);
                Ok(None)
            }
        }
    }

    /// Return the cached value for `key`, computing and storing it on a miss.
    ///
    /// A `None` from the loader is stored only when the cache allows null
    /// values. Loader errors are returned without touching the cache.
    pub async fn get_or_compute<T, E, F, Fut>(&self, key: &str, loader: F) -> Result<Option<T>, E>
    where
        T: Serialize + DeserializeOwned,
        E: From<CacheError>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<T>, E>>,
    {
        if let Some(cached) = self.get::<T>(key).await? {
            return Ok(cached);
        }

        let value = loader().await?;
        if value.is_some() || self.config.allow_cache_null_values() {
            self.put(key, value.as_ref()).await?;
        }
        Ok(value)
    }

    /// Store `value` under `key`; `None` records a cached "no result".
    ///
    /// Fails with [`CacheError::NullValuesNotAllowed`] when `value` is `None`
    /// and the cache does not cache null values; nothing is written then.
    pub async fn put<T>(&self, key: &str, value: Option<&T>) -> Result<(), CacheError>
    where
        T: Serialize,
    {
        let bytes = self.serialize(value)?;
        let cache_key = self.create_cache_key(key);

        self.writer
            .put(&self.name, &cache_key, &bytes, self.config.ttl())
            .await?;
        self.with_statistics(CacheStatistics::record_put);
        Ok(())
    }

    /// Store `value` only if `key` holds nothing yet.
    ///
    /// Returns the existing entry (in the shape of [`RedisCache::get`]) when
    /// one was present. A `None` value on a cache without null caching is a
    /// no-op that still reports the existing entry.
    pub async fn put_if_absent<T>(
        &self,
        key: &str,
        value: Option<&T>,
    ) -> Result<Option<Option<T>>, CacheError>
    where
        T: Serialize + DeserializeOwned,
    {
        if value.is_none() && !self.config.allow_cache_null_values() {
            return self.get(key).await;
        }

        let bytes = self.serialize(value)?;
        let cache_key = self.create_cache_key(key);
        let existing = self
            .writer
            .put_if_absent(&self.name, &cache_key, &bytes, self.config.ttl())
            .await?;

        match existing {
            Some(existing) => {
                self.with_statistics(CacheStatistics::record_hit);
                Ok(Some(self.deserialize(&existing)?))
            }
            None => {
                self.with_statistics(CacheStatistics::record_put);
                Ok(None)
            }
        }
    }

    pub async fn evict(&self, key: &str) -> Result<(), CacheError> {
        let cache_key = self.create_cache_key(key);
        self.writer.remove(&self.name, &cache_key).await?;
        self.with_statistics(CacheStatistics::record_removal);
        Ok(())
    }

    /// Remove every entry of this cache.
    ///
    /// Without a key prefix the pattern is `*`, which clears the whole database.
    pub async fn clear(&self) -> Result<usize, CacheError> {
        let pattern = self.create_cache_key("*");
        let removed = self.writer.clean(&self.name, &pattern).await?;
        if let Some(statistics) = &self.statistics {
            for _ in 0..removed {
                statistics.record_removal();
            }
        }
        Ok(removed)
    }

    /// Counters since creation or the last reset; `None` when statistics are disabled
    pub fn statistics(&self) -> Option<CacheStatisticsSnapshot> {
        self.statistics.as_ref().map(CacheStatistics::snapshot)
    }

    pub fn reset_statistics(&self) {
        self.with_statistics(CacheStatistics::reset);
    }

    fn with_statistics(&self, record: impl FnOnce(&CacheStatistics)) {
        if let Some(statistics) = &self.statistics {
            record(statistics);
        }
    }

    fn serialize<T>(&self, value: Option<&T>) -> Result<Vec<u8>, CacheError>
    where
        T: Serialize,
    {
        match value {
            Some(value) => self.config.value_serializer().serialize(value),
            None if self.config.allow_cache_null_values() => Ok(NULL_VALUE.to_vec()),
            None => Err(CacheError::NullValuesNotAllowed(self.name.clone())),
        }
    }

    fn deserialize<T>(&self, bytes: &[u8]) -> Result<Option<T>, CacheError>
    where
        T: DeserializeOwned,
    {
        if bytes == NULL_VALUE {
            return Ok(None);
        }
        Ok(Some(self.config.value_serializer().deserialize(bytes)?))
    }
}
