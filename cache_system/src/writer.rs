//! Backing-store access for Redis caches
//!
//! A [`CacheWriter`] performs the raw byte-level operations of every cache
//! created by a manager. [`RedisCacheWriter`] talks to Redis; it is handed a
//! client and only connects on first use.

use crate::errors::CacheError;
use async_trait::async_trait;
use config::RedisConnectionConfig;
use redis::{AsyncCommands, Client};
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Raw key-value operations used by [`crate::RedisCache`]
#[async_trait]
pub trait CacheWriter: Send + Sync + Debug {
    /// Fetch the bytes stored under `key`
    async fn get(&self, cache_name: &str, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Store `value` under `key`, expiring after `ttl` when given
    async fn put(
        &self,
        cache_name: &str,
        key: &str,
        value: &[u8],
        ttl: Option<Duration>,
    ) -> Result<(), CacheError>;

    /// Store `value` only if `key` is absent. Returns the existing bytes when
    /// nothing was written.
    async fn put_if_absent(
        &self,
        cache_name: &str,
        key: &str,
        value: &[u8],
        ttl: Option<Duration>,
    ) -> Result<Option<Vec<u8>>, CacheError>;

    async fn remove(&self, cache_name: &str, key: &str) -> Result<(), CacheError>;

    /// Remove every key matching the glob `pattern`, returning how many were removed
    async fn clean(&self, cache_name: &str, pattern: &str) -> Result<usize, CacheError>;
}

/// Redis-backed cache writer
#[derive(Clone)]
pub struct RedisCacheWriter {
    client: Arc<Client>,
    connection_pool: Arc<RwLock<Option<redis::aio::MultiplexedConnection>>>,
}

impl Debug for RedisCacheWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let connection_status = {
            match self.connection_pool.try_read() {
                Ok(pool) => {
                    if pool.is_some() {
                        "connected"
                    } else {
                        "no_connection"
                    }
                }
                Err(_) => "lock_error",
            }
        };

        f.debug_struct("RedisCacheWriter")
            .field("connected", &connection_status)
            .finish()
    }
}

impl RedisCacheWriter {
    /// Wrap an existing client. No connection is opened here.
    pub fn new(client: Client) -> Self {
        Self {
            client: Arc::new(client),
            connection_pool: Arc::new(RwLock::new(None)),
        }
    }

    /// Create a writer from connection settings. Only parses the URL.
    pub fn from_config(config: &RedisConnectionConfig) -> Result<Self, CacheError> {
        let client = Client::open(config.url.as_str())?;
        Ok(Self::new(client))
    }

    /// Get or create Redis connection
    async fn get_connection(&self) -> Result<redis::aio::MultiplexedConnection, CacheError> {
        let mut pool = self.connection_pool.write().await;

        if pool.is_none() {
            let connection = self.client.get_multiplexed_async_connection().await?;
            *pool = Some(connection);
        }

        Ok(pool
            .as_ref()
            .ok_or_else(|| CacheError::Connection("Failed to get connection from pool".into()))?
            .clone())
    }
}

fn ttl_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1)
}

#[async_trait]
impl CacheWriter for RedisCacheWriter {
    async fn get(&self, _cache_name: &str, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let mut conn = self.get_connection().await?;

        let value: Option<Vec<u8>> = conn.get(key).await?;
        Ok(value)
    }

    async fn put(
        &self,
        cache_name: &str,
        key: &str,
        value: &[u8],
        ttl: Option<Duration>,
    ) -> Result<(), CacheError> {
        let mut conn = self.get_connection().await?;

        match ttl {
            Some(ttl) => {
                let _: () = conn.pset_ex(key, value, ttl_millis(ttl)).await?;
            }
            None => {
                let _: () = conn.set(key, value).await?;
            }
        }

        trace_log!(cache = cache_name, key, "redis cache write");
        Ok(())
    }

    async fn put_if_absent(
        &self,
        cache_name: &str,
        key: &str,
        value: &[u8],
        ttl: Option<Duration>,
    ) -> Result<Option<Vec<u8>>, CacheError> {
        let mut conn = self.get_connection().await?;

        let mut command = redis::cmd("SET");
        command.arg(key).arg(value).arg("NX");
        if let Some(ttl) = ttl {
            command.arg("PX").arg(ttl_millis(ttl));
        }

        let stored: Option<String> = command.query_async(&mut conn).await?;
        if stored.is_some() {
            trace_log!(cache = cache_name, key, "redis cache write if absent");
            return Ok(None);
        }

        let existing: Option<Vec<u8>> = conn.get(key).await?;
        Ok(existing)
    }

    async fn remove(&self, _cache_name: &str, key: &str) -> Result<(), CacheError> {
        let mut conn = self.get_connection().await?;

        let _: i32 = conn.del(key).await?;
        Ok(())
    }

    async fn clean(&self, cache_name: &str, pattern: &str) -> Result<usize, CacheError> {
        let mut conn = self.get_connection().await?;

        let keys: Vec<String> = conn.keys(pattern).await?;

        if keys.is_empty() {
            return Ok(0);
        }

        let deleted: usize = conn.del(keys).await?;
        debug_log!(cache = cache_name, pattern, deleted, "redis cache cleaned");
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_does_not_connect() {
        // Nothing listens on this port; construction must still succeed
        let writer = RedisCacheWriter::from_config(&RedisConnectionConfig::new(
            "redis://127.0.0.1:1/",
        ))
        .expect("valid url");

        assert!(format!("{:?}", writer).contains("no_connection"));
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        let result = RedisCacheWriter::from_config(&RedisConnectionConfig::new("not a url"));
        assert!(matches!(result, Err(CacheError::ConnectionError(_))));
    }

    #[test]
    fn test_ttl_millis_rounds_up_to_one() {
        assert_eq!(ttl_millis(Duration::from_micros(10)), 1);
        assert_eq!(ttl_millis(Duration::from_secs(2)), 2000);
    }

    fn redis_url() -> String {
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379/".to_string())
    }

    #[tokio::test]
    #[ignore = "requires a Redis server at REDIS_URL"]
    async fn test_redis_writer_operations() {
        let writer = RedisCacheWriter::from_config(&RedisConnectionConfig::new(redis_url()))
            .expect("valid url");
        let namespace = format!("duck-cache-test:{}:", std::process::id());
        let expiring = format!("{}expiring", namespace);
        let persistent = format!("{}persistent", namespace);

        writer
            .put("test", &expiring, b"one", Some(Duration::from_secs(60)))
            .await
            .unwrap();
        writer.put("test", &persistent, b"two", None).await.unwrap();
        assert_eq!(writer.get("test", &expiring).await.unwrap(), Some(b"one".to_vec()));

        let mut conn = writer.get_connection().await.unwrap();
        let expiring_ttl: i64 = conn.pttl(&expiring).await.unwrap();
        let persistent_ttl: i64 = conn.pttl(&persistent).await.unwrap();
        assert!(expiring_ttl > 0 && expiring_ttl <= 60_000);
        assert_eq!(persistent_ttl, -1);

        let existing = writer
            .put_if_absent("test", &expiring, b"other", None)
            .await
            .unwrap();
        assert_eq!(existing, Some(b"one".to_vec()));

        let fresh = format!("{}fresh", namespace);
        let existing = writer
            .put_if_absent("test", &fresh, b"three", Some(Duration::from_secs(60)))
            .await
            .unwrap();
        assert_eq!(existing, None);
        assert_eq!(writer.get("test", &fresh).await.unwrap(), Some(b"three".to_vec()));

        writer.remove("test", &fresh).await.unwrap();
        assert_eq!(writer.get("test", &fresh).await.unwrap(), None);

        let removed = writer
            .clean("test", &format!("{}*", namespace))
            .await
            .unwrap();
        assert_eq!(removed, 2);
        assert_eq!(writer.get("test", &persistent).await.unwrap(), None);
    }
}
