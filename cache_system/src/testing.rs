//! In-memory [`CacheWriter`] for tests
//!
//! Available under `cfg(test)` and the `test-util` feature. Honors TTLs and
//! records the TTL of the last write per key so tests can assert on it.

use crate::errors::CacheError;
use crate::writer::CacheWriter;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

#[derive(Debug)]
struct Entry {
    value: Vec<u8>,
    ttl: Option<Duration>,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|deadline| deadline <= now)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryCacheWriter {
    entries: Mutex<HashMap<String, Entry>>,
}

impl InMemoryCacheWriter {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Every live key, sorted
    pub fn keys(&self) -> Vec<String> {
        let now = Instant::now();
        let mut keys: Vec<String> = self
            .entries()
            .iter()
            .filter(|(_, entry)| !entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        keys
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.keys().iter().any(|existing| existing == key)
    }

    /// TTL used by the last write of `key`; `None` when absent or never expiring
    pub fn ttl_of(&self, key: &str) -> Option<Duration> {
        self.entries().get(key).and_then(|entry| entry.ttl)
    }

    pub fn raw(&self, key: &str) -> Option<Vec<u8>> {
        let now = Instant::now();
        self.entries()
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.value.clone())
    }

    fn insert(&self, key: &str, value: &[u8], ttl: Option<Duration>) {
        self.entries().insert(
            key.to_string(),
            Entry {
                value: value.to_vec(),
                ttl,
                expires_at: ttl.map(|ttl| Instant::now() + ttl),
            },
        );
    }
}

/// Minimal glob matching supporting `*` wildcards
fn glob_matches(pattern: &str, candidate: &str) -> bool {
    let parts: Vec<&str> = pattern.split('*').collect();
    if parts.len() == 1 {
        return pattern == candidate;
    }

    let (first, rest) = (parts[0], &parts[1..]);
    let Some(mut remaining) = candidate.strip_prefix(first) else {
        return false;
    };

    let last = rest[rest.len() - 1];
    for part in &rest[..rest.len() - 1] {
        match remaining.find(part) {
            Some(index) => remaining = &remaining[index + part.len()..],
            None => return false,
        }
    }
    remaining.ends_with(last)
}

#[async_trait]
impl CacheWriter for InMemoryCacheWriter {
    async fn get(&self, _cache_name: &str, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(self.raw(key))
    }

    async fn put(
        &self,
        _cache_name: &str,
        key: &str,
        value: &[u8],
        ttl: Option<Duration>,
    ) -> Result<(), CacheError> {
        self.insert(key, value, ttl);
        Ok(())
    }

    async fn put_if_absent(
        &self,
        _cache_name: &str,
        key: &str,
        value: &[u8],
        ttl: Option<Duration>,
    ) -> Result<Option<Vec<u8>>, CacheError> {
        if let Some(existing) = self.raw(key) {
            return Ok(Some(existing));
        }
        self.insert(key, value, ttl);
        Ok(None)
    }

    async fn remove(&self, _cache_name: &str, key: &str) -> Result<(), CacheError> {
        self.entries().remove(key);
        Ok(())
    }

    async fn clean(&self, _cache_name: &str, pattern: &str) -> Result<usize, CacheError> {
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|key, _| !glob_matches(pattern, key));
        Ok(before - entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glob_matches() {
        assert!(glob_matches("*", "anything"));
        assert!(glob_matches("users::*", "users::42"));
        assert!(!glob_matches("users::*", "orders::42"));
        assert!(glob_matches("app:*::*", "app:users::1"));
        assert!(glob_matches("exact", "exact"));
        assert!(!glob_matches("exact", "exactly"));
    }

    #[tokio::test]
    async fn test_expired_entries_are_absent() {
        let writer = InMemoryCacheWriter::new();
        writer
            .put("c", "k", b"v", Some(Duration::from_millis(1)))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(writer.get("c", "k").await.unwrap(), None);
    }
}
