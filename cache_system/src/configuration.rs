use crate::serializer::ValueSerializer;
use std::time::Duration;

/// Separator placed between the cache name and the entry key
pub const KEY_SEPARATOR: &str = "::";

/// Computes the key prefix of a cache from its name
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CacheKeyPrefix {
    /// `{cache_name}::`
    #[default]
    Simple,
    /// `{prefix}{cache_name}::`
    Prefixed(String),
}

impl CacheKeyPrefix {
    pub fn compute(&self, cache_name: &str) -> String {
        match self {
            CacheKeyPrefix::Simple => format!("{}{}", cache_name, KEY_SEPARATOR),
            CacheKeyPrefix::Prefixed(prefix) => {
                format!("{}{}{}", prefix, cache_name, KEY_SEPARATOR)
            }
        }
    }
}

/// Resolved, serializer-bound settings of one Redis cache.
///
/// Immutable: every `with`-style method consumes the configuration and
/// returns an updated copy, so a shared default can be specialized per cache.
#[derive(Debug, Clone, PartialEq)]
pub struct RedisCacheConfiguration {
    ttl: Option<Duration>,
    cache_null_values: bool,
    use_prefix: bool,
    key_prefix: CacheKeyPrefix,
    value_serializer: ValueSerializer,
}

impl RedisCacheConfiguration {
    /// Built-in defaults: no expiry, null values cached, keys prefixed with
    /// `{cache_name}::`, binary value serialization
    pub fn default_cache_config() -> Self {
        Self {
            ttl: None,
            cache_null_values: true,
            use_prefix: true,
            key_prefix: CacheKeyPrefix::Simple,
            value_serializer: ValueSerializer::Binary,
        }
    }

    /// Set the entry expiration. A zero duration means entries never expire.
    pub fn entry_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = (!ttl.is_zero()).then_some(ttl);
        self
    }

    /// Prefix keys with `{prefix}{cache_name}::`
    pub fn prefix_cache_name_with(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = CacheKeyPrefix::Prefixed(prefix.into());
        self
    }

    /// Never store a "no result" outcome
    pub fn disable_caching_null_values(mut self) -> Self {
        self.cache_null_values = false;
        self
    }

    /// Store keys as given, without any prefix
    pub fn disable_key_prefix(mut self) -> Self {
        self.use_prefix = false;
        self
    }

    pub fn serialize_values_with(mut self, serializer: ValueSerializer) -> Self {
        self.value_serializer = serializer;
        self
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    pub fn allow_cache_null_values(&self) -> bool {
        self.cache_null_values
    }

    pub fn use_prefix(&self) -> bool {
        self.use_prefix
    }

    pub fn key_prefix(&self) -> &CacheKeyPrefix {
        &self.key_prefix
    }

    /// Key prefix for the given cache, `None` when prefixing is disabled
    pub fn key_prefix_for(&self, cache_name: &str) -> Option<String> {
        self.use_prefix.then(|| self.key_prefix.compute(cache_name))
    }

    pub fn value_serializer(&self) -> ValueSerializer {
        self.value_serializer
    }
}

impl Default for RedisCacheConfiguration {
    fn default() -> Self {
        Self::default_cache_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RedisCacheConfiguration::default_cache_config();

        assert_eq!(config.ttl(), None);
        assert!(config.allow_cache_null_values());
        assert!(config.use_prefix());
        assert_eq!(config.key_prefix(), &CacheKeyPrefix::Simple);
        assert_eq!(config.value_serializer(), ValueSerializer::Binary);
        assert_eq!(config.key_prefix_for("users").as_deref(), Some("users::"));
    }

    #[test]
    fn test_zero_ttl_means_no_expiry() {
        let config = RedisCacheConfiguration::default_cache_config().entry_ttl(Duration::ZERO);
        assert_eq!(config.ttl(), None);

        let config = config.entry_ttl(Duration::from_secs(5));
        assert_eq!(config.ttl(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_prefix_cache_name_with() {
        let config = RedisCacheConfiguration::default_cache_config().prefix_cache_name_with("app:");
        assert_eq!(config.key_prefix_for("users").as_deref(), Some("app:users::"));
    }

    #[test]
    fn test_disable_key_prefix_overrides_prefix() {
        let config = RedisCacheConfiguration::default_cache_config()
            .prefix_cache_name_with("app:")
            .disable_key_prefix();

        assert_eq!(config.key_prefix_for("users"), None);
    }

    #[test]
    fn test_equality_covers_serializer() {
        let json = RedisCacheConfiguration::default_cache_config()
            .serialize_values_with(ValueSerializer::Json);
        let binary = RedisCacheConfiguration::default_cache_config();

        assert_ne!(json, binary);
        assert_eq!(json.serialize_values_with(ValueSerializer::Binary), binary);
        assert_ne!(binary.clone(), binary.disable_caching_null_values());
    }
}
