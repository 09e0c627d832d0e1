//! Redis cache manager construction
//!
//! Combines the global cache properties, the named overrides and the
//! application-supplied hooks into a ready [`RedisCacheManager`].

use crate::customizers::{BuilderCustomizers, CacheManagerCustomizers};
use crate::resolver;
use cache_system::{CacheWriter, RedisCacheConfiguration, RedisCacheManager};
use config::{CacheProperties, DuckCacheProperties};
use std::sync::Arc;

/// Inputs of one manager construction
#[derive(Debug, Clone, Copy)]
pub struct RedisCacheManagerFactory<'a> {
    cache: &'a CacheProperties,
    duck: &'a DuckCacheProperties,
    default_configuration: Option<&'a RedisCacheConfiguration>,
    builder_customizers: Option<&'a BuilderCustomizers>,
    manager_customizers: Option<&'a CacheManagerCustomizers>,
}

impl<'a> RedisCacheManagerFactory<'a> {
    pub fn new(cache: &'a CacheProperties, duck: &'a DuckCacheProperties) -> Self {
        Self {
            cache,
            duck,
            default_configuration: None,
            builder_customizers: None,
            manager_customizers: None,
        }
    }

    /// Use an application-supplied default instead of the one derived from `cache.redis`
    pub fn with_default_configuration(mut self, config: &'a RedisCacheConfiguration) -> Self {
        self.default_configuration = Some(config);
        self
    }

    pub fn with_builder_customizers(mut self, customizers: &'a BuilderCustomizers) -> Self {
        self.builder_customizers = Some(customizers);
        self
    }

    pub fn with_manager_customizers(mut self, customizers: &'a CacheManagerCustomizers) -> Self {
        self.manager_customizers = Some(customizers);
        self
    }

    /// Baseline configuration for caches without a named override
    pub fn determine_configuration(&self) -> RedisCacheConfiguration {
        match self.default_configuration {
            Some(config) => config.clone(),
            None => resolver::create_configuration(&self.cache.redis),
        }
    }

    /// Build the manager over `writer`. Performs no I/O.
    pub fn build(&self, writer: Arc<dyn CacheWriter>) -> RedisCacheManager {
        let defaults = self.determine_configuration();
        let mut builder = RedisCacheManager::builder(writer).cache_defaults(defaults.clone());

        if !self.cache.cache_names.is_empty() {
            builder = builder.initial_cache_names(self.cache.cache_names.iter().cloned());
        }
        if self.cache.redis.enable_statistics {
            builder = builder.enable_statistics();
        }
        if !self.duck.redis.is_empty() {
            builder = builder
                .with_initial_cache_configurations(resolver::resolve(&defaults, &self.duck.redis));
        }

        if let Some(customizers) = self.builder_customizers {
            builder = customizers.customize(builder);
        }
        debug_log!(
            caches = ?builder.configured_cache_names(),
            overrides = self.duck.redis.len(),
            "building redis cache manager"
        );
        let manager = builder.build();
        match self.manager_customizers {
            Some(customizers) => customizers.customize(manager),
            None => manager,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cache_system::testing::InMemoryCacheWriter;
    use cache_system::{CacheManager, ValueSerializer};
    use config::RedisCacheProperties;
    use std::collections::HashMap;
    use std::time::Duration;

    fn writer() -> Arc<dyn CacheWriter> {
        Arc::new(InMemoryCacheWriter::new())
    }

    fn cache_properties(names: &[&str]) -> CacheProperties {
        CacheProperties {
            cache_names: names.iter().map(|name| name.to_string()).collect(),
            redis: RedisCacheProperties::default().with_time_to_live(Duration::from_secs(600)),
            ..Default::default()
        }
    }

    fn duck_properties() -> DuckCacheProperties {
        DuckCacheProperties {
            redis: HashMap::from([
                (
                    "a".to_string(),
                    RedisCacheProperties::default().with_time_to_live(Duration::from_secs(30)),
                ),
                (
                    "b".to_string(),
                    RedisCacheProperties::default().with_cache_null_values(false),
                ),
            ]),
        }
    }

    #[test]
    fn test_named_and_default_caches() {
        let cache = cache_properties(&["a", "b", "c"]);
        let duck = duck_properties();
        let manager = RedisCacheManagerFactory::new(&cache, &duck).build(writer());

        assert_eq!(manager.cache_names(), vec!["a", "b", "c"]);

        let a = manager.get_cache("a").unwrap();
        assert_eq!(a.configuration().ttl(), Some(Duration::from_secs(30)));

        let b = manager.get_cache("b").unwrap();
        assert_eq!(b.configuration().ttl(), None);
        assert!(!b.configuration().allow_cache_null_values());

        let c = manager.get_cache("c").unwrap();
        assert_eq!(c.configuration().ttl(), Some(Duration::from_secs(600)));
        assert!(c.configuration().allow_cache_null_values());
    }

    #[test]
    fn test_overrides_pre_created_without_cache_names() {
        let cache = CacheProperties::default();
        let duck = duck_properties();
        let manager = RedisCacheManagerFactory::new(&cache, &duck).build(writer());

        assert_eq!(manager.cache_names(), vec!["a", "b"]);
    }

    #[test]
    fn test_statistics_flag() {
        let mut cache = cache_properties(&["a"]);
        let duck = DuckCacheProperties::default();

        let manager = RedisCacheManagerFactory::new(&cache, &duck).build(writer());
        assert!(!manager.statistics_enabled());

        cache.redis = cache.redis.with_enable_statistics(true);
        let manager = RedisCacheManagerFactory::new(&cache, &duck).build(writer());
        assert!(manager.statistics_enabled());
        assert!(manager.get_cache("a").unwrap().statistics().is_some());
    }

    #[test]
    fn test_supplied_default_configuration_wins() {
        let cache = cache_properties(&["c"]);
        let duck = DuckCacheProperties::default();
        let supplied = RedisCacheConfiguration::default().prefix_cache_name_with("custom:");

        let factory =
            RedisCacheManagerFactory::new(&cache, &duck).with_default_configuration(&supplied);
        let manager = factory.build(writer());

        assert_eq!(factory.determine_configuration(), supplied);
        assert_eq!(manager.get_cache("c").unwrap().configuration(), &supplied);
        assert_eq!(manager.default_configuration(), &supplied);
    }

    #[test]
    fn test_supplied_serializer_not_applied_to_named_caches() {
        let cache = cache_properties(&["c"]);
        let duck = duck_properties();
        let supplied =
            RedisCacheConfiguration::default().serialize_values_with(ValueSerializer::Json);

        let manager = RedisCacheManagerFactory::new(&cache, &duck)
            .with_default_configuration(&supplied)
            .build(writer());

        let serializer_of = |name: &str| {
            manager
                .get_cache(name)
                .unwrap()
                .configuration()
                .value_serializer()
        };
        assert_eq!(serializer_of("c"), ValueSerializer::Json);
        assert_eq!(serializer_of("a"), ValueSerializer::Binary);
        assert_eq!(serializer_of("b"), ValueSerializer::Binary);
    }

    #[test]
    fn test_construction_is_repeatable() {
        let cache = cache_properties(&["a", "b", "c"]);
        let duck = duck_properties();
        let factory = RedisCacheManagerFactory::new(&cache, &duck);

        let first = factory.build(writer());
        let second = factory.build(writer());

        assert_eq!(first.cache_configurations(), second.cache_configurations());
        assert!(!Arc::ptr_eq(
            &first.get_cache("a").unwrap(),
            &second.get_cache("a").unwrap()
        ));
    }

    #[test]
    fn test_customizers_applied() {
        let cache = cache_properties(&["a"]);
        let duck = DuckCacheProperties::default();
        let mut builder_customizers = BuilderCustomizers::new();
        builder_customizers.push(|builder| builder.disable_create_on_missing_cache());
        let mut manager_customizers = CacheManagerCustomizers::new();
        manager_customizers.push(|manager| {
            manager.get_cache("a");
        });

        let factory = RedisCacheManagerFactory::new(&cache, &duck)
            .with_builder_customizers(&builder_customizers)
            .with_manager_customizers(&manager_customizers);
        let manager = factory.build(writer());

        assert!(manager.get_cache("unknown").is_none());
    }
}
