//! Guarded cache-manager providers
//!
//! The bootstrap walks an ordered list of providers. A provider runs only
//! while no cache manager exists and its predicate holds for the components
//! resolved so far.

use crate::customizers::{BuilderCustomizers, CacheManagerCustomizers};
use crate::errors::DuckCacheError;
use crate::factory::RedisCacheManagerFactory;
use cache_system::{CacheManager, CacheWriter, RedisCacheConfiguration};
use config::{AppConfig, CacheType};
use std::fmt;
use std::sync::Arc;

/// Components visible to providers while the cache manager is resolved
#[derive(Debug)]
pub struct BootContext {
    pub config: Arc<AppConfig>,
    pub writer: Option<Arc<dyn CacheWriter>>,
    pub default_cache_configuration: Option<RedisCacheConfiguration>,
    pub builder_customizers: BuilderCustomizers,
    pub manager_customizers: CacheManagerCustomizers,
    pub cache_manager: Option<Arc<dyn CacheManager>>,
}

impl BootContext {
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self {
            config,
            writer: None,
            default_cache_configuration: None,
            builder_customizers: BuilderCustomizers::new(),
            manager_customizers: CacheManagerCustomizers::new(),
            cache_manager: None,
        }
    }

    /// Declared cache type, if any
    pub fn cache_type(&self) -> Option<CacheType> {
        self.config.cache.cache_type
    }

    /// True when no type is declared or the declared type is `cache_type`
    pub fn cache_type_allows(&self, cache_type: CacheType) -> bool {
        self.cache_type().is_none_or(|declared| declared == cache_type)
    }
}

type Condition = Box<dyn Fn(&BootContext) -> bool + Send + Sync>;
type Construct =
    Box<dyn Fn(&BootContext) -> Result<Arc<dyn CacheManager>, DuckCacheError> + Send + Sync>;

/// One guarded construction step
pub struct Provider {
    name: String,
    condition: Condition,
    construct: Construct,
}

impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provider").field("name", &self.name).finish()
    }
}

impl Provider {
    pub fn new<C, F>(name: impl Into<String>, condition: C, construct: F) -> Self
    where
        C: Fn(&BootContext) -> bool + Send + Sync + 'static,
        F: Fn(&BootContext) -> Result<Arc<dyn CacheManager>, DuckCacheError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            condition: Box::new(condition),
            construct: Box::new(construct),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Predicate plus the implicit "no manager yet" guard
    pub fn matches(&self, context: &BootContext) -> bool {
        context.cache_manager.is_none() && (self.condition)(context)
    }

    pub fn provide(&self, context: &BootContext) -> Result<Arc<dyn CacheManager>, DuckCacheError> {
        (self.construct)(context)
    }
}

/// Builds a [`cache_system::RedisCacheManager`] when a writer is available
/// and the declared cache type is absent or `redis`
pub fn redis_provider() -> Provider {
    Provider::new(
        "redis",
        |context| context.writer.is_some() && context.cache_type_allows(CacheType::Redis),
        |context| {
            let writer = context.writer.clone().ok_or_else(|| {
                DuckCacheError::Configuration {
                    cache_type: context.cache_type(),
                }
            })?;

            let mut factory =
                RedisCacheManagerFactory::new(&context.config.cache, &context.config.duck.cache)
                    .with_builder_customizers(&context.builder_customizers)
                    .with_manager_customizers(&context.manager_customizers);
            if let Some(config) = &context.default_cache_configuration {
                factory = factory.with_default_configuration(config);
            }

            let manager: Arc<dyn CacheManager> = Arc::new(factory.build(writer));
            Ok(manager)
        },
    )
}
