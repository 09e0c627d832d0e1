//! Core bootstrap functionality
//!
//! This module contains the `CacheBootstrap` struct, which collects the
//! configuration and explicitly supplied components, walks the provider list
//! and validates that a cache manager came out of it.

use std::sync::Arc;

use cache_system::{
    CacheManager, CacheWriter, RedisCacheConfiguration, RedisCacheManager,
    RedisCacheManagerBuilder, RedisCacheWriter,
};
use config::AppConfig;

use crate::errors::DuckCacheError;
use crate::provider::{self, BootContext, Provider};
use crate::validator;

/// Startup-time assembly of the application's cache manager
#[derive(Debug)]
pub struct CacheBootstrap {
    context: BootContext,
    providers: Vec<Provider>,
}

impl CacheBootstrap {
    /// Create a bootstrap with the built-in Redis provider
    pub fn new(config: AppConfig) -> Self {
        Self {
            context: BootContext::new(Arc::new(config)),
            providers: vec![provider::redis_provider()],
        }
    }

    /// Load configuration with [`AppConfig::load`] and create a bootstrap for it
    pub fn from_env() -> Result<Self, DuckCacheError> {
        Ok(Self::new(AppConfig::load()?))
    }

    pub fn config(&self) -> &AppConfig {
        &self.context.config
    }

    /// Backing store for the Redis provider; takes precedence over `redis.url`
    pub fn with_writer(mut self, writer: Arc<dyn CacheWriter>) -> Self {
        self.context.writer = Some(writer);
        self
    }

    /// Back the cache with an existing Redis client
    pub fn with_redis_client(self, client: redis::Client) -> Self {
        self.with_writer(Arc::new(RedisCacheWriter::new(client)))
    }

    /// Replace the default configuration derived from `cache.redis`
    pub fn with_default_cache_configuration(mut self, config: RedisCacheConfiguration) -> Self {
        self.context.default_cache_configuration = Some(config);
        self
    }

    pub fn with_builder_customizer<F>(mut self, customizer: F) -> Self
    where
        F: Fn(RedisCacheManagerBuilder) -> RedisCacheManagerBuilder + Send + Sync + 'static,
    {
        self.context.builder_customizers.push(customizer);
        self
    }

    pub fn with_manager_customizer<F>(mut self, customizer: F) -> Self
    where
        F: Fn(&RedisCacheManager) + Send + Sync + 'static,
    {
        self.context.manager_customizers.push(customizer);
        self
    }

    /// Use a cache manager provided elsewhere; no provider will run
    pub fn with_cache_manager(mut self, manager: Arc<dyn CacheManager>) -> Self {
        self.context.cache_manager = Some(manager);
        self
    }

    /// Append a provider after the built-in ones
    pub fn with_provider(mut self, provider: Provider) -> Self {
        self.providers.push(provider);
        self
    }

    /// Names of the registered providers, in evaluation order
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(Provider::name).collect()
    }

    /// Resolve the cache manager.
    ///
    /// Runs each matching provider in order until one produced a manager,
    /// then fails with [`DuckCacheError::Configuration`] if none did.
    pub fn boot(mut self) -> Result<Arc<dyn CacheManager>, DuckCacheError> {
        if self.context.writer.is_none() {
            if let Some(redis) = &self.context.config.redis {
                let writer = RedisCacheWriter::from_config(redis)?;
                self.context.writer = Some(Arc::new(writer));
            }
        }

        for provider in &self.providers {
            if !provider.matches(&self.context) {
                trace_log!(provider = provider.name(), "provider skipped");
                continue;
            }

            let manager = provider.provide(&self.context)?;
            debug_log!(
                provider = provider.name(),
                caches = ?manager.cache_names(),
                "cache manager provided"
            );
            self.context.cache_manager = Some(manager);
        }

        let cache_type = self.context.cache_type();
        validator::validate(cache_type, self.context.cache_manager.as_ref())?;

        self.context
            .cache_manager
            .ok_or(DuckCacheError::Configuration { cache_type })
    }
}
