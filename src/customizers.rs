//! Hooks applied while the cache manager is assembled
//!
//! Builder customizers adjust the [`RedisCacheManagerBuilder`] right before
//! `build()`; manager customizers see the finished manager. Both run in
//! registration order.

use cache_system::{RedisCacheManager, RedisCacheManagerBuilder};
use std::fmt;
use std::sync::Arc;

/// Adjusts the builder before the manager is built
pub type BuilderCustomizer =
    Arc<dyn Fn(RedisCacheManagerBuilder) -> RedisCacheManagerBuilder + Send + Sync>;

/// Inspects or prepares the built manager
pub type ManagerCustomizer = Arc<dyn Fn(&RedisCacheManager) + Send + Sync>;

/// Ordered builder customizers
#[derive(Clone, Default)]
pub struct BuilderCustomizers {
    customizers: Vec<BuilderCustomizer>,
}

impl BuilderCustomizers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<F>(&mut self, customizer: F)
    where
        F: Fn(RedisCacheManagerBuilder) -> RedisCacheManagerBuilder + Send + Sync + 'static,
    {
        self.customizers.push(Arc::new(customizer));
    }

    pub fn customize(&self, builder: RedisCacheManagerBuilder) -> RedisCacheManagerBuilder {
        self.customizers
            .iter()
            .fold(builder, |builder, customizer| customizer(builder))
    }

    pub fn len(&self) -> usize {
        self.customizers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customizers.is_empty()
    }
}

impl fmt::Debug for BuilderCustomizers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuilderCustomizers")
            .field("count", &self.customizers.len())
            .finish()
    }
}

/// Ordered manager customizers
#[derive(Clone, Default)]
pub struct CacheManagerCustomizers {
    customizers: Vec<ManagerCustomizer>,
}

impl CacheManagerCustomizers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<F>(&mut self, customizer: F)
    where
        F: Fn(&RedisCacheManager) + Send + Sync + 'static,
    {
        self.customizers.push(Arc::new(customizer));
    }

    /// Run every customizer against `manager` and hand it back
    pub fn customize(&self, manager: RedisCacheManager) -> RedisCacheManager {
        for customizer in &self.customizers {
            customizer(&manager);
        }
        manager
    }

    pub fn len(&self) -> usize {
        self.customizers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customizers.is_empty()
    }
}

impl fmt::Debug for CacheManagerCustomizers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheManagerCustomizers")
            .field("count", &self.customizers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cache_system::testing::InMemoryCacheWriter;
    use cache_system::CacheManager;
    use std::sync::Mutex;

    #[test]
    fn test_builder_customizers_run_in_order() {
        let mut customizers = BuilderCustomizers::new();
        customizers.push(|builder| builder.initial_cache_names(["first"]));
        customizers.push(|builder| builder.disable_create_on_missing_cache());

        let builder = RedisCacheManager::builder(Arc::new(InMemoryCacheWriter::new()));
        let manager = customizers.customize(builder).build();

        assert_eq!(customizers.len(), 2);
        assert_eq!(manager.cache_names(), vec!["first"]);
        assert!(!manager.allows_in_flight_cache_creation());
    }

    #[test]
    fn test_manager_customizers_run_in_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut customizers = CacheManagerCustomizers::new();
        for label in ["one", "two"] {
            let seen = seen.clone();
            customizers.push(move |_manager| seen.lock().unwrap().push(label));
        }

        let manager = RedisCacheManager::builder(Arc::new(InMemoryCacheWriter::new())).build();
        customizers.customize(manager);

        assert_eq!(*seen.lock().unwrap(), vec!["one", "two"]);
    }

    #[test]
    fn test_empty_customizers_are_identity() {
        let builder = RedisCacheManager::builder(Arc::new(InMemoryCacheWriter::new()))
            .initial_cache_names(["a"]);
        let manager = BuilderCustomizers::new().customize(builder).build();
        let manager = CacheManagerCustomizers::new().customize(manager);

        assert_eq!(manager.cache_names(), vec!["a"]);
    }
}
