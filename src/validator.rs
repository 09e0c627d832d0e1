//! Last-chance check that the bootstrap produced a cache manager

use crate::errors::DuckCacheError;
use cache_system::CacheManager;
use config::CacheType;
use std::sync::Arc;

/// Fail with [`DuckCacheError::Configuration`] when no manager exists
pub fn validate(
    cache_type: Option<CacheType>,
    manager: Option<&Arc<dyn CacheManager>>,
) -> Result<(), DuckCacheError> {
    match manager {
        Some(_) => Ok(()),
        None => {
            tracing::error!(?cache_type, "no cache manager could be auto-configured");
            Err(DuckCacheError::Configuration { cache_type })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cache_system::RedisCacheManager;
    use cache_system::testing::InMemoryCacheWriter;

    #[test]
    fn test_present_manager_passes() {
        let manager: Arc<dyn CacheManager> = Arc::new(
            RedisCacheManager::builder(Arc::new(InMemoryCacheWriter::new())).build(),
        );

        assert!(validate(Some(CacheType::Redis), Some(&manager)).is_ok());
        assert!(validate(None, Some(&manager)).is_ok());
    }

    #[test]
    fn test_missing_manager_names_cache_type() {
        let err = validate(Some(CacheType::Redis), None).unwrap_err();

        assert!(matches!(
            err,
            DuckCacheError::Configuration {
                cache_type: Some(CacheType::Redis)
            }
        ));
        assert_eq!(
            err.to_string(),
            "No cache manager could be auto-configured, check your configuration (caching type is 'REDIS')"
        );
    }

    #[test]
    fn test_missing_manager_without_declared_type() {
        let err = validate(None, None).unwrap_err();
        assert!(err.to_string().contains("caching type is 'unspecified'"));
    }
}
