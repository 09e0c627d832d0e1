//! Per-cache settings resolution
//!
//! Turns raw [`RedisCacheProperties`] into serializer-bound
//! [`RedisCacheConfiguration`]s, for the global default and for every named
//! override declared under `duck.cache.redis`.

use cache_system::{RedisCacheConfiguration, ValueSerializer};
use config::RedisCacheProperties;
use std::collections::HashMap;

/// Build one cache configuration from raw properties.
///
/// Starts from the built-in defaults, never from another configuration, so
/// unset properties always mean "built-in default".
pub fn create_configuration(properties: &RedisCacheProperties) -> RedisCacheConfiguration {
    apply_properties(RedisCacheConfiguration::default_cache_config(), properties)
}

/// Resolve every named override.
///
/// Each entry is independent: it starts from the built-in defaults, binary
/// value serialization included, and inherits nothing from `global_default`.
pub fn resolve(
    global_default: &RedisCacheConfiguration,
    overrides: &HashMap<String, RedisCacheProperties>,
) -> HashMap<String, RedisCacheConfiguration> {
    debug_log!(
        overrides = overrides.len(),
        default_serializer = global_default.value_serializer().id(),
        "resolving named cache configurations"
    );
    overrides
        .iter()
        .map(|(name, properties)| {
            let template = RedisCacheConfiguration::default_cache_config()
                .serialize_values_with(ValueSerializer::Binary);
            trace_log!(cache = %name, ?properties, "resolving named cache configuration");
            (name.clone(), apply_properties(template, properties))
        })
        .collect()
}

fn apply_properties(
    mut config: RedisCacheConfiguration,
    properties: &RedisCacheProperties,
) -> RedisCacheConfiguration {
    if let Some(ttl) = properties.time_to_live {
        config = config.entry_ttl(ttl);
    }
    if let Some(prefix) = &properties.key_prefix {
        config = config.prefix_cache_name_with(prefix.clone());
    }
    if !properties.cache_null_values {
        config = config.disable_caching_null_values();
    }
    if !properties.use_key_prefix {
        config = config.disable_key_prefix();
    }
    config
}
