//! Configuration Module
//!
//! Handles loading cache configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::registry::RegistryConfig;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Number of entries to pre-size each store for (no eviction bound)
    pub initial_capacity: usize,
    /// Seconds between expiry sweeps, 0 = lazy expiration only
    pub sweep_interval: u64,
    /// Name the default store is registered under
    pub default_name: String,
    /// Whether registry calls for unknown names go to the default store
    pub fallback_to_default: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_INITIAL_CAPACITY` - Store pre-size hint (default: 0)
    /// - `CACHE_SWEEP_INTERVAL` - Sweep frequency in seconds (default: 0, disabled)
    /// - `CACHE_DEFAULT_NAME` - Default store name (default: "memory")
    /// - `CACHE_FALLBACK_TO_DEFAULT` - "true"/"1" to enable fallback (default: false)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a Config from an arbitrary variable lookup.
    ///
    /// Unset or unparsable values fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            initial_capacity: lookup("CACHE_INITIAL_CAPACITY")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.initial_capacity),
            sweep_interval: lookup("CACHE_SWEEP_INTERVAL")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.sweep_interval),
            default_name: lookup("CACHE_DEFAULT_NAME")
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.default_name),
            fallback_to_default: lookup("CACHE_FALLBACK_TO_DEFAULT")
                .and_then(|v| parse_bool(&v))
                .unwrap_or(defaults.fallback_to_default),
        }
    }

    /// Returns the sweep period, or None when sweeping is disabled.
    pub fn sweep_interval(&self) -> Option<Duration> {
        (self.sweep_interval > 0).then(|| Duration::from_secs(self.sweep_interval))
    }

    /// Returns the registry settings carried by this config.
    pub fn registry_config(&self) -> RegistryConfig {
        RegistryConfig {
            fallback_to_default: self.fallback_to_default,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_capacity: 0,
            sweep_interval: 0,
            default_name: "memory".to_string(),
            fallback_to_default: false,
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
