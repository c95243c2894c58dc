//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::str::FromStr;

/// Name of the region holding every text entry key.
pub const DEFAULT_REGION: &str = "textEntries";

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Initial caching strategy (`app.cache.use-auto`)
    pub use_auto_cache: bool,
    /// Cache region used for text entries
    pub cache_region: String,
    /// Store-default TTL in seconds, 0 = entries never expire
    pub cache_default_ttl: u64,
    /// Expired-entry sweep interval in seconds
    pub cleanup_interval: u64,
    /// Run a warm-up pass right after startup
    pub warm_up_on_start: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `APP_CACHE_USE_AUTO` - Start with the declarative strategy (default: false)
    /// - `CACHE_REGION` - Region name (default: textEntries)
    /// - `CACHE_DEFAULT_TTL` - Store TTL in seconds, 0 disables (default: 0)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 30)
    /// - `CACHE_WARM_UP_ON_START` - Warm the cache at startup (default: false)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            use_auto_cache: bool_var("APP_CACHE_USE_AUTO").unwrap_or(defaults.use_auto_cache),
            cache_region: env::var("CACHE_REGION")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.cache_region),
            cache_default_ttl: parse_var("CACHE_DEFAULT_TTL")
                .unwrap_or(defaults.cache_default_ttl),
            cleanup_interval: parse_var("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
            warm_up_on_start: bool_var("CACHE_WARM_UP_ON_START")
                .unwrap_or(defaults.warm_up_on_start),
        }
    }

    /// Store-default TTL, `None` when entries should never expire.
    pub fn default_ttl(&self) -> Option<u64> {
        (self.cache_default_ttl > 0).then_some(self.cache_default_ttl)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            use_auto_cache: false,
            cache_region: DEFAULT_REGION.to_string(),
            cache_default_ttl: 0,
            cleanup_interval: 30,
            warm_up_on_start: false,
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn bool_var(name: &str) -> Option<bool> {
    env::var(name).ok().and_then(|v| parse_bool(&v))
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server_port, 3000);
        assert!(!config.use_auto_cache);
        assert_eq!(config.cache_region, "textEntries");
        assert_eq!(config.default_ttl(), None);
        assert_eq!(config.cleanup_interval, 30);
        assert!(!config.warm_up_on_start);
    }

    #[test]
    fn test_default_ttl_enabled() {
        let config = Config {
            cache_default_ttl: 60,
            ..Config::default()
        };
        assert_eq!(config.default_ttl(), Some(60));
    }

    #[test]
    fn test_parse_bool_variants() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool(" yes "), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_config_from_env_defaults() {
        env::remove_var("SERVER_PORT");
        env::remove_var("APP_CACHE_USE_AUTO");
        env::remove_var("CACHE_REGION");
        env::remove_var("CACHE_DEFAULT_TTL");
        env::remove_var("CLEANUP_INTERVAL");
        env::remove_var("CACHE_WARM_UP_ON_START");

        let config = Config::from_env();
        assert_eq!(config.server_port, 3000);
        assert!(!config.use_auto_cache);
        assert_eq!(config.cache_region, DEFAULT_REGION);
        assert_eq!(config.cleanup_interval, 30);
    }
}
