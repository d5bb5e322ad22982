//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use crate::routing::compile_pattern;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `max_bytes` is 0 or exceeds 50MB
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `user_agent` or `cache_name` is empty
    /// - a route pattern or deny-list pattern does not compile
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_bytes == 0 {
            return Err(ConfigError::Invalid { field: "max_bytes".into(), reason: "must be greater than 0".into() });
        }
        if self.max_bytes > 50 * 1024 * 1024 {
            return Err(ConfigError::Invalid { field: "max_bytes".into(), reason: "must not exceed 50MB".into() });
        }

        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if self.cache_name.trim().is_empty() {
            return Err(ConfigError::Invalid { field: "cache_name".into(), reason: "must not be empty".into() });
        }

        for (i, route) in self.routes.iter().enumerate() {
            if let Err(e) = compile_pattern(&route.regexp) {
                return Err(ConfigError::Invalid { field: format!("routes[{i}].regexp"), reason: e.to_string() });
            }
            for (j, pattern) in route.deny_list.iter().enumerate() {
                if let Err(e) = compile_pattern(pattern) {
                    return Err(ConfigError::Invalid {
                        field: format!("routes[{i}].deny_list[{j}]"),
                        reason: e.to_string(),
                    });
                }
            }
            if route.max_entries == Some(0) {
                tracing::warn!(route = i, "max_entries = 0 falls back to the default of 25");
            }
        }

        if self.routes.is_empty() {
            tracing::warn!("no asset routes configured; nothing will be cached");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{RouteConfig, StrategyName};

    fn route(regexp: &str) -> RouteConfig {
        RouteConfig {
            regexp: regexp.into(),
            caching_strategy: StrategyName::CacheFirst,
            deny_list: Vec::new(),
            purge_on_quota_error: None,
            max_entries: None,
        }
    }

    #[test]
    fn test_validate_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_max_bytes_zero() {
        let config = AppConfig { max_bytes: 0, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "max_bytes"));
    }

    #[test]
    fn test_validate_max_bytes_exceeds_limit() {
        let config = AppConfig { max_bytes: 51 * 1024 * 1024, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "max_bytes"));
    }

    #[test]
    fn test_validate_timeout_bounds() {
        let config = AppConfig { timeout_ms: 50, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));

        let config = AppConfig { timeout_ms: 301_000, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));
    }

    #[test]
    fn test_validate_empty_names() {
        let config = AppConfig { user_agent: String::new(), ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field, .. }) if field == "user_agent"));

        let config = AppConfig { cache_name: "  ".into(), ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field, .. }) if field == "cache_name"));
    }

    #[test]
    fn test_validate_bad_route_pattern() {
        let config = AppConfig { routes: vec![route(r"\.png$"), route("[")], ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "routes[1].regexp"));
    }

    #[test]
    fn test_validate_bad_deny_pattern() {
        let mut bad = route(r"\.png$");
        bad.deny_list = vec!["/ok/".into(), "(".into()];
        let config = AppConfig { routes: vec![bad], ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "routes[0].deny_list[1]"));
    }

    #[test]
    fn test_validate_zero_max_entries_accepted() {
        let mut zero = route(r"\.png$");
        zero.max_entries = Some(0);
        let config = AppConfig { routes: vec![zero], ..Default::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_edge_case_values() {
        let config = AppConfig { max_bytes: 1, timeout_ms: 100, ..Default::default() };
        assert!(config.validate().is_ok());

        let config = AppConfig { max_bytes: 50 * 1024 * 1024, timeout_ms: 300_000, ..Default::default() };
        assert!(config.validate().is_ok());
    }
}
