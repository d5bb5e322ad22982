//! Declarative routing rules.
//!
//! A [`RouteConfig`] is the serializable form read from configuration; it is
//! compiled once into a [`RoutingRule`] holding ready regular expressions.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::Error;

/// Eviction bound applied when a rule does not set `max_entries`.
pub const DEFAULT_MAX_ENTRIES: usize = 25;

/// Caching strategy requested by a rule.
///
/// Names outside the three known ones are kept verbatim so the strategy
/// builder can decide how to treat them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StrategyName {
    NetworkFirst,
    CacheFirst,
    StaleWhileRevalidate,
    Unrecognized(String),
}

impl StrategyName {
    pub fn as_str(&self) -> &str {
        match self {
            StrategyName::NetworkFirst => "NETWORK_FIRST",
            StrategyName::CacheFirst => "CACHE_FIRST",
            StrategyName::StaleWhileRevalidate => "STALE_WHILE_REVALIDATE",
            StrategyName::Unrecognized(name) => name,
        }
    }
}

impl From<&str> for StrategyName {
    fn from(name: &str) -> Self {
        match name {
            "NETWORK_FIRST" => StrategyName::NetworkFirst,
            "CACHE_FIRST" => StrategyName::CacheFirst,
            "STALE_WHILE_REVALIDATE" => StrategyName::StaleWhileRevalidate,
            other => StrategyName::Unrecognized(other.to_string()),
        }
    }
}

impl From<String> for StrategyName {
    fn from(name: String) -> Self {
        StrategyName::from(name.as_str())
    }
}

impl From<StrategyName> for String {
    fn from(name: StrategyName) -> Self {
        name.as_str().to_string()
    }
}

impl fmt::Display for StrategyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compile a URL pattern, keeping the source text in the error.
pub fn compile_pattern(pattern: &str) -> Result<Regex, Error> {
    Regex::new(pattern).map_err(|e| Error::InvalidPattern { pattern: pattern.to_string(), reason: e.to_string() })
}

/// A compiled routing rule.
///
/// `pattern` and every `deny_list` entry are tested against the full
/// request URL.
#[derive(Debug, Clone)]
pub struct RoutingRule {
    pub pattern: Regex,
    pub caching_strategy: StrategyName,
    pub deny_list: Vec<Regex>,
    pub purge_on_quota_error: Option<bool>,
    pub max_entries: Option<usize>,
}

impl RoutingRule {
    pub fn new(pattern: Regex, caching_strategy: impl Into<StrategyName>) -> Self {
        Self {
            pattern,
            caching_strategy: caching_strategy.into(),
            deny_list: Vec::new(),
            purge_on_quota_error: None,
            max_entries: None,
        }
    }

    pub fn with_deny_list(mut self, deny_list: Vec<Regex>) -> Self {
        self.deny_list = deny_list;
        self
    }

    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = Some(max_entries);
        self
    }

    pub fn with_purge_on_quota_error(mut self, purge: bool) -> Self {
        self.purge_on_quota_error = Some(purge);
        self
    }
}

/// Serializable routing rule, as found under `[[routes]]` in the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteConfig {
    /// Regular expression matched against request URLs.
    pub regexp: String,

    /// One of `NETWORK_FIRST`, `CACHE_FIRST`, `STALE_WHILE_REVALIDATE`.
    pub caching_strategy: StrategyName,

    /// URL patterns that must never be cached.
    #[serde(default)]
    pub deny_list: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purge_on_quota_error: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_entries: Option<usize>,
}

impl RouteConfig {
    /// Compile the route pattern and its deny-list.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidPattern` for the first pattern that fails to compile.
    pub fn compile(&self) -> Result<RoutingRule, Error> {
        let pattern = compile_pattern(&self.regexp)?;
        let deny_list = self
            .deny_list
            .iter()
            .map(|p| compile_pattern(p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RoutingRule {
            pattern,
            caching_strategy: self.caching_strategy.clone(),
            deny_list,
            purge_on_quota_error: self.purge_on_quota_error,
            max_entries: self.max_entries,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_name_known() {
        assert_eq!(StrategyName::from("NETWORK_FIRST"), StrategyName::NetworkFirst);
        assert_eq!(StrategyName::from("CACHE_FIRST"), StrategyName::CacheFirst);
        assert_eq!(StrategyName::from("STALE_WHILE_REVALIDATE"), StrategyName::StaleWhileRevalidate);
    }

    #[test]
    fn test_strategy_name_unrecognized_is_kept() {
        let name = StrategyName::from("cache_first");
        assert_eq!(name, StrategyName::Unrecognized("cache_first".into()));
        assert_eq!(name.to_string(), "cache_first");
    }

    #[test]
    fn test_strategy_name_serde() {
        let name: StrategyName = serde_json::from_str("\"STALE_WHILE_REVALIDATE\"").unwrap();
        assert_eq!(name, StrategyName::StaleWhileRevalidate);
        assert_eq!(serde_json::to_string(&StrategyName::NetworkFirst).unwrap(), "\"NETWORK_FIRST\"");
    }

    #[test]
    fn test_route_config_defaults() {
        let config: RouteConfig =
            serde_json::from_str(r#"{"regexp": "\\.jpg$", "caching_strategy": "CACHE_FIRST"}"#).unwrap();
        assert!(config.deny_list.is_empty());
        assert!(config.purge_on_quota_error.is_none());
        assert!(config.max_entries.is_none());
    }

    #[test]
    fn test_route_config_compile() {
        let config = RouteConfig {
            regexp: r"\.jpg$".into(),
            caching_strategy: StrategyName::CacheFirst,
            deny_list: vec!["/private/".into()],
            purge_on_quota_error: Some(false),
            max_entries: Some(10),
        };
        let rule = config.compile().unwrap();
        assert!(rule.pattern.is_match("https://example.com/a.jpg"));
        assert_eq!(rule.deny_list.len(), 1);
        assert_eq!(rule.purge_on_quota_error, Some(false));
        assert_eq!(rule.max_entries, Some(10));
    }

    #[test]
    fn test_route_config_compile_bad_deny_pattern() {
        let config = RouteConfig {
            regexp: r"\.css$".into(),
            caching_strategy: StrategyName::NetworkFirst,
            deny_list: vec!["ok".into(), "[unclosed".into()],
            purge_on_quota_error: None,
            max_entries: None,
        };
        let result = config.compile();
        assert!(matches!(result, Err(Error::InvalidPattern { pattern, .. }) if pattern == "[unclosed"));
    }

    #[test]
    fn test_routing_rule_builder() {
        let rule = RoutingRule::new(Regex::new(r"\.js$").unwrap(), "NETWORK_FIRST")
            .with_max_entries(5)
            .with_purge_on_quota_error(false);
        assert_eq!(rule.caching_strategy, StrategyName::NetworkFirst);
        assert_eq!(rule.max_entries, Some(5));
        assert_eq!(rule.purge_on_quota_error, Some(false));
        assert!(rule.deny_list.is_empty());
    }
}
