//! Turns routing rules into configured strategies.

use std::sync::Arc;

use crate::routing::{DEFAULT_MAX_ENTRIES, RoutingRule, StrategyName};

use super::{AdmissionFilter, CacheWillUpdate, ExpirationConfig, Strategy, StrategyKind};

/// Cache namespace shared by every asset route.
pub const ASSET_CACHE_NAME: &str = "amp-asset-cache";

/// Builds one [`Strategy`] per rule, all writing to the same namespace.
#[derive(Clone)]
pub struct StrategyBuilder {
    cache_name: String,
    upstream: Option<Arc<dyn CacheWillUpdate>>,
}

impl Default for StrategyBuilder {
    fn default() -> Self {
        Self::new(ASSET_CACHE_NAME)
    }
}

impl StrategyBuilder {
    pub fn new(cache_name: impl Into<String>) -> Self {
        Self { cache_name: cache_name.into(), upstream: None }
    }

    /// Install `upstream` as the pre-cache hook of every filter built from here on.
    pub fn with_upstream(mut self, upstream: Arc<dyn CacheWillUpdate>) -> Self {
        self.upstream = Some(upstream);
        self
    }

    pub fn cache_name(&self) -> &str {
        &self.cache_name
    }

    /// Build a fully configured strategy for `rule`.
    ///
    /// A missing or zero `max_entries` becomes [`DEFAULT_MAX_ENTRIES`].
    ///
    /// `CACHE_FIRST` and any unrecognized strategy name both produce a
    /// cache-first strategy.
    pub fn build(&self, rule: &RoutingRule) -> Strategy {
        let expiration = ExpirationConfig {
            max_entries: rule.max_entries.filter(|n| *n > 0).unwrap_or(DEFAULT_MAX_ENTRIES),
            purge_on_quota_error: rule.purge_on_quota_error.unwrap_or(true),
        };

        let mut admission = AdmissionFilter::new(expiration, rule.deny_list.clone());
        if let Some(upstream) = &self.upstream {
            admission = admission.with_upstream(Arc::clone(upstream));
        }

        let kind = match &rule.caching_strategy {
            StrategyName::NetworkFirst => StrategyKind::NetworkFirst,
            StrategyName::StaleWhileRevalidate => StrategyKind::StaleWhileRevalidate,
            StrategyName::CacheFirst => StrategyKind::CacheFirst,
            StrategyName::Unrecognized(name) => {
                tracing::warn!(
                    strategy = name.as_str(),
                    pattern = rule.pattern.as_str(),
                    "unrecognized caching strategy, using cache-first"
                );
                StrategyKind::CacheFirst
            }
        };

        Strategy::new(kind, self.cache_name.clone(), admission)
    }
}
