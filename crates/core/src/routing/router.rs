//! Route registration and first-match lookup.

use std::sync::Arc;

use regex::Regex;

use crate::Error;
use crate::strategy::Strategy;

/// A registered (pattern, strategy) pair.
#[derive(Debug, Clone)]
pub struct Route {
    pattern: Regex,
    strategy: Arc<Strategy>,
}

impl Route {
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    pub fn strategy(&self) -> &Arc<Strategy> {
        &self.strategy
    }

    pub fn matches(&self, url: &str) -> bool {
        self.pattern.is_match(url)
    }
}

/// Anything routes can be registered against.
pub trait RouteRegistrar {
    /// Register an interception rule.
    ///
    /// Implementations decide their own validation; failures are returned
    /// to the caller unchanged.
    fn register_route(&mut self, pattern: Regex, strategy: Strategy) -> Result<(), Error>;
}

/// In-memory route table.
///
/// Routes are kept in registration order and [`Router::find`] returns the
/// first one whose pattern matches.
#[derive(Debug, Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// First registered route matching `url`.
    pub fn find(&self, url: &str) -> Option<&Route> {
        self.routes.iter().find(|route| route.matches(url))
    }
}

impl RouteRegistrar for Router {
    fn register_route(&mut self, pattern: Regex, strategy: Strategy) -> Result<(), Error> {
        tracing::info!(
            pattern = pattern.as_str(),
            strategy = %strategy.kind(),
            cache_name = strategy.cache_name(),
            "registered route"
        );
        self.routes.push(Route { pattern, strategy: Arc::new(strategy) });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{RoutingRule, StrategyName};
    use crate::strategy::{StrategyBuilder, StrategyKind};

    fn strategy(name: StrategyName) -> Strategy {
        let rule = RoutingRule::new(Regex::new(".*").unwrap(), name);
        StrategyBuilder::default().build(&rule)
    }

    #[test]
    fn test_router_empty() {
        let router = Router::new();
        assert!(router.is_empty());
        assert!(router.find("https://example.com/a.png").is_none());
    }

    #[test]
    fn test_router_first_match_wins() {
        let mut router = Router::new();
        router
            .register_route(Regex::new(r"\.png$").unwrap(), strategy(StrategyName::NetworkFirst))
            .unwrap();
        router
            .register_route(Regex::new(r"example\.com").unwrap(), strategy(StrategyName::StaleWhileRevalidate))
            .unwrap();

        let route = router.find("https://example.com/logo.png").unwrap();
        assert_eq!(route.strategy().kind(), StrategyKind::NetworkFirst);

        let route = router.find("https://example.com/app.js").unwrap();
        assert_eq!(route.strategy().kind(), StrategyKind::StaleWhileRevalidate);

        assert!(router.find("https://other.org/app.js").is_none());
    }

    #[test]
    fn test_router_preserves_order() {
        let mut router = Router::new();
        for pattern in [r"\.css$", r"\.js$", r"\.woff2$"] {
            router
                .register_route(Regex::new(pattern).unwrap(), strategy(StrategyName::CacheFirst))
                .unwrap();
        }
        let patterns: Vec<&str> = router.routes().iter().map(|r| r.pattern().as_str()).collect();
        assert_eq!(patterns, vec![r"\.css$", r"\.js$", r"\.woff2$"]);
        assert_eq!(router.len(), 3);
    }
}
