//! Service worker modules and the asset caching module.

use crate::Error;
use crate::routing::{RouteRegistrar, RoutingRule};
use crate::strategy::StrategyBuilder;

/// A unit of service worker behavior initialized once with its options.
pub trait SwModule {
    type Options;

    /// Register everything the module needs against `router`.
    fn init<R: RouteRegistrar>(&self, options: Self::Options, router: &mut R) -> Result<(), Error>;
}

/// Registers one cached route per asset caching rule.
#[derive(Clone, Default)]
pub struct AssetCachingModule {
    builder: StrategyBuilder,
}

impl AssetCachingModule {
    pub fn new(builder: StrategyBuilder) -> Self {
        Self { builder }
    }

    pub fn builder(&self) -> &StrategyBuilder {
        &self.builder
    }
}

impl SwModule for AssetCachingModule {
    type Options = Vec<RoutingRule>;

    /// Build a strategy for each rule and register it, in the order given.
    ///
    /// Stops at the first registration the router refuses.
    fn init<R: RouteRegistrar>(&self, rules: Vec<RoutingRule>, router: &mut R) -> Result<(), Error> {
        for rule in rules {
            let strategy = self.builder.build(&rule);
            router.register_route(rule.pattern, strategy)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    use crate::message::{Request, Response};
    use crate::routing::Router;
    use crate::strategy::{Strategy, StrategyKind};

    /// Records registrations in call order.
    #[derive(Default)]
    struct Recorder {
        calls: Vec<(String, StrategyKind)>,
    }

    impl RouteRegistrar for Recorder {
        fn register_route(&mut self, pattern: Regex, strategy: Strategy) -> Result<(), Error> {
            self.calls.push((pattern.as_str().to_string(), strategy.kind()));
            Ok(())
        }
    }

    /// Refuses any pattern containing a space.
    #[derive(Default)]
    struct Picky {
        accepted: usize,
    }

    impl RouteRegistrar for Picky {
        fn register_route(&mut self, pattern: Regex, _strategy: Strategy) -> Result<(), Error> {
            if pattern.as_str().contains(' ') {
                return Err(Error::InvalidInput(format!("bad pattern {}", pattern.as_str())));
            }
            self.accepted += 1;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_init_single_cache_first_route_with_deny_list() {
        let rules = vec![
            RoutingRule::new(Regex::new(r"\.jpg$").unwrap(), "CACHE_FIRST")
                .with_deny_list(vec![Regex::new(r"/private/").unwrap()]),
        ];
        let mut router = Router::new();

        AssetCachingModule::default().init(rules, &mut router).unwrap();

        assert_eq!(router.len(), 1);
        let route = &router.routes()[0];
        assert_eq!(route.pattern().as_str(), r"\.jpg$");
        assert_eq!(route.strategy().kind(), StrategyKind::CacheFirst);

        let response = Response::ok("image/jpeg", vec![0xff]);
        let private = Request::parse("https://example.com/private/a.jpg").unwrap();
        assert!(route.strategy().admission().evaluate(&private, &response).await.is_none());
        let public = Request::parse("https://example.com/public/a.jpg").unwrap();
        assert!(route.strategy().admission().evaluate(&public, &response).await.is_some());
    }

    #[test]
    fn test_init_preserves_rule_order() {
        let rules = vec![
            RoutingRule::new(Regex::new("a").unwrap(), "NETWORK_FIRST"),
            RoutingRule::new(Regex::new("b").unwrap(), "STALE_WHILE_REVALIDATE"),
            RoutingRule::new(Regex::new("c").unwrap(), "SOMETHING_ELSE"),
        ];
        let mut recorder = Recorder::default();

        AssetCachingModule::default().init(rules, &mut recorder).unwrap();

        assert_eq!(
            recorder.calls,
            vec![
                ("a".to_string(), StrategyKind::NetworkFirst),
                ("b".to_string(), StrategyKind::StaleWhileRevalidate),
                ("c".to_string(), StrategyKind::CacheFirst),
            ]
        );
    }

    #[test]
    fn test_init_empty_rules() {
        let mut router = Router::new();
        AssetCachingModule::default().init(Vec::new(), &mut router).unwrap();
        assert!(router.is_empty());
    }

    #[test]
    fn test_init_propagates_registrar_error() {
        let rules = vec![
            RoutingRule::new(Regex::new("ok").unwrap(), "CACHE_FIRST"),
            RoutingRule::new(Regex::new("not ok").unwrap(), "CACHE_FIRST"),
            RoutingRule::new(Regex::new("never").unwrap(), "CACHE_FIRST"),
        ];
        let mut picky = Picky::default();

        let result = AssetCachingModule::default().init(rules, &mut picky);

        assert!(matches!(result, Err(Error::InvalidInput(_))));
        assert_eq!(picky.accepted, 1);
    }

    #[test]
    fn test_init_uses_builder_cache_name() {
        let module = AssetCachingModule::new(StrategyBuilder::new("custom"));
        let mut router = Router::new();
        module
            .init(vec![RoutingRule::new(Regex::new("x").unwrap(), "CACHE_FIRST")], &mut router)
            .unwrap();
        assert_eq!(router.routes()[0].strategy().cache_name(), "custom");
        assert_eq!(module.builder().cache_name(), "custom");
    }
}
