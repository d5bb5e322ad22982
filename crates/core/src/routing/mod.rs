//! URL routing: declarative rules and the route table they are registered in.

pub mod router;
pub mod rule;

pub use router::{Route, RouteRegistrar, Router};
pub use rule::{DEFAULT_MAX_ENTRIES, RouteConfig, RoutingRule, StrategyName, compile_pattern};
