//! Core types and shared functionality for sw-assets.
//!
//! This crate provides:
//! - Routing rules and the in-memory route table
//! - Caching strategies and the cache admission filter
//! - The asset caching module that wires rules into routes
//! - Cache namespace storage with SQLite backend
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod message;
pub mod module;
pub mod routing;
pub mod strategy;

pub use cache::{CacheDb, CachedEntry};
pub use config::AppConfig;
pub use error::Error;
pub use message::{Request, Response};
pub use module::{AssetCachingModule, SwModule};
pub use routing::{Route, RouteConfig, RouteRegistrar, Router, RoutingRule, StrategyName};
pub use strategy::{ASSET_CACHE_NAME, AdmissionFilter, CacheWillUpdate, Strategy, StrategyBuilder, StrategyKind};
