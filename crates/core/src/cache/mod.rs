//! SQLite-backed storage for cache namespaces.
//!
//! Admitted responses are persisted per namespace and request URL, with async
//! access via tokio-rusqlite. It supports:
//!
//! - Namespaced entries keyed by SHA-256 of namespace and URL
//! - Automatic schema migrations
//! - WAL mode for concurrent access
//!
//! Size limits and quota purges are applied by the host's expiration engine,
//! not here.

pub mod connection;
pub mod entries;
pub mod hash;
pub mod migrations;

pub use crate::Error;

pub use connection::CacheDb;
pub use entries::CachedEntry;
