//! Network side of sw-assets.
//!
//! This crate provides the HTTP fetcher and the cache warming pass shared by
//! the CLI.

pub mod fetch;
pub mod warm;

pub use fetch::{FetchClient, FetchConfig, Fetcher};
pub use warm::{WarmOutcome, warm};
