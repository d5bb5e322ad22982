//! Configured caching strategies.
//!
//! A [`Strategy`] names how requests on a route are answered (network-first,
//! cache-first or stale-while-revalidate), which cache namespace it writes to,
//! and the [`AdmissionFilter`] that guards every write. Serving requests from
//! the race between network and cache belongs to the host's strategy engine;
//! this module supplies the configuration and the write path.

pub mod admission;
pub mod builder;

pub use admission::{Admission, AdmissionFilter, CacheWillUpdate, ExpirationConfig, Rejection};
pub use builder::{ASSET_CACHE_NAME, StrategyBuilder};

use std::fmt;

use crate::Error;
use crate::cache::CacheDb;
use crate::message::{Request, Response};

/// Strategy variant understood by the strategy engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    NetworkFirst,
    CacheFirst,
    StaleWhileRevalidate,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::NetworkFirst => "network-first",
            StrategyKind::CacheFirst => "cache-first",
            StrategyKind::StaleWhileRevalidate => "stale-while-revalidate",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A strategy instance bound to one route.
#[derive(Debug, Clone)]
pub struct Strategy {
    kind: StrategyKind,
    cache_name: String,
    admission: AdmissionFilter,
}

impl Strategy {
    pub fn new(kind: StrategyKind, cache_name: impl Into<String>, admission: AdmissionFilter) -> Self {
        Self { kind, cache_name: cache_name.into(), admission }
    }

    pub fn kind(&self) -> StrategyKind {
        self.kind
    }

    pub fn cache_name(&self) -> &str {
        &self.cache_name
    }

    pub fn admission(&self) -> &AdmissionFilter {
        &self.admission
    }

    /// Run the admission filter, writing the admitted copy into this
    /// strategy's cache namespace.
    ///
    /// Returns `true` if an entry was written.
    ///
    /// # Errors
    ///
    /// Only storage failures are errors; a rejected response yields `Ok(false)`.
    pub async fn admit_and_store(&self, db: &CacheDb, request: &Request, response: &Response) -> Result<bool, Error> {
        let Some(admitted) = self.admission.evaluate(request, response).await else {
            return Ok(false);
        };

        db.put(&self.cache_name, request.url(), &admitted).await?;
        Ok(true)
    }
}
