//! Cache warming: fetch routed assets ahead of time and store the ones the
//! route's admission filter accepts.

use sw_assets_core::{CacheDb, Error, Request, Router, StrategyKind};

use crate::fetch::Fetcher;

/// What happened to a single warmed URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarmOutcome {
    /// Written to the route's cache namespace.
    Stored(StrategyKind),
    /// Fetched, but the admission filter refused it.
    Rejected(StrategyKind),
    /// No route matches the URL; nothing was fetched.
    Unrouted,
}

/// Route, fetch, admit and store one URL.
///
/// # Errors
///
/// Returns fetch and storage errors; admission rejections are
/// `WarmOutcome::Rejected`.
pub async fn warm<F>(router: &Router, fetcher: &F, db: &CacheDb, request: &Request) -> Result<WarmOutcome, Error>
where
    F: Fetcher + ?Sized,
{
    let Some(route) = router.find(request.url()) else {
        tracing::debug!(url = request.url(), "no route matches");
        return Ok(WarmOutcome::Unrouted);
    };
    let strategy = route.strategy();

    let response = fetcher.fetch(request).await?;
    if strategy.admit_and_store(db, request, &response).await? {
        tracing::info!(url = request.url(), strategy = %strategy.kind(), "warmed");
        Ok(WarmOutcome::Stored(strategy.kind()))
    } else {
        Ok(WarmOutcome::Rejected(strategy.kind()))
    }
}
