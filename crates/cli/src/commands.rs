//! Subcommand implementations.
//!
//! Each command prints a JSON document to stdout.

use anyhow::{Context, Result};
use serde::Serialize;
use sw_assets_client::{FetchClient, FetchConfig, WarmOutcome};
use sw_assets_core::strategy::Admission;
use sw_assets_core::{AppConfig, CacheDb, Request, Response, Router};

/// One registered route.
#[derive(Debug, Serialize)]
pub struct RouteSummary {
    pub pattern: String,
    pub strategy: String,
    pub cache_name: String,
    pub max_entries: usize,
    pub purge_on_quota_error: bool,
    pub deny_list: Vec<String>,
}

/// Result of `check`.
#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub url: String,
    pub route: Option<String>,
    pub strategy: Option<String>,
    pub cacheable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Result of `warm` for one URL.
#[derive(Debug, Serialize)]
pub struct WarmReport {
    pub url: String,
    pub outcome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn route_summaries(router: &Router) -> Vec<RouteSummary> {
    router
        .routes()
        .iter()
        .map(|route| {
            let strategy = route.strategy();
            let admission = strategy.admission();
            RouteSummary {
                pattern: route.pattern().as_str().to_string(),
                strategy: strategy.kind().to_string(),
                cache_name: strategy.cache_name().to_string(),
                max_entries: admission.expiration().max_entries,
                purge_on_quota_error: admission.expiration().purge_on_quota_error,
                deny_list: admission.deny_list().iter().map(|p| p.as_str().to_string()).collect(),
            }
        })
        .collect()
}

pub fn routes(router: &Router) -> Result<()> {
    print_json(&route_summaries(router))
}

/// Decide, without touching the network, whether a `200` response of
/// `content_type` for `url` would be admitted.
pub async fn check_report(router: &Router, url: &str, content_type: &str) -> Result<CheckReport> {
    let request = Request::parse(url)?;

    let Some(route) = router.find(request.url()) else {
        return Ok(CheckReport {
            url: request.url().to_string(),
            route: None,
            strategy: None,
            cacheable: false,
            reason: Some("no matching route".into()),
        });
    };

    let response = Response::ok(content_type, Vec::new());
    let decision = route.strategy().admission().decide(&request, &response).await;
    let (cacheable, reason) = match decision {
        Admission::Admit(_) => (true, None),
        Admission::Reject(rejection) => (false, Some(rejection.to_string())),
    };

    Ok(CheckReport {
        url: request.url().to_string(),
        route: Some(route.pattern().as_str().to_string()),
        strategy: Some(route.strategy().kind().to_string()),
        cacheable,
        reason,
    })
}

pub async fn check(router: &Router, url: &str, content_type: &str) -> Result<()> {
    print_json(&check_report(router, url, content_type).await?)
}

pub async fn warm(config: &AppConfig, router: &Router, urls: &[String]) -> Result<()> {
    config.require_routes()?;

    let db = open_db(config).await?;
    let client = FetchClient::new(FetchConfig::from(config))?;

    let mut reports = Vec::with_capacity(urls.len());
    for url in urls {
        let result = match Request::parse(url) {
            Ok(request) => sw_assets_client::warm(router, &client, &db, &request).await,
            Err(e) => Err(e),
        };
        let report = match result {
            Ok(outcome) => WarmReport { url: url.clone(), outcome: describe(outcome), error: None },
            Err(e) => {
                tracing::warn!(url = url.as_str(), error = %e, "warm failed");
                WarmReport { url: url.clone(), outcome: "failed".into(), error: Some(e.to_string()) }
            }
        };
        reports.push(report);
    }

    print_json(&reports)
}

fn describe(outcome: WarmOutcome) -> String {
    match outcome {
        WarmOutcome::Stored(kind) => format!("stored ({kind})"),
        WarmOutcome::Rejected(kind) => format!("rejected ({kind})"),
        WarmOutcome::Unrouted => "unrouted".into(),
    }
}

pub async fn entries(config: &AppConfig) -> Result<()> {
    let db = open_db(config).await?;
    let keys = db.keys(&config.cache_name).await?;
    print_json(&keys)
}

pub async fn clear(config: &AppConfig) -> Result<()> {
    let db = open_db(config).await?;
    let deleted = db.clear(&config.cache_name).await?;
    tracing::info!(deleted, cache_name = %config.cache_name, "cleared cache namespace");
    print_json(&serde_json::json!({ "deleted": deleted }))
}

async fn open_db(config: &AppConfig) -> Result<CacheDb> {
    CacheDb::open(&config.db_path)
        .await
        .with_context(|| format!("opening cache database {}", config.db_path.display()))
}
