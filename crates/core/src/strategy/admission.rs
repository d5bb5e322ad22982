//! Cache admission: decides whether a freshly fetched response may be stored.
//!
//! Checks run in a fixed order for every response:
//!
//! 1. Deny-list: any pattern matching the request URL rejects immediately.
//! 2. Upstream hook: an optional [`CacheWillUpdate`] delegate may veto.
//! 3. Content type: HTML documents are never admitted.
//!
//! A rejection is a policy outcome, not an error. Callers see `None` and skip
//! the cache write.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use regex::Regex;

use crate::message::{Request, Response};
use crate::routing::DEFAULT_MAX_ENTRIES;

/// Pre-cache hook invoked after a successful fetch and before a cache write.
///
/// Returning `None` means "do not cache".
#[async_trait]
pub trait CacheWillUpdate: Send + Sync {
    async fn cache_will_update(&self, request: &Request, response: &Response) -> Option<Response>;
}

/// Eviction parameters handed to the expiration engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpirationConfig {
    pub max_entries: usize,
    pub purge_on_quota_error: bool,
}

impl Default for ExpirationConfig {
    fn default() -> Self {
        Self { max_entries: DEFAULT_MAX_ENTRIES, purge_on_quota_error: true }
    }
}

/// Why a response was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The request URL matched this deny-list pattern.
    Denied(String),
    /// The upstream hook returned no response.
    Upstream,
    /// The response is an HTML document.
    Html,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Denied(pattern) => write!(f, "denied by pattern {pattern}"),
            Rejection::Upstream => f.write_str("vetoed by upstream hook"),
            Rejection::Html => f.write_str("html response"),
        }
    }
}

/// Outcome of [`AdmissionFilter::decide`].
#[derive(Debug, Clone, PartialEq)]
pub enum Admission {
    /// Duplicate of the fetched response, ready to be written.
    Admit(Response),
    Reject(Rejection),
}

impl Admission {
    pub fn into_response(self) -> Option<Response> {
        match self {
            Admission::Admit(response) => Some(response),
            Admission::Reject(_) => None,
        }
    }
}

/// Admission filter attached to a single strategy.
///
/// The deny-list is fixed at construction and only ever read, so one filter
/// can serve any number of concurrent requests.
#[derive(Clone)]
pub struct AdmissionFilter {
    deny_list: Vec<Regex>,
    expiration: ExpirationConfig,
    upstream: Option<Arc<dyn CacheWillUpdate>>,
}

impl AdmissionFilter {
    pub fn new(expiration: ExpirationConfig, deny_list: Vec<Regex>) -> Self {
        Self { deny_list, expiration, upstream: None }
    }

    /// Run `upstream` between the deny-list and content-type checks.
    pub fn with_upstream(mut self, upstream: Arc<dyn CacheWillUpdate>) -> Self {
        self.upstream = Some(upstream);
        self
    }

    pub fn deny_list(&self) -> &[Regex] {
        &self.deny_list
    }

    pub fn expiration(&self) -> ExpirationConfig {
        self.expiration
    }

    pub fn has_upstream(&self) -> bool {
        self.upstream.is_some()
    }

    /// First deny-list pattern matching `url`, if any.
    pub fn denied_by(&self, url: &str) -> Option<&Regex> {
        self.deny_list.iter().find(|pattern| pattern.is_match(url))
    }

    /// Run all admission checks and report the reason for any rejection.
    pub async fn decide(&self, request: &Request, response: &Response) -> Admission {
        if let Some(pattern) = self.denied_by(request.url()) {
            return Admission::Reject(Rejection::Denied(pattern.as_str().to_string()));
        }

        let returned = match &self.upstream {
            Some(upstream) => match upstream.cache_will_update(request, response).await {
                Some(returned) => returned,
                None => return Admission::Reject(Rejection::Upstream),
            },
            None => response.clone(),
        };

        // `returned` is already an owned copy; the caller keeps the original.
        if returned.is_html() {
            return Admission::Reject(Rejection::Html);
        }

        Admission::Admit(returned)
    }

    /// Admitted duplicate of `response`, or `None` if it must not be cached.
    pub async fn evaluate(&self, request: &Request, response: &Response) -> Option<Response> {
        match self.decide(request, response).await {
            Admission::Admit(admitted) => Some(admitted),
            Admission::Reject(reason) => {
                tracing::debug!(url = request.url(), %reason, "response not admitted to cache");
                None
            }
        }
    }
}

impl fmt::Debug for AdmissionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdmissionFilter")
            .field("deny_list", &self.deny_list.iter().map(Regex::as_str).collect::<Vec<_>>())
            .field("expiration", &self.expiration)
            .field("upstream", &self.upstream.is_some())
            .finish()
    }
}

#[async_trait]
impl CacheWillUpdate for AdmissionFilter {
    async fn cache_will_update(&self, request: &Request, response: &Response) -> Option<Response> {
        self.evaluate(request, response).await
    }
}
