//! Request and response values passed through strategies and admission hooks.

use bytes::Bytes;
use http::{HeaderMap, HeaderValue, StatusCode, header};
use url::Url;

use crate::Error;

/// An intercepted request. Only the URL takes part in routing and deny-listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub url: Url,
    pub headers: HeaderMap,
}

impl Request {
    pub fn new(url: Url) -> Self {
        Self { url, headers: HeaderMap::new() }
    }

    /// Parse a request URL.
    pub fn parse(url: &str) -> Result<Self, Error> {
        let url = Url::parse(url.trim()).map_err(|e| Error::InvalidUrl(format!("{url}: {e}")))?;
        Ok(Self::new(url))
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }
}

/// A fully buffered network response.
///
/// The body is reference counted, so [`Clone`] produces an independent
/// duplicate that can be inspected and stored while the original is
/// forwarded to the page.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Response {
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self { status, headers, body: body.into() }
    }

    /// Build a `200 OK` response with the given content type.
    pub fn ok(content_type: &str, body: impl Into<Bytes>) -> Self {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(content_type) {
            headers.insert(header::CONTENT_TYPE, value);
        }
        Self::new(StatusCode::OK, headers, body)
    }

    /// Raw `content-type` header, if present and valid UTF-8.
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok())
    }

    /// Whether the response declares an HTML document.
    pub fn is_html(&self) -> bool {
        self.content_type().is_some_and(|ct| ct.contains("text/html"))
    }
}
