//! HTTP response classification and typed decoding.
//!
//! Every response that comes back from the transport goes through
//! [`Response::into_body`] or [`Response::json`]. Those are the only places
//! where status codes turn into errors:
//!
//! | status       | result                                         |
//! |--------------|------------------------------------------------|
//! | 429          | [`ErrorKind::RateLimited`], body ignored        |
//! | >= 300       | [`ErrorKind::ServerError`]                      |
//! | empty body   | [`ErrorKind::EmptyBody`]                        |
//! | bad JSON     | [`ErrorKind::Decode`]                           |
//!
//! Rate-limit headers are attached to the decoded value when its type asks
//! for them through [`ResponseShape::attach_rate_limit`].

use std::time::Duration;

use bytes::Bytes;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{Error, ErrorKind, Result};

/// A fully read HTTP response.
#[derive(Debug, Clone)]
pub struct Response {
    status: u16,
    headers: HeaderMap,
    body: Bytes,
    url: Url,
}

impl Response {
    /// Assemble a response from its raw parts.
    pub fn from_parts(status: u16, headers: HeaderMap, body: impl Into<Bytes>, url: Url) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
            url,
        }
    }

    /// Read a transport response to the end.
    pub(crate) async fn read(inner: reqwest::Response) -> Result<Self> {
        let status = inner.status().as_u16();
        let headers = inner.headers().clone();
        let url = inner.url().clone();
        let body = inner.bytes().await?;
        Ok(Self {
            status,
            headers,
            body,
            url,
        })
    }

    /// Get the HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Returns true if the response status is successful (2xx).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The URL that produced this response.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Raw body bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Get a header value.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }

    /// Get the Retry-After header as a Duration.
    ///
    /// Only the integer-seconds form is recognised.
    pub fn retry_after(&self) -> Option<Duration> {
        self.header_u64("retry-after").map(Duration::from_secs)
    }

    /// Rate limit counters from the `X-Ratelimit-*` headers.
    pub fn rate_limit(&self) -> RateLimitInfo {
        RateLimitInfo {
            limit: self.header_u64("x-ratelimit-limit"),
            remaining: self.header_u64("x-ratelimit-remaining"),
            reset: self.header_u64("x-ratelimit-reset"),
        }
    }

    /// Classify the status and hand back the body of a successful response.
    pub fn into_body(self) -> Result<Bytes> {
        if self.status == 429 {
            return Err(Error::new(ErrorKind::RateLimited {
                retry_after: self.retry_after(),
            }));
        }

        if self.status >= 300 {
            return Err(Error::new(ErrorKind::ServerError {
                status: self.status,
                message: error_message(self.status, &self.body),
            }));
        }

        if self.body.iter().all(u8::is_ascii_whitespace) {
            return Err(Error::new(ErrorKind::EmptyBody));
        }

        Ok(self.body)
    }

    /// Classify the status and decode the body as JSON.
    pub fn json<T: ResponseShape>(self) -> Result<T> {
        let rate_limit = self.rate_limit();
        let body = self.into_body()?;

        let mut value: T = serde_json::from_slice(&body)?;
        value.attach_rate_limit(rate_limit);
        Ok(value)
    }

    fn header_u64(&self, name: &str) -> Option<u64> {
        self.header(name)?.trim().parse().ok()
    }
}

/// A type the decoder can produce.
///
/// Types that want the rate-limit counters of the response they were decoded
/// from override [`attach_rate_limit`](ResponseShape::attach_rate_limit);
/// everything else uses the no-op default:
///
/// ```rust
/// use horizon_client::ResponseShape;
///
/// #[derive(serde::Deserialize)]
/// struct Root {
///     horizon_version: String,
/// }
///
/// impl ResponseShape for Root {}
/// ```
pub trait ResponseShape: DeserializeOwned {
    /// Receive the response's rate-limit counters.
    fn attach_rate_limit(&mut self, _rate_limit: RateLimitInfo) {}
}

impl ResponseShape for serde_json::Value {}

/// Request quota counters reported by the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateLimitInfo {
    /// Requests allowed per window.
    pub limit: Option<u64>,
    /// Requests left in the current window.
    pub remaining: Option<u64>,
    /// Seconds until the window resets.
    pub reset: Option<u64>,
}

impl RateLimitInfo {
    /// True when the server reported no requests left.
    pub fn is_exhausted(&self) -> bool {
        self.remaining == Some(0)
    }

    /// True when none of the headers were present.
    pub fn is_empty(&self) -> bool {
        self.limit.is_none() && self.remaining.is_none() && self.reset.is_none()
    }
}

/// Horizon's problem document (RFC 7807 style).
#[derive(Debug, serde::Deserialize)]
struct Problem {
    title: String,
    detail: Option<String>,
}

const MAX_MESSAGE_LENGTH: usize = 500;

/// Build the message of a `ServerError` from whatever the server sent.
fn error_message(status: u16, body: &[u8]) -> String {
    if let Ok(problem) = serde_json::from_slice::<Problem>(body) {
        return match problem.detail {
            Some(detail) if !detail.is_empty() => format!("{}: {}", problem.title, detail),
            _ => problem.title,
        };
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if !text.is_empty() {
        return truncate_message(text);
    }

    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or_default()
        .to_string()
}

fn truncate_message(message: &str) -> String {
    if message.chars().count() <= MAX_MESSAGE_LENGTH {
        return message.to_string();
    }
    let mut truncated: String = message.chars().take(MAX_MESSAGE_LENGTH).collect();
    truncated.push_str("...[truncated]");
    truncated
}
