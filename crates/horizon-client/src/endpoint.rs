//! Request URL construction.
//!
//! An [`Endpoint`] is a validated base URL plus a resource path and an ordered
//! set of query parameters. Every builder method consumes the endpoint and
//! returns a derived one, so a configured endpoint can be cloned and extended
//! without affecting the original.
//!
//! ```rust
//! use horizon_client::{Endpoint, Order};
//!
//! let url = Endpoint::new("https://horizon.example.com", ["ledgers"])?
//!     .limit(50)?
//!     .order(Order::Descending)?
//!     .build();
//!
//! assert_eq!(
//!     url.as_str(),
//!     "https://horizon.example.com/ledgers?limit=50&order=desc"
//! );
//! # Ok::<(), horizon_client::Error>(())
//! ```

use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::error::{Error, ErrorKind, Result};

/// Largest page size Horizon accepts.
pub const MAX_LIMIT: u32 = 200;

/// Sort order for paged collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Ascending,
    Descending,
}

impl Order {
    /// Wire value of the `order` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Order::Ascending => "asc",
            Order::Descending => "desc",
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Order {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "asc" | "ascending" => Ok(Order::Ascending),
            "desc" | "descending" => Ok(Order::Descending),
            other => Err(invalid_parameter(
                "order",
                format!("expected 'asc' or 'desc', got '{other}'"),
            )),
        }
    }
}

/// A request target: base URL, resource path and query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    base: Url,
    segments: Vec<String>,
    query: Vec<(String, String)>,
    paging: bool,
}

impl Endpoint {
    /// Parse `base_url` and append the given path segments.
    ///
    /// Fails with [`ErrorKind::InvalidEndpoint`] unless `base_url` is an
    /// absolute `http` or `https` URL with a host.
    pub fn new<I, S>(base_url: &str, segments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let base = Url::parse(base_url)?;
        Self::from_url(base, segments)
    }

    /// Like [`Endpoint::new`] for an already parsed URL.
    pub fn from_url<I, S>(base: Url, segments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        validate_base(&base)?;
        Ok(Self::from_validated(base).set_segments(segments))
    }

    pub(crate) fn from_validated(base: Url) -> Self {
        Self {
            base,
            segments: Vec::new(),
            query: Vec::new(),
            paging: true,
        }
    }

    /// Disable cursor/limit/order on this endpoint.
    pub fn without_paging(mut self) -> Self {
        self.paging = false;
        self
    }

    /// Whether cursor/limit/order may be set.
    pub fn supports_paging(&self) -> bool {
        self.paging
    }

    /// The base URL this endpoint was created from.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// The resource path segments, relative to the base URL.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Replace the resource path.
    pub fn set_segments<I, S>(mut self, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.segments = segments.into_iter().map(Into::into).collect();
        self
    }

    /// Append one path segment.
    pub fn push_segment(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    /// Set a query parameter, replacing any earlier value for `name`.
    pub fn query_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.query.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.query.push((name, value)),
        }
        self
    }

    /// Current value of a query parameter.
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Start after the given paging token.
    pub fn cursor(self, token: impl Into<String>) -> Result<Self> {
        self.require_paging("cursor")?;
        Ok(self.query_param("cursor", token))
    }

    /// Maximum number of records per page, `1..=MAX_LIMIT`.
    pub fn limit(self, limit: u32) -> Result<Self> {
        self.require_paging("limit")?;
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(invalid_parameter(
                "limit",
                format!("must be between 1 and {MAX_LIMIT}, got {limit}"),
            ));
        }
        Ok(self.query_param("limit", limit.to_string()))
    }

    /// Sort order of the returned records.
    pub fn order(self, order: Order) -> Result<Self> {
        self.require_paging("order")?;
        Ok(self.query_param("order", order.as_str()))
    }

    /// Produce the final URL.
    ///
    /// Query parameters already present on the base URL are kept unless
    /// overridden by a parameter of the same name.
    pub fn build(&self) -> Url {
        let mut url = self.base.clone();

        if !self.segments.is_empty() {
            if let Ok(mut path) = url.path_segments_mut() {
                path.pop_if_empty().extend(self.segments.iter());
            }
        }

        let mut pairs: Vec<(String, String)> = self
            .base
            .query_pairs()
            .filter(|(name, _)| self.query_value(name).is_none())
            .map(|(n, v)| (n.into_owned(), v.into_owned()))
            .collect();
        pairs.extend(self.query.iter().cloned());

        url.set_query(None);
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        url
    }

    fn require_paging(&self, operation: &str) -> Result<()> {
        if self.paging {
            Ok(())
        } else {
            Err(Error::new(ErrorKind::UnsupportedOperation(format!(
                "'{operation}' is not supported by /{}",
                self.segments.join("/")
            ))))
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.build().as_str())
    }
}

fn validate_base(base: &Url) -> Result<()> {
    if !matches!(base.scheme(), "http" | "https") {
        return Err(Error::new(ErrorKind::InvalidEndpoint(format!(
            "unsupported scheme '{}', expected http or https",
            base.scheme()
        ))));
    }
    if base.cannot_be_a_base() || base.host_str().is_none() {
        return Err(Error::new(ErrorKind::InvalidEndpoint(format!(
            "'{base}' is not an absolute URL with a host"
        ))));
    }
    Ok(())
}

fn invalid_parameter(name: &str, reason: String) -> Error {
    Error::new(ErrorKind::InvalidParameter {
        name: name.to_string(),
        reason,
    })
}
