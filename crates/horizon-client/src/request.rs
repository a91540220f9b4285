//! HTTP request building.

use std::collections::HashMap;

use serde::Serialize;
use url::Url;

use crate::error::{Error, ErrorKind, Result};

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMethod {
    Get,
    Post,
}

impl RequestMethod {
    /// Convert to reqwest::Method.
    pub fn to_reqwest(&self) -> reqwest::Method {
        match self {
            RequestMethod::Get => reqwest::Method::GET,
            RequestMethod::Post => reqwest::Method::POST,
        }
    }
}

/// Builder for a single outbound HTTP request.
///
/// The URL is final: query parameters belong on the [`Url`] (see
/// [`Endpoint`](crate::Endpoint)), so nothing is appended at send time.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    pub(crate) method: RequestMethod,
    pub(crate) url: Url,
    pub(crate) headers: HashMap<String, String>,
    pub(crate) body: Option<RequestBody>,
}

/// Request body content.
#[derive(Debug, Clone)]
pub enum RequestBody {
    Text(String),
}

impl RequestBuilder {
    /// Create a new request builder.
    pub fn new(method: RequestMethod, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HashMap::new(),
            body: None,
        }
    }

    /// The target URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The request method.
    pub fn method(&self) -> RequestMethod {
        self.method
    }

    /// Add a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Set a `application/x-www-form-urlencoded` body.
    pub fn form<T: Serialize + ?Sized>(mut self, data: &T) -> Result<Self> {
        let encoded = serde_urlencoded::to_string(data).map_err(|e| {
            Error::with_source(
                ErrorKind::InvalidParameter {
                    name: "form".to_string(),
                    reason: e.to_string(),
                },
                e,
            )
        })?;
        self.body = Some(RequestBody::Text(encoded));
        self.headers.insert(
            "Content-Type".to_string(),
            "application/x-www-form-urlencoded".to_string(),
        );
        Ok(self)
    }

    /// Ask for a JSON response.
    pub fn accept_json(self) -> Self {
        self.header("Accept", "application/json")
    }
}
