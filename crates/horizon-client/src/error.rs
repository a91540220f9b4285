//! Error types for horizon-client.

use std::time::Duration;

/// Result type alias for horizon-client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for horizon-client operations.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional source error.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Create a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Create a new error with the given kind and source.
    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    /// Returns true if this is a rate limit error.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self.kind, ErrorKind::RateLimited { .. })
    }

    /// Returns true if the request never left the client (bad URL or parameter).
    pub fn is_builder_error(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::InvalidEndpoint(_)
                | ErrorKind::InvalidParameter { .. }
                | ErrorKind::UnsupportedOperation(_)
        )
    }

    /// Returns the retry-after duration if this is a rate limit error.
    pub fn retry_after(&self) -> Option<Duration> {
        match &self.kind {
            ErrorKind::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }

    /// Returns the HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match &self.kind {
            ErrorKind::ServerError { status, .. } => Some(*status),
            ErrorKind::RateLimited { .. } => Some(429),
            _ => None,
        }
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// Base URL is not a well-formed absolute HTTP or HTTPS URL.
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// A query parameter was outside its allowed domain.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// The endpoint does not support the requested builder operation.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Rate limit exceeded (HTTP 429).
    #[error("Rate limited{}", retry_after.map(|d| format!(", retry after {}s", d.as_secs())).unwrap_or_default())]
    RateLimited { retry_after: Option<Duration> },

    /// Server answered with a status of 300 or above.
    #[error("Server error: {status} {message}")]
    ServerError { status: u16, message: String },

    /// Successful status but no body to decode.
    #[error("Response contains no content")]
    EmptyBody,

    /// Body could not be decoded into the requested shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Transport failure (DNS, refused connection, TLS, timeout).
    #[error("Connection error: {0}")]
    Connection(String),

    /// Invalid client configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        // Status is never classified here; execute() hands back every response.
        let kind = if err.is_builder() {
            ErrorKind::InvalidEndpoint(err.to_string())
        } else {
            ErrorKind::Connection(err.to_string())
        };

        Error::with_source(kind, err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(ErrorKind::Decode(err.to_string()), err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::with_source(ErrorKind::InvalidEndpoint(err.to_string()), err)
    }
}
