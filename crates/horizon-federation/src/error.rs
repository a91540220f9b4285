//! Error types for horizon-federation.

use std::time::Duration;

use horizon_client::ErrorKind as ClientErrorKind;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    pub kind: ErrorKind,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    /// True when the federation server answered 404 for the query.
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, ErrorKind::NotFound(_))
    }

    /// True when the federation server answered 429.
    pub fn is_rate_limited(&self) -> bool {
        self.status() == Some(429)
    }

    /// Retry-After reported with a 429, if any.
    pub fn retry_after(&self) -> Option<Duration> {
        match &self.kind {
            ErrorKind::ServerError { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    /// HTTP status of a federation server failure.
    pub fn status(&self) -> Option<u16> {
        match &self.kind {
            ErrorKind::ServerError { status, .. } => *status,
            ErrorKind::NotFound(_) => Some(404),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("stellar.toml not found or invalid: {0}")]
    ConfigNotFound(String),

    #[error("stellar.toml for {0} has no FEDERATION_SERVER")]
    NoFederationServer(String),

    #[error("Invalid federation server: {0}")]
    FederationServerInvalid(String),

    #[error("Malformed address: {0}")]
    MalformedAddress(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Federation server error{}: {message}", status.map(|s| format!(" {s}")).unwrap_or_default())]
    ServerError {
        status: Option<u16>,
        retry_after: Option<Duration>,
        message: String,
    },

    #[error("Connection error: {0}")]
    Connection(String),
}

/// Classification of a failed federation query.
///
/// 404 is the only status with its own kind; every other status (429
/// included) and any unusable 2xx body become `ServerError`.
impl From<horizon_client::Error> for Error {
    fn from(err: horizon_client::Error) -> Self {
        let kind = match &err.kind {
            ClientErrorKind::ServerError { status: 404, message } => {
                ErrorKind::NotFound(message.clone())
            }
            ClientErrorKind::ServerError { status, message } => ErrorKind::ServerError {
                status: Some(*status),
                retry_after: None,
                message: message.clone(),
            },
            ClientErrorKind::RateLimited { retry_after } => ErrorKind::ServerError {
                status: Some(429),
                retry_after: *retry_after,
                message: "rate limited".to_string(),
            },
            ClientErrorKind::EmptyBody | ClientErrorKind::Decode(_) => ErrorKind::ServerError {
                status: None,
                retry_after: None,
                message: err.to_string(),
            },
            ClientErrorKind::InvalidEndpoint(_)
            | ClientErrorKind::InvalidParameter { .. }
            | ClientErrorKind::UnsupportedOperation(_) => {
                ErrorKind::InvalidEndpoint(err.to_string())
            }
            ClientErrorKind::Connection(_) | ClientErrorKind::Config(_) => {
                ErrorKind::Connection(err.to_string())
            }
        };

        Error::with_source(kind, err)
    }
}
