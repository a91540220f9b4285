//! Transport settings shared by Horizon and federation requests.
//!
//! Defaults suit public Horizon instances: one request per call, no retry,
//! a keep-alive pool sized for a handful of concurrent pagers.
//!
//! ```rust
//! use std::time::Duration;
//! use horizon_client::ClientConfig;
//!
//! let config = ClientConfig::builder()
//!     .with_timeout(Duration::from_secs(10))
//!     .with_tracing(false)
//!     .build();
//! assert_eq!(config.connect_timeout, horizon_client::config::DEFAULT_CONNECT_TIMEOUT);
//! ```

use std::time::Duration;

use crate::error::{Error, ErrorKind, Result};

/// Whole-request deadline. Horizon answers collection pages well inside this.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);
pub const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 10;

/// Environment variable overriding [`ClientConfig::timeout`], in seconds.
pub const TIMEOUT_ENV: &str = "HORIZON_SDK_TIMEOUT_SECS";

/// Settings for [`HorizonHttpClient`](crate::HorizonHttpClient).
///
/// Rate limits and server failures always reach the caller, so there is
/// nothing here about retries.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Deadline for a whole request, body included.
    pub timeout: Duration,
    /// Deadline for establishing the TCP/TLS connection.
    pub connect_timeout: Duration,
    /// How long an unused pooled connection is kept.
    pub pool_idle_timeout: Duration,
    /// Pooled connections kept per Horizon or federation host.
    pub pool_max_idle_per_host: usize,
    /// Sent as `User-Agent`; defaults to `horizon-sdk/<version>`.
    pub user_agent: String,
    /// Advertise gzip/deflate. Horizon compresses large collection pages.
    pub accept_compressed: bool,
    /// Emit `tracing` events for every request and response.
    pub enable_tracing: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            pool_idle_timeout: DEFAULT_POOL_IDLE_TIMEOUT,
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE_PER_HOST,
            user_agent: crate::USER_AGENT.to_string(),
            accept_compressed: true,
            enable_tracing: true,
        }
    }
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Defaults with overrides from the process environment.
    ///
    /// Reads `HORIZON_SDK_TIMEOUT_SECS`; a value that is not a whole number
    /// of seconds fails with `Config`.
    pub fn from_env() -> Result<Self> {
        Ok(Self::builder()
            .with_env_overrides(|name| std::env::var(name).ok())?
            .build())
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    pub fn with_pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.config.pool_idle_timeout = timeout;
        self
    }

    pub fn with_pool_max_idle(mut self, max: usize) -> Self {
        self.config.pool_max_idle_per_host = max;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.config.accept_compressed = enabled;
        self
    }

    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.config.enable_tracing = enabled;
        self
    }

    /// Apply overrides found through `lookup` (normally `std::env::var`).
    /// Unset or blank variables leave the current value alone.
    pub fn with_env_overrides<F>(self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let Some(raw) = lookup(TIMEOUT_ENV).filter(|v| !v.trim().is_empty()) else {
            return Ok(self);
        };

        let secs = raw.trim().parse::<u64>().map_err(|e| {
            Error::with_source(
                ErrorKind::Config(format!(
                    "{TIMEOUT_ENV} must be a whole number of seconds, got '{raw}'"
                )),
                e,
            )
        })?;
        Ok(self.with_timeout(Duration::from_secs(secs)))
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}
