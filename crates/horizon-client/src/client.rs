//! Shared HTTP client.

use tracing::{debug, info, instrument};
use url::Url;

use crate::config::ClientConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::request::{RequestBody, RequestBuilder, RequestMethod};
use crate::response::{Response, ResponseShape};

/// HTTP client for Horizon and federation servers.
///
/// Wraps a pooled `reqwest::Client`; cloning is cheap and clones share the
/// pool. Construct one at startup and hand it to every component.
///
/// The client never retries and never interprets status codes: [`execute`]
/// returns every response the server produced, and classification happens in
/// [`Response::json`] / [`Response::into_body`].
///
/// [`execute`]: HorizonHttpClient::execute
#[derive(Debug, Clone)]
pub struct HorizonHttpClient {
    inner: reqwest::Client,
    config: ClientConfig,
}

impl HorizonHttpClient {
    /// Create a new HTTP client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .user_agent(&config.user_agent)
            .gzip(config.accept_compressed)
            .deflate(config.accept_compressed)
            .build()
            .map_err(|e| Error::with_source(ErrorKind::Config(e.to_string()), e))?;

        Ok(Self { inner, config })
    }

    /// Create a new HTTP client with default configuration.
    pub fn default_client() -> Result<Self> {
        Self::new(ClientConfig::default())
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Create a GET request builder.
    pub fn get(&self, url: Url) -> RequestBuilder {
        RequestBuilder::new(RequestMethod::Get, url)
    }

    /// Create a POST request builder.
    pub fn post(&self, url: Url) -> RequestBuilder {
        RequestBuilder::new(RequestMethod::Post, url)
    }

    /// Send a request and read the whole response.
    ///
    /// Only transport failures are errors here; a 404 or 500 is a normal
    /// [`Response`].
    #[instrument(skip(self, request), fields(method = ?request.method, url = %request.url))]
    pub async fn execute(&self, request: RequestBuilder) -> Result<Response> {
        let mut req = self
            .inner
            .request(request.method.to_reqwest(), request.url.clone());

        for (name, value) in &request.headers {
            req = req.header(name.as_str(), value.as_str());
        }

        if let Some(RequestBody::Text(text)) = request.body {
            req = req.body(text);
        }

        if self.config.enable_tracing {
            debug!(method = ?request.method, url = %request.url, "Sending request");
        }

        let response = req.send().await?;

        if self.config.enable_tracing {
            let status = response.status().as_u16();
            let content_length = response.content_length();

            if response.status().is_success() {
                debug!(status, content_length, "Response received");
            } else {
                info!(status, content_length, "Non-success response");
            }
        }

        Response::read(response).await
    }

    /// Execute a request and decode the JSON response.
    pub async fn send_json<T: ResponseShape>(&self, request: RequestBuilder) -> Result<T> {
        self.execute(request).await?.json()
    }

    /// GET a URL and decode the JSON response.
    pub async fn get_json<T: ResponseShape>(&self, url: Url) -> Result<T> {
        self.send_json(self.get(url).accept_json()).await
    }
}
