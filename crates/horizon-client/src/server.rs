//! Horizon server facade.
//!
//! `HorizonServer` binds a base URL to a shared [`HorizonHttpClient`] and
//! hands out pre-configured [`Endpoint`]s for each resource collection.
//! Resource-specific filters are plain [`Endpoint::query_param`] calls on the
//! returned endpoint.

use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use crate::client::HorizonHttpClient;
use crate::config::ClientConfig;
use crate::endpoint::Endpoint;
use crate::error::Result;
use crate::page::{Page, Pager};
use crate::response::ResponseShape;

/// Connection to one Horizon instance.
///
/// # Example
///
/// ```rust,ignore
/// use horizon_client::{HorizonServer, Order};
///
/// let server = HorizonServer::new("https://horizon-testnet.stellar.org")?;
///
/// let ledgers = server.ledgers().limit(5)?.order(Order::Descending)?;
/// let page: Page<serde_json::Value> = server.fetch_page(&ledgers).await?;
/// ```
#[derive(Debug, Clone)]
pub struct HorizonServer {
    http: HorizonHttpClient,
    server_url: Url,
}

impl HorizonServer {
    /// Create a server handle with a default client.
    ///
    /// Fails with `InvalidEndpoint` unless `url` is an absolute HTTP or
    /// HTTPS URL.
    pub fn new(url: &str) -> Result<Self> {
        Self::with_config(url, ClientConfig::default())
    }

    /// Create a server handle with custom HTTP configuration.
    pub fn with_config(url: &str, config: ClientConfig) -> Result<Self> {
        Self::with_client(HorizonHttpClient::new(config)?, url)
    }

    /// Create a server handle on an existing (shared) client.
    pub fn with_client(http: HorizonHttpClient, url: &str) -> Result<Self> {
        // Validation is the same as for any endpoint.
        let server_url = Endpoint::new(url, Vec::<String>::new())?.build();
        Ok(Self { http, server_url })
    }

    /// The server's base URL.
    pub fn server_url(&self) -> &Url {
        &self.server_url
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &HorizonHttpClient {
        &self.http
    }

    /// An endpoint at the given path below the server URL.
    pub fn endpoint<I, S>(&self, segments: I) -> Endpoint
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Endpoint::from_validated(self.server_url.clone()).set_segments(segments)
    }

    // =========================================================================
    // Resource endpoints
    // =========================================================================

    /// `GET /accounts`
    pub fn accounts(&self) -> Endpoint {
        self.endpoint(["accounts"])
    }

    /// `GET /accounts/{account_id}`
    pub fn account(&self, account_id: &str) -> Endpoint {
        self.endpoint(["accounts", account_id]).without_paging()
    }

    /// `GET /accounts/{account_id}/{resource}`, e.g. `offers` or `payments`.
    pub fn for_account(&self, account_id: &str, resource: &str) -> Endpoint {
        self.endpoint(["accounts", account_id, resource])
    }

    /// `GET /effects`
    pub fn effects(&self) -> Endpoint {
        self.endpoint(["effects"])
    }

    /// `GET /ledgers`
    pub fn ledgers(&self) -> Endpoint {
        self.endpoint(["ledgers"])
    }

    /// `GET /ledgers/{sequence}`
    pub fn ledger(&self, sequence: u64) -> Endpoint {
        self.endpoint(["ledgers".to_string(), sequence.to_string()])
            .without_paging()
    }

    /// `GET /offers`
    pub fn offers(&self) -> Endpoint {
        self.endpoint(["offers"])
    }

    /// `GET /operations`
    pub fn operations(&self) -> Endpoint {
        self.endpoint(["operations"])
    }

    /// `GET /order_book`; not a paged collection.
    pub fn order_book(&self) -> Endpoint {
        self.endpoint(["order_book"]).without_paging()
    }

    /// `GET /paths`
    pub fn paths(&self) -> Endpoint {
        self.endpoint(["paths"])
    }

    /// `GET /payments`
    pub fn payments(&self) -> Endpoint {
        self.endpoint(["payments"])
    }

    /// `GET /trades`
    pub fn trades(&self) -> Endpoint {
        self.endpoint(["trades"])
    }

    /// `GET /transactions`
    pub fn transactions(&self) -> Endpoint {
        self.endpoint(["transactions"])
    }

    // =========================================================================
    // Typed requests
    // =========================================================================

    /// GET an endpoint and decode a single object.
    #[instrument(skip(self), fields(url = %endpoint))]
    pub async fn fetch<T: ResponseShape>(&self, endpoint: &Endpoint) -> Result<T> {
        self.http.get_json(endpoint.build()).await
    }

    /// GET the first page of a collection endpoint.
    pub async fn fetch_page<T: DeserializeOwned>(&self, endpoint: &Endpoint) -> Result<Page<T>> {
        self.http.get_page(endpoint.build()).await
    }

    /// Fetch the page following `page`, if any.
    pub async fn next_page<T: DeserializeOwned>(&self, page: &Page<T>) -> Result<Option<Page<T>>> {
        self.http.next_page(page).await
    }

    /// Walk a collection endpoint lazily.
    pub fn pages<T: DeserializeOwned>(&self, endpoint: &Endpoint) -> Pager<T> {
        self.http.pages(endpoint.build())
    }

    /// Submit a base64-encoded transaction envelope.
    ///
    /// The response goes through the same classification as every other
    /// call, so a rejected transaction is a `ServerError` carrying Horizon's
    /// problem title and detail.
    #[instrument(skip(self, envelope_xdr))]
    pub async fn submit_transaction<T: ResponseShape>(&self, envelope_xdr: &str) -> Result<T> {
        let url = self.transactions().build();
        let request = self
            .http
            .post(url)
            .accept_json()
            .form(&[("tx", envelope_xdr)])?;
        self.http.send_json(request).await
    }
}
