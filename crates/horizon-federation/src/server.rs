//! A resolved federation server.

use horizon_client::{Endpoint, HorizonHttpClient};
use tracing::{debug, instrument};
use url::Url;

use crate::error::{Error, ErrorKind, Result};
use crate::record::FederationRecord;

/// A federation server and the domain it answers for.
///
/// Obtained from [`FederationResolver::create_for_domain`] or built directly
/// when the server URL is already known.
///
/// [`FederationResolver::create_for_domain`]: crate::FederationResolver::create_for_domain
#[derive(Debug, Clone)]
pub struct FederationServer {
    http: HorizonHttpClient,
    server_url: Url,
    domain: String,
}

impl FederationServer {
    /// Create a server for an `https` URL.
    ///
    /// Any other scheme, or a URL that does not parse, fails with
    /// `FederationServerInvalid`.
    pub fn new(http: HorizonHttpClient, server_url: &str, domain: impl Into<String>) -> Result<Self> {
        Self::build(http, server_url, domain.into(), false)
    }

    pub(crate) fn build(
        http: HorizonHttpClient,
        server_url: &str,
        domain: String,
        allow_http: bool,
    ) -> Result<Self> {
        let url = Url::parse(server_url).map_err(|e| {
            Error::with_source(
                ErrorKind::FederationServerInvalid(format!("'{server_url}': {e}")),
                e,
            )
        })?;

        let scheme_ok = match url.scheme() {
            "https" => true,
            "http" => allow_http,
            _ => false,
        };
        if !scheme_ok {
            return Err(Error::new(ErrorKind::FederationServerInvalid(format!(
                "'{server_url}' is not an https URL"
            ))));
        }
        if url.cannot_be_a_base() || url.host_str().is_none() {
            return Err(Error::new(ErrorKind::FederationServerInvalid(format!(
                "'{server_url}' has no host"
            ))));
        }

        Ok(Self {
            http,
            server_url: url,
            domain,
        })
    }

    pub fn server_url(&self) -> &Url {
        &self.server_url
    }

    /// Domain this server is responsible for. Informational only.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Look up a `name*domain` address.
    ///
    /// The address is checked before anything is sent: it must contain
    /// exactly one `*` with text on both sides.
    pub async fn resolve_address(&self, address: &str) -> Result<FederationRecord> {
        split_address(address)?;
        self.query("name", address).await
    }

    /// Reverse lookup of an account ID.
    pub async fn resolve_account_id(&self, account_id: &str) -> Result<FederationRecord> {
        if account_id.trim().is_empty() {
            return Err(Error::new(ErrorKind::MalformedAddress(
                "account id is empty".to_string(),
            )));
        }
        self.query("id", account_id).await
    }

    /// `<server_url>?type=<kind>&q=<q>`, keeping any other parameters the
    /// server URL already carries.
    pub(crate) fn query_url(&self, kind: &str, q: &str) -> Result<Url> {
        Ok(
            Endpoint::from_url(self.server_url.clone(), Vec::<String>::new())?
                .query_param("type", kind)
                .query_param("q", q)
                .build(),
        )
    }

    #[instrument(skip(self), fields(server = %self.server_url))]
    async fn query(&self, kind: &str, q: &str) -> Result<FederationRecord> {
        let url = self.query_url(kind, q)?;
        debug!(url = %url, "Querying federation server");
        let record: FederationRecord = self.http.get_json(url).await?;
        debug!(account_id = %record.account_id, "Federation record received");
        Ok(record)
    }
}

/// Split `name*domain` into its two halves.
pub fn split_address(address: &str) -> Result<(&str, &str)> {
    let mut tokens = address.split('*');
    match (tokens.next(), tokens.next(), tokens.next()) {
        (Some(name), Some(domain), None) if !name.is_empty() && !domain.is_empty() => {
            Ok((name, domain))
        }
        _ => Err(Error::new(ErrorKind::MalformedAddress(format!(
            "'{address}' is not of the form name*domain"
        )))),
    }
}
