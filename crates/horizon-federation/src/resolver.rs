//! stellar.toml discovery.

use horizon_client::HorizonHttpClient;
use tracing::{debug, instrument};
use url::Url;

use crate::error::{Error, ErrorKind, Result};
use crate::record::FederationRecord;
use crate::server::{split_address, FederationServer};
use crate::stellar_toml::{StellarToml, STELLAR_TOML_PATH};

/// Finds the federation server for a domain and resolves addresses on it.
///
/// # Example
///
/// ```rust,ignore
/// use horizon_client::HorizonHttpClient;
/// use horizon_federation::FederationResolver;
///
/// let resolver = FederationResolver::new(HorizonHttpClient::default_client()?);
///
/// // Two steps...
/// let server = resolver.create_for_domain("example.com").await?;
/// let record = server.resolve_address("bob*example.com").await?;
///
/// // ...or one.
/// let record = resolver.resolve("bob*example.com").await?;
/// println!("{}", record.account_id);
/// ```
#[derive(Debug, Clone)]
pub struct FederationResolver {
    http: HorizonHttpClient,
    allow_http: bool,
}

impl FederationResolver {
    pub fn new(http: HorizonHttpClient) -> Self {
        Self {
            http,
            allow_http: false,
        }
    }

    /// Permit plain `http`: stellar.toml is then fetched over http and an
    /// `http` FEDERATION_SERVER is accepted. For local and test networks.
    pub fn with_allow_http(mut self, allow_http: bool) -> Self {
        self.allow_http = allow_http;
        self
    }

    pub fn allows_http(&self) -> bool {
        self.allow_http
    }

    pub fn http(&self) -> &HorizonHttpClient {
        &self.http
    }

    /// Build a [`FederationServer`] for a known URL under this resolver's
    /// scheme policy.
    pub fn server(&self, server_url: &str, domain: impl Into<String>) -> Result<FederationServer> {
        FederationServer::build(self.http.clone(), server_url, domain.into(), self.allow_http)
    }

    /// Where the stellar.toml of `domain` lives.
    ///
    /// `domain` is a host name or IPv4 address with an optional `:port`.
    /// Input that URL parsing would rewrite (escapes, backslashes, empty
    /// labels) fails with `InvalidEndpoint`.
    pub fn stellar_toml_url(&self, domain: &str) -> Result<Url> {
        let invalid = |reason: &str| {
            Error::new(ErrorKind::InvalidEndpoint(format!(
                "'{domain}' is not a domain name: {reason}"
            )))
        };

        let (host, port) = match domain.split_once(':') {
            Some((host, port)) => (host, Some(port)),
            None => (domain, None),
        };

        if host.is_empty() {
            return Err(invalid("empty host"));
        }
        for label in host.split('.') {
            if label.is_empty() {
                return Err(invalid("empty label"));
            }
            if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
                return Err(invalid("unexpected character"));
            }
            if label.starts_with('-') || label.ends_with('-') {
                return Err(invalid("label starts or ends with '-'"));
            }
        }
        let port = match port {
            None => None,
            Some(p) if !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()) => {
                Some(p.parse::<u16>().map_err(|_| invalid("port out of range"))?)
            }
            Some(_) => return Err(invalid("bad port")),
        };

        let scheme = if self.allow_http { "http" } else { "https" };
        let url = Url::parse(&format!("{scheme}://{domain}{STELLAR_TOML_PATH}")).map_err(|e| {
            Error::with_source(
                ErrorKind::InvalidEndpoint(format!("'{domain}': {e}")),
                e,
            )
        })?;

        let same_host = url.host_str().is_some_and(|h| h.eq_ignore_ascii_case(host));
        let same_port = port.is_none() || url.port_or_known_default() == port;
        if !same_host || !same_port || url.path() != STELLAR_TOML_PATH {
            return Err(invalid("does not survive URL normalisation"));
        }
        Ok(url)
    }

    /// Fetch the domain's stellar.toml.
    #[instrument(skip(self))]
    pub async fn fetch_stellar_toml(&self, domain: &str) -> Result<StellarToml> {
        let url = self.stellar_toml_url(domain)?;
        debug!(url = %url, "Fetching stellar.toml");

        let response = self.http.execute(self.http.get(url)).await?;
        let body = response
            .into_body()
            .map_err(|e| Error::with_source(ErrorKind::ConfigNotFound(e.to_string()), e))?;

        StellarToml::from_slice(&body)
    }

    /// Discover the federation server named in the domain's stellar.toml.
    pub async fn create_for_domain(&self, domain: &str) -> Result<FederationServer> {
        let stellar_toml = self.fetch_stellar_toml(domain).await?;

        let server_url = stellar_toml
            .federation_server()
            .ok_or_else(|| Error::new(ErrorKind::NoFederationServer(domain.to_string())))?;

        let server = self.server(server_url, domain)?;
        debug!(domain, server = %server.server_url(), "Federation server discovered");
        Ok(server)
    }

    /// Resolve `name*domain` in one call: discovery for `domain`, then the
    /// address lookup.
    pub async fn resolve(&self, address: &str) -> Result<FederationRecord> {
        let (_, domain) = split_address(address)?;
        self.create_for_domain(domain)
            .await?
            .resolve_address(address)
            .await
    }
}
