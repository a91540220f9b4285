//! The `/.well-known/stellar.toml` document.

use std::str::FromStr;

use crate::error::{Error, ErrorKind, Result};

/// Path of the document below a domain's root.
pub const STELLAR_TOML_PATH: &str = "/.well-known/stellar.toml";

/// A parsed stellar.toml.
///
/// Only the top-level string keys this crate cares about get accessors;
/// anything else is reachable through [`get`](StellarToml::get).
#[derive(Debug, Clone, PartialEq)]
pub struct StellarToml {
    table: toml::Table,
}

impl StellarToml {
    /// Parse raw document bytes.
    ///
    /// Invalid UTF-8 or invalid TOML fails with `ConfigNotFound`.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| Error::with_source(ErrorKind::ConfigNotFound(e.to_string()), e))?;
        text.parse()
    }

    /// Raw value of a top-level key.
    pub fn get(&self, key: &str) -> Option<&toml::Value> {
        self.table.get(key)
    }

    /// A top-level key, if present and a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key)?.as_str()
    }

    pub fn federation_server(&self) -> Option<&str> {
        self.get_str("FEDERATION_SERVER")
    }

    pub fn horizon_url(&self) -> Option<&str> {
        self.get_str("HORIZON_URL")
    }

    pub fn network_passphrase(&self) -> Option<&str> {
        self.get_str("NETWORK_PASSPHRASE")
    }

    pub fn signing_key(&self) -> Option<&str> {
        self.get_str("SIGNING_KEY")
    }

    pub fn transfer_server(&self) -> Option<&str> {
        self.get_str("TRANSFER_SERVER")
    }

    pub fn web_auth_endpoint(&self) -> Option<&str> {
        self.get_str("WEB_AUTH_ENDPOINT")
    }

    /// The whole document.
    pub fn as_table(&self) -> &toml::Table {
        &self.table
    }
}

impl FromStr for StellarToml {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let table = s
            .parse::<toml::Table>()
            .map_err(|e| Error::with_source(ErrorKind::ConfigNotFound(e.to_string()), e))?;
        Ok(Self { table })
    }
}
