//! # horizon-federation
//!
//! Stellar federation: turn `name*domain` addresses into account IDs.
//!
//! Resolution is two steps:
//!
//! 1. **Discovery** - fetch `https://<domain>/.well-known/stellar.toml` and read
//!    its `FEDERATION_SERVER`.
//! 2. **Lookup** - `GET <server>?type=name&q=<address>`.
//!
//! [`FederationResolver`] does discovery (or both steps at once with
//! [`FederationResolver::resolve`]); [`FederationServer`] does lookups.
//!
//! ## Example
//!
//! ```rust,ignore
//! use horizon_client::HorizonHttpClient;
//! use horizon_federation::FederationResolver;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), horizon_federation::Error> {
//!     let http = HorizonHttpClient::default_client()?;
//!     let record = FederationResolver::new(http)
//!         .resolve("bob*example.com")
//!         .await?;
//!
//!     println!("{} memo={:?}", record.account_id, record.memo);
//!     Ok(())
//! }
//! ```

mod error;
mod record;
mod resolver;
mod server;
mod stellar_toml;

pub use error::{Error, ErrorKind, Result};
pub use record::FederationRecord;
pub use resolver::FederationResolver;
pub use server::{split_address, FederationServer};
pub use stellar_toml::{StellarToml, STELLAR_TOML_PATH};
