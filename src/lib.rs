//! # horizon-sdk
//!
//! Client library for the Stellar Horizon API and the federation protocol.
//!
//! ## Crates
//!
//! - **horizon-client** - URL building, typed response decoding, rate limits, pagination
//! - **horizon-federation** - stellar.toml discovery and `name*domain` resolution
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use horizon_sdk::{FederationResolver, HorizonServer, Order, Page};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let server = HorizonServer::new("https://horizon-testnet.stellar.org")?;
//!
//!     let resolver = FederationResolver::new(server.http().clone());
//!     let record = resolver.resolve("bob*example.com").await?;
//!
//!     let payments = server
//!         .for_account(&record.account_id, "payments")
//!         .order(Order::Descending)?;
//!     let page: Page<serde_json::Value> = server.fetch_page(&payments).await?;
//!
//!     for payment in page.records() {
//!         println!("{}", payment["id"]);
//!     }
//!
//!     Ok(())
//! }
//! ```

// Re-export all crates for convenient access
#[cfg(feature = "client")]
pub use horizon_client as client;
#[cfg(feature = "federation")]
pub use horizon_federation as federation;

// Re-export commonly used types at the top level
#[cfg(feature = "client")]
pub use horizon_client::{
    ClientConfig, Endpoint, HorizonHttpClient, HorizonServer, Order, Page, Pager, RateLimitInfo,
    ResponseShape,
};
#[cfg(feature = "federation")]
pub use horizon_federation::{FederationRecord, FederationResolver, FederationServer};
