//! # horizon-client
//!
//! Core HTTP layer for talking to a Stellar Horizon server.
//!
//! This crate provides:
//! - Request URL construction with validated paging parameters
//! - One classification path from HTTP status to typed error
//! - Rate-limit header extraction
//! - Lazy, forward-only pagination over HAL collection pages
//! - Connection pooling and request/response tracing
//!
//! Nothing here retries. A 429 comes back as [`ErrorKind::RateLimited`]
//! with the server's `Retry-After` so the caller can decide what to do.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     HorizonServer                           │
//! │  - Resource endpoints (ledgers, payments, ...)              │
//! │  - fetch / fetch_page / pages / submit_transaction          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │              Endpoint ──build()──▶ Url                      │
//! │              Page<T> / Pager<T>                             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  HorizonHttpClient                          │
//! │  - Pooled transport, compression, tracing                   │
//! │  - Response::json classifies status and decodes             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use horizon_client::{HorizonServer, Order, Page};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), horizon_client::Error> {
//!     let server = HorizonServer::new("https://horizon-testnet.stellar.org")?;
//!
//!     let payments = server
//!         .for_account("GABC...", "payments")
//!         .limit(50)?
//!         .order(Order::Descending)?;
//!
//!     let mut pager = server.pages::<serde_json::Value>(&payments);
//!     while let Some(page) = pager.next().await? {
//!         for payment in page.records() {
//!             println!("{}", payment["id"]);
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

mod client;
pub mod config;
mod endpoint;
mod error;
mod page;
mod request;
mod response;
mod server;

pub use client::HorizonHttpClient;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use endpoint::{Endpoint, Order, MAX_LIMIT};
pub use error::{Error, ErrorKind, Result};
pub use page::{Link, Links, Page, Pager};
pub use request::{RequestBody, RequestBuilder, RequestMethod};
pub use response::{RateLimitInfo, Response, ResponseShape};
pub use server::HorizonServer;

/// User-Agent string for the client
pub const USER_AGENT: &str = concat!("horizon-sdk/", env!("CARGO_PKG_VERSION"));
