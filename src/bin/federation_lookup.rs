//! Resolve a Stellar federation address from the command line.
//!
//! ```sh
//! cargo run --bin federation-lookup -- bob*example.com
//! ```
//!
//! Prints the federation record as JSON. Environment:
//!
//! - `HORIZON_SDK_TIMEOUT_SECS` - request timeout (default 30)
//! - `HORIZON_SDK_ALLOW_HTTP` - `1`/`true` to allow plain http (local testing)
//! - `RUST_LOG` - log filter, e.g. `horizon_federation=debug`

use horizon_sdk::{ClientConfig, FederationResolver, HorizonHttpClient};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: federation-lookup <name*domain>";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let address = match (args.next(), args.next()) {
        (Some(address), None) if address != "-h" && address != "--help" => address,
        _ => {
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    };

    let config = ClientConfig::builder()
        .with_env_overrides(env_var)
        .unwrap_or_else(|e| {
            eprintln!("Error: {e}");
            std::process::exit(2);
        });
    let allow_http = env_var("HORIZON_SDK_ALLOW_HTTP")
        .is_some_and(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"));

    let http = HorizonHttpClient::new(config.build()).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });

    let record = FederationResolver::new(http)
        .with_allow_http(allow_http)
        .resolve(&address)
        .await
        .unwrap_or_else(|e| {
            eprintln!("Error: {e}");
            std::process::exit(1);
        });

    match serde_json::to_string_pretty(&record) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
