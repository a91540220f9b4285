use horizon_sdk::{ClientConfig, FederationResolver, HorizonHttpClient, HorizonServer};
use wiremock::MockServer;

/// A shared client with tracing turned off.
pub fn http() -> HorizonHttpClient {
    HorizonHttpClient::new(ClientConfig::builder().with_tracing(false).build())
        .expect("client construction should not fail")
}

/// A Horizon facade pointed at the mock server.
pub fn horizon(mock_server: &MockServer) -> HorizonServer {
    HorizonServer::with_client(http(), &mock_server.uri()).expect("mock URI is a valid base URL")
}

/// A resolver that may talk plain http to the mock server.
pub fn resolver() -> FederationResolver {
    FederationResolver::new(http()).with_allow_http(true)
}

/// The `host:port` of a mock server, usable as a federation domain.
pub fn domain(mock_server: &MockServer) -> String {
    mock_server.address().to_string()
}
