use horizon_sdk::federation::ErrorKind;
use horizon_sdk::FederationRecord;
use wiremock::matchers::{any, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{domain, http, resolver};

const ACCOUNT_ID: &str = "GCW667JUHCOP5Y7KY6KGDHNPHFM4CS3FCBQ7QWDUALXTX3PGXLSOEALY";

async fn serve_stellar_toml(mock_server: &MockServer, federation_server: &str) {
    Mock::given(method("GET"))
        .and(path("/.well-known/stellar.toml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            "# stellar.toml\nNETWORK_PASSPHRASE = \"Test SDF Network ; September 2015\"\nFEDERATION_SERVER = \"{federation_server}\"\n"
        )))
        .expect(1)
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_discover_then_resolve() {
    // The config document and the federation server live on different hosts.
    let config_host = MockServer::start().await;
    let api_host = MockServer::start().await;
    let domain = domain(&config_host);
    let address = format!("bob*{domain}");

    serve_stellar_toml(&config_host, &format!("{}/federation", api_host.uri())).await;

    Mock::given(method("GET"))
        .and(path("/federation"))
        .and(query_param("type", "name"))
        .and(query_param("q", address.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "stellar_address": address,
            "account_id": ACCOUNT_ID,
            "memo_type": "text",
            "memo": "invoice-42"
        })))
        .expect(1)
        .mount(&api_host)
        .await;

    let server = resolver().create_for_domain(&domain).await.unwrap();
    assert_eq!(server.domain(), domain);
    assert_eq!(
        server.server_url().as_str(),
        format!("{}/federation", api_host.uri())
    );

    let record = server.resolve_address(&address).await.unwrap();
    assert_eq!(
        record,
        FederationRecord {
            stellar_address: Some(address.clone()),
            account_id: ACCOUNT_ID.to_string(),
            memo_type: Some("text".to_string()),
            memo: Some("invoice-42".to_string()),
        }
    );

    let requests = api_host.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].url.query(),
        Some(format!("type=name&q=bob*{}", domain.replace(':', "%3A")).as_str())
    );
}

#[tokio::test]
async fn test_one_shot_resolve_with_id_memo() {
    let mock_server = MockServer::start().await;
    let address = format!("alice*{}", domain(&mock_server));

    serve_stellar_toml(&mock_server, &format!("{}/fed", mock_server.uri())).await;

    Mock::given(method("GET"))
        .and(path("/fed"))
        .and(query_param("q", address.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "account_id": ACCOUNT_ID,
            "memo_type": "id",
            "memo": 123456789
        })))
        .mount(&mock_server)
        .await;

    let record = resolver().resolve(&address).await.unwrap();
    assert_eq!(record.account_id, ACCOUNT_ID);
    assert_eq!(record.memo.as_deref(), Some("123456789"));
    assert_eq!(record.stellar_address, None);
}

#[tokio::test]
async fn test_unknown_address_is_not_found() {
    let mock_server = MockServer::start().await;
    let address = format!("nobody*{}", domain(&mock_server));

    serve_stellar_toml(&mock_server, &format!("{}/federation", mock_server.uri())).await;

    Mock::given(method("GET"))
        .and(path("/federation"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&mock_server)
        .await;

    let err = resolver().resolve(&address).await.unwrap_err();
    assert!(err.is_not_found(), "got {err}");
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_federation_server_rate_limit_is_surfaced() {
    let mock_server = MockServer::start().await;
    let address = format!("bob*{}", domain(&mock_server));

    serve_stellar_toml(&mock_server, &format!("{}/federation", mock_server.uri())).await;

    Mock::given(method("GET"))
        .and(path("/federation"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "20"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let err = resolver().resolve(&address).await.unwrap_err();
    assert!(err.is_rate_limited());
    assert_eq!(err.retry_after(), Some(std::time::Duration::from_secs(20)));
}

#[tokio::test]
async fn test_http_federation_server_rejected_by_strict_resolver() {
    let strict = horizon_sdk::FederationResolver::new(http());

    let err = strict
        .server("http://fed.example.com/federation", "example.com")
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::FederationServerInvalid(_)));

    let err = horizon_sdk::FederationServer::new(http(), "http://fed.example.com", "example.com")
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::FederationServerInvalid(_)));
}

#[tokio::test]
async fn test_malformed_addresses_never_reach_the_server() {
    let mock_server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let server = resolver()
        .server(&format!("{}/federation", mock_server.uri()), "stellar.org")
        .unwrap();

    for address in ["bob@stellar.org", "bob*stellar*org", "*stellar.org", "bob*"] {
        let err = server.resolve_address(address).await.unwrap_err();
        assert!(
            matches!(err.kind, ErrorKind::MalformedAddress(_)),
            "{address}: got {err}"
        );
    }
}
