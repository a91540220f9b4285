use futures::TryStreamExt;
use horizon_sdk::client::ErrorKind;
use horizon_sdk::{Order, Page, RateLimitInfo, ResponseShape};
use serde::Deserialize;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::horizon;

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct Payment {
    id: String,
    amount: String,
}

#[derive(Debug, Deserialize)]
struct Account {
    account_id: String,
    sequence: String,
    #[serde(skip)]
    rate_limit: RateLimitInfo,
}

impl ResponseShape for Account {
    fn attach_rate_limit(&mut self, rate_limit: RateLimitInfo) {
        self.rate_limit = rate_limit;
    }
}

fn payments_page(ids: &[&str], next: Option<String>) -> serde_json::Value {
    let records: Vec<_> = ids
        .iter()
        .map(|id| serde_json::json!({ "id": id, "amount": "10.0000000", "type": "payment" }))
        .collect();
    serde_json::json!({
        "_links": { "next": { "href": next } },
        "_embedded": { "records": records }
    })
}

/// Three pages of payments for GABC, two per page, newest first.
async fn mount_payment_chain(mock_server: &MockServer) {
    let uri = mock_server.uri();
    let base = format!("{uri}/accounts/GABC/payments");

    Mock::given(method("GET"))
        .and(path("/accounts/GABC/payments"))
        .and(query_param("limit", "2"))
        .and(query_param("order", "desc"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(payments_page(&["6", "5"], Some(format!("{base}?cursor=5&limit=2&order=desc"))))
                .insert_header("X-Ratelimit-Limit", "3600")
                .insert_header("X-Ratelimit-Remaining", "3598"),
        )
        .mount(mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/accounts/GABC/payments"))
        .and(query_param("cursor", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payments_page(
            &["4", "3"],
            Some(format!("{base}?cursor=3&limit=2&order=desc")),
        )))
        .with_priority(1)
        .mount(mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/accounts/GABC/payments"))
        .and(query_param("cursor", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payments_page(&["2", "1"], None)))
        .with_priority(1)
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_walk_account_payments() {
    let mock_server = MockServer::start().await;
    mount_payment_chain(&mock_server).await;

    let server = horizon(&mock_server);
    let endpoint = server
        .for_account("GABC", "payments")
        .limit(2)
        .unwrap()
        .order(Order::Descending)
        .unwrap();

    let first: Page<Payment> = server.fetch_page(&endpoint).await.unwrap();
    assert_eq!(first.rate_limit().limit, Some(3600));
    assert_eq!(first.rate_limit().remaining, Some(3598));

    let pages: Vec<Page<Payment>> = server.pages(&endpoint).into_stream().try_collect().await.unwrap();
    let ids: Vec<String> = pages
        .into_iter()
        .flat_map(Page::into_records)
        .map(|p| p.id)
        .collect();
    assert_eq!(ids, ["6", "5", "4", "3", "2", "1"]);
}

#[tokio::test]
async fn test_collect_records_stops_at_page_limit() {
    let mock_server = MockServer::start().await;
    mount_payment_chain(&mock_server).await;

    let server = horizon(&mock_server);
    let endpoint = server
        .for_account("GABC", "payments")
        .limit(2)
        .unwrap()
        .order(Order::Descending)
        .unwrap();

    let records: Vec<Payment> = server.pages(&endpoint).collect_records(Some(2)).await.unwrap();
    assert_eq!(records.len(), 4);
    assert_eq!(records[3].amount, "10.0000000");
}

#[tokio::test]
async fn test_pager_retries_the_failed_page() {
    let mock_server = MockServer::start().await;
    let uri = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/ledgers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payments_page(
            &["1"],
            Some(format!("{uri}/ledgers?cursor=1")),
        )))
        .mount(&mock_server)
        .await;

    // The second page is rate limited once, then served.
    Mock::given(method("GET"))
        .and(query_param("cursor", "1"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "1"))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("cursor", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payments_page(&["2"], None)))
        .with_priority(2)
        .mount(&mock_server)
        .await;

    let server = horizon(&mock_server);
    let mut pager = server.pages::<Payment>(&server.ledgers());

    assert_eq!(pager.next().await.unwrap().unwrap().records()[0].id, "1");

    let err = pager.next().await.unwrap_err();
    assert!(err.is_rate_limited());
    assert_eq!(
        pager.pending_url().map(|u| u.as_str().to_string()),
        Some(format!("{uri}/ledgers?cursor=1"))
    );

    assert_eq!(pager.next().await.unwrap().unwrap().records()[0].id, "2");
    assert!(pager.next().await.unwrap().is_none());
    assert!(pager.is_done());
    assert_eq!(pager.pages_fetched(), 2);
}

#[tokio::test]
async fn test_fetch_single_account() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/accounts/GABC"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({
                    "account_id": "GABC",
                    "sequence": "4294967296"
                }))
                .insert_header("X-Ratelimit-Reset", "17"),
        )
        .mount(&mock_server)
        .await;

    let server = horizon(&mock_server);
    let account: Account = server.fetch(&server.account("GABC")).await.unwrap();

    assert_eq!(account.account_id, "GABC");
    assert_eq!(account.sequence, "4294967296");
    assert_eq!(account.rate_limit.reset, Some(17));
    assert_eq!(account.rate_limit.limit, None);
}

#[tokio::test]
async fn test_missing_account_is_server_error_404() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/accounts/GNOPE"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "type": "https://stellar.org/horizon-errors/not_found",
            "title": "Resource Missing",
            "status": 404
        })))
        .mount(&mock_server)
        .await;

    let server = horizon(&mock_server);
    let err = server
        .fetch::<serde_json::Value>(&server.account("GNOPE"))
        .await
        .unwrap_err();

    match err.kind {
        ErrorKind::ServerError { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Resource Missing");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_rate_limit_ignores_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/trades"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("Retry-After", "20")
                .set_body_json(payments_page(&["1"], None)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let server = horizon(&mock_server);
    let err = server
        .fetch_page::<Payment>(&server.trades())
        .await
        .unwrap_err();

    assert!(matches!(
        err.kind,
        ErrorKind::RateLimited {
            retry_after: Some(d)
        } if d.as_secs() == 20
    ));
}

#[test]
fn test_builder_errors_surface_before_network() {
    let server = horizon_sdk::HorizonServer::new("https://horizon.example.com").unwrap();

    let err = server.order_book().cursor("now").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnsupportedOperation(_)));

    let err = server.ledgers().limit(0).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidParameter { .. }));

    let err = server.ledgers().limit(201).unwrap_err();
    assert!(err.is_builder_error());

    let url = server
        .order_book()
        .query_param("selling_asset_type", "native")
        .query_param("buying_asset_type", "credit_alphanum4")
        .query_param("buying_asset_code", "USD")
        .build();
    assert_eq!(
        url.as_str(),
        "https://horizon.example.com/order_book?selling_asset_type=native&buying_asset_type=credit_alphanum4&buying_asset_code=USD"
    );
}
