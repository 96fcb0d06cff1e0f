use httpmock::prelude::*;
use serde_json::json;

use stockgrid_core::GridError;
use stockgrid_core::connector::QuoteProvider;
use stockgrid_core::Symbol;
use stockgrid_finnhub::{FinnhubConfig, FinnhubConnector};

fn connector_for(server: &MockServer) -> FinnhubConnector {
    FinnhubConnector::new(FinnhubConfig::new("test-token").with_api_url(server.base_url()))
}

#[tokio::test]
async fn quote_maps_provider_payload() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/quote")
                .query_param("symbol", "AAPL")
                .query_param("token", "test-token");
            then.status(200).json_body(json!({
                "c": 50.0, "d": 5.0, "dp": 11.11,
                "h": 51.0, "l": 44.5, "o": 45.2, "pc": 45.0
            }));
        })
        .await;

    let q = connector_for(&server)
        .quote(&Symbol::new("AAPL"))
        .await
        .expect("quote should succeed");

    mock.assert_async().await;
    assert_eq!(q.symbol, Symbol::new("AAPL"));
    assert_eq!(q.price, 50.0);
    assert_eq!(q.previous_close, 45.0);
    assert_eq!(q.change, 5.0);
    assert_eq!(q.change_percent, 11.11);
}

#[tokio::test]
async fn non_success_status_is_a_connector_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/quote");
            then.status(429).body("rate limited");
        })
        .await;

    let err = connector_for(&server)
        .quote(&Symbol::new("AAPL"))
        .await
        .expect_err("429 must surface as an error");
    assert!(matches!(err, GridError::Connector { .. }), "got {err:?}");
}

#[tokio::test]
async fn malformed_payload_is_a_data_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/quote");
            then.status(200).body("<html>not json</html>");
        })
        .await;

    let err = connector_for(&server)
        .quote(&Symbol::new("AAPL"))
        .await
        .expect_err("malformed body must surface as an error");
    assert!(matches!(err, GridError::Data(_)), "got {err:?}");
}
