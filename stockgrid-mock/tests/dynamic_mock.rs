use stockgrid_core::{GridError, Quote, QuoteUpdate, Symbol};
use stockgrid_mock::{DynamicMockConnector, MockBehavior, StreamBehavior};

fn quote_for(sym: &Symbol, price: f64, previous_close: f64) -> Quote {
    Quote {
        symbol: sym.clone(),
        price,
        change: price - previous_close,
        change_percent: ((price - previous_close) / previous_close) * 100.0,
        previous_close,
        open: previous_close,
        high: price.max(previous_close),
        low: price.min(previous_close),
    }
}

#[tokio::test]
async fn test_mock_quote_return() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("P0");
    let sym = Symbol::new("AAPL");
    let q = quote_for(&sym, 50.0, 45.0);
    controller
        .set_quote_behavior(sym.clone(), MockBehavior::Return(q.clone()))
        .await;

    let qp = mock.as_quote_provider().expect("quote provider");
    let got = qp.quote(&sym).await.expect("quote ok");
    assert_eq!(got.symbol, q.symbol);
    assert_eq!(got.price, 50.0);
}

#[tokio::test]
async fn test_mock_quote_fail() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("P0");
    let sym = Symbol::new("MSFT");
    let err = GridError::Data("boom".to_string());
    controller
        .set_quote_behavior(sym.clone(), MockBehavior::Fail(err.clone()))
        .await;

    let qp = mock.as_quote_provider().expect("quote provider");
    let got = qp.quote(&sym).await.expect_err("err");
    assert_eq!(got, err);
}

#[tokio::test]
async fn test_mock_stream_startup_fail() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("P0");
    controller
        .set_stream_behavior("P0", StreamBehavior::Fail(GridError::Data("nope".into())))
        .await;

    let sp = mock.as_stream_provider().expect("stream provider");
    let sym = Symbol::new("AAPL");
    let err = sp.stream_quotes(&[sym], 64).await.expect_err("err");
    assert!(matches!(err, GridError::Data(_)));
}

#[tokio::test]
async fn test_mock_stream_logs_requests() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("P0");
    controller
        .set_stream_behavior("P0", StreamBehavior::Fail(GridError::Data("deny".into())))
        .await;
    let sp = mock.as_stream_provider().expect("stream provider");
    let sym = Symbol::new("AAPL");
    let _ = sp.stream_quotes(std::slice::from_ref(&sym), 64).await;

    let reqs = controller.get_stream_requests("P0").await;
    assert_eq!(reqs.len(), 1);
    assert_eq!(reqs[0], vec![sym]);
    assert_eq!(controller.get_stream_capacities("P0").await, vec![64]);
}

#[tokio::test]
async fn test_mock_stream_remote_kill() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("P0");
    let sym = Symbol::new("AAPL");
    let updates = vec![QuoteUpdate {
        symbol: sym.clone(),
        price: 51.25,
        ts: chrono::Utc::now(),
    }];
    controller
        .set_stream_behavior("P0", StreamBehavior::Success(updates))
        .await;

    let sp = mock.as_stream_provider().expect("stream provider");
    let (mut session, mut rx) = sp
        .stream_quotes(std::slice::from_ref(&sym), 64)
        .await
        .expect("stream started");

    controller.fail_stream("P0").await;
    // A buffered update may still arrive; the channel must close after the kill
    while rx.recv().await.is_some() {}

    // Ensure the session can still be closed cleanly
    session.close().await;
}

#[tokio::test]
async fn test_mock_manual_stream_pushes_filtered_updates() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("P0");
    controller
        .set_stream_behavior("P0", StreamBehavior::Manual)
        .await;

    let sp = mock.as_stream_provider().expect("stream provider");
    let aapl = Symbol::new("AAPL");
    let (mut session, mut rx) = sp
        .stream_quotes(std::slice::from_ref(&aapl), 64)
        .await
        .expect("stream started");

    let pushed = controller
        .push_update(
            "P0",
            QuoteUpdate {
                symbol: Symbol::new("MSFT"),
                price: 400.0,
                ts: chrono::Utc::now(),
            },
        )
        .await;
    assert!(pushed);
    let pushed = controller
        .push_update(
            "P0",
            QuoteUpdate {
                symbol: aapl.clone(),
                price: 51.0,
                ts: chrono::Utc::now(),
            },
        )
        .await;
    assert!(pushed);

    // Only the subscribed symbol comes through
    let got = rx.recv().await.expect("one update");
    assert_eq!(got.symbol, aapl);
    assert_eq!(got.price, 51.0);

    session.close().await;
}
