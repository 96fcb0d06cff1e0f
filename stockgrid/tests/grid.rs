use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use stockgrid::{GridConfig, GridView, StockGrid, TrackedSymbol, Watchlist};
use stockgrid_core::{GridConnector, GridError, Quote, QuoteUpdate, Symbol};
use stockgrid_mock::{DynamicMockConnector, DynamicMockController, MockBehavior, StreamBehavior};

const MOCK: &str = "grid-test";

fn quote(symbol: &Symbol, price: f64, previous_close: f64) -> Quote {
    let change = price - previous_close;
    let change_percent = if previous_close == 0.0 {
        0.0
    } else {
        change / previous_close * 100.0
    };
    Quote {
        symbol: symbol.clone(),
        price,
        change,
        change_percent,
        previous_close,
        open: previous_close,
        high: price.max(previous_close),
        low: price.min(previous_close),
    }
}

fn tick(symbol: &Symbol, price: f64) -> QuoteUpdate {
    QuoteUpdate {
        symbol: symbol.clone(),
        price,
        ts: Utc::now(),
    }
}

fn watchlist(symbols: &[&str]) -> Watchlist {
    symbols
        .iter()
        .map(|s| TrackedSymbol::new(*s, format!("{s} Corp"), 10))
        .collect()
}

fn grid_over(connector: Arc<dyn GridConnector>, wl: Watchlist) -> StockGrid {
    StockGrid::builder()
        .with_connector(connector)
        .watchlist(wl)
        .build()
        .expect("grid builds")
}

fn ready_table(view: GridView) -> stockgrid::QuoteTable {
    match view {
        GridView::Ready { table } => table,
        other => panic!("expected Ready, got {other:?}"),
    }
}

async fn await_revision(changes: &mut tokio::sync::watch::Receiver<u64>) {
    tokio::time::timeout(Duration::from_secs(2), changes.changed())
        .await
        .expect("revision bump within deadline")
        .expect("grid still alive");
}

async fn manual_mock() -> (Arc<dyn GridConnector>, DynamicMockController) {
    let (mock, controller) = DynamicMockConnector::new_with_controller(MOCK);
    controller
        .set_stream_behavior(MOCK, StreamBehavior::Manual)
        .await;
    (mock, controller)
}

#[tokio::test]
async fn mixed_snapshot_reaches_ready_with_bounded_fallback() {
    let (mock, controller) = manual_mock().await;
    let aaa = Symbol::new("AAA");
    let bbb = Symbol::new("BBB");
    controller
        .set_quote_behavior(aaa.clone(), MockBehavior::Return(quote(&aaa, 50.0, 45.0)))
        .await;
    controller
        .set_quote_behavior(bbb.clone(), MockBehavior::Fail(GridError::Data("boom".into())))
        .await;

    let grid = grid_over(mock, watchlist(&["AAA", "BBB"]));
    grid.activate().await;

    let table = ready_table(grid.view().await);
    assert_eq!(table.len(), 2);

    let a = table.get(&aaa).expect("AAA entry");
    assert_eq!(a.price, 50.0);
    assert_eq!(a.change, 5.0);
    assert!((a.change_percent - 11.11).abs() < 0.01);

    // The failed symbol gets a bounded placeholder, never an error
    let b = table.get(&bbb).expect("BBB entry");
    assert!((100.0..1100.0).contains(&b.price));
    assert!((100.0..1100.0).contains(&b.reference_price));
    assert!((-25.0..25.0).contains(&b.change));
    assert!((-5.0..5.0).contains(&b.change_percent));

    // The stream opened for the full tracked set regardless of fallbacks
    let reqs = controller.get_stream_requests(MOCK).await;
    assert_eq!(reqs.len(), 1);
    assert_eq!(reqs[0].len(), 2);

    grid.deactivate().await;
}

#[tokio::test]
async fn empty_watchlist_fails_without_opening_a_stream() {
    let (mock, controller) = manual_mock().await;
    let grid = grid_over(mock, Watchlist::default());

    grid.activate().await;

    match grid.view().await {
        GridView::Failed { message } => assert!(message.contains("empty"), "got: {message}"),
        other => panic!("expected Failed, got {other:?}"),
    }
    assert!(controller.get_stream_requests(MOCK).await.is_empty());
}

#[tokio::test]
async fn ticks_decay_the_reference_to_the_prior_price() {
    let (mock, controller) = manual_mock().await;
    let aaa = Symbol::new("AAA");
    controller
        .set_quote_behavior(aaa.clone(), MockBehavior::Return(quote(&aaa, 100.0, 100.0)))
        .await;

    let grid = grid_over(mock, watchlist(&["AAA"]));
    grid.activate().await;
    let mut changes = grid.changes();
    changes.mark_unchanged();

    // First tick is measured against the snapshot reference
    assert!(controller.push_update(MOCK, tick(&aaa, 110.0)).await);
    await_revision(&mut changes).await;
    let table = ready_table(grid.view().await);
    let e = table.get(&aaa).expect("entry");
    assert_eq!(e.price, 110.0);
    assert_eq!(e.change, 10.0);
    assert!((e.change_percent - 10.0).abs() < 1e-9);

    // Every later tick is measured against the prior tick's price
    assert!(controller.push_update(MOCK, tick(&aaa, 99.0)).await);
    await_revision(&mut changes).await;
    let table = ready_table(grid.view().await);
    let e = table.get(&aaa).expect("entry");
    assert_eq!(e.price, 99.0);
    assert_eq!(e.reference_price, 110.0);
    assert_eq!(e.change, -11.0);
    assert!((e.change_percent - (-10.0)).abs() < 0.01);

    grid.deactivate().await;
}

#[tokio::test]
async fn zero_reference_yields_zero_percent() {
    let (mock, controller) = manual_mock().await;
    let aaa = Symbol::new("AAA");
    controller
        .set_quote_behavior(aaa.clone(), MockBehavior::Return(quote(&aaa, 10.0, 0.0)))
        .await;

    let grid = grid_over(mock, watchlist(&["AAA"]));
    grid.activate().await;
    let mut changes = grid.changes();
    changes.mark_unchanged();

    assert!(controller.push_update(MOCK, tick(&aaa, 5.0)).await);
    await_revision(&mut changes).await;
    let table = ready_table(grid.view().await);
    let e = table.get(&aaa).expect("entry");
    assert_eq!(e.change, 5.0);
    assert_eq!(e.change_percent, 0.0);

    grid.deactivate().await;
}

#[tokio::test]
async fn no_update_lands_after_teardown() {
    let (mock, controller) = manual_mock().await;
    let aaa = Symbol::new("AAA");
    controller
        .set_quote_behavior(aaa.clone(), MockBehavior::Return(quote(&aaa, 100.0, 100.0)))
        .await;

    let grid = grid_over(mock, watchlist(&["AAA"]));
    grid.activate().await;
    grid.deactivate().await;

    // A straggler tick may still be pushed at the transport; it must not land
    let _ = controller.push_update(MOCK, tick(&aaa, 999.0)).await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(grid.view().await, GridView::Idle);
}

#[tokio::test]
async fn reactivation_replaces_the_previous_session() {
    let (mock, controller) = manual_mock().await;
    let aaa = Symbol::new("AAA");
    controller
        .set_quote_behavior(aaa.clone(), MockBehavior::Return(quote(&aaa, 100.0, 100.0)))
        .await;

    let grid = grid_over(mock, watchlist(&["AAA"]));
    grid.activate().await;
    grid.activate().await;

    // One stream request per activation; the grid is live on the second one
    let reqs = controller.get_stream_requests(MOCK).await;
    assert_eq!(reqs.len(), 2);

    let mut changes = grid.changes();
    changes.mark_unchanged();
    assert!(controller.push_update(MOCK, tick(&aaa, 105.0)).await);
    await_revision(&mut changes).await;
    let table = ready_table(grid.view().await);
    assert_eq!(table.get(&aaa).expect("entry").price, 105.0);

    grid.deactivate().await;
}

#[tokio::test]
async fn stream_open_failure_degrades_silently_to_a_frozen_table() {
    let (mock, controller) = DynamicMockConnector::new_with_controller(MOCK);
    let aaa = Symbol::new("AAA");
    controller
        .set_quote_behavior(aaa.clone(), MockBehavior::Return(quote(&aaa, 50.0, 45.0)))
        .await;
    controller
        .set_stream_behavior(MOCK, StreamBehavior::Fail(GridError::Data("no feed".into())))
        .await;

    let grid = grid_over(mock, watchlist(&["AAA"]));
    grid.activate().await;

    let table = ready_table(grid.view().await);
    assert_eq!(table.get(&aaa).expect("entry").price, 50.0);

    grid.deactivate().await;
}

#[tokio::test]
async fn hung_snapshot_call_falls_back_when_bounded() {
    let (mock, controller) = manual_mock().await;
    let aaa = Symbol::new("AAA");
    let bbb = Symbol::new("BBB");
    controller
        .set_quote_behavior(aaa.clone(), MockBehavior::Return(quote(&aaa, 50.0, 45.0)))
        .await;
    controller
        .set_quote_behavior(bbb.clone(), MockBehavior::Hang)
        .await;

    let grid = StockGrid::builder()
        .with_connector(mock)
        .watchlist(watchlist(&["AAA", "BBB"]))
        .config(GridConfig {
            snapshot_timeout: Some(Duration::from_millis(100)),
            ..GridConfig::default()
        })
        .build()
        .expect("grid builds");

    grid.activate().await;

    let table = ready_table(grid.view().await);
    assert_eq!(table.get(&aaa).expect("AAA entry").price, 50.0);
    let b = table.get(&bbb).expect("BBB entry");
    assert!((100.0..1100.0).contains(&b.price));

    grid.deactivate().await;
}

#[tokio::test]
async fn configured_channel_capacity_reaches_the_connector() {
    let (mock, controller) = manual_mock().await;
    let aaa = Symbol::new("AAA");
    controller
        .set_quote_behavior(aaa.clone(), MockBehavior::Return(quote(&aaa, 100.0, 100.0)))
        .await;

    let grid = StockGrid::builder()
        .with_connector(mock)
        .watchlist(watchlist(&["AAA"]))
        .config(GridConfig {
            channel_capacity: 7,
            ..GridConfig::default()
        })
        .build()
        .expect("grid builds");

    grid.activate().await;
    assert_eq!(controller.get_stream_capacities(MOCK).await, vec![7]);
    grid.deactivate().await;
}

#[tokio::test]
async fn builder_requires_a_connector() {
    let err = StockGrid::builder().build().expect_err("no connector");
    assert!(matches!(err, GridError::InvalidArg(_)));
}
