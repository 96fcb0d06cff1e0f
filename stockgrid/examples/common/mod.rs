use std::sync::Arc;
use stockgrid_core::GridConnector;

#[must_use]
pub fn get_connector() -> Arc<dyn GridConnector> {
    if std::env::var("STOCKGRID_EXAMPLES_USE_MOCK").is_ok() {
        println!("--- (Using Mock Connector for CI) ---");
        Arc::new(stockgrid_mock::MockConnector::new())
    } else {
        Arc::new(
            stockgrid_finnhub::FinnhubConnector::from_env()
                .expect("set STOCKGRID_FINNHUB_TOKEN or STOCKGRID_EXAMPLES_USE_MOCK"),
        )
    }
}
