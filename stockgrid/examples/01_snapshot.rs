mod common;
use common::get_connector;
use stockgrid::{GridView, StockGrid};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // 1. Create connector (mock in CI when STOCKGRID_EXAMPLES_USE_MOCK is set).
    let connector = get_connector();

    // 2. Build the engine over the bundled demo portfolio.
    let grid = StockGrid::builder().with_connector(connector).build()?;

    // 3. Activate: snapshot first, then the stream opens in the background.
    grid.activate().await;

    match grid.view().await {
        GridView::Ready { table } => {
            for tracked in grid.watchlist().iter() {
                if let Some(entry) = table.get(&tracked.symbol) {
                    println!(
                        "{:<6} {:<26} {:>10.2} {:>+8.2} ({:>+6.2}%)",
                        tracked.symbol, tracked.name, entry.price, entry.change, entry.change_percent
                    );
                }
            }
            println!("holdings value: {:.2}", grid.watchlist().holdings_value(&table));
            println!("day change:     {:+.2}", grid.watchlist().day_change(&table));
        }
        other => println!("grid did not reach Ready: {other:?}"),
    }

    grid.deactivate().await;
    Ok(())
}
