mod common;
use common::get_connector;
use std::time::Duration;
use stockgrid::{GridView, StockGrid};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let connector = get_connector();
    let grid = StockGrid::builder().with_connector(connector).build()?;

    println!("Activating grid... (running for ~30s)");
    grid.activate().await;

    let mut changes = grid.changes();
    let deadline = tokio::time::sleep(Duration::from_secs(30));
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            () = &mut deadline => break,
            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
                if let GridView::Ready { table } = grid.view().await {
                    println!(
                        "rev {:>4}: holdings {:.2}, day change {:+.2}",
                        *changes.borrow(),
                        grid.watchlist().holdings_value(&table),
                        grid.watchlist().day_change(&table),
                    );
                }
            }
        }
    }

    grid.deactivate().await;
    println!("grid stopped");
    Ok(())
}
