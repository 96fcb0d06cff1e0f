//! The fixed tracked-symbol set and portfolio arithmetic over a quote table.

use stockgrid_core::{QuoteTable, Symbol};

/// A tracked holding: ticker, display name, and held-share count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedSymbol {
    /// Ticker the holding tracks.
    pub symbol: Symbol,
    /// Display name shown alongside the ticker.
    pub name: String,
    /// Number of shares held.
    pub shares: u32,
}

impl TrackedSymbol {
    /// Build a tracked holding.
    pub fn new(symbol: impl AsRef<str>, name: impl Into<String>, shares: u32) -> Self {
        Self {
            symbol: Symbol::new(symbol),
            name: name.into(),
            shares,
        }
    }
}

/// The immutable tracked set for one engine instance.
///
/// Fixed at build time; the engine snapshots and streams exactly these
/// symbols and nothing else.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Watchlist(Vec<TrackedSymbol>);

impl Watchlist {
    /// Build a watchlist from tracked holdings.
    #[must_use]
    pub fn new(tracked: Vec<TrackedSymbol>) -> Self {
        Self(tracked)
    }

    /// Number of tracked holdings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the watchlist tracks nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the tracked holdings in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &TrackedSymbol> {
        self.0.iter()
    }

    /// The tracked ticker set, in declaration order.
    #[must_use]
    pub fn symbols(&self) -> Vec<Symbol> {
        self.0.iter().map(|t| t.symbol.clone()).collect()
    }

    /// Total holdings value against the given table: Σ shares × price.
    ///
    /// Holdings without a table entry contribute nothing.
    #[must_use]
    pub fn holdings_value(&self, table: &QuoteTable) -> f64 {
        self.0
            .iter()
            .filter_map(|t| table.get(&t.symbol).map(|e| f64::from(t.shares) * e.price))
            .sum()
    }

    /// Total day change against the given table: Σ shares × change.
    #[must_use]
    pub fn day_change(&self, table: &QuoteTable) -> f64 {
        self.0
            .iter()
            .filter_map(|t| table.get(&t.symbol).map(|e| f64::from(t.shares) * e.change))
            .sum()
    }
}

impl FromIterator<TrackedSymbol> for Watchlist {
    fn from_iter<I: IntoIterator<Item = TrackedSymbol>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The bundled demo portfolio: six ADR holdings with fixed share counts.
#[must_use]
pub fn default_portfolio() -> Watchlist {
    Watchlist::new(vec![
        TrackedSymbol::new("MSFT", "Reliance Industries", 25),
        TrackedSymbol::new("AAPL", "Tata Consultancy Services", 15),
        TrackedSymbol::new("INFY", "Infosys Limited", 40),
        TrackedSymbol::new("HDB", "HDFC Bank", 30),
        TrackedSymbol::new("IBN", "ICICI Bank", 50),
        TrackedSymbol::new("WIT", "Wipro Limited", 60),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockgrid_core::QuoteEntry;

    #[test]
    fn default_portfolio_tracks_six_symbols() {
        let wl = default_portfolio();
        assert_eq!(wl.len(), 6);
        let syms = wl.symbols();
        assert!(syms.contains(&Symbol::new("MSFT")));
        assert!(syms.contains(&Symbol::new("WIT")));
    }

    #[test]
    fn portfolio_valuation_sums_tracked_entries_only() {
        let wl = Watchlist::new(vec![
            TrackedSymbol::new("AAA", "Alpha", 10),
            TrackedSymbol::new("BBB", "Beta", 5),
        ]);
        let mut table = QuoteTable::new();
        table.insert(Symbol::new("AAA"), QuoteEntry::from_parts(50.0, 45.0, 5.0, 11.11));
        // BBB has no entry yet; it must not contribute
        assert_eq!(wl.holdings_value(&table), 500.0);
        assert_eq!(wl.day_change(&table), 50.0);
    }
}
