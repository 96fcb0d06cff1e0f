//! The quote domain: symbols, snapshot quotes, ticks, and the reconciled
//! per-symbol entry/table.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque ticker identifier.
///
/// Normalized to trimmed uppercase on construction so lookups behave the same
/// regardless of how the caller typed the ticker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Construct a symbol, trimming whitespace and uppercasing.
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_ascii_uppercase())
    }

    /// Returns the normalized ticker string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A point-in-time quote as reported by a snapshot provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Ticker the quote belongs to.
    pub symbol: Symbol,
    /// Current price.
    pub price: f64,
    /// Absolute change as reported by the provider.
    pub change: f64,
    /// Percent change as reported by the provider.
    pub change_percent: f64,
    /// Previous-close price; the baseline for derived deltas.
    pub previous_close: f64,
    /// Day open price.
    pub open: f64,
    /// Day high price.
    pub high: f64,
    /// Day low price.
    pub low: f64,
}

/// One incremental price update delivered by a streaming connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteUpdate {
    /// Ticker the update belongs to.
    pub symbol: Symbol,
    /// Traded price.
    pub price: f64,
    /// Provider-reported event timestamp.
    pub ts: DateTime<Utc>,
}

/// Per-symbol reconciled state: current price plus derived deltas against a
/// reference baseline.
///
/// The reference baseline decays once live ticks flow: the first tick after a
/// snapshot is measured against the snapshot's previous close, every later
/// tick against the prior tick's price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteEntry {
    /// Current price.
    pub price: f64,
    /// Baseline against which `change`/`change_percent` were computed.
    pub reference_price: f64,
    /// `price - reference_price` (provider-reported for snapshot entries).
    pub change: f64,
    /// Percent change; `0.0` whenever the baseline is zero or unknown.
    pub change_percent: f64,
    ticked: bool,
}

impl QuoteEntry {
    /// Build an entry from a provider snapshot quote, taking the derived
    /// fields directly from the provider's response.
    #[must_use]
    pub fn from_quote(q: &Quote) -> Self {
        Self {
            price: q.price,
            reference_price: q.previous_close,
            change: q.change,
            change_percent: q.change_percent,
            ticked: false,
        }
    }

    /// Build an entry from raw fields without marking it live.
    ///
    /// Used for fallback placeholder entries where no provider response
    /// exists.
    #[must_use]
    pub const fn from_parts(
        price: f64,
        reference_price: f64,
        change: f64,
        change_percent: f64,
    ) -> Self {
        Self {
            price,
            reference_price,
            change,
            change_percent,
            ticked: false,
        }
    }

    /// Whether this entry has been updated by at least one live tick.
    #[must_use]
    pub const fn is_live(&self) -> bool {
        self.ticked
    }

    /// Apply a live tick, recomputing `change`/`change_percent` against the
    /// decayed baseline.
    pub fn apply_tick(&mut self, price: f64) {
        let baseline = if self.ticked {
            self.price
        } else {
            self.reference_price
        };
        let change = price - baseline;
        self.price = price;
        self.reference_price = baseline;
        self.change = change;
        self.change_percent = percent_of(change, baseline);
        self.ticked = true;
    }
}

/// Percent change of `change` over `baseline`, defined as `0.0` when the
/// baseline is zero or not finite. Never NaN or infinite.
#[must_use]
pub fn percent_of(change: f64, baseline: f64) -> f64 {
    if baseline == 0.0 || !baseline.is_finite() {
        0.0
    } else {
        change / baseline * 100.0
    }
}

/// Mapping from tracked symbol to its reconciled entry.
///
/// Once the initial snapshot completes, the key set equals the tracked symbol
/// set exactly. Before that the table does not exist at all (the engine's
/// loading phase), so an empty table is never observable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteTable(HashMap<Symbol, QuoteEntry>);

impl QuoteTable {
    /// Create an empty table; callers populate it during snapshot fan-in.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the table holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Look up the entry for a symbol.
    #[must_use]
    pub fn get(&self, symbol: &Symbol) -> Option<&QuoteEntry> {
        self.0.get(symbol)
    }

    /// Insert or replace the entry for a symbol.
    pub fn insert(&mut self, symbol: Symbol, entry: QuoteEntry) {
        self.0.insert(symbol, entry);
    }

    /// Whether the table has an entry for a symbol.
    #[must_use]
    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.0.contains_key(symbol)
    }

    /// Iterate over `(symbol, entry)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, &QuoteEntry)> {
        self.0.iter()
    }

    /// Apply a live tick to the entry for `symbol`.
    ///
    /// Returns `false` (and leaves the table untouched) when the symbol is
    /// not tracked; stray ticks are dropped, never an error.
    pub fn apply_tick(&mut self, symbol: &Symbol, price: f64) -> bool {
        match self.0.get_mut(symbol) {
            Some(entry) => {
                entry.apply_tick(price);
                true
            }
            None => false,
        }
    }
}

impl FromIterator<(Symbol, QuoteEntry)> for QuoteTable {
    fn from_iter<I: IntoIterator<Item = (Symbol, QuoteEntry)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
