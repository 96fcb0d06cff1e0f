//! stockgrid reconciles a batch quote snapshot with a live tick stream.
//!
//! Overview
//! - Snapshots a fixed tracked symbol set through any connector implementing
//!   the `stockgrid_core` contracts, replacing per-symbol failures with
//!   bounded-random placeholder entries so one bad symbol never fails the
//!   batch.
//! - Opens one streaming session per activation and folds each tick into the
//!   table, recomputing the derived change fields against a decaying
//!   baseline: the first tick is measured against the snapshot's previous
//!   close, every later tick against the prior tick's price.
//! - Tears down race-safely: no tick lands after `deactivate()`, even when
//!   one is already in flight, and re-activation never leaks the previous
//!   session.
//!
//! Building and running an engine:
//! ```rust,ignore
//! use std::sync::Arc;
//! use stockgrid::StockGrid;
//! use stockgrid_finnhub::FinnhubConnector;
//!
//! let connector = Arc::new(FinnhubConnector::from_env()?);
//! let grid = StockGrid::builder().with_connector(connector).build()?;
//!
//! grid.activate().await;
//! let mut changes = grid.changes();
//! while changes.changed().await.is_ok() {
//!     if let stockgrid::GridView::Ready { table } = grid.view().await {
//!         let total = grid.watchlist().holdings_value(&table);
//!         // render the table and portfolio totals
//!     }
//! }
//! grid.deactivate().await;
//! ```
//!
//! See `stockgrid/examples/` for runnable end-to-end demonstrations.
#![warn(missing_docs)]

mod grid;
mod snapshot;
mod watchlist;

pub use grid::{GridView, StockGrid, StockGridBuilder};
pub use watchlist::{TrackedSymbol, Watchlist, default_portfolio};

// Re-export core types for convenience
pub use stockgrid_core::{
    GridConfig,
    GridConnector,
    GridError,
    Quote,
    QuoteEntry,
    QuoteTable,
    QuoteUpdate,
    StreamSession,
    Symbol,
};
