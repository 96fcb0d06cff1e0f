//! stockgrid-core
//!
//! Core types, traits, and utilities shared across the stockgrid workspace.
//!
//! - `types`: the quote domain (symbols, snapshot quotes, ticks, the
//!   reconciled per-symbol entry and table).
//! - `connector`: the `GridConnector` trait and capability provider traits.
//! - `stream`: the `StreamSession` teardown primitive for live tick feeds.
//! - `config`: engine configuration shared by orchestrators and connectors.
//!
//! Async runtime (Tokio)
//! ---------------------
//! This crate assumes the Tokio ecosystem as the async runtime. Several public
//! APIs are explicitly coupled to Tokio types and facilities:
//!
//! - `stream::StreamSession` wraps `tokio::task::JoinHandle<()>` and uses
//!   `tokio::sync::oneshot::Sender<()>` for cooperative shutdown.
//! - `connector::StreamProvider` returns
//!   `(StreamSession, tokio::sync::mpsc::Receiver<QuoteUpdate>)`.
//!
//! As a result, code that uses streaming must run under a Tokio 1.x runtime.
#![warn(missing_docs)]

pub mod config;
/// Connector capability traits and the primary `GridConnector` interface.
pub mod connector;
/// Unified error type for the stockgrid workspace.
pub mod error;
/// Stream-session utilities used by connectors and the engine.
pub mod stream;
pub mod types;

pub use config::GridConfig;
pub use connector::GridConnector;
pub use error::GridError;
pub use stream::StreamSession;
pub use types::{Quote, QuoteEntry, QuoteTable, QuoteUpdate, Symbol};
