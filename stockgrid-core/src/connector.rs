use async_trait::async_trait;

use crate::GridError;
use crate::stream::StreamSession;
use crate::types::{Quote, QuoteUpdate, Symbol};

/// Focused role trait for connectors that provide point-in-time quotes.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Fetch a point-in-time quote for the given symbol.
    async fn quote(&self, symbol: &Symbol) -> Result<Quote, GridError>;
}

/// Focused role trait for connectors that provide streaming price ticks.
#[async_trait]
pub trait StreamProvider: Send + Sync {
    /// Start a streaming session for the given symbols.
    ///
    /// `capacity` bounds the tick channel between the session's transport
    /// task and the caller; it must be non-zero.
    ///
    /// The returned receiver yields only ticks for the subscribed symbols;
    /// unrecognized symbols and malformed provider payloads are dropped by
    /// the connector. Transport failures after a successful return are never
    /// surfaced as errors: the session simply stops delivering.
    async fn stream_quotes(
        &self,
        symbols: &[Symbol],
        capacity: usize,
    ) -> Result<(StreamSession, tokio::sync::mpsc::Receiver<QuoteUpdate>), GridError>;
}

/// Main connector trait implemented by provider crates. Exposes capability
/// discovery.
pub trait GridConnector: Send + Sync {
    /// A stable identifier for logs and error tagging (e.g. "stockgrid-finnhub").
    fn name(&self) -> &'static str;

    /// Human-readable vendor name (e.g. "Finnhub").
    fn vendor(&self) -> &'static str;

    /// Quote capability accessor; `None` when unsupported.
    fn as_quote_provider(&self) -> Option<&dyn QuoteProvider> {
        None
    }

    /// Streaming capability accessor; `None` when unsupported.
    fn as_stream_provider(&self) -> Option<&dyn StreamProvider> {
        None
    }
}
