//! Finnhub connector for the stockgrid quote engine.
//!
//! Implements both capability traits from `stockgrid-core`:
//!
//! - [`QuoteProvider`](stockgrid_core::connector::QuoteProvider) via one
//!   `/quote` REST request per symbol;
//! - [`StreamProvider`](stockgrid_core::connector::StreamProvider) via one
//!   WebSocket connection per session, subscribing to trade events for the
//!   requested symbols.
//!
//! Credentials are injected through [`FinnhubConfig`]; there is deliberately
//! no built-in fallback token.
//!
//! ```rust,ignore
//! let connector = FinnhubConnector::from_env()?;
//! let quote = connector.quote(&Symbol::new("AAPL")).await?;
//! let (session, mut ticks) = connector.stream_quotes(&[Symbol::new("AAPL")], 1024).await?;
//! ```
#![warn(missing_docs)]

mod config;
mod rest;
mod stream;
mod wire;

use std::sync::Arc;

use async_trait::async_trait;

use stockgrid_core::connector::{GridConnector, QuoteProvider, StreamProvider};
use stockgrid_core::stream::StreamSession;
use stockgrid_core::{GridError, Quote, QuoteUpdate, Symbol};

pub use config::{API_URL_ENV, DEFAULT_API_URL, DEFAULT_WS_URL, FinnhubConfig, TOKEN_ENV, WS_URL_ENV};

pub(crate) const CONNECTOR_NAME: &str = "stockgrid-finnhub";

/// Connector backed by Finnhub's REST and WebSocket APIs.
pub struct FinnhubConnector {
    rest: rest::RestClient,
    cfg: FinnhubConfig,
}

impl FinnhubConnector {
    /// Build a connector from an explicit configuration.
    #[must_use]
    pub fn new(cfg: FinnhubConfig) -> Self {
        Self {
            rest: rest::RestClient::new(cfg.clone()),
            cfg,
        }
    }

    /// Build a connector from the process environment.
    ///
    /// # Errors
    /// Returns `InvalidArg` when the token variable is unset or empty.
    pub fn from_env() -> Result<Self, GridError> {
        Ok(Self::new(FinnhubConfig::from_env()?))
    }
}

impl GridConnector for FinnhubConnector {
    fn name(&self) -> &'static str {
        CONNECTOR_NAME
    }

    fn vendor(&self) -> &'static str {
        "Finnhub"
    }

    fn as_quote_provider(&self) -> Option<&dyn QuoteProvider> {
        Some(self as &dyn QuoteProvider)
    }

    fn as_stream_provider(&self) -> Option<&dyn StreamProvider> {
        Some(self as &dyn StreamProvider)
    }
}

#[async_trait]
impl QuoteProvider for FinnhubConnector {
    async fn quote(&self, symbol: &Symbol) -> Result<Quote, GridError> {
        self.rest.quote(symbol).await
    }
}

#[async_trait]
impl StreamProvider for FinnhubConnector {
    async fn stream_quotes(
        &self,
        symbols: &[Symbol],
        capacity: usize,
    ) -> Result<(StreamSession, tokio::sync::mpsc::Receiver<QuoteUpdate>), GridError> {
        if symbols.is_empty() {
            return Err(GridError::InvalidArg(
                "symbol list cannot be empty".into(),
            ));
        }
        if capacity == 0 {
            return Err(GridError::InvalidArg(
                "channel capacity must be non-zero".into(),
            ));
        }
        let symbols: Arc<[Symbol]> = symbols.iter().cloned().collect();
        Ok(stream::spawn_stream(self.cfg.clone(), symbols, capacity))
    }
}
