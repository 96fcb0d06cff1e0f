//! Mock connectors for stockgrid examples and tests.
//!
//! [`MockConnector`] serves deterministic fixture quotes for the symbols the
//! bundled demo portfolio tracks, so examples run without credentials or
//! network access. [`dynamic::DynamicMockConnector`] goes further and lets a
//! test script every call from the outside.

use async_trait::async_trait;

use stockgrid_core::connector::{GridConnector, QuoteProvider};
use stockgrid_core::{GridError, Quote, Symbol};

pub mod dynamic;
mod fixtures;

pub use dynamic::{DynamicMockConnector, DynamicMockController, MockBehavior, StreamBehavior};

/// Mock connector for CI-safe examples. Provides deterministic data from static fixtures.
pub struct MockConnector;

impl Default for MockConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConnector {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    async fn maybe_fail_or_timeout(symbol: &str, capability: &'static str) -> Result<(), GridError> {
        match symbol {
            "FAIL" => Err(GridError::connector(
                "stockgrid-mock",
                format!("forced failure: {capability}"),
            )),
            "TIMEOUT" => {
                // Simulate brief latency; orchestrator may time out depending on config.
                // Keep short to avoid slowing tests excessively.
                tokio::time::sleep(std::time::Duration::from_millis(200)).await;
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

impl GridConnector for MockConnector {
    fn name(&self) -> &'static str {
        "stockgrid-mock"
    }
    fn vendor(&self) -> &'static str {
        "Mock"
    }

    fn as_quote_provider(&self) -> Option<&dyn QuoteProvider> {
        Some(self as &dyn QuoteProvider)
    }
    // Stream intentionally unsupported; use `dynamic` for scripted sessions.
}

#[async_trait]
impl QuoteProvider for MockConnector {
    async fn quote(&self, symbol: &Symbol) -> Result<Quote, GridError> {
        let s = symbol.as_str();
        Self::maybe_fail_or_timeout(s, "quote").await?;
        fixtures::quote_by_symbol(s)
            .ok_or_else(|| GridError::not_found(format!("quote for {s}")))
    }
}
