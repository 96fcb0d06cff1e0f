use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the stockgrid workspace.
///
/// Wraps capability mismatches, argument validation errors, provider-tagged
/// failures, not-found conditions, and provider timeouts.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GridError {
    /// The requested capability is not implemented by the target connector.
    #[error("unsupported capability: {capability}")]
    Unsupported {
        /// A capability string describing what was requested (e.g. "quote").
        capability: String,
    },

    /// Issues with the returned or expected data (missing fields, etc.).
    #[error("data issue: {0}")]
    Data(String),

    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// An individual connector returned an error.
    #[error("{connector} failed: {msg}")]
    Connector {
        /// Connector name that failed.
        connector: String,
        /// Human-readable error message.
        msg: String,
    },

    /// A resource or symbol could not be found.
    #[error("not found: {what}")]
    NotFound {
        /// Description of missing resource, e.g. "quote for AAPL".
        what: String,
    },

    /// An individual provider call exceeded the configured timeout.
    #[error("provider timed out: {capability} via {connector}")]
    ProviderTimeout {
        /// Connector name that timed out.
        connector: String,
        /// Capability label (e.g. "quote", "stream-quotes").
        capability: String,
    },
}

impl GridError {
    /// Helper: build an `Unsupported` error for a capability string.
    pub fn unsupported(cap: impl Into<String>) -> Self {
        Self::Unsupported {
            capability: cap.into(),
        }
    }

    /// Helper: build a `Connector` error with the connector name and message.
    pub fn connector(connector: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Connector {
            connector: connector.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `NotFound` error for a description of the missing resource.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Helper: build a `ProviderTimeout` error.
    pub fn provider_timeout(connector: impl Into<String>, capability: impl Into<String>) -> Self {
        Self::ProviderTimeout {
            connector: connector.into(),
            capability: capability.into(),
        }
    }
}
