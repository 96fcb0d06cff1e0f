//! Provider configuration, constructed once and injected into the connector.

use stockgrid_core::GridError;

/// Default base URL for Finnhub's REST API.
pub const DEFAULT_API_URL: &str = "https://finnhub.io/api/v1";
/// Default URL for Finnhub's streaming WebSocket endpoint.
pub const DEFAULT_WS_URL: &str = "wss://ws.finnhub.io";

/// Environment variable holding the API token. Mandatory: there is no
/// built-in fallback credential.
pub const TOKEN_ENV: &str = "STOCKGRID_FINNHUB_TOKEN";
/// Optional REST base URL override (useful for pointing tests at a local
/// mock server).
pub const API_URL_ENV: &str = "STOCKGRID_FINNHUB_API_URL";
/// Optional WebSocket URL override.
pub const WS_URL_ENV: &str = "STOCKGRID_FINNHUB_WS_URL";

/// Connection settings for the Finnhub connector.
#[derive(Debug, Clone)]
pub struct FinnhubConfig {
    /// API token appended to REST queries and the WebSocket URL.
    pub api_key: String,
    /// REST base URL (no trailing slash).
    pub api_url: String,
    /// WebSocket endpoint URL.
    pub ws_url: String,
}

impl FinnhubConfig {
    /// Build a configuration with the default production endpoints.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: DEFAULT_API_URL.to_string(),
            ws_url: DEFAULT_WS_URL.to_string(),
        }
    }

    /// Resolve the configuration from the process environment.
    ///
    /// # Errors
    /// Returns `InvalidArg` when the token variable is unset or empty.
    pub fn from_env() -> Result<Self, GridError> {
        let api_key = match std::env::var(TOKEN_ENV) {
            Ok(v) if !v.trim().is_empty() => v,
            _ => {
                return Err(GridError::InvalidArg(format!(
                    "{TOKEN_ENV} must be set to a Finnhub API token"
                )));
            }
        };
        let mut cfg = Self::new(api_key);
        if let Ok(url) = std::env::var(API_URL_ENV)
            && !url.trim().is_empty()
        {
            cfg.api_url = url;
        }
        if let Ok(url) = std::env::var(WS_URL_ENV)
            && !url.trim().is_empty()
        {
            cfg.ws_url = url;
        }
        Ok(cfg)
    }

    /// Override the REST base URL.
    #[must_use]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Override the WebSocket URL.
    #[must_use]
    pub fn with_ws_url(mut self, url: impl Into<String>) -> Self {
        self.ws_url = url.into();
        self
    }
}
