//! REST snapshot access: one `/quote` request per symbol.

use serde::Deserialize;
use stockgrid_core::{GridError, Quote, Symbol};
use url::Url;

use crate::config::FinnhubConfig;

/// Raw `/quote` payload in Finnhub's single-letter field scheme.
#[derive(Debug, Deserialize)]
pub(crate) struct FhQuote {
    /// Current price.
    #[serde(default)]
    pub c: f64,
    /// Absolute change since previous close.
    #[serde(default)]
    pub d: f64,
    /// Percent change since previous close.
    #[serde(default)]
    pub dp: f64,
    /// Day high.
    #[serde(default)]
    pub h: f64,
    /// Day low.
    #[serde(default)]
    pub l: f64,
    /// Day open.
    #[serde(default)]
    pub o: f64,
    /// Previous close.
    #[serde(default)]
    pub pc: f64,
}

impl FhQuote {
    pub(crate) fn into_quote(self, symbol: Symbol) -> Quote {
        Quote {
            symbol,
            price: self.c,
            change: self.d,
            change_percent: self.dp,
            previous_close: self.pc,
            open: self.o,
            high: self.h,
            low: self.l,
        }
    }
}

pub(crate) struct RestClient {
    http: reqwest::Client,
    cfg: FinnhubConfig,
}

impl RestClient {
    pub(crate) fn new(cfg: FinnhubConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            cfg,
        }
    }

    pub(crate) async fn quote(&self, symbol: &Symbol) -> Result<Quote, GridError> {
        let mut url = Url::parse(&format!("{}/quote", self.cfg.api_url))
            .map_err(|e| GridError::InvalidArg(format!("bad Finnhub API URL: {e}")))?;
        url.query_pairs_mut()
            .append_pair("symbol", symbol.as_str())
            .append_pair("token", &self.cfg.api_key);

        let res = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| GridError::connector(crate::CONNECTOR_NAME, e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            return Err(GridError::connector(
                crate::CONNECTOR_NAME,
                format!("HTTP {status} for quote {symbol}"),
            ));
        }

        let raw: FhQuote = res
            .json()
            .await
            .map_err(|e| GridError::Data(format!("malformed quote payload for {symbol}: {e}")))?;
        Ok(raw.into_quote(symbol.clone()))
    }
}
