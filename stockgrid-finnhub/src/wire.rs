//! WebSocket frame shapes for the Finnhub streaming feed.
//!
//! Outbound control frames are `{"type":"subscribe","symbol":...}` /
//! `{"type":"unsubscribe","symbol":...}` text messages, one per symbol.
//! Inbound frames carry a `type` discriminator; only `trade` frames hold tick
//! records. Anything else (pings, acks, malformed text) decodes to no ticks.

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use serde_json::json;
use stockgrid_core::{QuoteUpdate, Symbol};

pub(crate) fn subscribe_frame(symbol: &Symbol) -> String {
    json!({ "type": "subscribe", "symbol": symbol.as_str() }).to_string()
}

pub(crate) fn unsubscribe_frame(symbol: &Symbol) -> String {
    json!({ "type": "unsubscribe", "symbol": symbol.as_str() }).to_string()
}

#[derive(Debug, Deserialize)]
struct InboundFrame {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Vec<TradeRecord>,
}

/// One trade record; fields are optional so a single malformed record drops
/// quietly instead of poisoning the whole frame.
#[derive(Debug, Deserialize)]
struct TradeRecord {
    s: Option<String>,
    p: Option<f64>,
    /// Millisecond epoch timestamp.
    t: Option<i64>,
}

fn record_ts(ms: Option<i64>) -> DateTime<Utc> {
    ms.and_then(|ms| Utc.timestamp_millis_opt(ms).single())
        .unwrap_or_else(Utc::now)
}

/// Decode one inbound text frame into tick updates.
///
/// Non-trade frames, unparsable text, and records missing a symbol or price
/// all yield an empty vec.
pub(crate) fn decode_frame(text: &str) -> Vec<QuoteUpdate> {
    let Ok(frame) = serde_json::from_str::<InboundFrame>(text) else {
        return Vec::new();
    };
    if frame.kind != "trade" {
        return Vec::new();
    }
    frame
        .data
        .into_iter()
        .filter_map(|rec| match (rec.s, rec.p) {
            (Some(s), Some(p)) => Some(QuoteUpdate {
                symbol: Symbol::new(s),
                price: p,
                ts: record_ts(rec.t),
            }),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_frames_have_type_discriminator() {
        let s = Symbol::new("AAPL");
        assert_eq!(
            subscribe_frame(&s),
            r#"{"symbol":"AAPL","type":"subscribe"}"#
        );
        assert_eq!(
            unsubscribe_frame(&s),
            r#"{"symbol":"AAPL","type":"unsubscribe"}"#
        );
    }

    #[test]
    fn trade_frame_decodes_each_record() {
        let ticks = decode_frame(
            r#"{"type":"trade","data":[{"s":"AAPL","p":191.5,"t":1700000000000,"v":10},{"s":"MSFT","p":420.25,"t":1700000000500}]}"#,
        );
        assert_eq!(ticks.len(), 2);
        assert_eq!(ticks[0].symbol, Symbol::new("AAPL"));
        assert_eq!(ticks[0].price, 191.5);
        assert_eq!(ticks[1].symbol, Symbol::new("MSFT"));
    }

    #[test]
    fn non_trade_frames_yield_nothing() {
        assert!(decode_frame(r#"{"type":"ping"}"#).is_empty());
        assert!(decode_frame(r#"{"type":"trade"}"#).is_empty());
    }

    #[test]
    fn malformed_text_yields_nothing() {
        assert!(decode_frame("not json at all").is_empty());
        assert!(decode_frame(r#"{"data":[{"s":"AAPL","p":1.0}]}"#).is_empty());
    }

    #[test]
    fn records_missing_symbol_or_price_are_dropped() {
        let ticks = decode_frame(
            r#"{"type":"trade","data":[{"p":1.0},{"s":"AAPL"},{"s":"MSFT","p":420.0}]}"#,
        );
        assert_eq!(ticks.len(), 1);
        assert_eq!(ticks[0].symbol, Symbol::new("MSFT"));
    }
}
