//! Static quote fixtures covering the demo portfolio.

use stockgrid_core::{Quote, Symbol};

fn quote(symbol: &str, price: f64, previous_close: f64, open: f64, high: f64, low: f64) -> Quote {
    let change = price - previous_close;
    let change_percent = if previous_close == 0.0 {
        0.0
    } else {
        (change / previous_close) * 100.0
    };
    Quote {
        symbol: Symbol::new(symbol),
        price,
        change,
        change_percent,
        previous_close,
        open,
        high,
        low,
    }
}

pub fn quote_by_symbol(symbol: &str) -> Option<Quote> {
    let q = match symbol {
        "MSFT" => quote("MSFT", 428.90, 425.30, 426.00, 430.15, 424.80),
        "AAPL" => quote("AAPL", 232.15, 229.70, 230.10, 233.40, 229.20),
        "INFY" => quote("INFY", 18.42, 18.61, 18.55, 18.70, 18.35),
        "HDB" => quote("HDB", 64.05, 63.20, 63.40, 64.30, 63.10),
        "IBN" => quote("IBN", 29.87, 30.12, 30.05, 30.20, 29.70),
        "WIT" => quote("WIT", 5.91, 5.84, 5.85, 5.95, 5.80),
        _ => return None,
    };
    Some(q)
}
