//! Bar — one minute of market data for a single ticker.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// OHLC minute bar with optional indicator columns.
///
/// Timestamps are exchange-local wall-clock time encoded as nanoseconds
/// since the epoch. They are monotonic within a ticker and non-decreasing
/// across the merged multi-ticker stream fed to the engine.
///
/// The optional columns (`atr`, `pm_high`, `vwap`) use `0.0` to mean
/// "absent"; the risk models substitute close-derived defaults when they
/// read a non-positive value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bar {
    pub ticker: u32,
    pub ts_ns: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub atr: f64,
    #[serde(default)]
    pub pm_high: f64,
    #[serde(default)]
    pub vwap: f64,
}

impl Bar {
    /// Wall-clock time of the bar.
    pub fn datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_nanos(self.ts_ns)
    }

    /// Basic OHLC sanity check: high >= low, prices positive.
    pub fn is_sane(&self) -> bool {
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.open > 0.0
            && self.close > 0.0
    }

    /// Degenerate bar where all four prices equal `price`.
    ///
    /// Handy for synthetic streams in tests and benchmarks.
    pub fn flat(ticker: u32, ts_ns: i64, price: f64) -> Self {
        Self {
            ticker,
            ts_ns,
            open: price,
            high: price,
            low: price,
            close: price,
            atr: 0.0,
            pm_high: 0.0,
            vwap: 0.0,
        }
    }
}
