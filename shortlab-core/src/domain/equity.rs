//! Equity curve sample.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One point on the sampled equity curve.
///
/// The engine samples every `max(1, total_bars / 500)` bars plus the first
/// and last bar, so the curve stays bounded no matter how long the input
/// stream is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquitySample {
    pub ts_ns: i64,
    pub balance: f64,
    pub open_positions: usize,
}

impl EquitySample {
    pub fn time(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_nanos(self.ts_ns)
    }
}
