//! ClosedTrade — an immutable round-trip record appended by the engine.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Why a position was closed. Listed in the order the exit phase checks
/// them; the first match on a bar wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitReason {
    StopLoss,
    TakeProfit,
    MaxHoldTime,
    EndOfDay,
    /// Position survived to the end of the data stream.
    ForceClose,
}

impl ExitReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExitReason::StopLoss => "stop_loss",
            ExitReason::TakeProfit => "take_profit",
            ExitReason::MaxHoldTime => "max_hold_time",
            ExitReason::EndOfDay => "end_of_day",
            ExitReason::ForceClose => "force_close",
        }
    }
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A completed short round trip. Append-only: the engine never mutates a
/// record after pushing it onto the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosedTrade {
    pub strategy: usize,
    pub ticker: u32,
    pub entry_bar: usize,
    pub exit_bar: usize,
    pub entry_ts_ns: i64,
    pub exit_ts_ns: i64,
    pub entry_price: f64,
    pub exit_price: f64,
    pub quantity: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    /// Realized pnl net of the exit-side commission.
    pub pnl: f64,
    pub exit_reason: ExitReason,
}

impl ClosedTrade {
    /// Initial risk per share: |entry − stop|.
    pub fn risk(&self) -> f64 {
        (self.entry_price - self.stop_loss).abs()
    }

    /// Profit expressed as a multiple of the initial risk.
    ///
    /// Positive when the short worked (price fell). 0 when the risk
    /// distance is 0.
    pub fn r_multiple(&self) -> f64 {
        let risk = self.risk();
        if risk > 0.0 {
            (self.entry_price - self.exit_price) / risk
        } else {
            0.0
        }
    }

    /// Strict `> 0` test: an exactly break-even trade counts as a loss.
    pub fn is_winner(&self) -> bool {
        self.r_multiple() > 0.0
    }

    pub fn entry_time(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_nanos(self.entry_ts_ns)
    }

    pub fn exit_time(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_nanos(self.exit_ts_ns)
    }
}
