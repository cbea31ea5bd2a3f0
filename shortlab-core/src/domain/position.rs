//! Open position — engine-owned, mutable state.

use serde::{Deserialize, Serialize};

/// An open short position.
///
/// Positions live in a flat arena inside the simulation loop and are
/// removed by swap-remove; nothing outside the loop holds a reference to
/// one, so removal never invalidates an external handle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    /// Index into the strategy config set.
    pub strategy: usize,
    pub ticker: u32,
    pub entry_bar: usize,
    pub entry_ts_ns: i64,
    pub entry_price: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub quantity: f64,
}

impl Position {
    /// Unrealized pnl of the short at `price`, before commission.
    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        (self.entry_price - price) * self.quantity
    }

    /// Initial risk per share: |entry − stop|.
    pub fn risk(&self) -> f64 {
        (self.entry_price - self.stop_loss).abs()
    }
}
