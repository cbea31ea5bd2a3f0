//! MarketDataset — the merged, time-ordered minute-bar stream.

use serde::{Deserialize, Serialize};

use crate::domain::Bar;

/// Immutable input stream for a backtest run.
///
/// Bars from all tickers are merged into a single array sorted by
/// timestamp (globally non-decreasing; ties keep input order). The engine
/// validates ordering before running, so a dataset that fails
/// [`MarketDataset::is_time_ordered`] is rejected instead of silently
/// producing garbage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketDataset {
    pub bars: Vec<Bar>,
}

impl MarketDataset {
    pub fn new(bars: Vec<Bar>) -> Self {
        Self { bars }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// True when global timestamps never move backwards.
    pub fn is_time_ordered(&self) -> bool {
        self.bars.windows(2).all(|w| w[0].ts_ns <= w[1].ts_ns)
    }

    /// Index of the first bar whose timestamp violates ordering, if any.
    pub fn first_unordered_index(&self) -> Option<usize> {
        self.bars
            .windows(2)
            .position(|w| w[0].ts_ns > w[1].ts_ns)
            .map(|i| i + 1)
    }
}
