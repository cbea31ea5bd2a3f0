//! shortlab-core — the short-bias backtest engine.
//!
//! This crate contains the heart of the simulator:
//! - Domain types (bars, strategies, positions, closed trades, equity samples)
//! - Immutable input containers (merged bar stream, boolean signal matrix)
//! - Run parameters with TOML loading and a content-addressed run id
//! - The single-pass simulation loop: exits before entries on every bar,
//!   weight-renormalized capital allocation, end-of-stream force-close
//!
//! Everything downstream of the raw ledger (statistics, Monte Carlo,
//! correlation) lives in `shortlab-analytics`.

pub mod config;
pub mod dataset;
pub mod domain;
pub mod engine;
pub mod signal;

pub use config::{RunParams, EOD_EXIT_HOUR, EOD_EXIT_MINUTE};
pub use dataset::MarketDataset;
pub use engine::{run_backtest, BacktestOutput, EngineError};
pub use signal::SignalMatrix;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: engine inputs and outputs are Send + Sync, so
    /// independent runs can be dispatched across threads by callers.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::Bar>();
        require_sync::<domain::Bar>();
        require_send::<domain::StrategyConfig>();
        require_sync::<domain::StrategyConfig>();
        require_send::<domain::Position>();
        require_sync::<domain::Position>();
        require_send::<domain::ClosedTrade>();
        require_sync::<domain::ClosedTrade>();
        require_send::<domain::EquitySample>();
        require_sync::<domain::EquitySample>();

        require_send::<MarketDataset>();
        require_sync::<MarketDataset>();
        require_send::<SignalMatrix>();
        require_sync::<SignalMatrix>();
        require_send::<RunParams>();
        require_sync::<RunParams>();
        require_send::<BacktestOutput>();
        require_sync::<BacktestOutput>();
        require_send::<EngineError>();
        require_sync::<EngineError>();
    }
}
