//! Simulation engine: single-pass bar loop over the merged stream.

mod simulation;

pub use simulation::{
    run_backtest, BacktestOutput, EngineError, EQUITY_CURVE_TARGET_POINTS,
};
