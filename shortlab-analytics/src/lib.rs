//! shortlab-analytics — statistics and portfolio analytics over a
//! backtest ledger.
//!
//! Consumes the raw output of `shortlab-core` and produces:
//! - Summary trade statistics (win rate, profit factor, Sharpe,
//!   drawdown, R distribution, time-of-day / day-of-week expectancies)
//! - Monte Carlo resampling of the ledger with a ruin estimate
//! - Pairwise strategy correlation over synthetic compounded curves
//! - Drawdown series and stagnation periods
//! - A single serializable report plus CSV/JSON artifact writers

pub mod export;
pub mod metrics;
pub mod portfolio;
pub mod report;

pub use metrics::TradeStats;
pub use portfolio::{CorrelationMatrix, DrawdownPoint, MonteCarloSummary, StagnationPeriod};
pub use report::{BacktestReport, SCHEMA_VERSION};
