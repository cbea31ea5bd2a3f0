//! Portfolio-level analytics: resampled outcome distributions, strategy
//! correlation, and drawdown structure.

pub mod correlation;
pub mod drawdown;
pub mod monte_carlo;

pub use correlation::{correlation_matrix, CorrelationMatrix, RISK_FRACTION_PER_TRADE};
pub use drawdown::{drawdown_series, stagnation_periods, DrawdownPoint, StagnationPeriod};
pub use monte_carlo::{run_monte_carlo, MonteCarloSummary, RUIN_THRESHOLD_FRACTION};
