//! Full run report: ledger, curve, statistics, and portfolio analytics
//! bundled into one serializable document.

use serde::{Deserialize, Serialize};

use shortlab_core::domain::{ClosedTrade, EquitySample, StrategyConfig};
use shortlab_core::{BacktestOutput, RunParams};

use crate::metrics::TradeStats;
use crate::portfolio::{
    correlation_matrix, drawdown_series, run_monte_carlo, stagnation_periods,
    CorrelationMatrix, DrawdownPoint, MonteCarloSummary, StagnationPeriod,
};

/// Bumped when a field changes meaning, so stored reports from older
/// builds are distinguishable on load.
pub const SCHEMA_VERSION: u32 = 1;

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Complete result of one backtest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestReport {
    /// Reports written before versioning deserialize as version 1.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Content hash of the run parameters.
    pub run_id: String,

    pub initial_capital: f64,
    pub final_balance: f64,

    pub stats: TradeStats,
    pub monte_carlo: MonteCarloSummary,
    pub correlation: CorrelationMatrix,
    pub drawdown: Vec<DrawdownPoint>,
    pub stagnation: Vec<StagnationPeriod>,

    pub trades: Vec<ClosedTrade>,
    pub equity_curve: Vec<EquitySample>,
}

impl BacktestReport {
    /// Assembles the full report from a raw engine output.
    pub fn from_output(
        output: BacktestOutput,
        strategies: &[StrategyConfig],
        params: &RunParams,
        num_simulations: usize,
    ) -> Self {
        let stats = TradeStats::compute(&output.trades, &output.equity_curve);
        let monte_carlo =
            run_monte_carlo(&output.trades, params.initial_capital, num_simulations);
        let correlation =
            correlation_matrix(&output.trades, strategies, params.initial_capital);
        let drawdown = drawdown_series(&output.equity_curve);
        let stagnation = stagnation_periods(&output.equity_curve);

        tracing::info!(
            run_id = %params.run_id(),
            num_trades = output.trades.len(),
            final_balance = output.final_balance,
            "assembled backtest report"
        );

        BacktestReport {
            schema_version: SCHEMA_VERSION,
            run_id: params.run_id(),
            initial_capital: params.initial_capital,
            final_balance: output.final_balance,
            stats,
            monte_carlo,
            correlation,
            drawdown,
            stagnation,
            trades: output.trades,
            equity_curve: output.equity_curve,
        }
    }
}
