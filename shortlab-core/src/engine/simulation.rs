//! The simulation loop.
//!
//! One sequential pass over the merged bar stream. Per bar, exits are
//! resolved before entries, so capital freed by a stop on this bar is
//! available to strategies triggering on the same bar. Balance and the
//! open-position arena are owned by a state struct local to the run call;
//! there is no shared or global state, and independent runs can execute
//! concurrently without locking.

use chrono::Timelike;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{RunParams, EOD_EXIT_HOUR, EOD_EXIT_MINUTE};
use crate::dataset::MarketDataset;
use crate::domain::{Bar, ClosedTrade, EquitySample, ExitReason, Position, StrategyConfig};
use crate::signal::SignalMatrix;

/// Target number of equity-curve points; the sampling stride is
/// `max(1, total_bars / 500)` so the curve stays bounded for any input.
pub const EQUITY_CURVE_TARGET_POINTS: usize = 500;

/// Structural input violations. Business-logic edge cases (zero triggered
/// weight, missing optional columns, zero risk distance) never error; they
/// skip or fall back silently.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("bar {index}: global timestamp moves backwards")]
    NonMonotonicTimestamps { index: usize },
    #[error("signal matrix covers {actual} bars, dataset has {expected}")]
    SignalBarMismatch { expected: usize, actual: usize },
    #[error("signal matrix has {actual} strategy columns, config set has {expected}")]
    SignalStrategyMismatch { expected: usize, actual: usize },
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
}

/// Everything a single run produces: the trade ledger, the sampled equity
/// curve, and the final account balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestOutput {
    pub trades: Vec<ClosedTrade>,
    pub equity_curve: Vec<EquitySample>,
    pub final_balance: f64,
}

/// Mutable run state, threaded through the loop explicitly.
struct SimulationState {
    balance: f64,
    open: Vec<Position>,
    trades: Vec<ClosedTrade>,
    curve: Vec<EquitySample>,
}

impl SimulationState {
    fn new(initial_capital: f64) -> Self {
        Self {
            balance: initial_capital,
            open: Vec::new(),
            trades: Vec::new(),
            curve: Vec::new(),
        }
    }

    /// Close the position at `idx` by swap-remove and append the trade.
    fn close(
        &mut self,
        idx: usize,
        exit_bar: usize,
        exit_ts_ns: i64,
        exit_price: f64,
        reason: ExitReason,
        commission: f64,
    ) {
        let pos = self.open.swap_remove(idx);
        let pnl = (pos.entry_price - exit_price) * pos.quantity - commission;
        self.balance += pnl;
        self.trades.push(ClosedTrade {
            strategy: pos.strategy,
            ticker: pos.ticker,
            entry_bar: pos.entry_bar,
            exit_bar,
            entry_ts_ns: pos.entry_ts_ns,
            exit_ts_ns,
            entry_price: pos.entry_price,
            exit_price,
            quantity: pos.quantity,
            stop_loss: pos.stop_loss,
            take_profit: pos.take_profit,
            pnl,
            exit_reason: reason,
        });
    }

    /// Open a short at the bar close with `allocation` dollars of capital
    /// at risk. Skips silently when the risk model degenerates to a zero
    /// stop distance.
    fn open_position(
        &mut self,
        strategy: usize,
        config: &StrategyConfig,
        entry_bar: usize,
        bar: &Bar,
        allocation: f64,
        commission: f64,
    ) {
        let stop_loss = config.stop_loss.stop_price(bar);
        let take_profit = config.take_profit.target_price(bar);
        let risk = (stop_loss - bar.close).abs();
        if risk <= 0.0 {
            return;
        }
        let quantity = allocation / risk;
        if quantity <= 0.0 {
            return;
        }
        self.open.push(Position {
            strategy,
            ticker: bar.ticker,
            entry_bar,
            entry_ts_ns: bar.ts_ns,
            entry_price: bar.close,
            stop_loss,
            take_profit,
            quantity,
        });
        self.balance -= commission;
    }

    fn sample(&mut self, ts_ns: i64) {
        self.curve.push(EquitySample {
            ts_ns,
            balance: self.balance,
            open_positions: self.open.len(),
        });
    }
}

/// First exit condition that fires for `pos` on `bar`, with its fill
/// price. Checked in fixed priority: stop, target, max hold, end-of-day.
fn exit_trigger(pos: &Position, bar: &Bar, max_holding_ns: i64) -> Option<(f64, ExitReason)> {
    if bar.close >= pos.stop_loss {
        return Some((pos.stop_loss, ExitReason::StopLoss));
    }
    if bar.close <= pos.take_profit {
        return Some((pos.take_profit, ExitReason::TakeProfit));
    }
    if bar.ts_ns - pos.entry_ts_ns >= max_holding_ns {
        return Some((bar.close, ExitReason::MaxHoldTime));
    }
    let t = bar.datetime();
    if t.hour() >= EOD_EXIT_HOUR && t.minute() >= EOD_EXIT_MINUTE {
        return Some((bar.close, ExitReason::EndOfDay));
    }
    None
}

fn validate_inputs(
    dataset: &MarketDataset,
    strategies: &[StrategyConfig],
    signals: &SignalMatrix,
    params: &RunParams,
) -> Result<(), EngineError> {
    params.validate()?;
    if let Some(index) = dataset.first_unordered_index() {
        return Err(EngineError::NonMonotonicTimestamps { index });
    }
    if signals.num_bars() != dataset.len() {
        return Err(EngineError::SignalBarMismatch {
            expected: dataset.len(),
            actual: signals.num_bars(),
        });
    }
    if signals.num_strategies() != strategies.len() {
        return Err(EngineError::SignalStrategyMismatch {
            expected: strategies.len(),
            actual: signals.num_strategies(),
        });
    }
    Ok(())
}

/// Run one backtest over the merged bar stream.
///
/// Inputs are immutable; the returned ledger and curve are the only
/// observable effects. Bars must arrive in non-decreasing global timestamp
/// order and the signal matrix must match the dataset/strategy shape —
/// violations fail fast with an [`EngineError`] instead of truncating.
pub fn run_backtest(
    dataset: &MarketDataset,
    strategies: &[StrategyConfig],
    signals: &SignalMatrix,
    params: &RunParams,
) -> Result<BacktestOutput, EngineError> {
    validate_inputs(dataset, strategies, signals, params)?;

    let total_bars = dataset.len();
    tracing::debug!(
        bars = total_bars,
        strategies = strategies.len(),
        "starting backtest"
    );

    let sample_every = (total_bars / EQUITY_CURVE_TARGET_POINTS).max(1);
    let max_holding_ns = params.max_holding_secs.saturating_mul(1_000_000_000);
    let mut state = SimulationState::new(params.initial_capital);

    for (i, bar) in dataset.bars.iter().enumerate() {
        // Exit phase. Walk the arena from the back so swap_remove cannot
        // skip an entry: the element swapped into the hole has already
        // been examined.
        let mut idx = state.open.len();
        while idx > 0 {
            idx -= 1;
            if state.open[idx].ticker != bar.ticker {
                continue;
            }
            if let Some((price, reason)) = exit_trigger(&state.open[idx], bar, max_holding_ns) {
                state.close(idx, i, bar.ts_ns, price, reason, params.commission_per_trade);
            }
        }

        // Entry phase. Weights are renormalized over the triggered set and
        // applied against a single balance snapshot, so concurrently
        // triggered strategies split the same capital base exactly.
        let row = signals.row(i);
        let weight_sum: f64 = row
            .iter()
            .zip(strategies)
            .filter(|(on, _)| **on)
            .map(|(_, s)| s.weight)
            .sum();
        if weight_sum > 0.0 && state.balance > 0.0 {
            let snapshot = state.balance;
            for (j, config) in strategies.iter().enumerate() {
                if !row[j] {
                    continue;
                }
                let allocation = snapshot * config.weight / weight_sum;
                state.open_position(j, config, i, bar, allocation, params.commission_per_trade);
            }
        }

        // The final bar is sampled after force-close below.
        if i + 1 != total_bars && (i == 0 || i % sample_every == 0) {
            state.sample(bar.ts_ns);
        }
    }

    // End of stream: flatten whatever is still open at the last close.
    if let Some(last) = dataset.bars.last() {
        while !state.open.is_empty() {
            let idx = state.open.len() - 1;
            state.close(
                idx,
                total_bars - 1,
                last.ts_ns,
                last.close,
                ExitReason::ForceClose,
                params.commission_per_trade,
            );
        }
        state.sample(last.ts_ns);
    }

    tracing::debug!(
        trades = state.trades.len(),
        final_balance = state.balance,
        "backtest complete"
    );

    Ok(BacktestOutput {
        final_balance: state.balance,
        trades: state.trades,
        equity_curve: state.curve,
    })
}
