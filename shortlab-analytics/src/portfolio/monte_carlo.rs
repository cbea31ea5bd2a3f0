//! Monte Carlo resampling of the trade ledger.
//!
//! Each simulated path replays `num_trades` pnls drawn from the ledger
//! with replacement, compounding from the initial capital. Paths are
//! independent, so they fan out across the rayon pool. Sampling uses the
//! thread-local RNG and is not seedable; two invocations over the same
//! ledger will differ in the tails. Callers that need reproducible
//! summaries should persist the summary, not re-derive it.

use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use shortlab_core::domain::ClosedTrade;

/// A path whose equity dips below this fraction of the initial capital
/// counts as ruined.
pub const RUIN_THRESHOLD_FRACTION: f64 = 0.5;

/// Risk assumed per trade when a ledger entry carries no usable stop
/// distance, as a fraction of initial capital.
const FALLBACK_RISK_FRACTION: f64 = 0.01;

/// Distribution summary over all simulated final balances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloSummary {
    pub num_simulations: usize,
    pub best_final_balance: f64,
    pub worst_final_balance: f64,
    pub median_final_balance: f64,
    pub percentile_5: f64,
    pub percentile_25: f64,
    pub percentile_75: f64,
    pub percentile_95: f64,
    /// Share of paths that touched the ruin threshold, in [0, 100].
    pub probability_of_ruin_pct: f64,
    pub average_max_drawdown_pct: f64,
}

impl MonteCarloSummary {
    fn degenerate(initial_capital: f64) -> Self {
        MonteCarloSummary {
            num_simulations: 0,
            best_final_balance: initial_capital,
            worst_final_balance: initial_capital,
            median_final_balance: initial_capital,
            percentile_5: initial_capital,
            percentile_25: initial_capital,
            percentile_75: initial_capital,
            percentile_95: initial_capital,
            probability_of_ruin_pct: 0.0,
            average_max_drawdown_pct: 0.0,
        }
    }
}

/// Dollar risk a trade put on: quantity times stop distance, with a
/// capital-fraction fallback for zero-distance stops.
fn risk_usd(trade: &ClosedTrade, initial_capital: f64) -> f64 {
    let risk = trade.quantity * (trade.entry_price - trade.stop_loss).abs();
    if risk > 0.0 {
        risk
    } else {
        initial_capital * FALLBACK_RISK_FRACTION
    }
}

struct PathOutcome {
    final_balance: f64,
    max_drawdown_pct: f64,
    ruined: bool,
}

fn simulate_path(pnls: &[f64], initial_capital: f64) -> PathOutcome {
    let mut rng = rand::thread_rng();
    let ruin_floor = initial_capital * RUIN_THRESHOLD_FRACTION;
    let mut equity = initial_capital;
    let mut peak = initial_capital;
    let mut max_dd_pct = 0.0f64;
    let mut ruined = false;

    for _ in 0..pnls.len() {
        equity += pnls[rng.gen_range(0..pnls.len())];
        peak = peak.max(equity);
        if peak > 0.0 {
            max_dd_pct = max_dd_pct.max((peak - equity) / peak * 100.0);
        }
        if equity < ruin_floor {
            ruined = true;
        }
    }

    PathOutcome {
        final_balance: equity,
        max_drawdown_pct: max_dd_pct,
        ruined,
    }
}

/// Index into a sorted slice at percentile `p` (nearest-rank on n − 1).
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let idx = (p / 100.0 * (sorted.len() - 1) as f64).round() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

/// Runs `num_simulations` resampled paths and summarizes the outcome
/// distribution. An empty ledger or zero simulation count yields a flat
/// summary pinned at the initial capital.
pub fn run_monte_carlo(
    trades: &[ClosedTrade],
    initial_capital: f64,
    num_simulations: usize,
) -> MonteCarloSummary {
    if trades.is_empty() || num_simulations == 0 {
        return MonteCarloSummary::degenerate(initial_capital);
    }

    // Normalize each trade to the dollar pnl its r-multiple implies at
    // the risk it actually carried. This keeps resampling independent of
    // the original position-sizing sequence.
    let pnls: Vec<f64> = trades
        .iter()
        .map(|t| t.r_multiple() * risk_usd(t, initial_capital))
        .collect();

    tracing::debug!(
        num_simulations,
        num_trades = trades.len(),
        "running monte carlo resampling"
    );

    let outcomes: Vec<PathOutcome> = (0..num_simulations)
        .into_par_iter()
        .map(|_| simulate_path(&pnls, initial_capital))
        .collect();

    let mut finals: Vec<f64> = outcomes.iter().map(|o| o.final_balance).collect();
    finals.sort_by(|a, b| a.partial_cmp(b).expect("finite balances"));

    let ruined = outcomes.iter().filter(|o| o.ruined).count();
    let avg_dd = outcomes.iter().map(|o| o.max_drawdown_pct).sum::<f64>()
        / outcomes.len() as f64;

    MonteCarloSummary {
        num_simulations,
        best_final_balance: *finals.last().expect("nonempty"),
        worst_final_balance: finals[0],
        median_final_balance: percentile(&finals, 50.0),
        percentile_5: percentile(&finals, 5.0),
        percentile_25: percentile(&finals, 25.0),
        percentile_75: percentile(&finals, 75.0),
        percentile_95: percentile(&finals, 95.0),
        probability_of_ruin_pct: ruined as f64 / num_simulations as f64 * 100.0,
        average_max_drawdown_pct: avg_dd,
    }
}
