//! Summary statistics over a closed-trade ledger and an equity curve.
//!
//! Every metric returns a finite float: degenerate inputs (no trades, a
//! single trade, zero variance) produce 0.0 rather than NaN or infinity,
//! and the profit factor is capped so an all-winning ledger serializes
//! cleanly.

use std::collections::BTreeMap;

use chrono::{Datelike, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use shortlab_core::domain::{ClosedTrade, EquitySample};

/// Upper bound on the reported profit factor. A ledger with no losing
/// trades would otherwise divide by zero.
pub const PROFIT_FACTOR_CAP: f64 = 100.0;

/// Labels for the fixed R-multiple histogram, from heavy losses to the
/// open-ended right tail.
pub const R_BUCKET_LABELS: [&str; 9] = [
    "-3R", "-2R", "-1R", "0R", "+1R", "+2R", "+3R", "+4R", "+5R+",
];

// ─── Aggregate ───────────────────────────────────────────────────────

/// Headline statistics for one backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeStats {
    pub num_trades: usize,
    pub num_winners: usize,
    pub num_losers: usize,
    /// Fraction of trades with r > 0, in [0, 1].
    pub win_rate: f64,
    pub total_pnl: f64,
    pub avg_r_multiple: f64,
    /// Mean r over winning trades only, 0.0 with no winners.
    pub avg_win_r: f64,
    /// Mean r over losing trades only (r <= 0), 0.0 with no losers.
    pub avg_loss_r: f64,
    /// Gross profit / gross loss, capped at [`PROFIT_FACTOR_CAP`].
    pub profit_factor: f64,
    /// Per-trade Sharpe over r-multiples, not annualized.
    pub sharpe: f64,
    pub max_drawdown_pct: f64,
    pub max_drawdown_abs: f64,
    /// Trade counts per fixed R bucket, keyed by [`R_BUCKET_LABELS`].
    pub r_distribution: BTreeMap<String, usize>,
    /// Average r by entry hour, keyed "HH:00".
    pub ev_by_hour: BTreeMap<String, f64>,
    /// Average r by entry weekday, Mon..Fri, in weekday order.
    pub ev_by_day: Vec<(String, f64)>,
    /// Summed r per calendar month of entry, keyed "YYYY-MM".
    pub monthly_returns: BTreeMap<String, f64>,
}

impl TradeStats {
    /// Computes the full statistics block from a ledger and its curve.
    pub fn compute(trades: &[ClosedTrade], equity_curve: &[EquitySample]) -> Self {
        let rs: Vec<f64> = trades.iter().map(|t| t.r_multiple()).collect();
        let num_winners = trades.iter().filter(|t| t.is_winner()).count();
        let num_losers = trades.len() - num_winners;
        let win_rs: Vec<f64> = rs.iter().copied().filter(|&r| r > 0.0).collect();
        let loss_rs: Vec<f64> = rs.iter().copied().filter(|&r| r <= 0.0).collect();
        let (max_drawdown_pct, max_drawdown_abs) = max_drawdown(equity_curve);

        TradeStats {
            num_trades: trades.len(),
            num_winners,
            num_losers,
            win_rate: if trades.is_empty() {
                0.0
            } else {
                num_winners as f64 / trades.len() as f64
            },
            total_pnl: trades.iter().map(|t| t.pnl).sum(),
            avg_r_multiple: mean(&rs),
            avg_win_r: mean(&win_rs),
            avg_loss_r: mean(&loss_rs),
            profit_factor: profit_factor(trades),
            sharpe: sharpe(&rs),
            max_drawdown_pct,
            max_drawdown_abs,
            r_distribution: r_distribution(&rs),
            ev_by_hour: ev_by_hour(trades),
            ev_by_day: ev_by_day(trades),
            monthly_returns: monthly_returns(trades),
        }
    }
}

// ─── Metrics ─────────────────────────────────────────────────────────

/// Gross profit over gross loss, 0.0 when empty, capped when lossless.
pub fn profit_factor(trades: &[ClosedTrade]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    let gross_profit: f64 = trades.iter().map(|t| t.pnl.max(0.0)).sum();
    let gross_loss: f64 = trades.iter().map(|t| (-t.pnl).max(0.0)).sum();
    if gross_loss == 0.0 {
        if gross_profit > 0.0 {
            PROFIT_FACTOR_CAP
        } else {
            0.0
        }
    } else {
        (gross_profit / gross_loss).min(PROFIT_FACTOR_CAP)
    }
}

/// Per-trade Sharpe ratio over r-multiples. Needs at least two trades
/// and nonzero dispersion, otherwise 0.0. No annualization: the unit of
/// time here is "one trade".
pub fn sharpe(rs: &[f64]) -> f64 {
    if rs.len() < 2 {
        return 0.0;
    }
    let sd = std_dev(rs);
    if sd == 0.0 {
        0.0
    } else {
        mean(rs) / sd
    }
}

/// Worst peak-to-trough decline over the curve, as (percent, absolute).
/// A non-positive peak contributes nothing to the percent figure.
pub fn max_drawdown(curve: &[EquitySample]) -> (f64, f64) {
    let mut peak = f64::MIN;
    let mut worst_pct = 0.0f64;
    let mut worst_abs = 0.0f64;
    for sample in curve {
        peak = peak.max(sample.balance);
        let dd = peak - sample.balance;
        worst_abs = worst_abs.max(dd);
        if peak > 0.0 {
            worst_pct = worst_pct.max(dd / peak * 100.0);
        }
    }
    (worst_pct, worst_abs)
}

/// Histogram of r-multiples into the nine fixed buckets. Bucket `kR`
/// spans [k − 0.5, k + 0.5); the ends are open ("-3R" is everything
/// below −2.5, "+5R+" everything at or above 4.5).
pub fn r_distribution(rs: &[f64]) -> BTreeMap<String, usize> {
    let mut buckets: BTreeMap<String, usize> = R_BUCKET_LABELS
        .iter()
        .map(|label| (label.to_string(), 0))
        .collect();
    for &r in rs {
        let label = if r < -2.5 {
            "-3R"
        } else if r < -1.5 {
            "-2R"
        } else if r < -0.5 {
            "-1R"
        } else if r < 0.5 {
            "0R"
        } else if r < 1.5 {
            "+1R"
        } else if r < 2.5 {
            "+2R"
        } else if r < 3.5 {
            "+3R"
        } else if r < 4.5 {
            "+4R"
        } else {
            "+5R+"
        };
        *buckets.get_mut(label).expect("fixed label set") += 1;
    }
    buckets
}

/// Average r-multiple keyed by entry hour of day, formatted "HH:00"
/// (0–23). Only hours with at least one trade appear.
pub fn ev_by_hour(trades: &[ClosedTrade]) -> BTreeMap<String, f64> {
    let mut sums: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for t in trades {
        let key = format!("{:02}:00", t.entry_time().hour());
        let entry = sums.entry(key).or_insert((0.0, 0));
        entry.0 += t.r_multiple();
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(k, (sum, n))| (k, sum / n as f64))
        .collect()
}

/// Average r-multiple per weekday of entry, Monday through Friday in
/// calendar order. Weekend entries are ignored; minute bars from a
/// regular session never land there.
pub fn ev_by_day(trades: &[ClosedTrade]) -> Vec<(String, f64)> {
    let mut sums: [(f64, usize); 5] = [(0.0, 0); 5];
    for t in trades {
        let weekday = t.entry_time().weekday();
        if matches!(weekday, Weekday::Sat | Weekday::Sun) {
            continue;
        }
        let idx = weekday.num_days_from_monday() as usize;
        sums[idx].0 += t.r_multiple();
        sums[idx].1 += 1;
    }
    const DAYS: [Weekday; 5] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
    ];
    DAYS.iter()
        .zip(sums)
        .filter(|(_, (_, n))| *n > 0)
        .map(|(day, (sum, n))| (day.to_string(), sum / n as f64))
        .collect()
}

/// Summed r-multiple per calendar month of entry, keyed "YYYY-MM".
pub fn monthly_returns(trades: &[ClosedTrade]) -> BTreeMap<String, f64> {
    let mut months: BTreeMap<String, f64> = BTreeMap::new();
    for t in trades {
        let entry = t.entry_time();
        let key = format!("{:04}-{:02}", entry.year(), entry.month());
        *months.entry(key).or_insert(0.0) += t.r_multiple();
    }
    months
}

// ─── Helpers ─────────────────────────────────────────────────────────

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Population standard deviation.
pub(crate) fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}
