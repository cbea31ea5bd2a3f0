//! Pairwise correlation of per-strategy equity curves.
//!
//! Each strategy gets a synthetic curve: starting from the shared
//! initial capital, every one of its trades (in exit order) compounds
//! the balance by its r-multiple times a fixed risk fraction. Curves are
//! padded to a common length with their last value, then compared with
//! Pearson correlation.

use serde::{Deserialize, Serialize};

use shortlab_core::domain::{ClosedTrade, StrategyConfig};

/// Fraction of the running balance assumed at risk on each trade when
/// rebuilding a strategy's standalone curve.
pub const RISK_FRACTION_PER_TRADE: f64 = 0.01;

/// Symmetric correlation matrix over the configured strategies, in
/// configuration order. Diagonal is 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub strategy_ids: Vec<String>,
    pub matrix: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Correlation between strategies `a` and `b` by index.
    pub fn get(&self, a: usize, b: usize) -> f64 {
        self.matrix[a][b]
    }
}

/// Rebuilds each strategy's standalone compounded curve from its slice
/// of the ledger.
fn strategy_curves(
    trades: &[ClosedTrade],
    num_strategies: usize,
    initial_capital: f64,
) -> Vec<Vec<f64>> {
    let mut per_strategy: Vec<Vec<&ClosedTrade>> = vec![Vec::new(); num_strategies];
    for t in trades {
        if t.strategy < num_strategies {
            per_strategy[t.strategy].push(t);
        }
    }

    per_strategy
        .into_iter()
        .map(|mut slice| {
            slice.sort_by_key(|t| t.exit_ts_ns);
            let mut balance = initial_capital;
            let mut curve = Vec::with_capacity(slice.len() + 1);
            curve.push(balance);
            for t in slice {
                balance += t.r_multiple() * RISK_FRACTION_PER_TRADE * balance;
                curve.push(balance);
            }
            curve
        })
        .collect()
}

/// Pearson correlation coefficient. Returns 0.0 when either series has
/// zero variance, so flat curves read as uncorrelated rather than NaN.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    debug_assert_eq!(xs.len(), ys.len());
    let n = xs.len();
    if n < 2 {
        return 0.0;
    }
    let mean_x = xs.iter().sum::<f64>() / n as f64;
    let mean_y = ys.iter().sum::<f64>() / n as f64;
    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (&x, &y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        0.0
    } else {
        cov / (var_x.sqrt() * var_y.sqrt())
    }
}

/// Computes the full strategy-by-strategy correlation matrix. Strategies
/// with no trades produce flat curves and correlate 0.0 with everything
/// except themselves.
pub fn correlation_matrix(
    trades: &[ClosedTrade],
    strategies: &[StrategyConfig],
    initial_capital: f64,
) -> CorrelationMatrix {
    let mut curves = strategy_curves(trades, strategies.len(), initial_capital);

    // Equalize lengths by carrying each curve's last value forward.
    let max_len = curves.iter().map(Vec::len).max().unwrap_or(0);
    for curve in &mut curves {
        let last = curve.last().copied().unwrap_or(initial_capital);
        curve.resize(max_len, last);
    }

    let n = strategies.len();
    let mut matrix = vec![vec![0.0; n]; n];
    for i in 0..n {
        matrix[i][i] = 1.0;
        for j in (i + 1)..n {
            let c = pearson(&curves[i], &curves[j]);
            matrix[i][j] = c;
            matrix[j][i] = c;
        }
    }

    CorrelationMatrix {
        strategy_ids: strategies.iter().map(|s| s.id.clone()).collect(),
        matrix,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shortlab_core::domain::{ExitReason, RiskRule};

    fn strategy(id: &str) -> StrategyConfig {
        StrategyConfig {
            id: id.to_string(),
            weight: 50.0,
            stop_loss: RiskRule::Percent { value: 5.0 },
            take_profit: RiskRule::Percent { value: 5.0 },
        }
    }

    fn trade(strategy: usize, r: f64, exit_ts_ns: i64) -> ClosedTrade {
        ClosedTrade {
            strategy,
            ticker: 0,
            entry_bar: 0,
            exit_bar: 1,
            entry_ts_ns: 0,
            exit_ts_ns,
            entry_price: 100.0,
            exit_price: 100.0 - r * 5.0,
            quantity: 1.0,
            stop_loss: 105.0,
            take_profit: 95.0,
            pnl: r * 5.0,
            exit_reason: ExitReason::TakeProfit,
        }
    }

    #[test]
    fn identical_trade_streams_correlate_fully() {
        let rs = [1.0, -0.5, 2.0, -1.0, 0.7];
        let mut trades = Vec::new();
        for (i, &r) in rs.iter().enumerate() {
            trades.push(trade(0, r, i as i64));
            trades.push(trade(1, r, i as i64));
        }
        let m = correlation_matrix(&trades, &[strategy("a"), strategy("b")], 10_000.0);
        assert!((m.get(0, 1) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn mirrored_trade_streams_anticorrelate() {
        let rs = [1.0, -0.5, 2.0, -1.0, 0.7];
        let mut trades = Vec::new();
        for (i, &r) in rs.iter().enumerate() {
            trades.push(trade(0, r, i as i64));
            trades.push(trade(1, -r, i as i64));
        }
        let m = correlation_matrix(&trades, &[strategy("a"), strategy("b")], 10_000.0);
        assert!(m.get(0, 1) < -0.9);
    }

    #[test]
    fn diagonal_is_one_and_matrix_is_symmetric() {
        let trades = vec![
            trade(0, 1.0, 0),
            trade(1, -1.0, 1),
            trade(2, 0.5, 2),
            trade(0, -0.3, 3),
        ];
        let strategies = [strategy("a"), strategy("b"), strategy("c")];
        let m = correlation_matrix(&trades, &strategies, 10_000.0);
        for i in 0..3 {
            assert_eq!(m.get(i, i), 1.0);
            for j in 0..3 {
                assert_eq!(m.get(i, j), m.get(j, i));
            }
        }
    }

    #[test]
    fn tradeless_strategy_reads_as_uncorrelated() {
        let trades = vec![trade(0, 1.0, 0), trade(0, -1.0, 1)];
        let m = correlation_matrix(&trades, &[strategy("a"), strategy("idle")], 10_000.0);
        assert_eq!(m.get(0, 1), 0.0);
        assert_eq!(m.get(1, 1), 1.0);
    }

    #[test]
    fn pearson_zero_variance_is_zero() {
        assert_eq!(pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]), 0.0);
    }

    #[test]
    fn curves_sort_trades_by_exit_time() {
        // Same trades in shuffled input order must give the same matrix.
        let a = vec![trade(0, 1.0, 5), trade(0, -1.0, 2), trade(1, 0.5, 1)];
        let b = vec![trade(1, 0.5, 1), trade(0, -1.0, 2), trade(0, 1.0, 5)];
        let strategies = [strategy("a"), strategy("b")];
        let ma = correlation_matrix(&a, &strategies, 10_000.0);
        let mb = correlation_matrix(&b, &strategies, 10_000.0);
        assert_eq!(ma.matrix, mb.matrix);
    }
}
