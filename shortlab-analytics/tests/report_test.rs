//! Full pipeline: engine run → report assembly → artifact export.

use shortlab_analytics::export::{write_equity_csv, write_report_json, write_trades_csv};
use shortlab_analytics::BacktestReport;
use shortlab_core::domain::{Bar, RiskRule, StrategyConfig};
use shortlab_core::{run_backtest, BacktestOutput, MarketDataset, RunParams, SignalMatrix};

const MINUTE_NS: i64 = 60 * 1_000_000_000;

fn run_fixture() -> (BacktestOutput, Vec<StrategyConfig>, RunParams) {
    let strategies = vec![
        StrategyConfig {
            id: "fader".into(),
            weight: 60.0,
            stop_loss: RiskRule::Percent { value: 4.0 },
            take_profit: RiskRule::Percent { value: 4.0 },
        },
        StrategyConfig {
            id: "breakdown".into(),
            weight: 40.0,
            stop_loss: RiskRule::Atr { value: 2.0 },
            take_profit: RiskRule::Atr { value: 3.0 },
        },
    ];
    let bars: Vec<Bar> = (0..300)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.4).sin() * 5.0;
            Bar {
                ticker: (i % 2) as u32,
                ts_ns: (i / 2) as i64 * MINUTE_NS,
                open: close,
                high: close + 0.8,
                low: close - 0.8,
                close,
                atr: 1.0,
                pm_high: close + 3.0,
                vwap: close - 1.0,
            }
        })
        .collect();
    let ds = MarketDataset::new(bars);

    let mut signals = SignalMatrix::new(300, 2);
    for bar in (0..300).step_by(9) {
        signals.set(bar, 0);
    }
    for bar in (0..300).step_by(13) {
        signals.set(bar, 1);
    }

    let params = RunParams {
        initial_capital: 50_000.0,
        commission_per_trade: 1.0,
        max_holding_secs: 1_800,
    };
    let out = run_backtest(&ds, &strategies, &signals, &params).unwrap();
    (out, strategies, params)
}

#[test]
fn report_sections_agree_with_the_ledger() {
    let (out, strategies, params) = run_fixture();
    let num_trades = out.trades.len();
    assert!(num_trades > 0);

    let report = BacktestReport::from_output(out, &strategies, &params, 200);

    assert_eq!(report.stats.num_trades, num_trades);
    assert_eq!(
        report.stats.num_winners + report.stats.num_losers,
        num_trades
    );
    assert_eq!(
        report.stats.r_distribution.values().sum::<usize>(),
        num_trades
    );
    assert_eq!(report.monte_carlo.num_simulations, 200);
    assert!((0.0..=100.0).contains(&report.monte_carlo.probability_of_ruin_pct));

    // 2x2 symmetric matrix with unit diagonal.
    assert_eq!(report.correlation.matrix.len(), 2);
    assert_eq!(report.correlation.matrix[0][0], 1.0);
    assert_eq!(report.correlation.matrix[1][1], 1.0);
    assert_eq!(
        report.correlation.matrix[0][1],
        report.correlation.matrix[1][0]
    );

    assert_eq!(report.drawdown.len(), report.equity_curve.len());
    for p in &report.drawdown {
        assert!(p.drawdown_pct >= 0.0);
        assert!(p.peak >= p.balance);
    }
    for s in &report.stagnation {
        assert!(s.end_ts_ns >= s.start_ts_ns);
        assert!(s.max_drawdown_pct > 0.0);
    }
}

#[test]
fn artifacts_write_and_read_back() {
    let (out, strategies, params) = run_fixture();
    let report = BacktestReport::from_output(out, &strategies, &params, 50);

    let dir = tempfile::tempdir().unwrap();
    let trades_path = dir.path().join("trades.csv");
    let equity_path = dir.path().join("equity.csv");
    let report_path = dir.path().join("report.json");

    write_trades_csv(&trades_path, &report.trades).unwrap();
    write_equity_csv(&equity_path, &report.equity_curve).unwrap();
    write_report_json(&report_path, &report).unwrap();

    let mut reader = csv::Reader::from_path(&trades_path).unwrap();
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), report.trades.len());
    assert_eq!(reader.headers().unwrap().len(), 12);

    let mut equity_reader = csv::Reader::from_path(&equity_path).unwrap();
    let equity_rows = equity_reader.records().count();
    assert_eq!(equity_rows, report.equity_curve.len());

    let json = std::fs::read_to_string(&report_path).unwrap();
    let back: BacktestReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back.run_id, report.run_id);
    assert_eq!(back.trades.len(), report.trades.len());
}

#[test]
fn empty_run_still_produces_a_coherent_report() {
    let strategies = vec![StrategyConfig {
        id: "idle".into(),
        weight: 100.0,
        stop_loss: RiskRule::Percent { value: 5.0 },
        take_profit: RiskRule::Percent { value: 5.0 },
    }];
    let ds = MarketDataset::new(vec![
        Bar::flat(0, 0, 100.0),
        Bar::flat(0, MINUTE_NS, 101.0),
    ]);
    let signals = SignalMatrix::new(2, 1);
    let params = RunParams::default();
    let out = run_backtest(&ds, &strategies, &signals, &params).unwrap();

    let report = BacktestReport::from_output(out, &strategies, &params, 100);
    assert_eq!(report.stats.num_trades, 0);
    assert_eq!(report.stats.win_rate, 0.0);
    assert_eq!(report.monte_carlo.num_simulations, 0);
    assert_eq!(
        report.monte_carlo.median_final_balance,
        params.initial_capital
    );
    assert!(report.stagnation.is_empty());
    assert_eq!(report.final_balance, params.initial_capital);
}
