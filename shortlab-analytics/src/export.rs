//! Report artifact export (CSV trade tape, CSV equity curve, JSON report).

use std::path::Path;

use anyhow::{Context, Result};

use shortlab_core::domain::{ClosedTrade, EquitySample};

use crate::report::BacktestReport;

/// Writes the trade tape as CSV, one row per closed trade.
pub fn write_trades_csv(path: &Path, trades: &[ClosedTrade]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create trades CSV {}", path.display()))?;

    writer.write_record([
        "strategy",
        "ticker",
        "entry_time",
        "exit_time",
        "entry_price",
        "exit_price",
        "quantity",
        "stop_loss",
        "take_profit",
        "pnl",
        "r_multiple",
        "exit_reason",
    ])?;

    for trade in trades {
        writer.write_record([
            trade.strategy.to_string(),
            trade.ticker.to_string(),
            trade.entry_time().to_rfc3339(),
            trade.exit_time().to_rfc3339(),
            format!("{:.4}", trade.entry_price),
            format!("{:.4}", trade.exit_price),
            format!("{:.4}", trade.quantity),
            format!("{:.4}", trade.stop_loss),
            format!("{:.4}", trade.take_profit),
            format!("{:.4}", trade.pnl),
            format!("{:.4}", trade.r_multiple()),
            trade.exit_reason.as_str().to_string(),
        ])?;
    }

    writer
        .flush()
        .with_context(|| format!("failed to flush trades CSV {}", path.display()))?;
    Ok(())
}

/// Writes the sampled equity curve as CSV.
pub fn write_equity_csv(path: &Path, curve: &[EquitySample]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create equity CSV {}", path.display()))?;

    writer.write_record(["time", "balance", "open_positions"])?;
    for sample in curve {
        writer.write_record([
            sample.time().to_rfc3339(),
            format!("{:.2}", sample.balance),
            sample.open_positions.to_string(),
        ])?;
    }

    writer
        .flush()
        .with_context(|| format!("failed to flush equity CSV {}", path.display()))?;
    Ok(())
}

/// Writes the full report as pretty-printed JSON.
pub fn write_report_json(path: &Path, report: &BacktestReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("failed to serialize report")?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write report JSON {}", path.display()))?;
    Ok(())
}
