//! Drawdown series and stagnation periods over the sampled equity curve.

use serde::{Deserialize, Serialize};

use shortlab_core::domain::EquitySample;

/// One point of the drawdown overlay: the balance, the running peak,
/// and the decline from that peak in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawdownPoint {
    pub ts_ns: i64,
    pub balance: f64,
    pub peak: f64,
    pub drawdown_pct: f64,
}

/// A stretch of the curve spent below a prior peak. `recovered` is
/// false when the curve ends before regaining the peak.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StagnationPeriod {
    pub start_ts_ns: i64,
    pub end_ts_ns: i64,
    pub max_drawdown_pct: f64,
    pub recovered: bool,
}

/// Computes the running-peak drawdown overlay for the curve. A
/// non-positive peak yields 0.0 percent.
pub fn drawdown_series(curve: &[EquitySample]) -> Vec<DrawdownPoint> {
    let mut peak = f64::MIN;
    curve
        .iter()
        .map(|s| {
            peak = peak.max(s.balance);
            let drawdown_pct = if peak > 0.0 {
                (peak - s.balance) / peak * 100.0
            } else {
                0.0
            };
            DrawdownPoint {
                ts_ns: s.ts_ns,
                balance: s.balance,
                peak,
                drawdown_pct,
            }
        })
        .collect()
}

/// Extracts the contiguous below-peak stretches of the curve. A period
/// opens on the first sample under the running peak and closes on the
/// sample that regains it; a period still open at the end of the curve
/// is reported with `recovered: false`.
pub fn stagnation_periods(curve: &[EquitySample]) -> Vec<StagnationPeriod> {
    let series = drawdown_series(curve);
    let mut periods = Vec::new();
    let mut open: Option<StagnationPeriod> = None;

    for point in &series {
        if point.drawdown_pct > 0.0 {
            match open.as_mut() {
                Some(p) => {
                    p.end_ts_ns = point.ts_ns;
                    p.max_drawdown_pct = p.max_drawdown_pct.max(point.drawdown_pct);
                }
                None => {
                    open = Some(StagnationPeriod {
                        start_ts_ns: point.ts_ns,
                        end_ts_ns: point.ts_ns,
                        max_drawdown_pct: point.drawdown_pct,
                        recovered: false,
                    });
                }
            }
        } else if let Some(mut p) = open.take() {
            p.end_ts_ns = point.ts_ns;
            p.recovered = true;
            periods.push(p);
        }
    }
    if let Some(p) = open {
        periods.push(p);
    }
    periods
}
