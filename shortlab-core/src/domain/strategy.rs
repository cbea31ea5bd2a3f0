//! Strategy configuration and risk models.
//!
//! Every strategy is short-biased: the stop sits above the entry close and
//! the target below it. The level computation is a pure function of the
//! entry bar, so the engine never needs to know which model produced a
//! level.

use serde::{Deserialize, Serialize};

use super::bar::Bar;

/// ATR substitute when the column is absent: 2% of the entry close.
pub const DEFAULT_ATR_FRACTION: f64 = 0.02;
/// Stop fallback factor (pm_high absent, or unrecognized model).
pub const FALLBACK_STOP_FACTOR: f64 = 1.05;
/// Target fallback factor (vwap absent, or unrecognized model).
pub const FALLBACK_TARGET_FACTOR: f64 = 0.95;

/// Stop-loss / take-profit computation model.
///
/// Serialized with an external `type` tag so configs coming from the API
/// layer stay readable. Unknown types deserialize to `Other` and fall back
/// to a flat ±5% band around the entry close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskRule {
    /// Absolute dollar offset from the entry close.
    Fixed { value: f64 },
    /// Percent offset from the entry close.
    Percent { value: f64 },
    /// ATR multiple; substitutes 2% of close when the column is absent.
    Atr { value: f64 },
    /// Structure levels: pre-market high for the stop, VWAP for the target.
    Structure,
    /// Unrecognized model.
    #[serde(other)]
    Other,
}

impl RiskRule {
    /// Stop-loss level for a short entered at `bar.close`.
    pub fn stop_price(&self, bar: &Bar) -> f64 {
        let close = bar.close;
        match *self {
            RiskRule::Fixed { value } => close + value,
            RiskRule::Percent { value } => close * (1.0 + value / 100.0),
            RiskRule::Atr { value } => {
                let atr = if bar.atr > 0.0 {
                    bar.atr
                } else {
                    close * DEFAULT_ATR_FRACTION
                };
                close + atr * value
            }
            RiskRule::Structure => {
                if bar.pm_high > 0.0 {
                    bar.pm_high
                } else {
                    close * FALLBACK_STOP_FACTOR
                }
            }
            RiskRule::Other => close * FALLBACK_STOP_FACTOR,
        }
    }

    /// Take-profit level for a short entered at `bar.close`.
    pub fn target_price(&self, bar: &Bar) -> f64 {
        let close = bar.close;
        match *self {
            RiskRule::Fixed { value } => close - value,
            RiskRule::Percent { value } => close * (1.0 - value / 100.0),
            RiskRule::Atr { value } => {
                let atr = if bar.atr > 0.0 {
                    bar.atr
                } else {
                    close * DEFAULT_ATR_FRACTION
                };
                close - atr * value
            }
            RiskRule::Structure => {
                if bar.vwap > 0.0 {
                    bar.vwap
                } else {
                    close * FALLBACK_TARGET_FACTOR
                }
            }
            RiskRule::Other => close * FALLBACK_TARGET_FACTOR,
        }
    }
}

/// Per-strategy risk parameters and capital weight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyConfig {
    pub id: String,
    /// Capital weight, nominally 0–100. Only the ratio among strategies
    /// triggered on the same bar matters: weights are renormalized over
    /// the triggered set at entry time.
    pub weight: f64,
    pub stop_loss: RiskRule,
    pub take_profit: RiskRule,
}
