//! Run parameters — serializable, TOML-loadable, content-addressed.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// End-of-day exit cutoff: positions are flattened on the first bar where
/// the hour is >= 15 AND the minute is >= 59, in exchange-local time.
/// Both conditions must hold; a 16:05 bar does not trigger the cutoff.
pub const EOD_EXIT_HOUR: u32 = 15;
pub const EOD_EXIT_MINUTE: u32 = 59;

/// Unique identifier for a run (content-addressable hash).
pub type RunId = String;

/// Errors validating or loading run parameters.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("toml parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("initial_capital must be positive, got {0}")]
    NonPositiveCapital(f64),
    #[error("commission_per_trade must be non-negative, got {0}")]
    NegativeCommission(f64),
    #[error("max_holding_secs must be positive, got {0}")]
    NonPositiveHold(i64),
}

/// Global parameters for a single backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunParams {
    /// Starting account balance in dollars.
    pub initial_capital: f64,
    /// Flat commission charged once at entry and once inside each exit pnl.
    pub commission_per_trade: f64,
    /// Maximum position age before a time-based exit fires.
    pub max_holding_secs: i64,
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            initial_capital: 100_000.0,
            commission_per_trade: 1.0,
            max_holding_secs: 7_200,
        }
    }
}

impl RunParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.initial_capital.is_finite() || self.initial_capital <= 0.0 {
            return Err(ConfigError::NonPositiveCapital(self.initial_capital));
        }
        if self.commission_per_trade < 0.0 {
            return Err(ConfigError::NegativeCommission(self.commission_per_trade));
        }
        if self.max_holding_secs <= 0 {
            return Err(ConfigError::NonPositiveHold(self.max_holding_secs));
        }
        Ok(())
    }

    /// Parse from a TOML document and validate.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let params: RunParams = toml::from_str(s)?;
        params.validate()?;
        Ok(params)
    }

    /// Deterministic content hash of these parameters.
    ///
    /// Two runs with identical parameters get the same id, which lets the
    /// API layer cache and deduplicate results.
    pub fn run_id(&self) -> RunId {
        let json = serde_json::to_string(self).expect("RunParams serialization failed");
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(RunParams::default().validate().is_ok());
    }

    #[test]
    fn rejects_zero_capital() {
        let params = RunParams {
            initial_capital: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ConfigError::NonPositiveCapital(_))
        ));
    }

    #[test]
    fn rejects_negative_commission() {
        let params = RunParams {
            commission_per_trade: -0.5,
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ConfigError::NegativeCommission(_))
        ));
    }

    #[test]
    fn rejects_non_positive_hold() {
        let params = RunParams {
            max_holding_secs: 0,
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ConfigError::NonPositiveHold(_))
        ));
    }

    #[test]
    fn toml_round_trip() {
        let toml_src = r#"
            initial_capital = 25000.0
            commission_per_trade = 0.5
            max_holding_secs = 3600
        "#;
        let params = RunParams::from_toml_str(toml_src).unwrap();
        assert_eq!(params.initial_capital, 25_000.0);
        assert_eq!(params.commission_per_trade, 0.5);
        assert_eq!(params.max_holding_secs, 3_600);
    }

    #[test]
    fn toml_rejects_invalid_values() {
        let toml_src = r#"
            initial_capital = -1.0
            commission_per_trade = 0.0
            max_holding_secs = 3600
        "#;
        assert!(RunParams::from_toml_str(toml_src).is_err());
    }

    #[test]
    fn run_id_deterministic() {
        let params = RunParams::default();
        assert_eq!(params.run_id(), params.run_id());
        assert!(!params.run_id().is_empty());
    }

    #[test]
    fn run_id_changes_with_params() {
        let a = RunParams::default();
        let b = RunParams {
            commission_per_trade: 2.0,
            ..Default::default()
        };
        assert_ne!(a.run_id(), b.run_id());
    }
}
