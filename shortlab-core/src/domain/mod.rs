//! Domain types: bars, strategies, positions, trades, equity samples.

pub mod bar;
pub mod equity;
pub mod position;
pub mod strategy;
pub mod trade;

pub use bar::Bar;
pub use equity::EquitySample;
pub use position::Position;
pub use strategy::{RiskRule, StrategyConfig};
pub use trade::{ClosedTrade, ExitReason};
