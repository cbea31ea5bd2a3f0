//! SignalMatrix — precomputed boolean entry triggers, `[bars × strategies]`.
//!
//! The condition-evaluation layer (arbitrary AND/OR comparisons against
//! indicator columns) lives outside this crate; the engine only ever sees
//! its output as this dense boolean matrix, which keeps the hot loop free
//! of any expression interpretation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors constructing a signal matrix.
#[derive(Debug, Error)]
pub enum SignalError {
    #[error("row {row} has {actual} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
}

/// Dense row-major boolean matrix: one row per bar, one column per
/// strategy. `true` means the strategy's entry condition fired on that bar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalMatrix {
    num_strategies: usize,
    cells: Vec<bool>,
}

impl SignalMatrix {
    /// All-false matrix with the given shape.
    pub fn new(num_bars: usize, num_strategies: usize) -> Self {
        Self {
            num_strategies,
            cells: vec![false; num_bars * num_strategies],
        }
    }

    /// Build from per-bar rows. All rows must have the same width.
    pub fn from_rows(rows: &[Vec<bool>]) -> Result<Self, SignalError> {
        let expected = rows.first().map(Vec::len).unwrap_or(0);
        let mut cells = Vec::with_capacity(rows.len() * expected);
        for (row, r) in rows.iter().enumerate() {
            if r.len() != expected {
                return Err(SignalError::RaggedRow {
                    row,
                    expected,
                    actual: r.len(),
                });
            }
            cells.extend_from_slice(r);
        }
        Ok(Self {
            num_strategies: expected,
            cells,
        })
    }

    pub fn num_bars(&self) -> usize {
        if self.num_strategies == 0 {
            0
        } else {
            self.cells.len() / self.num_strategies
        }
    }

    pub fn num_strategies(&self) -> usize {
        self.num_strategies
    }

    pub fn set(&mut self, bar: usize, strategy: usize) {
        self.cells[bar * self.num_strategies + strategy] = true;
    }

    pub fn is_set(&self, bar: usize, strategy: usize) -> bool {
        self.cells[bar * self.num_strategies + strategy]
    }

    /// The trigger row for one bar.
    pub fn row(&self, bar: usize) -> &[bool] {
        let start = bar * self.num_strategies;
        &self.cells[start..start + self.num_strategies]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_read_back() {
        let mut m = SignalMatrix::new(3, 2);
        m.set(1, 0);
        m.set(2, 1);
        assert!(m.is_set(1, 0));
        assert!(!m.is_set(1, 1));
        assert_eq!(m.row(2), &[false, true]);
        assert_eq!(m.num_bars(), 3);
        assert_eq!(m.num_strategies(), 2);
    }

    #[test]
    fn from_rows_accepts_rectangular() {
        let m = SignalMatrix::from_rows(&[vec![true, false], vec![false, true]]).unwrap();
        assert!(m.is_set(0, 0));
        assert!(m.is_set(1, 1));
    }

    #[test]
    fn from_rows_rejects_ragged() {
        let err = SignalMatrix::from_rows(&[vec![true, false], vec![true]]).unwrap_err();
        match err {
            SignalError::RaggedRow { row, expected, actual } => {
                assert_eq!(row, 1);
                assert_eq!(expected, 2);
                assert_eq!(actual, 1);
            }
        }
    }

    #[test]
    fn empty_matrix() {
        let m = SignalMatrix::new(0, 4);
        assert_eq!(m.num_bars(), 0);
        let m = SignalMatrix::from_rows(&[]).unwrap();
        assert_eq!(m.num_strategies(), 0);
        assert_eq!(m.num_bars(), 0);
    }
}
