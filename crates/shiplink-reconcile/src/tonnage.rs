//! Fixed-point tonnage.
//!
//! Weights are carried as whole grams so that sums and differences are exact:
//! `reference - entity + entity == reference` holds whenever both steps
//! succeed. Arithmetic is checked and reports overflow as an error.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ReconcileError, Result};

const GRAMS_PER_TON: f64 = 1_000_000.0;

// Bound on a single weight. Sums are bounded only by i64 grams.
const MAX_TONS: f64 = 1.0e9;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Tonnage {
    grams: i64,
}

impl Tonnage {
    pub const ZERO: Tonnage = Tonnage { grams: 0 };

    pub fn from_grams(grams: i64) -> Self {
        Self { grams }
    }

    /// Round a weight in tons to the nearest gram.
    pub fn from_tons(tons: f64) -> Result<Self> {
        if !tons.is_finite() || tons.abs() > MAX_TONS {
            return Err(ReconcileError::InvalidTonnage { value: tons });
        }
        Ok(Self {
            grams: (tons * GRAMS_PER_TON).round() as i64,
        })
    }

    pub fn grams(self) -> i64 {
        self.grams
    }

    pub fn as_tons(self) -> f64 {
        self.grams as f64 / GRAMS_PER_TON
    }

    pub fn is_negative(self) -> bool {
        self.grams < 0
    }

    pub fn checked_add(self, rhs: Tonnage) -> Result<Tonnage> {
        self.grams
            .checked_add(rhs.grams)
            .map(Tonnage::from_grams)
            .ok_or(ReconcileError::TonnageOverflow)
    }

    pub fn checked_sub(self, rhs: Tonnage) -> Result<Tonnage> {
        self.grams
            .checked_sub(rhs.grams)
            .map(Tonnage::from_grams)
            .ok_or(ReconcileError::TonnageOverflow)
    }

    /// Sum of `values`, failing instead of wrapping.
    pub fn total<I>(values: I) -> Result<Tonnage>
    where
        I: IntoIterator<Item = Tonnage>,
    {
        values
            .into_iter()
            .try_fold(Tonnage::ZERO, Tonnage::checked_add)
    }
}

impl fmt::Display for Tonnage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3} t", self.as_tons())
    }
}
