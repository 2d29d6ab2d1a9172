//! Field comparison strategies.
//!
//! Every comparator maps a pair of cell values to a score in `[0, 1]`. A
//! missing (empty) value on either side always scores 0.

use std::fmt;

use rapidfuzz::distance::jaro_winkler;

use shiplink_common::{normalize_text, parse_f64};

pub trait FieldComparator: fmt::Debug + Send + Sync {
    /// Short name used in logs and comparison-table labels.
    fn kind(&self) -> &'static str;

    fn score(&self, left: &str, right: &str) -> f64;
}

/// 1 when the trimmed values are identical.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ExactMatch;

impl FieldComparator for ExactMatch {
    fn kind(&self) -> &'static str {
        "exact"
    }

    fn score(&self, left: &str, right: &str) -> f64 {
        let (left, right) = (left.trim(), right.trim());
        if left.is_empty() || right.is_empty() {
            return 0.0;
        }
        if left == right { 1.0 } else { 0.0 }
    }
}

/// 1 when the Jaro-Winkler similarity of the normalized values reaches
/// `threshold`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JaroWinkler {
    pub threshold: f64,
}

impl JaroWinkler {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Raw similarity of the normalized values.
    pub fn similarity(left: &str, right: &str) -> f64 {
        let left = normalize_text(left);
        let right = normalize_text(right);
        jaro_winkler::similarity(left.chars(), right.chars())
    }
}

impl Default for JaroWinkler {
    fn default() -> Self {
        Self::new(0.90)
    }
}

impl FieldComparator for JaroWinkler {
    fn kind(&self) -> &'static str {
        "jarowinkler"
    }

    fn score(&self, left: &str, right: &str) -> f64 {
        if left.trim().is_empty() || right.trim().is_empty() {
            return 0.0;
        }
        if Self::similarity(left, right) >= self.threshold {
            1.0
        } else {
            0.0
        }
    }
}

/// 1 when both values parse as numbers within `tolerance` of each other.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericTolerance {
    pub tolerance: f64,
}

impl NumericTolerance {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }
}

impl FieldComparator for NumericTolerance {
    fn kind(&self) -> &'static str {
        "numeric"
    }

    fn score(&self, left: &str, right: &str) -> f64 {
        match (parse_f64(left), parse_f64(right)) {
            (Some(a), Some(b)) if (a - b).abs() <= self.tolerance => 1.0,
            _ => 0.0,
        }
    }
}
