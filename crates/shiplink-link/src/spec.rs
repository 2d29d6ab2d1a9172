use std::sync::Arc;

use shiplink_model::MatchOptions;

use crate::compare::{ExactMatch, FieldComparator, JaroWinkler, NumericTolerance};

/// One scored field: a comparator applied to a left and a right column.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub label: String,
    pub left: String,
    pub right: String,
    pub comparator: Arc<dyn FieldComparator>,
}

/// Which pairs to generate and how to score them.
///
/// A pair is generated only when both records agree exactly on every
/// blocking field. Its total score is the sum of the per-comparison
/// scores, and it is accepted when that total is strictly greater than the
/// acceptance threshold. With the default threshold of 1.0 at least two
/// fields have to agree; the value is a tuning heuristic, not a derived
/// statistic.
#[derive(Debug, Clone)]
pub struct MatchSpec {
    block_on: Vec<String>,
    comparisons: Vec<Comparison>,
    acceptance_threshold: f64,
}

impl Default for MatchSpec {
    fn default() -> Self {
        Self {
            block_on: Vec::new(),
            comparisons: Vec::new(),
            acceptance_threshold: 1.0,
        }
    }
}

impl MatchSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact fields, fuzzy fields and blocking fields from configuration.
    pub fn from_options(options: &MatchOptions) -> Self {
        let mut spec = Self::new().with_acceptance_threshold(options.acceptance_threshold);
        for field in &options.block_fields {
            spec = spec.block(field);
        }
        for field in &options.exact_fields {
            spec = spec.exact(field);
        }
        for field in &options.fuzzy_fields {
            spec = spec.fuzzy(field, options.fuzzy_threshold);
        }
        spec
    }

    #[must_use]
    pub fn block(mut self, field: &str) -> Self {
        self.block_on.push(field.to_string());
        self
    }

    #[must_use]
    pub fn exact(self, field: &str) -> Self {
        self.compare(field, field, field, ExactMatch)
    }

    #[must_use]
    pub fn fuzzy(self, field: &str, threshold: f64) -> Self {
        self.compare(field, field, field, JaroWinkler::new(threshold))
    }

    #[must_use]
    pub fn numeric(self, field: &str, tolerance: f64) -> Self {
        self.compare(field, field, field, NumericTolerance::new(tolerance))
    }

    /// Score `left` against `right` with any comparator.
    #[must_use]
    pub fn compare<C>(mut self, label: &str, left: &str, right: &str, comparator: C) -> Self
    where
        C: FieldComparator + 'static,
    {
        self.comparisons.push(Comparison {
            label: label.to_string(),
            left: left.to_string(),
            right: right.to_string(),
            comparator: Arc::new(comparator),
        });
        self
    }

    #[must_use]
    pub fn with_acceptance_threshold(mut self, threshold: f64) -> Self {
        self.acceptance_threshold = threshold;
        self
    }

    pub fn block_fields(&self) -> &[String] {
        &self.block_on
    }

    pub fn comparisons(&self) -> &[Comparison] {
        &self.comparisons
    }

    pub fn acceptance_threshold(&self) -> f64 {
        self.acceptance_threshold
    }

    /// Whether a total score is accepted as a match.
    pub fn accepts(&self, total: f64) -> bool {
        total > self.acceptance_threshold
    }
}
