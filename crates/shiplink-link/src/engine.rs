//! Candidate generation and scoring.

use std::collections::HashMap;
use std::time::Instant;

use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};
use serde::Serialize;
use tracing::{debug, info, info_span};

use shiplink_common::{column_strings, f64_column};

use crate::error::{LinkError, Result, Side};
use crate::spec::MatchSpec;

/// Per-comparison scores of one candidate pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonVector {
    pub left: usize,
    pub right: usize,
    pub scores: Vec<f64>,
}

impl ComparisonVector {
    pub fn total(&self) -> f64 {
        self.scores.iter().sum()
    }
}

/// A candidate pair whose total score passed the acceptance threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatchResult {
    pub left: usize,
    pub right: usize,
    pub score: f64,
}

/// All scored candidate pairs, ordered by left row then right row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComparisonTable {
    labels: Vec<String>,
    vectors: Vec<ComparisonVector>,
}

impl ComparisonTable {
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn vectors(&self) -> &[ComparisonVector] {
        &self.vectors
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Pairs whose total score is strictly greater than `threshold`.
    pub fn classify(&self, threshold: f64) -> Vec<MatchResult> {
        self.vectors
            .iter()
            .filter_map(|vector| {
                let score = vector.total();
                (score > threshold).then_some(MatchResult {
                    left: vector.left,
                    right: vector.right,
                    score,
                })
            })
            .collect()
    }

    /// `index_a`, `index_b` and one score column per comparison label.
    pub fn to_frame(&self) -> Result<DataFrame> {
        let mut columns: Vec<Column> = Vec::with_capacity(self.labels.len() + 2);
        let lefts: Vec<u64> = self.vectors.iter().map(|v| v.left as u64).collect();
        let rights: Vec<u64> = self.vectors.iter().map(|v| v.right as u64).collect();
        columns.push(Series::new("index_a".into(), lefts).into_column());
        columns.push(Series::new("index_b".into(), rights).into_column());
        for (slot, label) in self.labels.iter().enumerate() {
            let scores = self.vectors.iter().map(|v| v.scores[slot]).collect();
            columns.push(f64_column(label, scores));
        }
        Ok(DataFrame::new(columns)?)
    }
}

/// Generates blocked candidate pairs between two frames and scores them.
#[derive(Debug, Clone)]
pub struct BlockedComparator {
    spec: MatchSpec,
}

impl BlockedComparator {
    pub fn new(spec: MatchSpec) -> Self {
        Self { spec }
    }

    pub fn spec(&self) -> &MatchSpec {
        &self.spec
    }

    /// Row pairs agreeing on every blocking field.
    ///
    /// Rows with an empty blocking value never pair. Without blocking fields
    /// every left row pairs with every right row.
    pub fn candidate_pairs(&self, left: &DataFrame, right: &DataFrame) -> Result<Vec<(usize, usize)>> {
        let block = self.spec.block_fields();
        if block.is_empty() {
            return Ok((0..left.height())
                .flat_map(|a| (0..right.height()).map(move |b| (a, b)))
                .collect());
        }
        let left_keys = block_keys(left, block, Side::Left)?;
        let right_keys = block_keys(right, block, Side::Right)?;

        let mut index: HashMap<&[String], Vec<usize>> = HashMap::new();
        for (row, key) in right_keys.iter().enumerate() {
            if let Some(key) = key {
                index.entry(key.as_slice()).or_default().push(row);
            }
        }
        let mut pairs = Vec::new();
        for (a, key) in left_keys.iter().enumerate() {
            let Some(key) = key else { continue };
            if let Some(rows) = index.get(key.as_slice()) {
                pairs.extend(rows.iter().map(|&b| (a, b)));
            }
        }
        Ok(pairs)
    }

    /// Score every candidate pair.
    pub fn compare(&self, left: &DataFrame, right: &DataFrame) -> Result<ComparisonTable> {
        let comparisons = self.spec.comparisons();
        if comparisons.is_empty() {
            return Err(LinkError::NoComparisons);
        }
        let span = info_span!(
            "compare",
            left_rows = left.height(),
            right_rows = right.height()
        );
        let _guard = span.enter();
        let start = Instant::now();

        let left_values = comparisons
            .iter()
            .map(|c| side_column(left, &c.left, Side::Left))
            .collect::<Result<Vec<_>>>()?;
        let right_values = comparisons
            .iter()
            .map(|c| side_column(right, &c.right, Side::Right))
            .collect::<Result<Vec<_>>>()?;

        let pairs = self.candidate_pairs(left, right)?;
        let vectors: Vec<ComparisonVector> = pairs
            .into_iter()
            .map(|(a, b)| ComparisonVector {
                left: a,
                right: b,
                scores: comparisons
                    .iter()
                    .enumerate()
                    .map(|(slot, c)| c.comparator.score(&left_values[slot][a], &right_values[slot][b]))
                    .collect(),
            })
            .collect();

        info!(
            candidate_pairs = vectors.len(),
            duration_ms = start.elapsed().as_millis(),
            "scored candidate pairs"
        );
        Ok(ComparisonTable {
            labels: comparisons.iter().map(|c| c.label.clone()).collect(),
            vectors,
        })
    }

    /// Scored pairs accepted by the acceptance threshold.
    pub fn find_matches(&self, left: &DataFrame, right: &DataFrame) -> Result<Vec<MatchResult>> {
        let table = self.compare(left, right)?;
        let matches = table.classify(self.spec.acceptance_threshold());
        debug!(
            candidate_pairs = table.len(),
            matches = matches.len(),
            "classified candidate pairs"
        );
        Ok(matches)
    }
}

fn side_column(df: &DataFrame, name: &str, side: Side) -> Result<Vec<String>> {
    if df.column(name).is_err() {
        return Err(LinkError::MissingColumn {
            side,
            column: name.to_string(),
        });
    }
    Ok(column_strings(df, name)?)
}

/// Blocking key per row; `None` when any component is empty.
fn block_keys(df: &DataFrame, fields: &[String], side: Side) -> Result<Vec<Option<Vec<String>>>> {
    let columns = fields
        .iter()
        .map(|field| side_column(df, field, side))
        .collect::<Result<Vec<_>>>()?;
    Ok((0..df.height())
        .map(|row| {
            let key: Vec<String> = columns.iter().map(|values| values[row].clone()).collect();
            (!key.iter().any(String::is_empty)).then_some(key)
        })
        .collect())
}
