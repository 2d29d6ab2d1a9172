//! One-to-one match selection and the joined output.

use std::collections::{BTreeMap, BTreeSet};

use polars::prelude::{Column, DataFrame, IdxCa, IdxSize, NewChunkedArray};
use tracing::info;

use shiplink_model::UniquenessPolicy;

use crate::engine::MatchResult;
use crate::error::{LinkError, Result};

#[derive(Debug, Clone, Copy, Default)]
pub struct UniqueMatchSelector {
    policy: UniquenessPolicy,
}

impl UniqueMatchSelector {
    pub fn new(policy: UniquenessPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> UniquenessPolicy {
        self.policy
    }

    /// Keep the matches whose right record matched exactly one distinct left
    /// record. Under [`UniquenessPolicy::Symmetric`] the left record must
    /// also have matched exactly one distinct right record.
    ///
    /// Input order is preserved.
    pub fn select(&self, matches: &[MatchResult]) -> Vec<MatchResult> {
        let lefts_per_right = distinct_partners(matches.iter().map(|m| (m.right, m.left)));
        let rights_per_left = distinct_partners(matches.iter().map(|m| (m.left, m.right)));
        matches
            .iter()
            .filter(|m| lefts_per_right[&m.right] == 1)
            .filter(|m| match self.policy {
                UniquenessPolicy::ReferenceSide => true,
                UniquenessPolicy::Symmetric => rights_per_left[&m.left] == 1,
            })
            .copied()
            .collect()
    }

    /// Select unique matches and join the matched rows side by side.
    ///
    /// The output carries every left column followed by every right column.
    /// Column names present on both sides are rejected; rename one side
    /// first, for example with [`suffix_columns`].
    pub fn join(&self, left: &DataFrame, right: &DataFrame, matches: &[MatchResult]) -> Result<DataFrame> {
        let left_names: BTreeSet<&str> = left.get_column_names().iter().map(|n| n.as_str()).collect();
        if let Some(shared) = right
            .get_column_names()
            .iter()
            .find(|name| left_names.contains(name.as_str()))
        {
            return Err(LinkError::ColumnCollision {
                column: shared.to_string(),
            });
        }

        let unique = self.select(matches);
        let left_rows = IdxCa::from_vec(
            "left_row".into(),
            unique.iter().map(|m| m.left as IdxSize).collect(),
        );
        let right_rows = IdxCa::from_vec(
            "right_row".into(),
            unique.iter().map(|m| m.right as IdxSize).collect(),
        );
        let left_part = left.take(&left_rows)?;
        let right_part = right.take(&right_rows)?;
        let joined = left_part.hstack(right_part.get_columns())?;
        info!(
            matches = matches.len(),
            unique = unique.len(),
            policy = ?self.policy,
            "selected unique matches"
        );
        Ok(joined)
    }
}

fn distinct_partners<I>(pairs: I) -> BTreeMap<usize, usize>
where
    I: Iterator<Item = (usize, usize)>,
{
    let mut partners: BTreeMap<usize, BTreeSet<usize>> = BTreeMap::new();
    for (key, partner) in pairs {
        partners.entry(key).or_default().insert(partner);
    }
    partners
        .into_iter()
        .map(|(key, set)| (key, set.len()))
        .collect()
}

/// Append `suffix` to every column name not listed in `keep`.
pub fn suffix_columns(df: &DataFrame, suffix: &str, keep: &[&str]) -> Result<DataFrame> {
    let columns: Vec<Column> = df
        .get_columns()
        .iter()
        .map(|column| {
            let name = column.name().as_str();
            if keep.contains(&name) {
                column.clone()
            } else {
                column.clone().with_name(format!("{name}{suffix}").into())
            }
        })
        .collect();
    Ok(DataFrame::new(columns)?)
}

#[cfg(test)]
mod tests {
    use shiplink_common::{column_strings, string_column};

    use super::*;

    fn pair(left: usize, right: usize) -> MatchResult {
        MatchResult {
            left,
            right,
            score: 2.0,
        }
    }

    #[test]
    fn reference_side_uniqueness() {
        // right 0 has two lefts; right 1 and 2 are unique but share left 1
        let matches = vec![pair(0, 0), pair(1, 0), pair(1, 1), pair(1, 2), pair(2, 3)];
        let selected = UniqueMatchSelector::new(UniquenessPolicy::ReferenceSide).select(&matches);
        assert_eq!(selected, vec![pair(1, 1), pair(1, 2), pair(2, 3)]);
    }

    #[test]
    fn symmetric_uniqueness() {
        let matches = vec![pair(0, 0), pair(1, 0), pair(1, 1), pair(1, 2), pair(2, 3)];
        let selected = UniqueMatchSelector::new(UniquenessPolicy::Symmetric).select(&matches);
        assert_eq!(selected, vec![pair(2, 3)]);
    }

    #[test]
    fn join_rejects_shared_columns() {
        let left = DataFrame::new(vec![string_column("period", vec!["2023-01".into()])]).unwrap();
        let right = left.clone();
        let err = UniqueMatchSelector::default()
            .join(&left, &right, &[pair(0, 0)])
            .unwrap_err();
        assert!(matches!(err, LinkError::ColumnCollision { ref column } if column == "period"));

        let right = suffix_columns(&right, "_bsgi", &[]).unwrap();
        let joined = UniqueMatchSelector::default()
            .join(&left, &right, &[pair(0, 0)])
            .unwrap();
        assert_eq!(column_strings(&joined, "period_bsgi").unwrap(), vec!["2023-01"]);
    }

    #[test]
    fn suffix_keeps_listed_columns() {
        let df = DataFrame::new(vec![
            string_column("period", vec!["2023-01".into()]),
            string_column("weight_ton", vec!["1".into()]),
        ])
        .unwrap();
        let out = suffix_columns(&df, "_ig", &["period"]).unwrap();
        let names: Vec<&str> = out.get_column_names().iter().map(|n| n.as_str()).collect();
        assert_eq!(names, vec!["period", "weight_ton_ig"]);
    }
}
