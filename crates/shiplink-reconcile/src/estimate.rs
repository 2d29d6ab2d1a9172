//! Residual ("Other") tonnage between a company-level source and the
//! reference source.

use std::collections::BTreeMap;

use polars::prelude::DataFrame;
use serde::Serialize;
use tracing::{info, warn};

use shiplink_aggregate::filter_crop;
use shiplink_common::{column_f64, column_strings, f64_column, string_column};
use shiplink_model::OTHER_COMPANY;

use crate::error::Result;
use crate::tonnage::Tonnage;

/// Result of one reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    pub reference: Tonnage,
    pub entity: Tonnage,
    /// `reference - entity`. Negative when the entity reports more than the
    /// reference source.
    pub other: Tonnage,
}

/// Computes `other = reference_total - entity_total`.
///
/// Stateless; a negative residual is returned unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightReconciliationEstimator;

impl WeightReconciliationEstimator {
    pub fn new() -> Self {
        Self
    }

    pub fn estimate(
        &self,
        entity_total: Tonnage,
        reference_total: Tonnage,
    ) -> Result<Reconciliation> {
        Ok(Reconciliation {
            reference: reference_total,
            entity: entity_total,
            other: reference_total.checked_sub(entity_total)?,
        })
    }
}

/// Restricts an estimate to one crop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CropScope {
    /// Canonical crop name.
    pub crop: String,
    /// Crop column, present in both frames.
    pub crop_column: String,
    /// Row label for the company side.
    pub entity_label: String,
}

/// Company totals plus the reference residual as an `"Other"` row.
///
/// Without a crop scope the company frame is summed per `company_column`,
/// every company becomes a row and the residual is appended; rows are
/// sorted by weight, largest first. With a scope both frames are filtered to the
/// crop and the result has exactly two rows: the entity label and
/// `"Other"`.
///
/// Output columns are `company_column` and `weight_column`.
pub fn estimate_weights(
    company: &DataFrame,
    company_column: &str,
    weight_column: &str,
    reference: &DataFrame,
    reference_weight_column: &str,
    scope: Option<&CropScope>,
) -> Result<DataFrame> {
    let estimator = WeightReconciliationEstimator::new();
    let (labels, weights): (Vec<String>, Vec<Tonnage>) = match scope {
        None => {
            let totals = company_totals(company, company_column, weight_column)?;
            let entity_total = Tonnage::total(totals.values().copied())?;
            let reference_total = Tonnage::total(tonnages(reference, reference_weight_column)?)?;
            let result = estimator.estimate(entity_total, reference_total)?;
            log_reconciliation(&result, None);
            totals
                .into_iter()
                .chain(std::iter::once((OTHER_COMPANY.to_string(), result.other)))
                .unzip()
        }
        Some(scope) => {
            let company = filter_crop(company, &scope.crop, &scope.crop_column)?;
            let reference = filter_crop(reference, &scope.crop, &scope.crop_column)?;
            let entity_total = Tonnage::total(tonnages(&company, weight_column)?)?;
            let reference_total = Tonnage::total(tonnages(&reference, reference_weight_column)?)?;
            let result = estimator.estimate(entity_total, reference_total)?;
            log_reconciliation(&result, Some(scope.crop.as_str()));
            (
                vec![scope.entity_label.clone(), OTHER_COMPANY.to_string()],
                vec![result.entity, result.other],
            )
        }
    };

    let mut rows: Vec<(String, Tonnage)> = labels.into_iter().zip(weights).collect();
    if scope.is_none() {
        rows.sort_by(|a, b| b.1.cmp(&a.1));
    }
    let (labels, weights): (Vec<String>, Vec<f64>) = rows
        .into_iter()
        .map(|(label, weight)| (label, weight.as_tons()))
        .unzip();
    Ok(DataFrame::new(vec![
        string_column(company_column, labels),
        f64_column(weight_column, weights),
    ])?)
}

/// Add a `share_pct` column: each weight as a percentage of the column
/// total, rounded to two decimals. A zero total gives 0 everywhere.
pub fn with_shares(df: &DataFrame, weight_column: &str) -> Result<DataFrame> {
    let weights: Vec<f64> = column_f64(df, weight_column)?
        .into_iter()
        .map(|value| value.unwrap_or(0.0))
        .collect();
    let total: f64 = weights.iter().sum();
    let shares = weights
        .iter()
        .map(|weight| {
            if total == 0.0 {
                0.0
            } else {
                (weight / total * 100.0 * 100.0).round() / 100.0
            }
        })
        .collect();
    let mut out = df.clone();
    out.with_column(f64_column("share_pct", shares))?;
    Ok(out)
}

/// Per-company sums in grams, keyed by company name.
fn company_totals(
    df: &DataFrame,
    company_column: &str,
    weight_column: &str,
) -> Result<BTreeMap<String, Tonnage>> {
    let mut totals: BTreeMap<String, Tonnage> = BTreeMap::new();
    for (company, weight) in column_strings(df, company_column)?
        .into_iter()
        .zip(tonnages(df, weight_column)?)
    {
        let total = totals.entry(company).or_default();
        *total = total.checked_add(weight)?;
    }
    Ok(totals)
}

fn tonnages(df: &DataFrame, column: &str) -> Result<Vec<Tonnage>> {
    column_f64(df, column)?
        .into_iter()
        .map(|value| Tonnage::from_tons(value.unwrap_or(0.0)))
        .collect()
}

fn log_reconciliation(result: &Reconciliation, crop: Option<&str>) {
    if result.other.is_negative() {
        warn!(
            crop,
            reference_tons = result.reference.as_tons(),
            entity_tons = result.entity.as_tons(),
            other_tons = result.other.as_tons(),
            "company total exceeds reference total"
        );
    }
    info!(
        crop,
        reference_tons = result.reference.as_tons(),
        entity_tons = result.entity.as_tons(),
        other_tons = result.other.as_tons(),
        "reconciled weights"
    );
}
