//! Cleaning stage: typed weights, month periods, canonical countries.
//!
//! Each function takes a frame by reference and returns a new frame; source
//! rows are never modified in place.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use polars::prelude::{DataFrame, IntoColumn, NamedFrom, Series};
use tracing::debug;

use shiplink_common::{column_strings, f64_column, normalize_text, parse_f64, string_column};
use shiplink_model::{ShipmentPeriod, ValueLookup, columns};

use crate::error::{IngestError, Result};

// Two-digit-year formats come first: "%Y" would read "22" as year 22.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%b-%y", "%d-%b-%Y", "%d/%m/%Y", "%d.%m.%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parse a shipment date. `YYYY-MM` values yield a month-only period.
pub fn parse_period(raw: &str) -> Option<ShipmentPeriod> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(ShipmentPeriod::Day(date));
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(value, format) {
            return Some(ShipmentPeriod::Day(datetime.date()));
        }
    }
    let (year, month) = value.split_once('-')?;
    if month.len() != 2 {
        return None;
    }
    let date = NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)?;
    ShipmentPeriod::month(date.year(), date.month()).ok()
}

/// Add `year`, `month` and `period` (`YYYY-MM`) columns derived from a date
/// column. Empty or unparseable dates are an error.
pub fn derive_periods(df: &DataFrame, date_column: &str) -> Result<DataFrame> {
    let raw = column_strings(df, date_column)?;
    let mut years = Vec::with_capacity(raw.len());
    let mut months = Vec::with_capacity(raw.len());
    let mut labels = Vec::with_capacity(raw.len());
    for (row, value) in raw.iter().enumerate() {
        let period = parse_period(value).ok_or_else(|| IngestError::InvalidDate {
            column: date_column.to_string(),
            row,
            value: value.clone(),
        })?;
        years.push(period.year());
        months.push(period.month_number() as i32);
        labels.push(period.label());
    }
    let mut out = df.clone();
    out.with_column(Series::new(columns::YEAR.into(), years).into_column())?;
    out.with_column(Series::new(columns::MONTH.into(), months).into_column())?;
    out.with_column(string_column(columns::PERIOD, labels))?;
    Ok(out)
}

/// Replace a weight column by its `f64` values.
///
/// Missing, unparseable and negative weights are errors.
pub fn coerce_weights(df: &DataFrame, column: &str) -> Result<DataFrame> {
    let weights = parse_weights(df, column)?;
    let mut out = df.clone();
    out.with_column(f64_column(column, weights))?;
    Ok(out)
}

/// Add `ton_column` computed from a kilogram column.
pub fn kilograms_to_tons(df: &DataFrame, kg_column: &str, ton_column: &str) -> Result<DataFrame> {
    let tons = parse_weights(df, kg_column)?
        .into_iter()
        .map(|kg| kg / 1000.0)
        .collect();
    let mut out = df.clone();
    out.with_column(f64_column(ton_column, tons))?;
    Ok(out)
}

/// Replace raw country spellings with their canonical lowercase name.
///
/// Each distinct raw value is resolved once. Unknown spellings are fatal.
pub fn standardize_countries(
    df: &DataFrame,
    column: &str,
    lookup: &ValueLookup,
) -> Result<DataFrame> {
    let raw = column_strings(df, column)?;
    let mut resolved: BTreeMap<&str, String> = BTreeMap::new();
    for value in &raw {
        if !resolved.contains_key(value.as_str()) {
            resolved.insert(value.as_str(), lookup.resolve(value)?);
        }
    }
    debug!(column, distinct = resolved.len(), "standardized countries");
    let values = raw
        .iter()
        .map(|value| resolved[value.as_str()].clone())
        .collect();
    let mut out = df.clone();
    out.with_column(string_column(column, values))?;
    Ok(out)
}

/// Add a lowercased, whitespace-folded copy of the shipper column.
pub fn lowercase_shippers(df: &DataFrame, shipper_column: &str) -> Result<DataFrame> {
    let values = column_strings(df, shipper_column)?
        .iter()
        .map(|value| normalize_text(value))
        .collect();
    let mut out = df.clone();
    out.with_column(string_column(columns::SHIPPER_LOW, values))?;
    Ok(out)
}

fn parse_weights(df: &DataFrame, column: &str) -> Result<Vec<f64>> {
    column_strings(df, column)?
        .into_iter()
        .enumerate()
        .map(|(row, value)| match parse_f64(&value) {
            Some(weight) if weight.is_finite() && weight >= 0.0 => Ok(weight),
            _ => Err(IngestError::InvalidWeight {
                column: column.to_string(),
                row,
                value,
            }),
        })
        .collect()
}
