//! DataFrame column helpers.
//!
//! Matching and grouping code works on plain Rust vectors pulled out of
//! frames; these helpers do the extraction and the reverse construction.

use polars::prelude::{
    Column, DataFrame, DataType, IntoColumn, NamedFrom, PolarsError, PolarsResult, Series,
};

/// Fails with `ColumnNotFound` naming the first absent column.
pub fn require_columns<S: AsRef<str>>(df: &DataFrame, names: &[S]) -> PolarsResult<()> {
    for name in names {
        let name = name.as_ref();
        if df.column(name).is_err() {
            return Err(PolarsError::ColumnNotFound(
                format!("column '{name}' not found").into(),
            ));
        }
    }
    Ok(())
}

/// All values of a column as trimmed strings. Nulls become empty strings.
pub fn column_strings(df: &DataFrame, name: &str) -> PolarsResult<Vec<String>> {
    let column = df.column(name)?;
    let cast = column.cast(&DataType::String)?;
    let values = cast
        .str()?
        .into_iter()
        .map(|value| value.map(str::trim).unwrap_or("").to_string())
        .collect();
    Ok(values)
}

/// All values of a column as `f64`.
///
/// String columns are parsed with [`parse_f64`] (so `"1,250.5"` is read as
/// 1250.5); other types are cast. Unparseable values and nulls are `None`.
pub fn column_f64(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<f64>>> {
    let column = df.column(name)?;
    if column.dtype() == &DataType::String {
        let values = column
            .str()?
            .into_iter()
            .map(|value| value.and_then(parse_f64))
            .collect();
        return Ok(values);
    }
    let cast = column.cast(&DataType::Float64)?;
    Ok(cast.f64()?.into_iter().collect())
}

pub fn string_column(name: &str, values: Vec<String>) -> Column {
    Series::new(name.into(), values).into_column()
}

pub fn f64_column(name: &str, values: Vec<f64>) -> Column {
    Series::new(name.into(), values).into_column()
}

/// Parses a number, accepting thousands separators. Empty input is `None`.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.contains(',') {
        return trimmed.replace(',', "").parse::<f64>().ok();
    }
    trimmed.parse::<f64>().ok()
}

/// Formats a number without trailing zeros.
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if !s.contains('.') {
        return s;
    }
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}
