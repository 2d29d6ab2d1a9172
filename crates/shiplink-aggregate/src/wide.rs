//! Long → wide reshaping used by the share tables.

use std::collections::{BTreeSet, HashMap};

use polars::prelude::{Column, DataFrame};

use shiplink_common::{column_f64, column_strings, f64_column, string_column};

use crate::error::Result;

/// Pivot `values` into one row per `index` value and one column per
/// `columns` value, summing duplicates.
///
/// Rows keep the order in which index values first appear; category columns
/// are sorted by name. Missing cells are 0.
pub fn wide_table(df: &DataFrame, index: &str, columns: &str, values: &str) -> Result<DataFrame> {
    let index_values = column_strings(df, index)?;
    let categories = column_strings(df, columns)?;
    let amounts = column_f64(df, values)?;

    let names: BTreeSet<&str> = categories.iter().map(String::as_str).collect();
    let slots: HashMap<&str, usize> = names
        .iter()
        .enumerate()
        .map(|(slot, name)| (*name, slot))
        .collect();

    let mut rows: Vec<String> = Vec::new();
    let mut row_of: HashMap<&str, usize> = HashMap::new();
    let mut cells: Vec<Vec<f64>> = Vec::new();
    for ((key, category), amount) in index_values.iter().zip(&categories).zip(&amounts) {
        let row = *row_of.entry(key.as_str()).or_insert_with(|| {
            rows.push(key.clone());
            cells.push(vec![0.0; names.len()]);
            rows.len() - 1
        });
        cells[row][slots[category.as_str()]] += amount.unwrap_or(0.0);
    }

    let mut out: Vec<Column> = Vec::with_capacity(names.len() + 1);
    out.push(string_column(index, rows));
    for (slot, name) in names.iter().enumerate() {
        out.push(f64_column(name, cells.iter().map(|row| row[slot]).collect()));
    }
    Ok(DataFrame::new(out)?)
}

/// Replace every non-index column by its share of the row total, in percent
/// rounded to two decimals. Rows with a zero total are all 0.
pub fn row_percentages(df: &DataFrame, index: &str) -> Result<DataFrame> {
    let value_names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .filter(|name| name != index)
        .collect();
    let values = value_names
        .iter()
        .map(|name| column_f64(df, name))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let totals: Vec<f64> = (0..df.height())
        .map(|row| values.iter().map(|column| column[row].unwrap_or(0.0)).sum())
        .collect();

    let mut out: Vec<Column> = vec![df.column(index)?.clone()];
    for (name, column) in value_names.iter().zip(&values) {
        let shares = column
            .iter()
            .zip(&totals)
            .map(|(value, total)| percent(value.unwrap_or(0.0), *total))
            .collect();
        out.push(f64_column(name, shares));
    }
    Ok(DataFrame::new(out)?)
}

fn percent(value: f64, total: f64) -> f64 {
    if total == 0.0 {
        return 0.0;
    }
    (value / total * 100.0 * 100.0).round() / 100.0
}
