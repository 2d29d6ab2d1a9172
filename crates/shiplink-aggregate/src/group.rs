//! Group-by with a declarative aggregation spec.
//!
//! A [`GroupSpec`] names the key columns, the aggregate functions applied to
//! each value column, and optional rename and sort steps. Groups keep the
//! order in which their keys first appear in the input until an explicit
//! sort is requested.

use std::fmt;
use std::str::FromStr;

use polars::prelude::*;
use tracing::debug;

use shiplink_common::require_columns;

use crate::error::{AggregateError, Result};

/// Aggregate function applied to one value column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggFn {
    Sum,
    /// Non-null values per group.
    Count,
    Min,
    Max,
    Mean,
    First,
}

impl AggFn {
    pub fn as_str(self) -> &'static str {
        match self {
            AggFn::Sum => "sum",
            AggFn::Count => "count",
            AggFn::Min => "min",
            AggFn::Max => "max",
            AggFn::Mean => "mean",
            AggFn::First => "first",
        }
    }

    fn expr(self, column: &str) -> Expr {
        let base = col(column);
        match self {
            AggFn::Sum => base.sum(),
            AggFn::Count => base.count(),
            AggFn::Min => base.min(),
            AggFn::Max => base.max(),
            AggFn::Mean => base.mean(),
            AggFn::First => base.first(),
        }
    }
}

impl fmt::Display for AggFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AggFn {
    type Err = AggregateError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "sum" => Ok(AggFn::Sum),
            "count" | "size" => Ok(AggFn::Count),
            "min" => Ok(AggFn::Min),
            "max" => Ok(AggFn::Max),
            "mean" | "avg" => Ok(AggFn::Mean),
            "first" => Ok(AggFn::First),
            _ => Err(AggregateError::UnknownFunction(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Aggregation {
    column: String,
    functions: Vec<AggFn>,
}

impl Aggregation {
    /// Output names: the column name for a single function, otherwise
    /// `{column}_{function}` for each function.
    fn output_names(&self) -> Vec<String> {
        if self.functions.len() == 1 {
            return vec![self.column.clone()];
        }
        self.functions
            .iter()
            .map(|function| format!("{}_{}", self.column, function))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
struct SortSpec {
    columns: Vec<String>,
    descending: bool,
}

/// Declarative description of a grouping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupSpec {
    keys: Vec<String>,
    aggregations: Vec<Aggregation>,
    renames: Vec<(String, String)>,
    sort: Option<SortSpec>,
}

impl GroupSpec {
    /// Group by `keys`. An empty key list aggregates the whole frame into a
    /// single row.
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Sum `column` per group, keeping its name.
    #[must_use]
    pub fn sum(self, column: &str) -> Self {
        self.agg(column, [AggFn::Sum])
    }

    /// Apply every function in `functions` to `column`.
    #[must_use]
    pub fn agg<I>(mut self, column: &str, functions: I) -> Self
    where
        I: IntoIterator<Item = AggFn>,
    {
        self.aggregations.push(Aggregation {
            column: column.to_string(),
            functions: functions.into_iter().collect(),
        });
        self
    }

    /// Rename an output column. Renames run before sorting.
    #[must_use]
    pub fn rename(mut self, from: &str, to: &str) -> Self {
        self.renames.push((from.to_string(), to.to_string()));
        self
    }

    /// Sort the result by output columns (after renames). Equal rows keep
    /// their group order.
    #[must_use]
    pub fn sort_by<I, S>(mut self, columns: I, descending: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sort = Some(SortSpec {
            columns: columns.into_iter().map(Into::into).collect(),
            descending,
        });
        self
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Column names of the grouped frame, after renames.
    pub fn output_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.keys.clone();
        for aggregation in &self.aggregations {
            names.extend(aggregation.output_names());
        }
        for (from, to) in &self.renames {
            for name in &mut names {
                if name == from {
                    *name = to.clone();
                }
            }
        }
        names
    }

    fn validate(&self, df: &DataFrame) -> Result<()> {
        if self.aggregations.is_empty() {
            return Err(AggregateError::NoAggregations);
        }
        if let Some(empty) = self.aggregations.iter().find(|a| a.functions.is_empty()) {
            return Err(AggregateError::NoFunctions {
                column: empty.column.clone(),
            });
        }
        require_columns(df, &self.keys)?;
        let value_columns: Vec<&str> = self
            .aggregations
            .iter()
            .map(|a| a.column.as_str())
            .collect();
        require_columns(df, &value_columns)?;

        let mut produced: Vec<String> = self.keys.clone();
        for aggregation in &self.aggregations {
            produced.extend(aggregation.output_names());
        }
        for (from, _) in &self.renames {
            ensure_output(from, &produced)?;
        }
        if let Some(sort) = &self.sort {
            let outputs = self.output_names();
            for column in &sort.columns {
                ensure_output(column, &outputs)?;
            }
        }
        Ok(())
    }
}

fn ensure_output(column: &str, produced: &[String]) -> Result<()> {
    if produced.iter().any(|name| name == column) {
        return Ok(());
    }
    Err(AggregateError::UnknownOutput {
        column: column.to_string(),
        available: produced.join(", "),
    })
}

/// Group `df` according to `spec`. The input frame is not modified.
pub fn group_records(df: &DataFrame, spec: &GroupSpec) -> Result<DataFrame> {
    spec.validate(df)?;

    let exprs: Vec<Expr> = spec
        .aggregations
        .iter()
        .flat_map(|aggregation| {
            aggregation
                .functions
                .iter()
                .zip(aggregation.output_names())
                .map(|(function, name)| function.expr(&aggregation.column).alias(name))
                .collect::<Vec<_>>()
        })
        .collect();

    let frame = df.clone().lazy();
    let grouped = if spec.keys.is_empty() {
        frame.select(exprs)
    } else {
        let keys: Vec<Expr> = spec.keys.iter().map(|key| col(key.as_str())).collect();
        frame.group_by_stable(keys).agg(exprs)
    };
    let mut out = grouped.collect()?;

    for (from, to) in &spec.renames {
        out.rename(from, to.as_str().into())?;
    }
    if let Some(sort) = &spec.sort {
        out = out.sort(
            sort.columns.clone(),
            SortMultipleOptions::default()
                .with_order_descending(sort.descending)
                .with_maintain_order(true),
        )?;
    }

    debug!(
        keys = ?spec.keys,
        input_rows = df.height(),
        groups = out.height(),
        "grouped records"
    );
    Ok(out)
}
