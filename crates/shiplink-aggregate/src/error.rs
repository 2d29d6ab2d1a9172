use polars::prelude::PolarsError;
use shiplink_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("group spec has no aggregations")]
    NoAggregations,

    #[error("no aggregate functions given for column '{column}'")]
    NoFunctions { column: String },

    #[error("unknown aggregate function '{0}' (expected sum, count, min, max, mean or first)")]
    UnknownFunction(String),

    #[error("column '{column}' is not produced by the grouping (available: {available})")]
    UnknownOutput { column: String, available: String },

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Polars(#[from] PolarsError),
}

pub type Result<T> = std::result::Result<T, AggregateError>;
