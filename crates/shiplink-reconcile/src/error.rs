use polars::prelude::PolarsError;
use shiplink_aggregate::AggregateError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("weight {value} cannot be represented as tonnage")]
    InvalidTonnage { value: f64 },

    #[error("tonnage total exceeds the representable range")]
    TonnageOverflow,

    #[error(transparent)]
    Aggregate(#[from] AggregateError),

    #[error(transparent)]
    Polars(#[from] PolarsError),
}

pub type Result<T> = std::result::Result<T, ReconcileError>;
