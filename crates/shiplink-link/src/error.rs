use polars::prelude::PolarsError;
use thiserror::Error;

/// Which input of a comparison a column belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

#[derive(Debug, Error)]
pub enum LinkError {
    #[error("match spec has no field comparisons")]
    NoComparisons,

    #[error("{side} table is missing column '{column}'")]
    MissingColumn { side: Side, column: String },

    #[error("column '{column}' exists in both tables; rename one side before joining")]
    ColumnCollision { column: String },

    #[error(transparent)]
    Polars(#[from] PolarsError),
}

pub type Result<T> = std::result::Result<T, LinkError>;
