use std::path::PathBuf;

use polars::prelude::PolarsError;
use shiplink_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("invalid date '{value}' in column '{column}' (row {row})")]
    InvalidDate {
        column: String,
        row: usize,
        value: String,
    },

    #[error("invalid weight '{value}' in column '{column}' (row {row})")]
    InvalidWeight {
        column: String,
        row: usize,
        value: String,
    },

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Polars(#[from] PolarsError),
}

impl IngestError {
    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
