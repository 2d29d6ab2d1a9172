use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown crop '{value}'; valid crops are: {valid}")]
    UnknownCrop { value: String, valid: String },

    #[error("no entry for '{value}' in the {table} lookup")]
    UnknownValue { table: String, value: String },

    #[error("unknown source '{0}'; expected one of: ig, bsgi, third_party")]
    UnknownSource(String),

    #[error("invalid weight {value}: must be a finite, non-negative number of tons")]
    InvalidWeight { value: f64 },

    #[error("invalid period {year}-{month:02}")]
    InvalidPeriod { year: i32, month: u32 },

    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ModelError>;
