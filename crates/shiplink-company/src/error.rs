use polars::prelude::PolarsError;
use thiserror::Error;

/// Failure reported by a translation collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslationError {
    #[error("no translation for '{text}' ({source_lang} -> {target_lang})")]
    Missing {
        text: String,
        source_lang: String,
        target_lang: String,
    },

    #[error("translation service failed: {0}")]
    Service(String),
}

#[derive(Debug, Error)]
pub enum CompanyError {
    #[error("failed to translate '{text}': {source}")]
    Translation {
        text: String,
        #[source]
        source: TranslationError,
    },

    #[error("alias '{alias}' is claimed by both '{first}' and '{second}'")]
    AliasConflict {
        alias: String,
        first: String,
        second: String,
    },

    #[error("invalid deal-id pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("land-deal table is missing column '{0}'")]
    MissingColumn(String),

    #[error(transparent)]
    Polars(#[from] PolarsError),
}

pub type Result<T> = std::result::Result<T, CompanyError>;
