//! Shared utilities for shiplink crates.
//!
//! This crate provides the DataFrame column helpers, text normalization and
//! the row-level log redaction switch used across the workspace.

pub mod frame;
pub mod redact;
pub mod text;

pub use frame::{
    column_f64, column_strings, f64_column, format_numeric, parse_f64, require_columns,
    string_column,
};
pub use redact::{REDACTED_VALUE, log_data_enabled, redact_value, set_log_data};
pub use text::{normalize_header, normalize_text};
