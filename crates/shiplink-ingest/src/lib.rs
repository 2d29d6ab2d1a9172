//! Flat-file adapters and the cleaning stage.
//!
//! Sources arrive as CSV exports; this crate turns them into frames with the
//! standard column set (see [`shiplink_model::columns`]) and writes derived
//! tables back out.

pub mod clean;
pub mod csv_table;
pub mod error;
pub mod records;

pub use clean::{
    coerce_weights, derive_periods, kilograms_to_tons, lowercase_shippers, parse_period,
    standardize_countries,
};
pub use csv_table::{read_csv_frame, read_csv_frame_from, write_csv_frame, write_csv_to};
pub use error::{IngestError, Result};
pub use records::records_frame;
