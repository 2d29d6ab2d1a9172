//! Grouping and reshaping of shipment frames.
//!
//! Both sources pass through here before matching: rows are classified into
//! canonical crops, filtered to one crop and summed by period and country.

pub mod crop;
pub mod error;
pub mod group;
pub mod wide;

pub use crop::{classify_crops, filter_crop};
pub use error::{AggregateError, Result};
pub use group::{AggFn, GroupSpec, group_records};
pub use wide::{row_percentages, wide_table};
