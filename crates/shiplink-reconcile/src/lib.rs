//! Reconciliation of company-level tonnage against the reference source.
//!
//! The reference source is treated as ground truth for the total shipped
//! per crop. Whatever the company-level records do not account for is
//! reported as `"Other"`, including negative residuals.

pub mod error;
pub mod estimate;
pub mod tonnage;

pub use error::{ReconcileError, Result};
pub use estimate::{
    CropScope, Reconciliation, WeightReconciliationEstimator, estimate_weights, with_shares,
};
pub use tonnage::Tonnage;
