//! Record linkage between a customs source and a reference source.
//!
//! Neither source carries a shared key. Candidate pairs are generated within
//! blocks of records that agree on cheap keys (the shipment month), scored
//! field by field with pluggable [`FieldComparator`]s, accepted on the total
//! score, and reduced to unique matches before the rows are joined.

pub mod compare;
pub mod engine;
pub mod error;
pub mod spec;
pub mod unique;

pub use compare::{ExactMatch, FieldComparator, JaroWinkler, NumericTolerance};
pub use engine::{BlockedComparator, ComparisonTable, ComparisonVector, MatchResult};
pub use error::{LinkError, Result, Side};
pub use spec::{Comparison, MatchSpec};
pub use unique::{UniqueMatchSelector, suffix_columns};
