//! Shared data model for the shipment reconciliation pipeline.
//!
//! - **record**: shipment rows, sources and periods
//! - **crop**: canonical crop categories and the commodity lookup
//! - **lookup**: raw → canonical value tables (countries)
//! - **options**: pipeline configuration loaded from TOML

pub mod crop;
pub mod error;
pub mod lookup;
pub mod options;
pub mod record;

pub use crop::{CropCategory, CropLookup};
pub use error::{ModelError, Result};
pub use lookup::ValueLookup;
pub use options::{
    DirectoryOptions, MatchOptions, OverlapPolicy, PipelineConfig, ResolutionPolicy,
    UniquenessPolicy,
};
pub use record::{ShipmentPeriod, ShipmentRecord, Source};

/// Company assigned to shipper strings that match no known alias.
pub const OTHER_COMPANY: &str = "Other";

/// Standard column names produced by the cleaning stage.
pub mod columns {
    pub const PERIOD: &str = "period";
    pub const YEAR: &str = "year";
    pub const MONTH: &str = "month";
    pub const COUNTRY: &str = "country";
    pub const CROP: &str = "crop";
    pub const WEIGHT_TON: &str = "weight_ton";
    pub const SHIPPER: &str = "shipper";
    pub const SHIPPER_LOW: &str = "shipper_low";
    pub const COMPANY_STD: &str = "company_std";
    pub const SOURCE: &str = "source";
}
