//! Shipment records shared by every source.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::crop::CropCategory;
use crate::error::{ModelError, Result};

/// Dataset a record was collected from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// Bill-of-lading customs records.
    Ig,
    /// Grain-corridor outbound shipments (reference source).
    Bsgi,
    ThirdParty,
}

impl Source {
    pub fn as_str(self) -> &'static str {
        match self {
            Source::Ig => "ig",
            Source::Bsgi => "bsgi",
            Source::ThirdParty => "third_party",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "ig" => Ok(Source::Ig),
            "bsgi" => Ok(Source::Bsgi),
            "third_party" | "third-party" | "panjiva" => Ok(Source::ThirdParty),
            _ => Err(ModelError::UnknownSource(s.to_string())),
        }
    }
}

/// When a shipment left.
///
/// Customs records only carry the month; corridor records carry the exact
/// departure day. Matching always happens at month granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ShipmentPeriod {
    Month { year: i32, month: u32 },
    Day(NaiveDate),
}

impl ShipmentPeriod {
    pub fn month(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(ModelError::InvalidPeriod { year, month });
        }
        Ok(ShipmentPeriod::Month { year, month })
    }

    pub fn year(&self) -> i32 {
        match self {
            ShipmentPeriod::Month { year, .. } => *year,
            ShipmentPeriod::Day(date) => date.year(),
        }
    }

    pub fn month_number(&self) -> u32 {
        match self {
            ShipmentPeriod::Month { month, .. } => *month,
            ShipmentPeriod::Day(date) => date.month(),
        }
    }

    /// Month label (`YYYY-MM`) used as the blocking key.
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year(), self.month_number())
    }
}

/// One row from any source. Immutable after ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentRecord {
    pub period: ShipmentPeriod,
    /// Destination country, lowercase canonical form.
    pub country: String,
    pub crop: CropCategory,
    pub weight_tons: f64,
    /// Free-text shipper, only present in customs records.
    pub shipper_raw: Option<String>,
    pub source: Source,
}

impl ShipmentRecord {
    pub fn new(
        source: Source,
        period: ShipmentPeriod,
        country: &str,
        crop: CropCategory,
        weight_tons: f64,
    ) -> Result<Self> {
        if !weight_tons.is_finite() || weight_tons < 0.0 {
            return Err(ModelError::InvalidWeight { value: weight_tons });
        }
        Ok(Self {
            period,
            country: country.trim().to_lowercase(),
            crop,
            weight_tons,
            shipper_raw: None,
            source,
        })
    }

    #[must_use]
    pub fn with_shipper(mut self, shipper: impl Into<String>) -> Self {
        self.shipper_raw = Some(shipper.into());
        self
    }
}
