//! Canonical crop categories and the raw-commodity lookup.
//!
//! Both sources describe commodities in free text (English product names in
//! the corridor data, customs descriptions in the bill-of-lading data). Every
//! raw label is mapped onto exactly one [`CropCategory`]; a label without an
//! entry is an error rather than a silent drop.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Closed set of crop categories used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CropCategory {
    #[serde(rename = "corn")]
    Corn,
    #[serde(rename = "soya")]
    Soya,
    #[serde(rename = "sunflower")]
    Sunflower,
    #[serde(rename = "wheat")]
    Wheat,
    #[serde(rename = "barley")]
    Barley,
    #[serde(rename = "peas")]
    Peas,
    #[serde(rename = "rapeseed")]
    Rapeseed,
    #[serde(rename = "vegetable oil")]
    VegetableOil,
    #[serde(rename = "sugar beet")]
    SugarBeet,
    #[serde(rename = "mixed")]
    Mixed,
    #[serde(rename = "canola")]
    Canola,
}

impl CropCategory {
    pub const ALL: [CropCategory; 11] = [
        CropCategory::Corn,
        CropCategory::Soya,
        CropCategory::Sunflower,
        CropCategory::Wheat,
        CropCategory::Barley,
        CropCategory::Peas,
        CropCategory::Rapeseed,
        CropCategory::VegetableOil,
        CropCategory::SugarBeet,
        CropCategory::Mixed,
        CropCategory::Canola,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CropCategory::Corn => "corn",
            CropCategory::Soya => "soya",
            CropCategory::Sunflower => "sunflower",
            CropCategory::Wheat => "wheat",
            CropCategory::Barley => "barley",
            CropCategory::Peas => "peas",
            CropCategory::Rapeseed => "rapeseed",
            CropCategory::VegetableOil => "vegetable oil",
            CropCategory::SugarBeet => "sugar beet",
            CropCategory::Mixed => "mixed",
            CropCategory::Canola => "canola",
        }
    }

    /// Comma-separated list of canonical names, used in error messages.
    pub fn valid_names() -> String {
        Self::ALL
            .iter()
            .map(|crop| crop.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for CropCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CropCategory {
    type Err = ModelError;

    /// Accepts canonical names only (case-insensitive). Raw commodity labels
    /// go through [`CropLookup`] instead.
    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|crop| crop.as_str() == key)
            .ok_or_else(|| ModelError::UnknownCrop {
                value: s.to_string(),
                valid: Self::valid_names(),
            })
    }
}

const DEFAULT_LABELS: &[(&str, CropCategory)] = &[
    ("maize", CropCategory::Corn),
    ("soya beans", CropCategory::Soya),
    ("soybeans", CropCategory::Soya),
    ("soya oil", CropCategory::Soya),
    ("soya bean meal", CropCategory::Soya),
    ("soybean meal", CropCategory::Soya),
    ("sunflower oil", CropCategory::Sunflower),
    ("sunflower meal", CropCategory::Sunflower),
    ("sunflower seed", CropCategory::Sunflower),
    ("sunflower pellets", CropCategory::Sunflower),
    ("sunflower cake", CropCategory::Sunflower),
    ("wheat bran", CropCategory::Wheat),
    ("pea", CropCategory::Peas),
    ("rapeseed meal", CropCategory::Rapeseed),
    ("rapeseed oil", CropCategory::Rapeseed),
    ("sugar beet pulp", CropCategory::SugarBeet),
];

/// Raw commodity label → canonical crop.
///
/// Keys are compared trimmed and lowercased. Canonical names always resolve
/// to themselves.
#[derive(Debug, Clone)]
pub struct CropLookup {
    labels: BTreeMap<String, CropCategory>,
}

impl CropLookup {
    /// Lookup containing only the canonical names.
    pub fn empty() -> Self {
        let labels = CropCategory::ALL
            .iter()
            .map(|crop| (crop.as_str().to_string(), *crop))
            .collect();
        Self { labels }
    }

    /// Lookup covering the corridor commodity vocabulary.
    pub fn with_defaults() -> Self {
        let mut lookup = Self::empty();
        for (label, crop) in DEFAULT_LABELS {
            lookup.insert(label, *crop);
        }
        lookup
    }

    /// Add or replace a label.
    pub fn insert(&mut self, label: &str, crop: CropCategory) {
        self.labels.insert(normalize_key(label), crop);
    }

    /// Add every entry of `labels`, replacing existing keys.
    pub fn extend<'a, I>(&mut self, labels: I)
    where
        I: IntoIterator<Item = (&'a String, &'a CropCategory)>,
    {
        for (label, crop) in labels {
            self.insert(label, *crop);
        }
    }

    /// Classify a raw commodity label; unknown labels are an error.
    pub fn classify(&self, raw: &str) -> Result<CropCategory> {
        self.labels
            .get(&normalize_key(raw))
            .copied()
            .ok_or_else(|| ModelError::UnknownValue {
                table: "crop".to_string(),
                value: raw.to_string(),
            })
    }

    /// Every label with its crop, in label order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, CropCategory)> {
        self.labels.iter().map(|(label, crop)| (label.as_str(), *crop))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl Default for CropLookup {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn normalize_key(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
