//! Pipeline configuration.
//!
//! Everything here is plain data injected into the matching and resolution
//! components at construction time. A config file only needs the sections it
//! changes; every field has a default.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::crop::{CropCategory, CropLookup};
use crate::error::{ModelError, Result};
use crate::lookup::ValueLookup;

/// Which side of a match set must be unique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UniquenessPolicy {
    /// Each reference (B-side) record links to exactly one A-side record.
    /// An A-side record may still appear in several pairs.
    #[default]
    ReferenceSide,
    /// Both sides must be unique.
    Symmetric,
}

/// What to do when two parents claim the same alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Fail directory construction.
    #[default]
    Reject,
    /// Keep the alias on the first parent (ascending name order) and drop it
    /// from later ones.
    KeepFirst,
}

/// How a shipper string containing aliases of several parents is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionPolicy {
    /// Scan every alias in directory order; the last hit wins.
    LastMatch,
    /// The longest matching alias wins; ties go to the earlier parent.
    #[default]
    LongestAlias,
}

/// Record-linkage settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchOptions {
    /// Fields scored 1 when equal.
    pub exact_fields: Vec<String>,
    /// Fields scored 1 when Jaro-Winkler similarity reaches `fuzzy_threshold`.
    pub fuzzy_fields: Vec<String>,
    /// Fields every candidate pair must agree on.
    pub block_fields: Vec<String>,
    pub fuzzy_threshold: f64,
    /// A pair is a match when its total score is strictly greater than this.
    pub acceptance_threshold: f64,
    pub uniqueness: UniquenessPolicy,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            exact_fields: vec!["period".to_string()],
            fuzzy_fields: vec!["country".to_string()],
            block_fields: vec!["period".to_string()],
            fuzzy_threshold: 0.90,
            acceptance_threshold: 1.0,
            uniqueness: UniquenessPolicy::default(),
        }
    }
}

/// Subsidiary directory construction settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryOptions {
    /// Number of parent companies kept, ranked by total deal size.
    pub top_parents: usize,
    /// Number of operating companies kept per parent.
    pub top_subsidiaries: usize,
    /// Separator between owners in multi-owner deals.
    pub parent_delimiter: String,
    /// Regex removed from company names (deal-id suffixes such as `(#1234)`).
    pub deal_id_pattern: String,
    pub source_language: String,
    /// Language of the shipper strings aliases are matched against.
    pub target_language: String,
    /// Keep only deals whose target country contains this text.
    pub target_country: Option<String>,
    pub overlap: OverlapPolicy,
    pub resolution: ResolutionPolicy,
}

impl Default for DirectoryOptions {
    fn default() -> Self {
        Self {
            top_parents: 25,
            top_subsidiaries: 20,
            parent_delimiter: "|".to_string(),
            deal_id_pattern: r"\s*\(#\d+\)".to_string(),
            source_language: "en".to_string(),
            target_language: "uk".to_string(),
            target_country: None,
            overlap: OverlapPolicy::default(),
            resolution: ResolutionPolicy::default(),
        }
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub matching: MatchOptions,
    pub directory: DirectoryOptions,
    /// Curated parent → alias entries, appended to the built directory.
    pub overrides: BTreeMap<String, Vec<String>>,
    /// Extra raw commodity labels.
    pub crops: BTreeMap<String, CropCategory>,
    /// Raw country spelling → canonical name.
    pub countries: BTreeMap<String, String>,
}

impl PipelineConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|source| ModelError::Config {
            path: "<inline>".into(),
            source,
        })
    }

    /// Load a TOML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ModelError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Built-in crop labels plus the configured ones.
    pub fn crop_lookup(&self) -> CropLookup {
        let mut lookup = CropLookup::with_defaults();
        lookup.extend(&self.crops);
        lookup
    }

    pub fn country_lookup(&self) -> ValueLookup {
        ValueLookup::countries(&self.countries)
    }
}
