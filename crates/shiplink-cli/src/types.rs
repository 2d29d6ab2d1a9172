use std::path::PathBuf;

use serde::Serialize;

/// One canonical crop and the raw commodity labels classified into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CropSummary {
    pub crop: String,
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyTotal {
    pub company: String,
    pub weight_ton: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolveResult {
    pub rows: usize,
    pub parents: usize,
    pub aliases: usize,
    /// Aliases contained in another parent's alias.
    pub overlaps: usize,
    /// Largest company first; unmatched shippers are grouped under "Other".
    pub totals: Vec<CompanyTotal>,
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkResult {
    pub crop: String,
    pub left_groups: usize,
    pub right_groups: usize,
    pub candidate_pairs: usize,
    pub matches: usize,
    pub unique_matches: usize,
    /// Weight of the distinct groups in unique matches, per side.
    pub left_matched_tons: f64,
    pub right_matched_tons: f64,
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconcileRow {
    pub label: String,
    pub weight_ton: f64,
    pub share_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconcileResult {
    pub crop: Option<String>,
    pub rows: Vec<ReconcileRow>,
    pub output: Option<PathBuf>,
}
