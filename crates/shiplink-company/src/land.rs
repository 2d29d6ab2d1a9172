//! Land-ownership deals and their ranking.
//!
//! Parents and operating companies are ranked by total contracted land
//! area. Ties keep alphabetical order of the grouped names.

use std::collections::BTreeMap;

use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use tracing::debug;

use shiplink_common::{column_f64, column_strings};

use crate::error::{CompanyError, Result};

/// One row of the land-ownership dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandDeal {
    pub deal_id: String,
    pub target_country: String,
    /// Raw owner field; multi-owner deals separate names with a delimiter.
    pub top_parent_companies: String,
    pub operating_company: String,
    /// Hectares. Missing sizes count as 0.
    pub deal_size: f64,
}

const DEAL_ID: &[&str] = &["deal_id"];
const TARGET_COUNTRY: &[&str] = &["target_country"];
const PARENTS: &[&str] = &["top_parent_companies"];
const OPERATING_COMPANY: &[&str] = &["operating_company_name", "operating_company:_name"];
const DEAL_SIZE: &[&str] = &["deal_size"];

fn find_column<'a>(df: &DataFrame, candidates: &[&'a str]) -> Result<&'a str> {
    candidates
        .iter()
        .copied()
        .find(|name| df.column(name).is_ok())
        .ok_or_else(|| CompanyError::MissingColumn(candidates[0].to_string()))
}

/// Read deals from a frame with normalized headers.
///
/// `deal_id` and `target_country` are optional; the owner, operating
/// company and size columns are required.
pub fn land_deals_from_frame(df: &DataFrame) -> Result<Vec<LandDeal>> {
    let optional = |candidates: &[&str]| -> Result<Vec<String>> {
        match find_column(df, candidates) {
            Ok(name) => Ok(column_strings(df, name)?),
            Err(_) => Ok(vec![String::new(); df.height()]),
        }
    };
    let deal_ids = optional(DEAL_ID)?;
    let countries = optional(TARGET_COUNTRY)?;
    let parents = column_strings(df, find_column(df, PARENTS)?)?;
    let operating = column_strings(df, find_column(df, OPERATING_COMPANY)?)?;
    let sizes = column_f64(df, find_column(df, DEAL_SIZE)?)?;

    let deals = deal_ids
        .into_iter()
        .zip(countries)
        .zip(parents)
        .zip(operating)
        .zip(sizes)
        .map(
            |((((deal_id, target_country), top_parent_companies), operating_company), size)| {
                LandDeal {
                    deal_id,
                    target_country,
                    top_parent_companies,
                    operating_company,
                    deal_size: size.unwrap_or(0.0),
                }
            },
        )
        .collect::<Vec<_>>();
    debug!(deals = deals.len(), "loaded land deals");
    Ok(deals)
}

/// Deals whose target country contains `country` (case-insensitive).
pub fn filter_target_country(deals: &[LandDeal], country: &str) -> Vec<LandDeal> {
    let needle = country.trim().to_lowercase();
    deals
        .iter()
        .filter(|deal| deal.target_country.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// Top `n` raw owner fields by summed deal size.
pub fn rank_parents(deals: &[LandDeal], n: usize) -> Vec<(String, f64)> {
    rank(
        deals
            .iter()
            .map(|deal| (deal.top_parent_companies.as_str(), deal.deal_size)),
        n,
    )
}

/// Top `m` operating companies of deals whose owner field contains `parent`
/// (case-insensitive).
pub fn rank_subsidiaries(deals: &[LandDeal], parent: &str, m: usize) -> Vec<(String, f64)> {
    let needle = parent.to_lowercase();
    rank(
        deals
            .iter()
            .filter(|deal| deal.top_parent_companies.to_lowercase().contains(&needle))
            .map(|deal| (deal.operating_company.as_str(), deal.deal_size)),
        m,
    )
}

fn rank<'a, I>(entries: I, limit: usize) -> Vec<(String, f64)>
where
    I: Iterator<Item = (&'a str, f64)>,
{
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for (name, size) in entries {
        if name.trim().is_empty() {
            continue;
        }
        *totals.entry(name).or_insert(0.0) += size;
    }
    let mut ranked: Vec<(String, f64)> = totals
        .into_iter()
        .map(|(name, total)| (name.to_string(), total))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deal(parents: &str, operating: &str, size: f64) -> LandDeal {
        LandDeal {
            deal_id: String::new(),
            target_country: "Ukraine".to_string(),
            top_parent_companies: parents.to_string(),
            operating_company: operating.to_string(),
            deal_size: size,
        }
    }

    #[test]
    fn parents_rank_by_total_size() {
        let deals = vec![
            deal("Kernel Holding", "Kernel-Trade", 100.0),
            deal("Astarta", "Astarta-Kyiv", 300.0),
            deal("Kernel Holding", "Enselco Agro", 250.0),
            deal("MHP", "Raftan", 50.0),
        ];
        let ranked = rank_parents(&deals, 2);
        assert_eq!(
            ranked,
            vec![
                ("Kernel Holding".to_string(), 350.0),
                ("Astarta".to_string(), 300.0)
            ]
        );
    }

    #[test]
    fn ties_keep_alphabetical_order() {
        let deals = vec![deal("Zeta", "z", 10.0), deal("Alpha", "a", 10.0)];
        let names: Vec<String> = rank_parents(&deals, 5).into_iter().map(|r| r.0).collect();
        assert_eq!(names, vec!["Alpha", "Zeta"]);
    }

    #[test]
    fn subsidiaries_match_parent_by_containment() {
        let deals = vec![
            deal("Kernel Holding|UkrLandFarming", "Kernel-Trade", 10.0),
            deal("kernel holding", "Enselco Agro", 40.0),
            deal("Astarta", "Astarta-Kyiv", 99.0),
            deal("Kernel Holding", "", 500.0),
        ];
        let ranked = rank_subsidiaries(&deals, "Kernel Holding", 20);
        let names: Vec<&str> = ranked.iter().map(|r| r.0.as_str()).collect();
        assert_eq!(names, vec!["Enselco Agro", "Kernel-Trade"]);
    }

    #[test]
    fn target_country_filter_is_case_insensitive() {
        let mut other = deal("X", "y", 1.0);
        other.target_country = "Russian Federation".to_string();
        let deals = vec![deal("A", "b", 1.0), other];
        assert_eq!(filter_target_country(&deals, "ukraine").len(), 1);
    }
}
