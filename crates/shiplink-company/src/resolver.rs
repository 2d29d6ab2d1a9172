//! Shipper string → canonical parent company.

use std::collections::BTreeMap;

use polars::prelude::DataFrame;
use tracing::{info, trace};

use shiplink_common::{column_strings, redact_value, string_column};
use shiplink_model::{OTHER_COMPANY, ResolutionPolicy};

use crate::directory::SubsidiaryDirectory;
use crate::error::Result;

/// Resolves lowercased shipper strings by alias containment.
///
/// A shipper containing no alias resolves to [`OTHER_COMPANY`]. When aliases
/// of several parents occur in the same shipper string, the
/// [`ResolutionPolicy`] picks the winner; both policies are deterministic
/// because the directory iterates in a fixed order.
#[derive(Debug, Clone)]
pub struct CompanyNameResolver {
    directory: SubsidiaryDirectory,
    policy: ResolutionPolicy,
}

impl CompanyNameResolver {
    pub fn new(directory: SubsidiaryDirectory, policy: ResolutionPolicy) -> Self {
        Self { directory, policy }
    }

    pub fn directory(&self) -> &SubsidiaryDirectory {
        &self.directory
    }

    pub fn policy(&self) -> ResolutionPolicy {
        self.policy
    }

    /// Canonical parent for one lowercased shipper string.
    pub fn resolve(&self, shipper: &str) -> &str {
        let mut best: Option<(&str, usize)> = None;
        for (parent, aliases) in self.directory.iter() {
            for alias in aliases {
                if alias.is_empty() || !shipper.contains(alias.as_str()) {
                    continue;
                }
                let length = alias.chars().count();
                let replace = match self.policy {
                    ResolutionPolicy::LastMatch => true,
                    ResolutionPolicy::LongestAlias => {
                        best.is_none_or(|(_, best_length)| length > best_length)
                    }
                };
                if replace {
                    best = Some((parent, length));
                }
            }
        }
        best.map_or(OTHER_COMPANY, |(parent, _)| parent)
    }

    /// Resolve each distinct value once.
    pub fn resolve_all<I, S>(&self, shippers: I) -> BTreeMap<String, String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut resolved = BTreeMap::new();
        for shipper in shippers {
            let shipper = shipper.as_ref();
            if resolved.contains_key(shipper) {
                continue;
            }
            let company = self.resolve(shipper);
            trace!(shipper = redact_value(shipper), company, "resolved shipper");
            resolved.insert(shipper.to_string(), company.to_string());
        }
        resolved
    }

    /// Add `output_column` with the parent of every value of `shipper_column`.
    ///
    /// The shipper column must already be lowercased.
    pub fn standardize_column(
        &self,
        df: &DataFrame,
        shipper_column: &str,
        output_column: &str,
    ) -> Result<DataFrame> {
        let shippers = column_strings(df, shipper_column)?;
        let resolved = self.resolve_all(&shippers);
        let unmatched = resolved
            .values()
            .filter(|company| company.as_str() == OTHER_COMPANY)
            .count();
        let companies = shippers
            .iter()
            .map(|shipper| resolved[shipper.as_str()].clone())
            .collect();
        let mut out = df.clone();
        out.with_column(string_column(output_column, companies))?;
        info!(
            rows = df.height(),
            distinct_shippers = resolved.len(),
            unmatched,
            "standardized shipper names"
        );
        Ok(out)
    }
}
