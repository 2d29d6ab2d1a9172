//! Parent company → subsidiary alias directory.
//!
//! The directory is built once per run from the land-ownership deals and is
//! read-only afterwards. Parents iterate in ascending name order and each
//! parent keeps its aliases in insertion order, so every lookup over the
//! directory is deterministic.

use std::collections::{BTreeMap, BTreeSet};

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use shiplink_model::{DirectoryOptions, OverlapPolicy};

use crate::error::{CompanyError, Result};
use crate::land::{LandDeal, filter_target_country, rank_parents, rank_subsidiaries};
use crate::translate::{TranslationTable, Translator};

/// An alias of one parent that occurs inside an alias of another parent.
///
/// A shipper string containing `containing_alias` also contains `alias`,
/// so it matches both parents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AliasOverlap {
    pub alias: String,
    pub parent: String,
    pub containing_alias: String,
    pub containing_parent: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubsidiaryDirectory {
    entries: BTreeMap<String, Vec<String>>,
}

impl SubsidiaryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a ready-made map (fixtures, curated lists). Identical
    /// aliases under different parents are handled by `policy`.
    pub fn from_map(map: BTreeMap<String, Vec<String>>, policy: OverlapPolicy) -> Result<Self> {
        let mut directory = Self::new();
        for (parent, aliases) in map {
            directory.insert_aliases(&parent, aliases);
        }
        directory.enforce_disjoint(policy, &CoOwners::new())?;
        Ok(directory)
    }

    /// Append aliases to `parent`, creating it if needed.
    ///
    /// Aliases are trimmed and lowercased; empty ones are dropped and an
    /// alias already listed for this parent is not repeated.
    pub fn insert_aliases<I, S>(&mut self, parent: &str, aliases: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entry = self.entries.entry(parent.trim().to_string()).or_default();
        for alias in aliases {
            let alias = alias.as_ref().trim().to_lowercase();
            if alias.is_empty() || entry.contains(&alias) {
                continue;
            }
            entry.push(alias);
        }
    }

    pub fn aliases(&self, parent: &str) -> Option<&[String]> {
        self.entries.get(parent).map(Vec::as_slice)
    }

    pub fn parents(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(parent, aliases)| (parent.as_str(), aliases.as_slice()))
    }

    /// Number of parents.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn alias_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Aliases contained in an alias of a different parent.
    pub fn overlaps(&self) -> Vec<AliasOverlap> {
        let flat: Vec<(&str, &str)> = self
            .iter()
            .flat_map(|(parent, aliases)| aliases.iter().map(move |alias| (parent, alias.as_str())))
            .collect();
        let mut overlaps = Vec::new();
        for (parent, alias) in &flat {
            for (other_parent, other_alias) in &flat {
                if parent != other_parent && other_alias.contains(alias) {
                    overlaps.push(AliasOverlap {
                        alias: (*alias).to_string(),
                        parent: (*parent).to_string(),
                        containing_alias: (*other_alias).to_string(),
                        containing_parent: (*other_parent).to_string(),
                    });
                }
            }
        }
        overlaps
    }

    /// Identical aliases under different parents are resolved by `policy`,
    /// except aliases shared by owners listed in the same owner field.
    /// Those stay under every co-owner and resolve to the first co-owner in
    /// directory order.
    fn enforce_disjoint(&mut self, policy: OverlapPolicy, co_owners: &CoOwners) -> Result<()> {
        let mut owner: BTreeMap<String, String> = BTreeMap::new();
        for (parent, aliases) in &mut self.entries {
            let mut kept = Vec::with_capacity(aliases.len());
            for alias in aliases.drain(..) {
                match owner.get(&alias) {
                    None => {
                        owner.insert(alias.clone(), parent.clone());
                        kept.push(alias);
                    }
                    Some(first) if co_owners.share(&alias, first, parent) => {
                        warn!(%alias, resolves_to = %first, co_owner = %parent, "alias shared by co-owners");
                        kept.push(alias);
                    }
                    Some(first) => match policy {
                        OverlapPolicy::Reject => {
                            return Err(CompanyError::AliasConflict {
                                alias,
                                first: first.clone(),
                                second: parent.clone(),
                            });
                        }
                        OverlapPolicy::KeepFirst => {
                            warn!(%alias, kept_on = %first, dropped_from = %parent, "duplicate alias dropped");
                        }
                    },
                }
            }
            *aliases = kept;
        }
        Ok(())
    }
}

/// Parents that received an alias from the same multi-owner field.
#[derive(Debug, Default)]
struct CoOwners {
    groups: BTreeMap<String, Vec<BTreeSet<String>>>,
}

impl CoOwners {
    fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, alias: &str, parents: &BTreeSet<String>) {
        if parents.len() < 2 {
            return;
        }
        self.groups
            .entry(alias.trim().to_lowercase())
            .or_default()
            .push(parents.clone());
    }

    fn share(&self, alias: &str, first: &str, second: &str) -> bool {
        self.groups.get(alias).is_some_and(|groups| {
            groups
                .iter()
                .any(|group| group.contains(first) && group.contains(second))
        })
    }
}

/// Builds a [`SubsidiaryDirectory`] from land deals.
#[derive(Debug, Clone, Default)]
pub struct DirectoryBuilder {
    options: DirectoryOptions,
    overrides: BTreeMap<String, Vec<String>>,
}

impl DirectoryBuilder {
    pub fn new(options: DirectoryOptions) -> Self {
        Self {
            options,
            overrides: BTreeMap::new(),
        }
    }

    /// Curated parent → alias entries, appended after the ranked aliases.
    #[must_use]
    pub fn with_overrides(mut self, overrides: BTreeMap<String, Vec<String>>) -> Self {
        self.overrides = overrides;
        self
    }

    /// Rank parents and subsidiaries, translate subsidiary names into the
    /// shipper language and assemble the directory.
    ///
    /// Multi-owner deals contribute their subsidiaries to every owner.
    /// Translation failures abort the build.
    pub fn build<T>(&self, deals: &[LandDeal], translator: &T) -> Result<SubsidiaryDirectory>
    where
        T: Translator + ?Sized,
    {
        let options = &self.options;
        let deal_id = Regex::new(&options.deal_id_pattern)?;
        let strip = |name: &str| deal_id.replace_all(name, "").trim().to_string();

        let scoped;
        let deals = match &options.target_country {
            Some(country) => {
                scoped = filter_target_country(deals, country);
                scoped.as_slice()
            }
            None => deals,
        };

        let ranked: Vec<(String, Vec<String>)> = rank_parents(deals, options.top_parents)
            .into_iter()
            .map(|(owners, _)| {
                let subsidiaries = rank_subsidiaries(deals, &owners, options.top_subsidiaries)
                    .into_iter()
                    .map(|(name, _)| strip(&name))
                    .filter(|name| !name.is_empty())
                    .collect();
                (owners, subsidiaries)
            })
            .collect();

        let distinct: BTreeSet<&str> = ranked
            .iter()
            .flat_map(|(_, subsidiaries)| subsidiaries.iter().map(String::as_str))
            .collect();
        let translations = TranslationTable::build(
            distinct,
            translator,
            &options.source_language,
            &options.target_language,
        )?;

        let mut directory = SubsidiaryDirectory::new();
        let mut co_owners = CoOwners::new();
        for (owners, subsidiaries) in &ranked {
            let aliases: Vec<&str> = subsidiaries
                .iter()
                .map(|name| translations.apply(name))
                .collect();
            let parents: BTreeSet<String> = owners
                .split(options.parent_delimiter.as_str())
                .map(&strip)
                .filter(|parent| !parent.is_empty())
                .collect();
            for parent in &parents {
                directory.insert_aliases(parent, &aliases);
            }
            for alias in &aliases {
                co_owners.record(alias, &parents);
            }
        }
        for (parent, aliases) in &self.overrides {
            directory.insert_aliases(parent, aliases);
        }
        directory.enforce_disjoint(options.overlap, &co_owners)?;

        let overlaps = directory.overlaps();
        for overlap in &overlaps {
            warn!(
                alias = %overlap.alias,
                parent = %overlap.parent,
                containing_alias = %overlap.containing_alias,
                containing_parent = %overlap.containing_parent,
                "alias contained in another parent's alias"
            );
        }
        info!(
            parents = directory.len(),
            aliases = directory.alias_count(),
            overlaps = overlaps.len(),
            "built subsidiary directory"
        );
        Ok(directory)
    }
}
