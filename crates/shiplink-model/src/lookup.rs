use std::collections::{BTreeMap, BTreeSet};

use crate::error::{ModelError, Result};

/// Static raw → canonical value table (countries, commodity codes).
///
/// Keys match case-insensitively after whitespace folding. A canonical value
/// resolves to itself. Anything else is a lookup failure: these tables have no
/// default entry.
#[derive(Debug, Clone)]
pub struct ValueLookup {
    table: String,
    entries: BTreeMap<String, String>,
    canonical: BTreeSet<String>,
}

impl ValueLookup {
    pub fn new<I, K, V>(table: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut map = BTreeMap::new();
        let mut canonical = BTreeSet::new();
        for (raw, value) in entries {
            let value = value.into();
            canonical.insert(fold(&value));
            map.insert(fold(raw.as_ref()), value);
        }
        Self {
            table: table.into(),
            entries: map,
            canonical,
        }
    }

    /// Country table: canonical names are stored lowercase.
    pub fn countries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        Self::new(
            "country",
            entries
                .into_iter()
                .map(|(raw, value)| (raw, fold(value.as_ref()))),
        )
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn resolve(&self, raw: &str) -> Result<String> {
        let key = fold(raw);
        if let Some(value) = self.entries.get(&key) {
            return Ok(value.clone());
        }
        if self.canonical.contains(&key) {
            return Ok(key);
        }
        Err(ModelError::UnknownValue {
            table: self.table.clone(),
            value: raw.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn fold(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_raw_spellings() {
        let lookup = ValueLookup::countries([("Іспанія", "Spain"), ("ESPANA", "spain")]);
        assert_eq!(lookup.resolve("іспанія").unwrap(), "spain");
        assert_eq!(lookup.resolve(" Espana ").unwrap(), "spain");
    }

    #[test]
    fn canonical_value_resolves_to_itself() {
        let lookup = ValueLookup::countries([("Іспанія", "Spain")]);
        assert_eq!(lookup.resolve("SPAIN").unwrap(), "spain");
    }

    #[test]
    fn unknown_value_names_the_table() {
        let lookup = ValueLookup::countries([("Іспанія", "Spain")]);
        let err = lookup.resolve("atlantis").unwrap_err();
        assert_eq!(err.to_string(), "no entry for 'atlantis' in the country lookup");
    }
}
