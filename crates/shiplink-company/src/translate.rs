//! Translation collaborator and the per-run translation table.
//!
//! The pipeline never calls a translation service per row. Distinct input
//! strings are collected first, each is translated once, and the resulting
//! table is passed around explicitly.

use std::collections::{BTreeMap, BTreeSet};

use polars::prelude::DataFrame;
use tracing::debug;

use shiplink_common::{column_strings, string_column};

use crate::error::{CompanyError, Result, TranslationError};

/// Opaque `text -> text` translation service.
pub trait Translator {
    fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> std::result::Result<String, TranslationError>;
}

impl<F> Translator for F
where
    F: Fn(&str, &str, &str) -> std::result::Result<String, TranslationError>,
{
    fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> std::result::Result<String, TranslationError> {
        self(text, source_lang, target_lang)
    }
}

/// Translator backed by a fixed dictionary.
///
/// Lookups are case-insensitive. Text already in the target language can be
/// passed through by listing it with itself as translation; anything absent is
/// an error.
#[derive(Debug, Clone, Default)]
pub struct GlossaryTranslator {
    entries: BTreeMap<String, String>,
}

impl GlossaryTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut glossary = Self::new();
        for (text, translation) in pairs {
            glossary.insert(text.as_ref(), translation);
        }
        glossary
    }

    /// Build from a two-column table (`text`, `translation`).
    pub fn from_frame(df: &DataFrame, text_column: &str, translation_column: &str) -> Result<Self> {
        for name in [text_column, translation_column] {
            if df.column(name).is_err() {
                return Err(CompanyError::MissingColumn(name.to_string()));
            }
        }
        let texts = column_strings(df, text_column)?;
        let translations = column_strings(df, translation_column)?;
        Ok(Self::from_pairs(
            texts
                .into_iter()
                .zip(translations)
                .filter(|(text, _)| !text.is_empty()),
        ))
    }

    pub fn insert(&mut self, text: &str, translation: impl Into<String>) {
        self.entries.insert(key(text), translation.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Translator for GlossaryTranslator {
    fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> std::result::Result<String, TranslationError> {
        self.entries
            .get(&key(text))
            .cloned()
            .ok_or_else(|| TranslationError::Missing {
                text: text.to_string(),
                source_lang: source_lang.to_string(),
                target_lang: target_lang.to_string(),
            })
    }
}

fn key(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Distinct input value → translation, built once per run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslationTable {
    entries: BTreeMap<String, String>,
}

impl TranslationTable {
    /// Translate every distinct value of `values` once.
    ///
    /// The first translation failure aborts the build.
    pub fn build<I, S, T>(values: I, translator: &T, source_lang: &str, target_lang: &str) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        T: Translator + ?Sized,
    {
        let distinct: BTreeSet<String> = values
            .into_iter()
            .map(|value| value.as_ref().to_string())
            .collect();
        let mut entries = BTreeMap::new();
        for text in distinct {
            let translated = translator
                .translate(&text, source_lang, target_lang)
                .map_err(|source| CompanyError::Translation {
                    text: text.clone(),
                    source,
                })?;
            entries.insert(text, translated);
        }
        debug!(
            distinct = entries.len(),
            source_lang, target_lang, "built translation table"
        );
        Ok(Self { entries })
    }

    pub fn get(&self, text: &str) -> Option<&str> {
        self.entries.get(text).map(String::as_str)
    }

    /// Translate `text`, falling back to the input when it was not part of
    /// the build set.
    pub fn apply<'a>(&'a self, text: &'a str) -> &'a str {
        self.get(text).unwrap_or(text)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Add `output_column` holding the translation of every value of `column`.
pub fn translate_column<T>(
    df: &DataFrame,
    column: &str,
    output_column: &str,
    translator: &T,
    source_lang: &str,
    target_lang: &str,
) -> Result<DataFrame>
where
    T: Translator + ?Sized,
{
    let values = column_strings(df, column)?;
    let table = TranslationTable::build(&values, translator, source_lang, target_lang)?;
    let translated = values
        .iter()
        .map(|value| table.apply(value).to_string())
        .collect();
    let mut out = df.clone();
    out.with_column(string_column(output_column, translated))?;
    Ok(out)
}
