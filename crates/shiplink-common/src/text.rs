//! Text normalization for headers and free-text values.

/// Lowercases and collapses whitespace. Used for shipper names and any other
/// value compared by substring.
pub fn normalize_text(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Converts a raw column header into `snake_case`.
///
/// Lowercases, strips punctuation and whitespace from both ends, drops `(`,
/// and joins words with `_`: `"Weight (KG)"` becomes `weight_kg`.
pub fn normalize_header(raw: &str) -> String {
    let lowered = raw.trim_matches('\u{feff}').to_lowercase();
    let stripped = lowered.trim_matches(|ch: char| ch.is_whitespace() || is_punctuation(ch));
    stripped
        .replace('(', "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

fn is_punctuation(ch: char) -> bool {
    ch.is_ascii_punctuation()
        || matches!(
            ch,
            '«' | '»' | '“' | '”' | '„' | '‘' | '’' | '–' | '—' | '…' | '¿' | '¡' | '·'
        )
}
