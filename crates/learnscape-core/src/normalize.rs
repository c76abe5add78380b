//! Text normalization for answer matching.
//!
//! Pure string utilities with no failure modes: every function returns a
//! value for every input, possibly empty.

use std::collections::BTreeSet;

/// Lowercase, trim, and strip every character that is not a letter or digit.
///
/// Used to compare numeric and short answers while ignoring punctuation,
/// units, spacing, and case: "5 m", "x=5", and "5" all normalize to
/// strings containing "5".
pub fn normalize_loose(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect()
}

/// Lowercase and trim only, keeping punctuation intact.
pub fn normalize_strict(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Split a string holding multiple values into an unordered set of
/// loose-normalized tokens.
///
/// Values are joined by commas, semicolons, ampersands, or the
/// conjunctions "dan"/"and" ("4 dan 8" becomes {"4", "8"}). A string
/// with no separators yields a one-element set; blank input yields an
/// empty set.
pub fn split_multi_value(s: &str) -> BTreeSet<String> {
    let lowered = s.to_lowercase();
    let mut values = BTreeSet::new();

    for part in lowered.split([',', ';', '&']) {
        let mut current = String::new();
        for word in part.split_whitespace() {
            if matches!(word, "dan" | "and") {
                push_value(&mut values, &current);
                current.clear();
            } else {
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(word);
            }
        }
        push_value(&mut values, &current);
    }

    values
}

fn push_value(values: &mut BTreeSet<String>, raw: &str) {
    let normalized = normalize_loose(raw);
    if !normalized.is_empty() {
        values.insert(normalized);
    }
}
