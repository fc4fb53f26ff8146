//! Builders for raw columns and text-encoded values.

use std::sync::Arc;

use strata_row::{RawColumns, options::DEFAULT_SEPARATORS};

/// Builds shared raw columns from `(name, value)` text pairs.
pub fn raw_columns<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Arc<RawColumns> {
    Arc::new(pairs.into_iter().collect())
}

/// Joins list items with the default separator of nesting `level`.
pub fn text_list(items: &[&str], level: usize) -> String {
    items.join(separator(level))
}

/// Joins map entries with the default separators of nesting `level` (entries)
/// and `level + 1` (key from value).
pub fn text_map(entries: &[(&str, &str)], level: usize) -> String {
    let kv = separator(level + 1);
    entries
        .iter()
        .map(|(k, v)| format!("{k}{kv}{v}"))
        .collect::<Vec<_>>()
        .join(separator(level))
}

fn separator(level: usize) -> &'static str {
    const SEPARATORS: [&str; DEFAULT_SEPARATORS.len()] = [
        "\x02", "\x03", "\x04", "\x05", "\x06", "\x07", "\x08",
    ];
    SEPARATORS[level]
}
