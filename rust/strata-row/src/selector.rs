//! Column selectors: which raw column(s) feed each field of a row.

use std::sync::Arc;

use ahash::AHashSet;
use strata_common::{Result, error::Error};

/// Suffix marking a selector that takes every remaining column sharing the
/// prefix before it.
pub const ALL_COLUMNS_SUFFIX: char = ':';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorKind {
    /// A single named column.
    Column,
    /// All columns starting with `prefix` that no named selector claims.
    AllColumns { prefix: Arc<[u8]> },
}

/// One entry of a row's column mapping.
///
/// The selector keeps its textual name side by side with the binary key it is
/// looked up by in [`RawColumns`](crate::raw_columns::RawColumns), so the two
/// can never drift apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSelector {
    name: Arc<str>,
    key: Arc<[u8]>,
    kind: SelectorKind,
}

impl ColumnSelector {
    /// Parses a single column mapping entry.
    ///
    /// `"name"` selects the column `name`; `"prefix:"` selects every remaining
    /// column whose name starts with `prefix`, and a bare `":"` selects every
    /// remaining column.
    pub fn parse(name: &str) -> Result<ColumnSelector> {
        if name.is_empty() {
            return Err(Error::invalid_arg("name", "empty column name"));
        }
        let kind = match name.strip_suffix(ALL_COLUMNS_SUFFIX) {
            Some(prefix) => SelectorKind::AllColumns {
                prefix: Arc::from(prefix.as_bytes()),
            },
            None => SelectorKind::Column,
        };
        Ok(ColumnSelector {
            name: Arc::from(name),
            key: Arc::from(name.as_bytes()),
            kind,
        })
    }

    /// Parses a comma-separated column mapping.
    pub fn parse_list(mapping: &str) -> Result<Vec<ColumnSelector>> {
        if mapping.is_empty() {
            return Ok(Vec::new());
        }
        mapping.split(',').map(ColumnSelector::parse).collect()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key(&self) -> &[u8] {
        &self.key
    }

    pub fn kind(&self) -> &SelectorKind {
        &self.kind
    }

    pub fn is_all_columns(&self) -> bool {
        matches!(self.kind, SelectorKind::AllColumns { .. })
    }
}

/// The set of raw columns gathered by an all-columns selector.
#[derive(Debug, Clone)]
pub struct ColumnMapSelection {
    prefix: Arc<[u8]>,
    claimed: Arc<AHashSet<Arc<[u8]>>>,
}

impl ColumnMapSelection {
    /// Builds the selection for `prefix`, excluding every column named by a
    /// single-column selector in `selectors`.
    pub fn new(prefix: Arc<[u8]>, selectors: &[ColumnSelector]) -> ColumnMapSelection {
        let claimed = selectors
            .iter()
            .filter(|s| !s.is_all_columns())
            .map(|s| s.key.clone())
            .collect();
        ColumnMapSelection {
            prefix,
            claimed: Arc::new(claimed),
        }
    }

    pub fn includes(&self, key: &[u8]) -> bool {
        key.starts_with(&self.prefix) && !self.claimed.contains(key)
    }

    /// Returns `key` without the selection prefix.
    pub fn strip<'a>(&self, key: &'a [u8]) -> &'a [u8] {
        key.strip_prefix(&*self.prefix).unwrap_or(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_selectors() {
        let s = ColumnSelector::parse("user_id").unwrap();
        assert_eq!(s.name(), "user_id");
        assert_eq!(s.key(), b"user_id");
        assert_eq!(s.kind(), &SelectorKind::Column);

        let s = ColumnSelector::parse("attr:").unwrap();
        assert!(s.is_all_columns());
        assert_eq!(
            s.kind(),
            &SelectorKind::AllColumns {
                prefix: Arc::from(&b"attr"[..])
            }
        );

        let s = ColumnSelector::parse(":").unwrap();
        assert_eq!(
            s.kind(),
            &SelectorKind::AllColumns {
                prefix: Arc::from(&b""[..])
            }
        );

        assert!(ColumnSelector::parse("").is_err());
    }

    #[test]
    fn test_parse_list() {
        let list = ColumnSelector::parse_list("id,name,:").unwrap();
        assert_eq!(list.len(), 3);
        assert!(list[2].is_all_columns());
        assert!(ColumnSelector::parse_list("").unwrap().is_empty());
        assert!(ColumnSelector::parse_list("id,,name").is_err());
    }

    #[test]
    fn test_selection_excludes_claimed() {
        let selectors = ColumnSelector::parse_list("id,attr_x,attr_:").unwrap();
        let selection = ColumnMapSelection::new(Arc::from(&b"attr_"[..]), &selectors);
        assert!(selection.includes(b"attr_color"));
        assert!(!selection.includes(b"attr_x"));
        assert!(!selection.includes(b"id"));
        assert_eq!(selection.strip(b"attr_color"), b"color");
    }
}
