//! The slot behind an all-columns selector.

use std::sync::Arc;

use strata_common::{Result, error::Error};
use strata_types::accessor::{AccessorCategory, AccessorRef};

use crate::{
    options::TextDecodeOptions,
    selector::ColumnMapSelection,
    slot::{FieldSlot, SlotInput},
    text::{check_decodable, decode_text},
    value::Value,
};

/// Gathers the columns of a [`ColumnMapSelection`] into one map value.
///
/// Keys are the column names with the selection prefix removed, decoded with
/// the map's key accessor; values are the column values decoded with the
/// map's value accessor. Entries are ordered by key bytes.
#[derive(Debug)]
pub struct ColumnMapSlot {
    key: AccessorRef,
    value: AccessorRef,
    selection: ColumnMapSelection,
    options: Arc<TextDecodeOptions>,
    decoded: Value,
}

impl ColumnMapSlot {
    pub fn new(
        accessor: &AccessorRef,
        selection: ColumnMapSelection,
        options: Arc<TextDecodeOptions>,
    ) -> Result<ColumnMapSlot> {
        if accessor.category() != AccessorCategory::Map {
            return Err(Error::invalid_accessor(format!(
                "column map requires a map accessor, got {:?}",
                accessor.category()
            )));
        }
        let (Some(key), Some(value)) = (accessor.key_accessor(), accessor.value_accessor()) else {
            return Err(Error::invalid_accessor("map accessor without key or value accessor"));
        };
        check_decodable(key.as_ref(), 0, &options)?;
        check_decodable(value.as_ref(), 0, &options)?;
        Ok(ColumnMapSlot {
            key: key.clone(),
            value: value.clone(),
            selection,
            options,
            decoded: Value::Null,
        })
    }
}

impl FieldSlot for ColumnMapSlot {
    fn load(&mut self, input: SlotInput<'_>) -> Result<()> {
        let SlotInput::Columns(columns) = input else {
            return Err(Error::invalid_operation("load single column value into column map slot"));
        };

        let mut selected = columns
            .iter()
            .filter(|(name, _)| self.selection.includes(name))
            .map(|(name, bytes)| (self.selection.strip(name), bytes))
            .collect::<Vec<_>>();
        selected.sort_unstable_by(|a, b| a.0.cmp(b.0));
        log::trace!(
            "gathering {} of {} columns into a column map",
            selected.len(),
            columns.len()
        );

        let mut entries = Vec::with_capacity(selected.len());
        for (name, bytes) in selected {
            let key = decode_text(name, self.key.as_ref(), 0, &self.options)?;
            let value = decode_text(bytes, self.value.as_ref(), 0, &self.options)?;
            entries.push((key, value));
        }
        self.decoded = Value::Map(entries);
        Ok(())
    }

    fn value(&self) -> &Value {
        &self.decoded
    }
}

#[cfg(test)]
mod tests {
    use strata_types::TypeSystem;

    use super::*;
    use crate::{raw_columns::RawColumns, selector::ColumnSelector};

    fn slot(type_string: &str, mapping: &str, prefix: &str) -> Result<ColumnMapSlot> {
        let types = TypeSystem::new();
        let accessor = types.accessor_for_type_string(type_string).unwrap();
        let selectors = ColumnSelector::parse_list(mapping).unwrap();
        let selection = ColumnMapSelection::new(Arc::from(prefix.as_bytes()), &selectors);
        ColumnMapSlot::new(&accessor, selection, Default::default())
    }

    #[test]
    fn test_gathers_unclaimed_columns() {
        let mut slot = slot("map<string,int>", "id,:", "").unwrap();
        let columns: RawColumns = [("id", "1"), ("b", "2"), ("a", "x"), ("c", "3")]
            .into_iter()
            .collect();
        slot.load(SlotInput::Columns(&columns)).unwrap();
        assert_eq!(
            slot.value(),
            &Value::Map(vec![
                (Value::from("a"), Value::Null),
                (Value::from("b"), Value::Int(2)),
                (Value::from("c"), Value::Int(3)),
            ])
        );
    }

    #[test]
    fn test_prefix_is_stripped() {
        let mut slot = slot("map<string,string>", "id,tag_:", "tag_").unwrap();
        let columns: RawColumns = [("id", "1"), ("tag_color", "red"), ("other", "x")]
            .into_iter()
            .collect();
        slot.load(SlotInput::Columns(&columns)).unwrap();
        assert_eq!(slot.value().map_get("color"), Some(&Value::from("red")));
        assert_eq!(slot.value().as_map().unwrap().len(), 1);

        let empty = RawColumns::new();
        slot.load(SlotInput::Columns(&empty)).unwrap();
        assert_eq!(slot.value(), &Value::Map(Vec::new()));
    }

    #[test]
    fn test_requires_map_accessor() {
        let err = slot("list<string>", ":", "").unwrap_err();
        assert!(err.is_invalid_accessor());
    }

    #[test]
    fn test_rejects_single_column_input() {
        let mut slot = slot("map<string,string>", ":", "").unwrap();
        assert!(slot.load(SlotInput::Bytes(b"x")).is_err());
    }
}
