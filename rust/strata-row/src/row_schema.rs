//! Row schemas: column names, column mapping and column types resolved into
//! the selectors and struct accessor a [`LazyRow`] reads with.

use std::sync::Arc;

use strata_common::{Result, error::Error};
use strata_types::{Category, TypeDescriptor, TypeSystem, accessor::AccessorRef};

use crate::{lazy_row::LazyRow, selector::ColumnSelector, slot::SlotFactory};

#[derive(Debug, Clone)]
pub struct RowSchema {
    selectors: Arc<[ColumnSelector]>,
    descriptor: TypeDescriptor,
    accessor: AccessorRef,
}

impl RowSchema {
    /// Resolves a row schema.
    ///
    /// * `column_names` - comma-separated field names of the row.
    /// * `column_mapping` - comma-separated raw column selectors, one per
    ///   field; an empty mapping reads each field from the column of the same
    ///   name.
    /// * `column_types` - type list with one type per field.
    ///
    /// Fields fed by an all-columns selector must be typed as maps.
    pub fn parse(
        column_names: &str,
        column_mapping: &str,
        column_types: &str,
        types: &TypeSystem,
    ) -> Result<RowSchema> {
        let names = split_list(column_names);
        let selectors = if column_mapping.is_empty() {
            ColumnSelector::parse_list(column_names)?
        } else {
            ColumnSelector::parse_list(column_mapping)?
        };
        let field_types = types.parse_all(column_types)?;

        if selectors.len() != names.len() {
            return Err(Error::schema_mismatch(names.len(), selectors.len()));
        }
        if field_types.len() != names.len() {
            return Err(Error::schema_mismatch(names.len(), field_types.len()));
        }
        for (selector, field_type) in selectors.iter().zip(&field_types) {
            if selector.is_all_columns() && field_type.category() != Category::Map {
                return Err(Error::invalid_arg(
                    "column_types",
                    format!(
                        "column '{}' selects all columns and must be a map, got {field_type}",
                        selector.name()
                    ),
                ));
            }
        }

        let descriptor = TypeDescriptor::structure(names.into_iter().zip(field_types));
        let accessor = types.accessor_for(&descriptor);
        log::debug!(
            "resolved row schema {} over columns {column_mapping:?}",
            types.type_string(&descriptor)
        );
        Ok(RowSchema {
            selectors: selectors.into(),
            descriptor,
            accessor,
        })
    }

    pub fn selectors(&self) -> &Arc<[ColumnSelector]> {
        &self.selectors
    }

    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    pub fn accessor(&self) -> &AccessorRef {
        &self.accessor
    }

    pub fn field_count(&self) -> usize {
        self.selectors.len()
    }

    /// Creates an unbound row reading this schema through `factory`.
    pub fn new_row(&self, factory: Arc<dyn SlotFactory>) -> Result<LazyRow> {
        LazyRow::new(self.accessor.clone(), factory)
    }
}

fn split_list(s: &str) -> Vec<&str> {
    if s.is_empty() {
        Vec::new()
    } else {
        s.split(',').collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{raw_columns::RawColumns, text::TextSlotFactory, value::Value};

    #[test]
    fn test_parse_schema() {
        let types = TypeSystem::new();
        let schema = RowSchema::parse(
            "id,name,props",
            "key,full_name,:",
            "int:string:map<string,string>",
            &types,
        )
        .unwrap();
        assert_eq!(schema.field_count(), 3);
        assert_eq!(schema.selectors()[1].name(), "full_name");
        assert!(schema.selectors()[2].is_all_columns());
        assert_eq!(
            schema.descriptor().to_canonical_string(),
            "struct<id:int,name:string,props:map<string,string>>"
        );
        assert!(Arc::ptr_eq(
            schema.accessor(),
            &types.accessor_for(schema.descriptor())
        ));
    }

    #[test]
    fn test_mapping_defaults_to_names() {
        let types = TypeSystem::new();
        let schema = RowSchema::parse("a,b", "", "int,int", &types).unwrap();
        assert_eq!(schema.selectors()[0].name(), "a");
        assert_eq!(schema.selectors()[1].key(), b"b");
    }

    #[test]
    fn test_count_mismatch() {
        let types = TypeSystem::new();
        let err = RowSchema::parse("a,b", "", "int", &types).unwrap_err();
        assert!(err.is_schema_mismatch());
        let err = RowSchema::parse("a,b", "x", "int,int", &types).unwrap_err();
        assert!(err.is_schema_mismatch());
    }

    #[test]
    fn test_all_columns_requires_map() {
        let types = TypeSystem::new();
        let err = RowSchema::parse("a,rest", "a,:", "int,string", &types).unwrap_err();
        assert!(err.to_string().contains("must be a map"));
    }

    #[test]
    fn test_malformed_types() {
        let types = TypeSystem::new();
        let err = RowSchema::parse("a", "", "list<int", &types).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_new_row() {
        let types = TypeSystem::new();
        let schema = RowSchema::parse("id,score", "", "bigint,double", &types).unwrap();
        let mut row = schema.new_row(Arc::new(TextSlotFactory::default())).unwrap();
        let raw: RawColumns = [("id", "10"), ("score", "0.5")].into_iter().collect();
        row.init(Arc::new(raw), schema.selectors().clone()).unwrap();
        assert_eq!(
            row.to_value().unwrap(),
            Value::Struct(vec![Value::BigInt(10), Value::Double(0.5)])
        );
    }
}
