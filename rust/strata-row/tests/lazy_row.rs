use std::sync::Arc;

use strata_common::{Result, error::ErrorKind};
use strata_row::{
    RowSchema, RowState, TextSlotFactory, Value,
    selector::ColumnMapSelection,
    slot::{FieldSlot, SlotFactory, SlotInput},
};
use strata_testkit::{
    columns::{raw_columns, text_list, text_map},
    counting::CountingSlotFactory,
};
use strata_types::{TypeSystem, accessor::AccessorRef};

fn counting_factory() -> CountingSlotFactory {
    CountingSlotFactory::new(Arc::new(TextSlotFactory::default()))
}

#[test]
fn test_absent_column_reads_null() {
    let types = TypeSystem::new();
    let schema = RowSchema::parse("id,name,age", "", "int,string,int", &types).unwrap();
    let mut row = schema.new_row(Arc::new(TextSlotFactory::default())).unwrap();
    row.init(
        raw_columns([("id", "1"), ("age", "30")]),
        schema.selectors().clone(),
    )
    .unwrap();
    assert_eq!(row.get_field(0).unwrap(), &Value::Int(1));
    assert!(row.get_field(1).unwrap().is_null());
    assert_eq!(row.get_field(2).unwrap(), &Value::Int(30));
}

#[test]
fn test_repeated_access_does_not_decode_again() {
    let types = TypeSystem::new();
    let schema = RowSchema::parse("id,tags", "", "bigint,list<string>", &types).unwrap();
    let factory = counting_factory();
    let counters = factory.counters();
    let mut row = schema.new_row(Arc::new(factory)).unwrap();

    let tags = text_list(&["a", "b", "c"], 0);
    row.init(
        raw_columns([("id", "5"), ("tags", tags.as_str())]),
        schema.selectors().clone(),
    )
    .unwrap();

    assert_eq!(row.get_field(1).unwrap().as_list().unwrap().len(), 3);
    assert_eq!(counters.created(), 2);
    assert_eq!(counters.loads(), 1);

    assert_eq!(row.get_field(1).unwrap().as_list().unwrap().len(), 3);
    assert_eq!(counters.loads(), 1);

    row.fields_as_list().unwrap();
    assert_eq!(counters.loads(), 2);
    row.fields_as_list().unwrap();
    assert_eq!(counters.loads(), 2);
}

#[test]
fn test_slots_survive_init() {
    let types = TypeSystem::new();
    let schema = RowSchema::parse("id", "", "int", &types).unwrap();
    let factory = counting_factory();
    let counters = factory.counters();
    let mut row = schema.new_row(Arc::new(factory)).unwrap();

    for i in 0..10 {
        let value = i.to_string();
        row.init(
            raw_columns([("id", value.as_str())]),
            schema.selectors().clone(),
        )
        .unwrap();
        assert_eq!(row.state(), RowState::Unparsed);
        assert_eq!(row.get_field(0).unwrap(), &Value::Int(i));
    }
    assert_eq!(counters.created(), 1);
    assert_eq!(counters.loads(), 10);
}

#[test]
fn test_fields_as_list_reuses_buffer() {
    let types = TypeSystem::new();
    let schema = RowSchema::parse("a,b", "", "int,string", &types).unwrap();
    let mut row = schema.new_row(Arc::new(TextSlotFactory::default())).unwrap();
    row.init(
        raw_columns([("a", "1"), ("b", "x")]),
        schema.selectors().clone(),
    )
    .unwrap();

    let first = row.fields_as_list().unwrap();
    let first_ptr = first.as_ptr();
    let first_values = first.to_vec();
    let second = row.fields_as_list().unwrap();
    assert_eq!(second, first_values.as_slice());
    assert_eq!(second.as_ptr(), first_ptr);

    row.init(raw_columns([("a", "2")]), schema.selectors().clone()).unwrap();
    let third = row.fields_as_list().unwrap();
    assert_eq!(third, &[Value::Int(2), Value::Null]);
    assert_eq!(third.as_ptr(), first_ptr);
}

#[test]
fn test_no_stale_values_across_rows() {
    let types = TypeSystem::new();
    let schema = RowSchema::parse(
        "id,name,props",
        "id,name,p_:",
        "int,string,map<string,int>",
        &types,
    )
    .unwrap();
    let mut row = schema.new_row(Arc::new(TextSlotFactory::default())).unwrap();

    row.init(
        raw_columns([("id", "1"), ("name", "first"), ("p_x", "10")]),
        schema.selectors().clone(),
    )
    .unwrap();
    assert_eq!(
        row.to_value().unwrap(),
        Value::Struct(vec![
            Value::Int(1),
            Value::from("first"),
            Value::Map(vec![(Value::from("x"), Value::Int(10))]),
        ])
    );

    row.init(raw_columns([("id", "2")]), schema.selectors().clone()).unwrap();
    assert_eq!(row.get_field(0).unwrap(), &Value::Int(2));
    assert!(row.get_field(1).unwrap().is_null());
    assert_eq!(row.get_field(2).unwrap(), &Value::Map(Vec::new()));
}

#[test]
fn test_schema_mismatch_on_init() {
    let types = TypeSystem::new();
    let schema = RowSchema::parse("a,b", "", "int,int", &types).unwrap();
    let other = RowSchema::parse("a", "", "int", &types).unwrap();
    let mut row = schema.new_row(Arc::new(TextSlotFactory::default())).unwrap();

    let err = row
        .init(raw_columns([("a", "1")]), other.selectors().clone()).unwrap_err();
    match err.kind() {
        ErrorKind::SchemaMismatch { expected, actual } => {
            assert_eq!(*expected, 2);
            assert_eq!(*actual, 1);
        }
        other => panic!("unexpected error kind {other:?}"),
    }
}

#[test]
fn test_column_map_over_nested_values() {
    let types = TypeSystem::new();
    let schema = RowSchema::parse(
        "key,attrs",
        "key,:",
        "string,map<string,map<string,int>>",
        &types,
    )
    .unwrap();
    let mut row = schema.new_row(Arc::new(TextSlotFactory::default())).unwrap();
    let sizes = text_map(&[("w", "3"), ("h", "4")], 0);
    row.init(
        raw_columns([("key", "k1"), ("size", sizes.as_str())]),
        schema.selectors().clone(),
    )
    .unwrap();

    let attrs = row.get_field(1).unwrap();
    let size = attrs.map_get("size").unwrap();
    assert_eq!(size.map_get("w"), Some(&Value::Int(3)));
    assert_eq!(size.map_get("h"), Some(&Value::Int(4)));
    assert!(attrs.map_get("key").is_none());
}

#[derive(Debug)]
struct FailingSlot(Value);

impl FieldSlot for FailingSlot {
    fn load(&mut self, input: SlotInput<'_>) -> Result<()> {
        match input {
            SlotInput::Bytes(b"bad") => Err(strata_common::error::Error::invalid_arg(
                "bytes",
                "rejected",
            )),
            _ => {
                self.0 = Value::from("ok");
                Ok(())
            }
        }
    }

    fn value(&self) -> &Value {
        &self.0
    }
}

struct FailingFactory;

impl SlotFactory for FailingFactory {
    fn create_slot(&self, _accessor: &AccessorRef) -> Result<Box<dyn FieldSlot>> {
        Ok(Box::new(FailingSlot(Value::Null)))
    }

    fn create_column_map_slot(
        &self,
        _accessor: &AccessorRef,
        _selection: ColumnMapSelection,
    ) -> Result<Box<dyn FieldSlot>> {
        Ok(Box::new(FailingSlot(Value::Null)))
    }
}

#[test]
fn test_decode_failure_names_column() {
    let types = TypeSystem::new();
    let schema = RowSchema::parse("a,b", "", "string,string", &types).unwrap();
    let mut row = schema.new_row(Arc::new(FailingFactory)).unwrap();
    row.init(
        raw_columns([("a", "fine"), ("b", "bad")]),
        schema.selectors().clone(),
    )
    .unwrap();

    assert_eq!(row.get_field(0).unwrap(), &Value::from("ok"));
    let err = row.get_field(1).unwrap_err();
    match err.kind() {
        ErrorKind::Decode { column, .. } => assert_eq!(column, "b"),
        other => panic!("unexpected error kind {other:?}"),
    }
    assert!(row.fields_as_list().is_err());
}
