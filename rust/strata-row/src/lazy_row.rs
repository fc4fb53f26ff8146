//! A reusable row that decodes its fields on first access.

use std::sync::Arc;

use strata_common::{Result, error::Error, verify_arg};
use strata_types::accessor::{AccessorCategory, AccessorRef};

use crate::{
    raw_columns::RawColumns,
    selector::{ColumnMapSelection, ColumnSelector, SelectorKind},
    slot::{FieldSlot, SlotFactory, SlotInput},
    value::{NULL, Value},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowState {
    /// No raw columns have been bound yet.
    Unbound,
    /// Bound to raw columns, no field has been accessed since.
    Unparsed,
    /// At least one field has been accessed since the last `init`.
    Parsed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldState {
    Pending,
    Null,
    Loaded,
}

/// A row over raw column values whose fields are decoded lazily.
///
/// The row is built once for a struct accessor (one field per schema entry)
/// and then re-bound to successive raw rows with [`LazyRow::init`]. Field
/// slots are allocated on the first access after construction and reused
/// for every later row; each field is decoded at most once per binding.
pub struct LazyRow {
    accessor: AccessorRef,
    factory: Arc<dyn SlotFactory>,
    state: RowState,
    columns: Option<Arc<RawColumns>>,
    selectors: Arc<[ColumnSelector]>,
    slots: Vec<Box<dyn FieldSlot>>,
    fields: Vec<FieldState>,
    cached_list: Vec<Value>,
}

impl LazyRow {
    /// Creates an unbound row for `accessor`, which must be a struct accessor.
    pub fn new(accessor: AccessorRef, factory: Arc<dyn SlotFactory>) -> Result<LazyRow> {
        if accessor.category() != AccessorCategory::Struct {
            return Err(Error::invalid_accessor(format!(
                "row accessor must be a struct, got {:?}",
                accessor.category()
            )));
        }
        let field_count = accessor.struct_fields().len();
        Ok(LazyRow {
            accessor,
            factory,
            state: RowState::Unbound,
            columns: None,
            selectors: Arc::from(Vec::new()),
            slots: Vec::new(),
            fields: vec![FieldState::Pending; field_count],
            cached_list: Vec::with_capacity(field_count),
        })
    }

    pub fn accessor(&self) -> &AccessorRef {
        &self.accessor
    }

    pub fn state(&self) -> RowState {
        self.state
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn selectors(&self) -> &[ColumnSelector] {
        &self.selectors
    }

    /// Binds the row to a new set of raw columns.
    ///
    /// `selectors` name the column(s) behind each field, in field order. The
    /// row forgets every value decoded from the previous binding; slots are
    /// kept.
    pub fn init(
        &mut self,
        columns: Arc<RawColumns>,
        selectors: Arc<[ColumnSelector]>,
    ) -> Result<()> {
        if selectors.len() != self.fields.len() {
            return Err(Error::schema_mismatch(self.fields.len(), selectors.len()));
        }
        if !self.slots.is_empty() && *self.selectors != *selectors {
            // Column-map slots captured the claims of the previous selectors.
            self.slots.clear();
        }
        self.columns = Some(columns);
        self.selectors = selectors;
        self.fields.fill(FieldState::Pending);
        self.state = RowState::Unparsed;
        Ok(())
    }

    /// Returns the value of the field at `index`, decoding it on first access.
    ///
    /// A field whose column is absent from the bound raw columns is null.
    pub fn get_field(&mut self, index: usize) -> Result<&Value> {
        self.ensure_parsed()?;
        verify_arg!(index, index < self.fields.len());
        self.materialize(index)?;
        Ok(self.field_value(index))
    }

    /// Returns every field value, decoding the ones not yet accessed.
    ///
    /// The returned slice lives in a buffer owned by the row and reused
    /// across calls.
    pub fn fields_as_list(&mut self) -> Result<&[Value]> {
        self.ensure_parsed()?;
        for index in 0..self.fields.len() {
            self.materialize(index)?;
        }
        self.cached_list.clear();
        for index in 0..self.fields.len() {
            let value = self.field_value(index).clone();
            self.cached_list.push(value);
        }
        Ok(&self.cached_list)
    }

    /// Materializes the whole row as a struct value.
    pub fn to_value(&mut self) -> Result<Value> {
        Ok(Value::Struct(self.fields_as_list()?.to_vec()))
    }

    fn ensure_parsed(&mut self) -> Result<()> {
        match self.state {
            RowState::Unbound => Err(Error::invalid_operation("read field of unbound row")),
            RowState::Unparsed => {
                if self.slots.is_empty() && !self.fields.is_empty() {
                    self.slots = self.allocate_slots()?;
                }
                self.state = RowState::Parsed;
                Ok(())
            }
            RowState::Parsed => Ok(()),
        }
    }

    fn allocate_slots(&self) -> Result<Vec<Box<dyn FieldSlot>>> {
        log::trace!("allocating {} field slots", self.fields.len());
        self.accessor
            .struct_fields()
            .iter()
            .zip(self.selectors.iter())
            .map(|(field, selector)| match selector.kind() {
                SelectorKind::Column => self.factory.create_slot(field.accessor()),
                SelectorKind::AllColumns { prefix } => self.factory.create_column_map_slot(
                    field.accessor(),
                    ColumnMapSelection::new(prefix.clone(), &self.selectors),
                ),
            })
            .collect()
    }

    fn materialize(&mut self, index: usize) -> Result<()> {
        if self.fields[index] != FieldState::Pending {
            return Ok(());
        }
        let Some(columns) = self.columns.as_deref() else {
            return Err(Error::invalid_operation("read field of unbound row"));
        };
        let selector = &self.selectors[index];
        let input = match selector.kind() {
            SelectorKind::Column => match columns.get(selector.key()) {
                Some(bytes) => SlotInput::Bytes(bytes),
                None => {
                    self.fields[index] = FieldState::Null;
                    return Ok(());
                }
            },
            SelectorKind::AllColumns { .. } => SlotInput::Columns(columns),
        };
        log::trace!("decoding field {index} from column '{}'", selector.name());
        self.slots[index]
            .load(input)
            .map_err(|e| Error::decode_with_source(selector.name(), e))?;
        self.fields[index] = FieldState::Loaded;
        Ok(())
    }

    fn field_value(&self, index: usize) -> &Value {
        match self.fields[index] {
            FieldState::Loaded => self.slots[index].value(),
            FieldState::Pending | FieldState::Null => &NULL,
        }
    }
}

impl std::fmt::Debug for LazyRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyRow")
            .field("accessor", &self.accessor)
            .field("state", &self.state)
            .field("selectors", &self.selectors)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}
