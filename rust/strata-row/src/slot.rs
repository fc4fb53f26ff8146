//! Field slots: the per-field decoding targets owned by a lazy row.
//!
//! A slot is created once per row lifetime for the accessor of its field and
//! is reloaded with new input on every row it reads. The decoding itself is a
//! collaborator concern, hence the [`SlotFactory`] seam.

use strata_common::Result;
use strata_types::accessor::AccessorRef;

use crate::{raw_columns::RawColumns, selector::ColumnMapSelection, value::Value};

/// The input a slot decodes from.
#[derive(Debug, Clone, Copy)]
pub enum SlotInput<'a> {
    /// The value bytes of the single column a selector names.
    Bytes(&'a [u8]),
    /// The whole raw column map, for slots gathering several columns.
    Columns(&'a RawColumns),
}

/// A reusable decoding target for one field.
pub trait FieldSlot: Send {
    /// Decodes `input`, replacing whatever the slot held before.
    fn load(&mut self, input: SlotInput<'_>) -> Result<()>;

    /// The value decoded by the last successful `load`.
    fn value(&self) -> &Value;
}

/// Creates field slots for accessors.
pub trait SlotFactory: Send + Sync {
    /// Creates a slot decoding single-column values of the accessor's type.
    fn create_slot(&self, accessor: &AccessorRef) -> Result<Box<dyn FieldSlot>>;

    /// Creates a slot gathering the columns of `selection` into a map value
    /// typed by `accessor`.
    fn create_column_map_slot(
        &self,
        accessor: &AccessorRef,
        selection: ColumnMapSelection,
    ) -> Result<Box<dyn FieldSlot>>;
}
