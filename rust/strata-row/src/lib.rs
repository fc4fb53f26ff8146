//! Lazy row materialization over raw column values.
//!
//! A [`RowSchema`] resolves column names, a column mapping and a type list
//! into selectors and a struct accessor; a [`LazyRow`] bound to one raw row
//! at a time decodes each field through a [`slot::FieldSlot`] only when the
//! field is read.

pub mod column_map;
pub mod lazy_row;
pub mod options;
pub mod raw_columns;
pub mod row_schema;
pub mod selector;
pub mod slot;
pub mod text;
pub mod value;

pub use lazy_row::{LazyRow, RowState};
pub use options::TextDecodeOptions;
pub use raw_columns::RawColumns;
pub use row_schema::RowSchema;
pub use selector::ColumnSelector;
pub use text::TextSlotFactory;
pub use value::Value;
