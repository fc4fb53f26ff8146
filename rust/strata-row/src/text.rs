//! Text decoding of raw column values.
//!
//! Column values are UTF-8 text. Collections are delimited by one separator
//! byte per nesting level (see [`TextDecodeOptions`]); a span equal to the
//! null sequence decodes to null at any level. Primitive spans that fail to
//! parse also decode to null rather than failing the row.

use std::sync::Arc;

use strata_common::{Result, error::Error};
use strata_types::{
    PrimitiveKind,
    accessor::{Accessor, AccessorCategory, AccessorRef},
};

use crate::{
    column_map::ColumnMapSlot,
    options::TextDecodeOptions,
    selector::ColumnMapSelection,
    slot::{FieldSlot, SlotFactory, SlotInput},
    value::Value,
};

/// Builds slots decoding text-encoded column values.
#[derive(Debug, Clone, Default)]
pub struct TextSlotFactory {
    options: Arc<TextDecodeOptions>,
}

impl TextSlotFactory {
    pub fn new(options: TextDecodeOptions) -> Result<TextSlotFactory> {
        options.validate()?;
        Ok(TextSlotFactory {
            options: Arc::new(options),
        })
    }

    pub fn options(&self) -> &TextDecodeOptions {
        &self.options
    }
}

impl SlotFactory for TextSlotFactory {
    fn create_slot(&self, accessor: &AccessorRef) -> Result<Box<dyn FieldSlot>> {
        check_decodable(accessor.as_ref(), 0, &self.options)?;
        Ok(Box::new(TextSlot {
            accessor: accessor.clone(),
            options: self.options.clone(),
            value: Value::Null,
        }))
    }

    fn create_column_map_slot(
        &self,
        accessor: &AccessorRef,
        selection: ColumnMapSelection,
    ) -> Result<Box<dyn FieldSlot>> {
        Ok(Box::new(ColumnMapSlot::new(
            accessor,
            selection,
            self.options.clone(),
        )?))
    }
}

/// A slot decoding one text column value.
#[derive(Debug)]
pub struct TextSlot {
    accessor: AccessorRef,
    options: Arc<TextDecodeOptions>,
    value: Value,
}

impl FieldSlot for TextSlot {
    fn load(&mut self, input: SlotInput<'_>) -> Result<()> {
        let SlotInput::Bytes(bytes) = input else {
            return Err(Error::invalid_operation("load column map into text slot"));
        };
        log::trace!("decoding {} text bytes", bytes.len());
        self.value = decode_text(bytes, self.accessor.as_ref(), 0, &self.options)?;
        Ok(())
    }

    fn value(&self) -> &Value {
        &self.value
    }
}

/// Verifies that values of `accessor` can be decoded starting at nesting
/// `level`: every node has a decodable category and its navigation, and the
/// options provide a separator for every collection level.
pub fn check_decodable(
    accessor: &dyn Accessor,
    level: usize,
    options: &TextDecodeOptions,
) -> Result<()> {
    match accessor.category() {
        AccessorCategory::Primitive => {
            accessor
                .primitive_kind()
                .ok_or_else(|| missing_part("primitive", "kind"))?;
        }
        AccessorCategory::List => {
            options.separator(level)?;
            let element = accessor
                .element_accessor()
                .ok_or_else(|| missing_part("list", "element"))?;
            check_decodable(element.as_ref(), level + 1, options)?;
        }
        AccessorCategory::Map => {
            options.separator(level + 1)?;
            let key = accessor
                .key_accessor()
                .ok_or_else(|| missing_part("map", "key"))?;
            let value = accessor
                .value_accessor()
                .ok_or_else(|| missing_part("map", "value"))?;
            check_decodable(key.as_ref(), level + 2, options)?;
            check_decodable(value.as_ref(), level + 2, options)?;
        }
        AccessorCategory::Struct => {
            options.separator(level)?;
            for field in accessor.struct_fields() {
                check_decodable(field.accessor().as_ref(), level + 1, options)?;
            }
        }
        AccessorCategory::Union => {
            return Err(Error::invalid_accessor("union values have no text decoding"));
        }
    }
    Ok(())
}

fn missing_part(category: &str, part: &str) -> Error {
    Error::invalid_accessor(format!("{category} accessor without {part} accessor"))
}

/// Decodes a text span at nesting `level` as a value of the accessor's type.
pub fn decode_text(
    bytes: &[u8],
    accessor: &dyn Accessor,
    level: usize,
    options: &TextDecodeOptions,
) -> Result<Value> {
    if options.is_null_sequence(bytes) {
        return Ok(Value::Null);
    }
    let category = accessor.category();
    if bytes.is_empty() && options.empty_as_null && category != AccessorCategory::Primitive {
        return Ok(Value::Null);
    }

    match category {
        AccessorCategory::Primitive => {
            let kind = accessor
                .primitive_kind()
                .ok_or_else(|| missing_part("primitive", "kind"))?;
            Ok(decode_primitive(bytes, kind))
        }
        AccessorCategory::List => {
            let element = accessor
                .element_accessor()
                .ok_or_else(|| missing_part("list", "element"))?;
            if bytes.is_empty() {
                return Ok(Value::List(Vec::new()));
            }
            let separator = options.separator(level)?;
            let items = bytes
                .split(|&b| b == separator)
                .map(|item| decode_text(item, element.as_ref(), level + 1, options))
                .collect::<Result<Vec<_>>>()?;
            Ok(Value::List(items))
        }
        AccessorCategory::Map => {
            let key = accessor
                .key_accessor()
                .ok_or_else(|| missing_part("map", "key"))?;
            let value = accessor
                .value_accessor()
                .ok_or_else(|| missing_part("map", "value"))?;
            if bytes.is_empty() {
                return Ok(Value::Map(Vec::new()));
            }
            let entry_separator = options.separator(level)?;
            let kv_separator = options.separator(level + 1)?;
            let mut entries = Vec::new();
            for entry in bytes.split(|&b| b == entry_separator) {
                let (k, v) = match entry.iter().position(|&b| b == kv_separator) {
                    Some(pos) => (&entry[..pos], Some(&entry[pos + 1..])),
                    None => (entry, None),
                };
                let k = decode_text(k, key.as_ref(), level + 2, options)?;
                let v = match v {
                    Some(v) => decode_text(v, value.as_ref(), level + 2, options)?,
                    None => Value::Null,
                };
                entries.push((k, v));
            }
            Ok(Value::Map(entries))
        }
        AccessorCategory::Struct => {
            let separator = options.separator(level)?;
            let mut parts = bytes.split(|&b| b == separator);
            let fields = accessor
                .struct_fields()
                .iter()
                .map(|field| match parts.next() {
                    Some(part) => {
                        decode_text(part, field.accessor().as_ref(), level + 1, options)
                    }
                    None => Ok(Value::Null),
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(Value::Struct(fields))
        }
        AccessorCategory::Union => {
            Err(Error::invalid_accessor("union values have no text decoding"))
        }
    }
}

/// Decodes a primitive text span. Spans that do not parse as `kind` decode
/// to null.
pub fn decode_primitive(bytes: &[u8], kind: PrimitiveKind) -> Value {
    match kind {
        PrimitiveKind::Void => return Value::Null,
        PrimitiveKind::String => {
            return Value::String(String::from_utf8_lossy(bytes).into_owned());
        }
        PrimitiveKind::Binary => return Value::Binary(bytes.to_vec()),
        _ => (),
    }

    let Ok(text) = std::str::from_utf8(bytes) else {
        return Value::Null;
    };
    if text.is_empty() {
        return Value::Null;
    }
    match kind {
        PrimitiveKind::Boolean => {
            if text.eq_ignore_ascii_case("true") {
                Value::Boolean(true)
            } else if text.eq_ignore_ascii_case("false") {
                Value::Boolean(false)
            } else {
                Value::Null
            }
        }
        PrimitiveKind::TinyInt => text.parse().map_or(Value::Null, Value::TinyInt),
        PrimitiveKind::SmallInt => text.parse().map_or(Value::Null, Value::SmallInt),
        PrimitiveKind::Int => text.parse().map_or(Value::Null, Value::Int),
        PrimitiveKind::BigInt => text.parse().map_or(Value::Null, Value::BigInt),
        PrimitiveKind::Float => text.parse().map_or(Value::Null, Value::Float),
        PrimitiveKind::Double => text.parse().map_or(Value::Null, Value::Double),
        PrimitiveKind::Timestamp => Value::Timestamp(text.to_string()),
        PrimitiveKind::Void | PrimitiveKind::String | PrimitiveKind::Binary => Value::Null,
    }
}
