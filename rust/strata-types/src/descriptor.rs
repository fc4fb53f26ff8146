//! Immutable, structurally comparable type descriptors.

use std::{fmt::Write, sync::Arc};

use strata_common::{Result, error::Error};

use crate::primitive::{PrimitiveKind, PrimitiveRegistry, StandardPrimitiveRegistry};

pub const LIST_TYPE_NAME: &str = "list";
pub const MAP_TYPE_NAME: &str = "map";
pub const STRUCT_TYPE_NAME: &str = "struct";

/// Returns `true` if `name` is one of the composite type keywords.
pub fn is_composite_keyword(name: &str) -> bool {
    matches!(name, LIST_TYPE_NAME | MAP_TYPE_NAME | STRUCT_TYPE_NAME)
}

/// The category of a [`TypeDescriptor`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Primitive,
    List,
    Map,
    Struct,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Category::Primitive => "primitive",
            Category::List => LIST_TYPE_NAME,
            Category::Map => MAP_TYPE_NAME,
            Category::Struct => STRUCT_TYPE_NAME,
        };
        f.write_str(name)
    }
}

/// A recursive schema type: a primitive, or a list, map or struct of nested types.
///
/// Descriptors are immutable once built. Equality and hashing are structural, so
/// two independently constructed descriptors with the same shape are
/// interchangeable as map keys. Nested nodes are shared through `Arc`, which
/// makes cloning cheap.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    Primitive(PrimitiveKind),
    List(Arc<TypeDescriptor>),
    Map(Arc<TypeDescriptor>, Arc<TypeDescriptor>),
    Struct(Arc<[StructField]>),
}

/// A named member of a struct descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructField {
    name: Arc<str>,
    data_type: TypeDescriptor,
}

impl StructField {
    pub fn new(name: impl Into<Arc<str>>, data_type: TypeDescriptor) -> StructField {
        StructField {
            name: name.into(),
            data_type,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_type(&self) -> &TypeDescriptor {
        &self.data_type
    }
}

impl TypeDescriptor {
    pub fn primitive(kind: PrimitiveKind) -> TypeDescriptor {
        TypeDescriptor::Primitive(kind)
    }

    pub fn list(element: TypeDescriptor) -> TypeDescriptor {
        TypeDescriptor::List(Arc::new(element))
    }

    pub fn map(key: TypeDescriptor, value: TypeDescriptor) -> TypeDescriptor {
        TypeDescriptor::Map(Arc::new(key), Arc::new(value))
    }

    /// Builds a struct descriptor. Field order is preserved and duplicate
    /// names are accepted as-is.
    pub fn structure<N>(fields: impl IntoIterator<Item = (N, TypeDescriptor)>) -> TypeDescriptor
    where
        N: Into<Arc<str>>,
    {
        TypeDescriptor::Struct(
            fields
                .into_iter()
                .map(|(name, data_type)| StructField::new(name, data_type))
                .collect(),
        )
    }

    pub fn category(&self) -> Category {
        match self {
            TypeDescriptor::Primitive(_) => Category::Primitive,
            TypeDescriptor::List(_) => Category::List,
            TypeDescriptor::Map(_, _) => Category::Map,
            TypeDescriptor::Struct(_) => Category::Struct,
        }
    }

    pub fn primitive_kind(&self) -> Result<PrimitiveKind> {
        match self {
            TypeDescriptor::Primitive(kind) => Ok(*kind),
            _ => Err(self.category_mismatch("primitive_kind", Category::Primitive)),
        }
    }

    pub fn element_type(&self) -> Result<&TypeDescriptor> {
        match self {
            TypeDescriptor::List(element) => Ok(element),
            _ => Err(self.category_mismatch("element_type", Category::List)),
        }
    }

    pub fn key_type(&self) -> Result<&TypeDescriptor> {
        match self {
            TypeDescriptor::Map(key, _) => Ok(key),
            _ => Err(self.category_mismatch("key_type", Category::Map)),
        }
    }

    pub fn value_type(&self) -> Result<&TypeDescriptor> {
        match self {
            TypeDescriptor::Map(_, value) => Ok(value),
            _ => Err(self.category_mismatch("value_type", Category::Map)),
        }
    }

    pub fn fields(&self) -> Result<&[StructField]> {
        match self {
            TypeDescriptor::Struct(fields) => Ok(fields),
            _ => Err(self.category_mismatch("fields", Category::Struct)),
        }
    }

    pub fn field_names(&self) -> Result<Vec<&str>> {
        Ok(self.fields()?.iter().map(StructField::name).collect())
    }

    pub fn field_types(&self) -> Result<Vec<&TypeDescriptor>> {
        Ok(self.fields()?.iter().map(StructField::data_type).collect())
    }

    /// Renders the descriptor in the canonical descriptor grammar, using the
    /// standard primitive names.
    pub fn to_canonical_string(&self) -> String {
        self.to_canonical_string_with(&StandardPrimitiveRegistry)
    }

    /// Renders the descriptor in the canonical descriptor grammar, naming
    /// primitives through `registry`.
    pub fn to_canonical_string_with(&self, registry: &dyn PrimitiveRegistry) -> String {
        let mut s = String::new();
        self.write_canonical(&mut s, registry)
            .expect("writing to a String");
        s
    }

    /// Returns a JSON description of the descriptor tree, intended for
    /// inspection and debugging.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::json;
        match self {
            TypeDescriptor::Primitive(kind) => json!({
                "category": "primitive",
                "kind": kind,
            }),
            TypeDescriptor::List(element) => json!({
                "category": LIST_TYPE_NAME,
                "element": element.to_json(),
            }),
            TypeDescriptor::Map(key, value) => json!({
                "category": MAP_TYPE_NAME,
                "key": key.to_json(),
                "value": value.to_json(),
            }),
            TypeDescriptor::Struct(fields) => json!({
                "category": STRUCT_TYPE_NAME,
                "fields": fields
                    .iter()
                    .map(|f| json!({ "name": f.name(), "type": f.data_type().to_json() }))
                    .collect::<Vec<_>>(),
            }),
        }
    }

    fn write_canonical(
        &self,
        out: &mut impl Write,
        registry: &dyn PrimitiveRegistry,
    ) -> std::fmt::Result {
        match self {
            TypeDescriptor::Primitive(kind) => out.write_str(registry.short_name(*kind)),
            TypeDescriptor::List(element) => {
                write!(out, "{LIST_TYPE_NAME}<")?;
                element.write_canonical(out, registry)?;
                out.write_char('>')
            }
            TypeDescriptor::Map(key, value) => {
                write!(out, "{MAP_TYPE_NAME}<")?;
                key.write_canonical(out, registry)?;
                out.write_char(',')?;
                value.write_canonical(out, registry)?;
                out.write_char('>')
            }
            TypeDescriptor::Struct(fields) => {
                write!(out, "{STRUCT_TYPE_NAME}<")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        out.write_char(',')?;
                    }
                    out.write_str(field.name())?;
                    out.write_char(':')?;
                    field.data_type().write_canonical(out, registry)?;
                }
                out.write_char('>')
            }
        }
    }

    #[cold]
    fn category_mismatch(&self, operation: &str, expected: Category) -> Error {
        Error::invalid_accessor(format!(
            "{operation} requires a {expected} descriptor, found {}",
            self.category()
        ))
    }
}

impl From<PrimitiveKind> for TypeDescriptor {
    fn from(kind: PrimitiveKind) -> Self {
        TypeDescriptor::Primitive(kind)
    }
}

impl std::fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.write_canonical(f, &StandardPrimitiveRegistry)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::hash_map::DefaultHasher,
        hash::{Hash, Hasher},
    };

    use super::*;

    fn hash_of(d: &TypeDescriptor) -> u64 {
        let mut h = DefaultHasher::new();
        d.hash(&mut h);
        h.finish()
    }

    fn sample() -> TypeDescriptor {
        TypeDescriptor::structure([
            ("a", TypeDescriptor::primitive(PrimitiveKind::Int)),
            (
                "b",
                TypeDescriptor::map(
                    PrimitiveKind::String.into(),
                    TypeDescriptor::list(PrimitiveKind::Double.into()),
                ),
            ),
        ])
    }

    #[test]
    fn test_structural_equality() {
        let a = sample();
        let b = sample();
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));

        let c = TypeDescriptor::structure([
            ("b", TypeDescriptor::primitive(PrimitiveKind::Int)),
            ("a", TypeDescriptor::primitive(PrimitiveKind::Int)),
        ]);
        let d = TypeDescriptor::structure([
            ("a", TypeDescriptor::primitive(PrimitiveKind::Int)),
            ("b", TypeDescriptor::primitive(PrimitiveKind::Int)),
        ]);
        assert_ne!(c, d);
    }

    #[test]
    fn test_category_accessors() {
        let d = sample();
        assert_eq!(d.category(), Category::Struct);
        assert_eq!(d.field_names().unwrap(), vec!["a", "b"]);
        let types = d.field_types().unwrap();
        assert_eq!(types[0].primitive_kind().unwrap(), PrimitiveKind::Int);
        assert_eq!(
            types[1].key_type().unwrap(),
            &TypeDescriptor::primitive(PrimitiveKind::String)
        );
        assert_eq!(
            types[1].value_type().unwrap().element_type().unwrap(),
            &TypeDescriptor::primitive(PrimitiveKind::Double)
        );
    }

    #[test]
    fn test_category_mismatch_is_invalid_accessor() {
        let d = TypeDescriptor::list(PrimitiveKind::Int.into());
        assert!(d.primitive_kind().unwrap_err().is_invalid_accessor());
        assert!(d.key_type().unwrap_err().is_invalid_accessor());
        assert!(d.value_type().unwrap_err().is_invalid_accessor());
        assert!(d.field_names().unwrap_err().is_invalid_accessor());
        assert!(d.field_types().unwrap_err().is_invalid_accessor());
        let p = TypeDescriptor::primitive(PrimitiveKind::Int);
        assert!(p.element_type().unwrap_err().is_invalid_accessor());
    }

    #[test]
    fn test_canonical_string() {
        assert_eq!(
            sample().to_canonical_string(),
            "struct<a:int,b:map<string,list<double>>>"
        );
        assert_eq!(sample().to_string(), sample().to_canonical_string());
        let empty = TypeDescriptor::Struct(Arc::from(Vec::<StructField>::new()));
        assert_eq!(empty.to_string(), "struct<>");
    }

    #[test]
    fn test_to_json() {
        let json = sample().to_json();
        assert_eq!(json["category"], "struct");
        assert_eq!(json["fields"][0]["name"], "a");
        assert_eq!(json["fields"][0]["type"]["kind"], "int");
        assert_eq!(json["fields"][1]["type"]["value"]["category"], "list");
    }
}
