//! Value accessors: runtime handles for reading a value of a given type.
//!
//! An accessor tree mirrors a [`TypeDescriptor`](crate::descriptor::TypeDescriptor)
//! tree. Consumers navigate it by category; producers compose it through an
//! [`AccessorFactory`]. The standard implementation is [`StandardAccessor`].

use std::sync::Arc;

use crate::primitive::PrimitiveKind;

/// Shared handle to an accessor.
pub type AccessorRef = Arc<dyn Accessor>;

/// The category of an accessor node.
///
/// `Union` exists in the accessor model but has no descriptor counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessorCategory {
    Primitive,
    List,
    Map,
    Struct,
    Union,
}

/// A runtime capability for reading values of one type.
///
/// Navigation methods return `None` (or an empty slice) when they do not apply
/// to the accessor's category.
pub trait Accessor: Send + Sync + std::fmt::Debug {
    fn category(&self) -> AccessorCategory;

    fn primitive_kind(&self) -> Option<PrimitiveKind> {
        None
    }

    fn element_accessor(&self) -> Option<&AccessorRef> {
        None
    }

    fn key_accessor(&self) -> Option<&AccessorRef> {
        None
    }

    fn value_accessor(&self) -> Option<&AccessorRef> {
        None
    }

    fn struct_fields(&self) -> &[AccessorField] {
        &[]
    }

    /// Returns the position of the first struct field named `name`.
    fn field_index(&self, name: &str) -> Option<usize> {
        self.struct_fields().iter().position(|f| f.name() == name)
    }
}

/// A named struct member within an accessor tree.
#[derive(Debug, Clone)]
pub struct AccessorField {
    name: Arc<str>,
    accessor: AccessorRef,
}

impl AccessorField {
    pub fn new(name: impl Into<Arc<str>>, accessor: AccessorRef) -> AccessorField {
        AccessorField {
            name: name.into(),
            accessor,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn accessor(&self) -> &AccessorRef {
        &self.accessor
    }
}

/// Composes accessors from their nested parts.
pub trait AccessorFactory: Send + Sync {
    fn primitive(&self, kind: PrimitiveKind) -> AccessorRef;

    fn list(&self, element: AccessorRef) -> AccessorRef;

    fn map(&self, key: AccessorRef, value: AccessorRef) -> AccessorRef;

    fn structure(&self, fields: Vec<AccessorField>) -> AccessorRef;
}

/// The standard accessor tree.
#[derive(Debug)]
pub enum StandardAccessor {
    Primitive(PrimitiveKind),
    List(AccessorRef),
    Map(AccessorRef, AccessorRef),
    Struct(Vec<AccessorField>),
}

impl Accessor for StandardAccessor {
    fn category(&self) -> AccessorCategory {
        match self {
            StandardAccessor::Primitive(_) => AccessorCategory::Primitive,
            StandardAccessor::List(_) => AccessorCategory::List,
            StandardAccessor::Map(_, _) => AccessorCategory::Map,
            StandardAccessor::Struct(_) => AccessorCategory::Struct,
        }
    }

    fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self {
            StandardAccessor::Primitive(kind) => Some(*kind),
            _ => None,
        }
    }

    fn element_accessor(&self) -> Option<&AccessorRef> {
        match self {
            StandardAccessor::List(element) => Some(element),
            _ => None,
        }
    }

    fn key_accessor(&self) -> Option<&AccessorRef> {
        match self {
            StandardAccessor::Map(key, _) => Some(key),
            _ => None,
        }
    }

    fn value_accessor(&self) -> Option<&AccessorRef> {
        match self {
            StandardAccessor::Map(_, value) => Some(value),
            _ => None,
        }
    }

    fn struct_fields(&self) -> &[AccessorField] {
        match self {
            StandardAccessor::Struct(fields) => fields,
            _ => &[],
        }
    }
}

/// Factory producing [`StandardAccessor`] nodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardAccessorFactory;

impl AccessorFactory for StandardAccessorFactory {
    fn primitive(&self, kind: PrimitiveKind) -> AccessorRef {
        Arc::new(StandardAccessor::Primitive(kind))
    }

    fn list(&self, element: AccessorRef) -> AccessorRef {
        Arc::new(StandardAccessor::List(element))
    }

    fn map(&self, key: AccessorRef, value: AccessorRef) -> AccessorRef {
        Arc::new(StandardAccessor::Map(key, value))
    }

    fn structure(&self, fields: Vec<AccessorField>) -> AccessorRef {
        Arc::new(StandardAccessor::Struct(fields))
    }
}
