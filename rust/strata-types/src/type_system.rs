//! The context that ties parsing, rendering and accessor memoization together.

use std::sync::Arc;

use strata_common::Result;

use crate::{
    accessor::{Accessor, AccessorFactory, AccessorRef, StandardAccessorFactory},
    bridge::{AccessorCache, descriptor_for},
    descriptor::TypeDescriptor,
    parser::TypeDescriptorParser,
    primitive::{PrimitiveRegistry, StandardPrimitiveRegistry},
};

/// Owns the primitive registry, the accessor factory and the descriptor cache.
///
/// A `TypeSystem` is meant to be long-lived and shared (typically behind an
/// `Arc`) by everything that reads rows of the same schemas. The cache it holds
/// is populated on demand and never shrinks.
pub struct TypeSystem {
    registry: Arc<dyn PrimitiveRegistry>,
    cache: AccessorCache,
}

impl TypeSystem {
    /// Creates a type system with the standard registry and accessor factory.
    pub fn new() -> TypeSystem {
        TypeSystem {
            registry: Arc::new(StandardPrimitiveRegistry),
            cache: AccessorCache::new(Arc::new(StandardAccessorFactory)),
        }
    }

    /// Replaces the primitive registry. The accessor cache is unaffected since
    /// it is keyed by descriptors, not by names.
    pub fn with_registry(mut self, registry: Arc<dyn PrimitiveRegistry>) -> TypeSystem {
        self.registry = registry;
        self
    }

    /// Replaces the accessor factory, discarding any accessors cached so far.
    pub fn with_factory(mut self, factory: Arc<dyn AccessorFactory>) -> TypeSystem {
        self.cache = AccessorCache::new(factory);
        self
    }

    pub fn registry(&self) -> &dyn PrimitiveRegistry {
        self.registry.as_ref()
    }

    pub fn accessor_cache(&self) -> &AccessorCache {
        &self.cache
    }

    /// Parses a separator-delimited list of type descriptors.
    pub fn parse_all(&self, s: &str) -> Result<Vec<TypeDescriptor>> {
        TypeDescriptorParser::new(s, self.registry.as_ref()).parse_all()
    }

    /// Parses a single type descriptor (the first of a type list).
    pub fn parse(&self, s: &str) -> Result<TypeDescriptor> {
        TypeDescriptorParser::new(s, self.registry.as_ref()).parse_first()
    }

    /// Returns the memoized accessor for `descriptor`.
    pub fn accessor_for(&self, descriptor: &TypeDescriptor) -> AccessorRef {
        self.cache.accessor_for(descriptor)
    }

    /// Parses `s` and returns the memoized accessor for the resulting type.
    pub fn accessor_for_type_string(&self, s: &str) -> Result<AccessorRef> {
        Ok(self.accessor_for(&self.parse(s)?))
    }

    /// Reconstructs the descriptor of an externally supplied accessor.
    pub fn descriptor_for(&self, accessor: &dyn Accessor) -> Result<TypeDescriptor> {
        descriptor_for(accessor)
    }

    /// Renders `descriptor` in canonical form, naming primitives through this
    /// type system's registry.
    pub fn type_string(&self, descriptor: &TypeDescriptor) -> String {
        descriptor.to_canonical_string_with(self.registry.as_ref())
    }
}

impl Default for TypeSystem {
    fn default() -> Self {
        TypeSystem::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        accessor::{AccessorCategory, AccessorField},
        primitive::{AliasPrimitiveRegistry, PrimitiveKind},
    };

    #[test]
    fn test_parse_and_bridge() {
        let types = TypeSystem::new();
        let accessor = types
            .accessor_for_type_string("struct<name:string,scores:list<double>>")
            .unwrap();
        assert_eq!(accessor.category(), AccessorCategory::Struct);
        assert_eq!(accessor.field_index("scores"), Some(1));

        let d = types.descriptor_for(accessor.as_ref()).unwrap();
        assert_eq!(types.type_string(&d), "struct<name:string,scores:list<double>>");
        assert!(Arc::ptr_eq(&types.accessor_for(&d), &accessor));
    }

    #[test]
    fn test_custom_registry() {
        let registry = AliasPrimitiveRegistry::new()
            .with_alias("text", PrimitiveKind::String)
            .unwrap();
        let types = TypeSystem::new().with_registry(Arc::new(registry));
        let d = types.parse("map<text,int>").unwrap();
        assert_eq!(types.type_string(&d), "map<string,int>");
    }

    #[derive(Debug)]
    struct Tagged(PrimitiveKind);

    impl Accessor for Tagged {
        fn category(&self) -> AccessorCategory {
            AccessorCategory::Primitive
        }

        fn primitive_kind(&self) -> Option<PrimitiveKind> {
            Some(self.0)
        }
    }

    struct TaggedFactory;

    impl AccessorFactory for TaggedFactory {
        fn primitive(&self, kind: PrimitiveKind) -> AccessorRef {
            Arc::new(Tagged(kind))
        }

        fn list(&self, element: AccessorRef) -> AccessorRef {
            StandardAccessorFactory.list(element)
        }

        fn map(&self, key: AccessorRef, value: AccessorRef) -> AccessorRef {
            StandardAccessorFactory.map(key, value)
        }

        fn structure(&self, fields: Vec<AccessorField>) -> AccessorRef {
            StandardAccessorFactory.structure(fields)
        }
    }

    #[test]
    fn test_custom_factory() {
        let types = TypeSystem::new().with_factory(Arc::new(TaggedFactory));
        let accessor = types.accessor_for_type_string("list<int>").unwrap();
        let element = accessor.element_accessor().unwrap();
        assert!(format!("{element:?}").starts_with("Tagged"));
        assert_eq!(
            types.descriptor_for(accessor.as_ref()).unwrap(),
            TypeDescriptor::list(TypeDescriptor::primitive(PrimitiveKind::Int))
        );
    }

    #[test]
    fn test_malformed_input_surfaces() {
        let types = TypeSystem::new();
        let err = types.accessor_for_type_string("map<int>").unwrap_err();
        assert!(err.is_malformed());
        assert_eq!(err.position(), Some(7));
        assert!(types.accessor_cache().is_empty());
    }
}
