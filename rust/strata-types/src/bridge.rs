//! Conversion between type descriptors and accessors.

use std::sync::{Arc, RwLock};

use ahash::AHashMap;
use strata_common::{Result, error::Error};

use crate::{
    accessor::{Accessor, AccessorCategory, AccessorFactory, AccessorField, AccessorRef},
    descriptor::TypeDescriptor,
};

/// Memoized descriptor-to-accessor conversion.
///
/// Entries are keyed by structural descriptor equality and are never evicted,
/// so the number of accessors ever built is bounded by the number of distinct
/// descriptors seen, not by the number of rows processed.
///
/// Concurrent misses on the same key may each build an accessor, but only the
/// first one inserted is kept and every caller receives that instance.
pub struct AccessorCache {
    cache: RwLock<AHashMap<TypeDescriptor, AccessorRef>>,
    factory: Arc<dyn AccessorFactory>,
}

impl AccessorCache {
    pub fn new(factory: Arc<dyn AccessorFactory>) -> AccessorCache {
        AccessorCache {
            cache: Default::default(),
            factory,
        }
    }

    /// Returns the accessor for `descriptor`, building and caching it (and any
    /// nested accessors) on first use.
    pub fn accessor_for(&self, descriptor: &TypeDescriptor) -> AccessorRef {
        if let Some(cached) = self.try_get_cached(descriptor) {
            return cached;
        }
        let accessor = match descriptor {
            TypeDescriptor::Primitive(kind) => self.factory.primitive(*kind),
            TypeDescriptor::List(element) => self.factory.list(self.accessor_for(element)),
            TypeDescriptor::Map(key, value) => self
                .factory
                .map(self.accessor_for(key), self.accessor_for(value)),
            TypeDescriptor::Struct(fields) => {
                let fields = fields
                    .iter()
                    .map(|f| AccessorField::new(f.name(), self.accessor_for(f.data_type())))
                    .collect();
                self.factory.structure(fields)
            }
        };
        log::debug!("accessor cache miss for '{descriptor}'");
        self.put_if_absent(descriptor, accessor)
    }

    /// Returns the cached accessor for `descriptor` without building one.
    pub fn get(&self, descriptor: &TypeDescriptor) -> Option<AccessorRef> {
        self.try_get_cached(descriptor)
    }

    /// Number of distinct descriptors cached so far, nested ones included.
    pub fn len(&self) -> usize {
        self.cache.read().expect("read lock").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn try_get_cached(&self, descriptor: &TypeDescriptor) -> Option<AccessorRef> {
        self.cache.read().expect("read lock").get(descriptor).cloned()
    }

    fn put_if_absent(&self, descriptor: &TypeDescriptor, accessor: AccessorRef) -> AccessorRef {
        self.cache
            .write()
            .expect("write lock")
            .entry(descriptor.clone())
            .or_insert(accessor)
            .clone()
    }
}

/// Reconstructs the descriptor of an accessor tree.
///
/// Fails with `InvalidAccessor` when a node's category has no descriptor
/// counterpart, or when a node does not provide the navigation its category
/// promises.
pub fn descriptor_for(accessor: &dyn Accessor) -> Result<TypeDescriptor> {
    match accessor.category() {
        AccessorCategory::Primitive => {
            let kind = accessor
                .primitive_kind()
                .ok_or_else(|| missing_part(accessor, "primitive kind"))?;
            Ok(TypeDescriptor::Primitive(kind))
        }
        AccessorCategory::List => {
            let element = accessor
                .element_accessor()
                .ok_or_else(|| missing_part(accessor, "element accessor"))?;
            Ok(TypeDescriptor::list(descriptor_for(element.as_ref())?))
        }
        AccessorCategory::Map => {
            let key = accessor
                .key_accessor()
                .ok_or_else(|| missing_part(accessor, "key accessor"))?;
            let value = accessor
                .value_accessor()
                .ok_or_else(|| missing_part(accessor, "value accessor"))?;
            Ok(TypeDescriptor::map(
                descriptor_for(key.as_ref())?,
                descriptor_for(value.as_ref())?,
            ))
        }
        AccessorCategory::Struct => {
            let fields = accessor
                .struct_fields()
                .iter()
                .map(|f| Ok((f.name(), descriptor_for(f.accessor().as_ref())?)))
                .collect::<Result<Vec<_>>>()?;
            Ok(TypeDescriptor::structure(fields))
        }
        AccessorCategory::Union => Err(Error::invalid_accessor(format!(
            "unknown accessor category {:?}",
            accessor.category()
        ))),
    }
}

#[cold]
fn missing_part(accessor: &dyn Accessor, part: &str) -> Error {
    Error::invalid_accessor(format!(
        "{:?} accessor does not provide a {part}",
        accessor.category()
    ))
}
