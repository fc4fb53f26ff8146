//! Slot factories that count what the wrapped factory does.

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use strata_common::Result;
use strata_row::{
    Value,
    selector::ColumnMapSelection,
    slot::{FieldSlot, SlotFactory, SlotInput},
};
use strata_types::accessor::AccessorRef;

/// Shared counters of a [`CountingSlotFactory`].
#[derive(Debug, Default)]
pub struct SlotCounters {
    created: AtomicUsize,
    loads: AtomicUsize,
}

impl SlotCounters {
    /// Number of slots created so far.
    pub fn created(&self) -> usize {
        self.created.load(Ordering::Relaxed)
    }

    /// Number of `load` calls across all created slots.
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }
}

/// Wraps a slot factory, counting created slots and decodes.
pub struct CountingSlotFactory {
    inner: Arc<dyn SlotFactory>,
    counters: Arc<SlotCounters>,
}

impl CountingSlotFactory {
    pub fn new(inner: Arc<dyn SlotFactory>) -> CountingSlotFactory {
        CountingSlotFactory {
            inner,
            counters: Default::default(),
        }
    }

    pub fn counters(&self) -> Arc<SlotCounters> {
        self.counters.clone()
    }

    fn wrap(&self, slot: Box<dyn FieldSlot>) -> Box<dyn FieldSlot> {
        self.counters.created.fetch_add(1, Ordering::Relaxed);
        Box::new(CountingSlot {
            inner: slot,
            counters: self.counters.clone(),
        })
    }
}

impl SlotFactory for CountingSlotFactory {
    fn create_slot(&self, accessor: &AccessorRef) -> Result<Box<dyn FieldSlot>> {
        Ok(self.wrap(self.inner.create_slot(accessor)?))
    }

    fn create_column_map_slot(
        &self,
        accessor: &AccessorRef,
        selection: ColumnMapSelection,
    ) -> Result<Box<dyn FieldSlot>> {
        Ok(self.wrap(self.inner.create_column_map_slot(accessor, selection)?))
    }
}

struct CountingSlot {
    inner: Box<dyn FieldSlot>,
    counters: Arc<SlotCounters>,
}

impl FieldSlot for CountingSlot {
    fn load(&mut self, input: SlotInput<'_>) -> Result<()> {
        self.counters.loads.fetch_add(1, Ordering::Relaxed);
        self.inner.load(input)
    }

    fn value(&self) -> &Value {
        self.inner.value()
    }
}
