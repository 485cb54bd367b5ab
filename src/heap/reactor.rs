use std::sync::Arc;

use crate::runtime::RuntimeSlot;

/// Reacts to memory pressure on an auto-sized VM, e.g. by shrinking its heap.
///
/// Only engaged when the launcher picked the heap ceiling itself. A user
/// who set the heap explicitly is left alone.
pub trait HeapReactor<H>: Send + Sync {
    /// Called after creation, before the bootstrap class runs.
    fn engage(&self, slot: Arc<RuntimeSlot<H>>, ceiling_bytes: u64);

    /// Called once bootstrap returns, before the VM is destroyed.
    fn disengage(&self);
}
