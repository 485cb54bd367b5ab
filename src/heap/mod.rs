//! Heap auto-sizing.
//!
//! Disabled by default. When enabled through [`HeapPolicy::Auto`] and the
//! user gave no maximum heap flag, the ceiling is derived from the memory
//! the host can still hand out.
//!
//! [`HeapPolicy::Auto`]: crate::config::HeapPolicy::Auto

mod meminfo;
mod reactor;
mod sizer;

pub use meminfo::{MemorySnapshot, MemoryStatus, ProcMemInfo};
pub use reactor::HeapReactor;
pub use sizer::{HeapAutoSizer, HeapProposal};

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Heap ceiling shared with the memory balloon; 0 means "not auto-sized".
#[derive(Debug, Clone, Default)]
pub struct HeapCeiling(Arc<AtomicU64>);

impl HeapCeiling {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, bytes: u64) {
        self.0.store(bytes, Ordering::SeqCst);
    }

    /// Withdraw the ceiling once the VM it was chosen for exists.
    pub fn reset(&self) {
        self.0.store(0, Ordering::SeqCst);
    }

    /// Configured ceiling in bytes, if auto-sizing chose one.
    pub fn get(&self) -> Option<u64> {
        match self.0.load(Ordering::SeqCst) {
            0 => None,
            bytes => Some(bytes),
        }
    }
}
