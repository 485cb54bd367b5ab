use crate::args::HeapFlags;
use crate::config::{HeapConfig, HeapPolicy};
use crate::heap::{HeapCeiling, MemoryStatus};
use crate::options::{LaunchOption, OptionSource};

/// Heap options chosen by the auto-sizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeapProposal {
    ceiling_bytes: u64,
    options: Vec<LaunchOption>,
}

impl HeapProposal {
    pub fn ceiling_bytes(&self) -> u64 {
        self.ceiling_bytes
    }

    pub fn options(&self) -> &[LaunchOption] {
        &self.options
    }

    /// Make the ceiling visible to the memory balloon.
    pub fn publish(&self, ceiling: &HeapCeiling) {
        ceiling.set(self.ceiling_bytes);
    }
}

/// Proposes `-Xmx`/`-Xms` from the host's free memory.
///
/// An explicit maximum heap flag is a declaration of intent: the sizer
/// then stays out of the way entirely.
pub struct HeapAutoSizer<'a> {
    policy: HeapPolicy,
    min_memory_bytes: u64,
    memory: &'a dyn MemoryStatus,
}

impl<'a> HeapAutoSizer<'a> {
    pub fn new(config: &HeapConfig, memory: &'a dyn MemoryStatus) -> Self {
        Self {
            policy: config.policy,
            min_memory_bytes: config.min_memory_bytes,
            memory,
        }
    }

    pub fn propose(&self, user: &HeapFlags) -> Option<HeapProposal> {
        if self.policy == HeapPolicy::Disabled {
            tracing::debug!("heap auto-sizing disabled");
            return None;
        }
        if let Some(max) = &user.max {
            tracing::info!(flag = %max.arg, "maximum heap set explicitly, not auto-sizing");
            return None;
        }

        let limit = match self.memory.snapshot() {
            Ok(snapshot) => snapshot.limit(),
            Err(e) => {
                tracing::warn!(error = %e, "memory status unavailable, not auto-sizing heap");
                return None;
            }
        };

        let ceiling_mb = limit >> 20;
        let ceiling_bytes = ceiling_mb << 20;
        if ceiling_bytes <= self.min_memory_bytes {
            tracing::info!(
                ceiling_bytes,
                min_memory_bytes = self.min_memory_bytes,
                "not enough memory to auto-size heap"
            );
            return None;
        }

        let mut options = vec![LaunchOption::new(
            format!("-Xmx{}M", ceiling_mb),
            OptionSource::AutoHeap,
        )];
        if !user.has_min() {
            options.push(LaunchOption::new(
                format!("-Xms{}M", ceiling_mb),
                OptionSource::AutoHeap,
            ));
        }

        tracing::info!(ceiling_mb, "auto-sized heap");
        Some(HeapProposal {
            ceiling_bytes,
            options,
        })
    }
}
