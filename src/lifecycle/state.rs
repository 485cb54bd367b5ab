use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// Where a launch is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LaunchState {
    Unstarted = 0,
    LibraryLoaded = 1,
    ConfigPrepared = 2,
    RuntimeCreated = 3,
    BootstrapInvoked = 4,
    Returned = 5,
    Faulted = 6,
    TornDown = 7,
}

/// Shared, lock-free view of a launch's [`LaunchState`].
#[derive(Debug, Clone)]
pub struct StateTracker {
    state: Arc<AtomicU8>,
}

impl StateTracker {
    pub fn new() -> Self {
        Self {
            state: Arc::new(AtomicU8::new(LaunchState::Unstarted as u8)),
        }
    }

    pub fn get(&self) -> LaunchState {
        match self.state.load(Ordering::SeqCst) {
            0 => LaunchState::Unstarted,
            1 => LaunchState::LibraryLoaded,
            2 => LaunchState::ConfigPrepared,
            3 => LaunchState::RuntimeCreated,
            4 => LaunchState::BootstrapInvoked,
            5 => LaunchState::Returned,
            6 => LaunchState::Faulted,
            _ => LaunchState::TornDown,
        }
    }

    pub fn advance(&self, state: LaunchState) {
        self.state.store(state as u8, Ordering::SeqCst);
        tracing::debug!("launch state: {:?}", state);
    }
}

impl Default for StateTracker {
    fn default() -> Self {
        Self::new()
    }
}
