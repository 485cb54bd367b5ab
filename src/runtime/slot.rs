use parking_lot::RwLock;

/// Lifecycle of a [`RuntimeSlot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    Unset,
    Published,
    /// Terminal: a cleared slot is never published again.
    Cleared,
}

enum Slot<H> {
    Unset,
    Published(H),
    Cleared,
}

/// Process-wide place where the running VM's handle can be looked up.
///
/// Written once after creation, cleared when the VM announces it is
/// stopping. Readers only see the handle inside [`RuntimeSlot::with`], so
/// a concurrent clear waits for them to finish.
pub struct RuntimeSlot<H> {
    slot: RwLock<Slot<H>>,
}

impl<H> Default for RuntimeSlot<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> RuntimeSlot<H> {
    pub fn new() -> Self {
        Self {
            slot: RwLock::new(Slot::Unset),
        }
    }

    /// Publish `handle`. Returns false if the slot was already used.
    pub fn publish(&self, handle: H) -> bool {
        let mut slot = self.slot.write();
        match *slot {
            Slot::Unset => {
                *slot = Slot::Published(handle);
                true
            }
            Slot::Published(_) | Slot::Cleared => false,
        }
    }

    /// Clear a published handle. Returns false if nothing was published.
    pub fn clear(&self) -> bool {
        let mut slot = self.slot.write();
        match *slot {
            Slot::Published(_) => {
                *slot = Slot::Cleared;
                true
            }
            Slot::Unset | Slot::Cleared => false,
        }
    }

    /// Run `f` with the handle, if one is published right now.
    pub fn with<R>(&self, f: impl FnOnce(&H) -> R) -> Option<R> {
        match &*self.slot.read() {
            Slot::Published(handle) => Some(f(handle)),
            Slot::Unset | Slot::Cleared => None,
        }
    }

    pub fn state(&self) -> SlotState {
        match *self.slot.read() {
            Slot::Unset => SlotState::Unset,
            Slot::Published(_) => SlotState::Published,
            Slot::Cleared => SlotState::Cleared,
        }
    }

    /// True once a handle has been published, even if since cleared.
    pub fn was_published(&self) -> bool {
        self.state() != SlotState::Unset
    }
}
