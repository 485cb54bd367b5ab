//! Argument handling for the launcher.
//!
//! ```text
//! argv → Classify → {runtime options, application arguments, heap flags}
//! ```
//!
//! Runtime options are forwarded to VM creation; everything else is handed
//! verbatim to the bootstrap class's `main`.

mod classifier;
mod registry;

pub use classifier::{classify, ArgumentSet, ClassifiedArg, HeapFlag, HeapFlags};
pub use registry::{flag_registry, FlagDef, FlagKind, HeapBound, APPLICATION_MARKER, FLAG_PREFIX};
