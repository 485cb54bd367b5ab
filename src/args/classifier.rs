//! Argument classifier: raw args → runtime options + application args.

use crate::args::registry::{FlagDef, FlagKind, HeapBound, APPLICATION_MARKER, FLAG_PREFIX};

/// A classified argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifiedArg {
    /// Consumed by the launcher and forwarded to VM creation.
    Runtime { arg: String, kind: FlagKind },
    /// Forwarded to the bootstrap class's `main`.
    Application(String),
}

impl ClassifiedArg {
    pub fn as_str(&self) -> &str {
        match self {
            ClassifiedArg::Runtime { arg, .. } => arg,
            ClassifiedArg::Application(arg) => arg,
        }
    }
}

/// First occurrence of a heap sizing flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeapFlag {
    /// Position in the raw argument vector.
    pub index: usize,
    pub arg: String,
}

/// Heap sizing flags the user supplied, first occurrence only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeapFlags {
    pub min: Option<HeapFlag>,
    pub max: Option<HeapFlag>,
}

impl HeapFlags {
    fn mark(&mut self, index: usize, arg: &str) {
        let slot = match HeapBound::of(arg) {
            Some(HeapBound::Min) => &mut self.min,
            Some(HeapBound::Max) => &mut self.max,
            None => return,
        };
        if slot.is_none() {
            *slot = Some(HeapFlag {
                index,
                arg: arg.to_string(),
            });
        }
    }

    pub fn has_min(&self) -> bool {
        self.min.is_some()
    }

    pub fn has_max(&self) -> bool {
        self.max.is_some()
    }
}

/// Result of classifying raw arguments.
#[derive(Debug, Clone, Default)]
pub struct ArgumentSet {
    /// Classified arguments in original order.
    pub args: Vec<ClassifiedArg>,
    pub heap: HeapFlags,
}

impl ArgumentSet {
    /// Runtime options in original order.
    pub fn runtime_options(&self) -> impl Iterator<Item = &str> {
        self.args.iter().filter_map(|a| match a {
            ClassifiedArg::Runtime { arg, .. } => Some(arg.as_str()),
            ClassifiedArg::Application(_) => None,
        })
    }

    /// Application arguments in original order.
    pub fn application_args(&self) -> impl Iterator<Item = &str> {
        self.args.iter().filter_map(|a| match a {
            ClassifiedArg::Application(arg) => Some(arg.as_str()),
            ClassifiedArg::Runtime { .. } => None,
        })
    }

    pub fn runtime_option_count(&self) -> usize {
        self.runtime_options().count()
    }
}

/// Classify raw args (program name excluded) against the registry.
///
/// Scanning stops for good at [`APPLICATION_MARKER`] or the first token
/// without the flag prefix. Unknown flags before that point stay with the
/// application.
pub fn classify(raw_args: &[String], registry: &[FlagDef]) -> ArgumentSet {
    let mut set = ArgumentSet::default();
    let mut scanning = true;

    for (index, arg) in raw_args.iter().enumerate() {
        if scanning && (arg == APPLICATION_MARKER || !arg.starts_with(FLAG_PREFIX)) {
            scanning = false;
        }

        if !scanning {
            set.args.push(ClassifiedArg::Application(arg.clone()));
            continue;
        }

        set.heap.mark(index, arg);

        match registry.iter().find(|d| d.matches(arg)) {
            Some(def) => set.args.push(ClassifiedArg::Runtime {
                arg: arg.clone(),
                kind: def.kind,
            }),
            None => set.args.push(ClassifiedArg::Application(arg.clone())),
        }
    }

    set
}
