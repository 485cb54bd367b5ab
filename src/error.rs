//! Launch error taxonomy and exit code mapping.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;

/// Which piece of the bootstrap entry point could not be found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapMissing {
    /// The class does not exist on the VM's class path.
    Class,
    /// Loading the class raised an exception (already described and cleared).
    ClassLoadFailed,
    /// The class exists but has no matching static method.
    Method { name: String, signature: String },
    /// The stop callback could not be registered on the class.
    StopCallback { name: String, signature: String },
}

/// Fatal conditions that end a launch.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The runtime library could not be loaded.
    #[error("Can't load runtime library '{path}': {reason}")]
    LibraryUnavailable { path: PathBuf, reason: String },

    /// A required entry point is absent from the runtime library.
    #[error("Failed looking up {symbol}() in '{path}'")]
    SymbolMissing { path: PathBuf, symbol: String },

    /// The runtime refused to create a VM.
    #[error("Can't create VM (status {status})")]
    Creation { status: i32 },

    /// Bootstrap class or method lookup failed after creation.
    #[error("{}", describe_bootstrap(.class, .missing))]
    BootstrapLookup {
        class: String,
        missing: BootstrapMissing,
    },

    /// An argument or option cannot be passed across the FFI boundary.
    #[error("Invalid argument '{arg}': {reason}")]
    InvalidArgument { arg: String, reason: String },

    /// The launch worker thread panicked or could not start.
    #[error("Launcher thread failed: {0}")]
    Worker(String),
}

fn describe_bootstrap(class: &str, missing: &BootstrapMissing) -> String {
    match missing {
        BootstrapMissing::Class => format!("Can't find class {}", class),
        BootstrapMissing::ClassLoadFailed => format!("Failed to load {}", class),
        BootstrapMissing::Method { name, signature } => {
            format!("Can't find {}{} in class {}", name, signature, class)
        }
        BootstrapMissing::StopCallback { name, signature } => {
            format!("Can't register native {}{} on class {}", name, signature, class)
        }
    }
}

impl LaunchError {
    /// Resolution failures happen before any runtime state exists.
    pub fn is_resolution(&self) -> bool {
        matches!(
            self,
            LaunchError::LibraryUnavailable { .. } | LaunchError::SymbolMissing { .. }
        )
    }

    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        1
    }
}

/// An exception left pending by the bootstrap `main`.
///
/// Never fatal to the launcher: it is described, cleared and logged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Application raised an uncaught exception: {description}")]
pub struct ApplicationFault {
    pub description: String,
}
