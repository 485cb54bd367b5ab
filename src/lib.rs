//! jvmlaunch: embeds a Java virtual machine in the current process.
//!
//! ```text
//! argv → Classify → Build options → Create VM → Invoke bootstrap → Tear down
//! ```

pub mod args;
pub mod cli;
pub mod config;
pub mod error;
pub mod heap;
pub mod lifecycle;
pub mod logging;
pub mod options;
pub mod runtime;

pub use error::LaunchError;
