//! Launch option assembly.
//!
//! ```text
//! mandatory → agents → auto heap → user runtime options
//! ```

mod agents;
mod builder;

pub use agents::{discover_agents, AgentDescriptor, AgentPattern};
pub use builder::{build_launch_options, mandatory_options, MANDATORY_OPTION_COUNT};

/// Where an option came from; also its position class in the final list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum OptionSource {
    Mandatory,
    Agent,
    AutoHeap,
    User,
}

/// One option string handed to VM creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchOption {
    value: String,
    source: OptionSource,
}

impl LaunchOption {
    pub fn new(value: impl Into<String>, source: OptionSource) -> Self {
        Self {
            value: value.into(),
            source,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn source(&self) -> OptionSource {
        self.source
    }
}

/// The final, ordered option list. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchOptions {
    options: Vec<LaunchOption>,
}

impl LaunchOptions {
    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LaunchOption> {
        self.options.iter()
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.options.iter().map(LaunchOption::value)
    }

    pub fn count_from(&self, source: OptionSource) -> usize {
        self.options.iter().filter(|o| o.source == source).count()
    }
}

impl<'a> IntoIterator for &'a LaunchOptions {
    type Item = &'a LaunchOption;
    type IntoIter = std::slice::Iter<'a, LaunchOption>;

    fn into_iter(self) -> Self::IntoIter {
        self.options.iter()
    }
}
