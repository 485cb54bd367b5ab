//! Option builder: every VM option in one place, in creation order.

use crate::args::{ArgumentSet, HeapBound, HeapFlags};
use crate::config::PropertiesConfig;
use crate::heap::HeapProposal;
use crate::options::{AgentDescriptor, LaunchOption, LaunchOptions, OptionSource};

/// Number of options [`mandatory_options`] produces.
pub const MANDATORY_OPTION_COUNT: usize = 4;

/// Options every VM is created with: empty class path, system class
/// loader, log manager, launcher version.
pub fn mandatory_options(
    properties: &PropertiesConfig,
    version: &str,
) -> [LaunchOption; MANDATORY_OPTION_COUNT] {
    let define = |name: &str, value: &str| {
        LaunchOption::new(format!("-D{}={}", name, value), OptionSource::Mandatory)
    };
    [
        define("java.class.path", &properties.class_path),
        define("java.system.class.loader", &properties.system_class_loader),
        define("java.util.logging.manager", &properties.log_manager),
        define(&properties.version_property, version),
    ]
}

/// Build the final option list.
///
/// Order is fixed: mandatory options, one `-agentpath:` per agent in
/// discovery order, auto heap options, then the user's runtime options as
/// classified.
pub fn build_launch_options(
    properties: &PropertiesConfig,
    version: &str,
    agents: Vec<AgentDescriptor>,
    heap: Option<&HeapProposal>,
    args: &ArgumentSet,
) -> LaunchOptions {
    OptionBuilder::new()
        .with_mandatory(properties, version)
        .with_agents(agents)
        .with_heap(heap, &args.heap)
        .with_runtime_args(args)
        .build()
}

/// Builder for the option list passed to VM creation.
#[derive(Debug, Default)]
struct OptionBuilder {
    options: Vec<LaunchOption>,
}

impl OptionBuilder {
    fn new() -> Self {
        Self::default()
    }

    fn with_mandatory(mut self, properties: &PropertiesConfig, version: &str) -> Self {
        self.options.extend(mandatory_options(properties, version));
        self
    }

    fn with_agents(mut self, agents: Vec<AgentDescriptor>) -> Self {
        self.options
            .extend(agents.into_iter().map(AgentDescriptor::into_option));
        self
    }

    /// Auto heap options, minus any bound the user already set.
    fn with_heap(mut self, proposal: Option<&HeapProposal>, user: &HeapFlags) -> Self {
        let Some(proposal) = proposal else {
            return self;
        };
        for option in proposal.options() {
            let user_set = match HeapBound::of(option.value()) {
                Some(HeapBound::Max) => user.has_max(),
                Some(HeapBound::Min) => user.has_min(),
                None => false,
            };
            if user_set {
                tracing::debug!(option = option.value(), "user heap flag wins over auto size");
                continue;
            }
            self.options.push(option.clone());
        }
        self
    }

    fn with_runtime_args(mut self, args: &ArgumentSet) -> Self {
        self.options.extend(
            args.runtime_options()
                .map(|arg| LaunchOption::new(arg, OptionSource::User)),
        );
        self
    }

    fn build(self) -> LaunchOptions {
        LaunchOptions {
            options: self.options,
        }
    }
}
