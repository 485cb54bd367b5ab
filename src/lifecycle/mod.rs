//! Launch lifecycle: drives the VM from library load to teardown.
//!
//! ```text
//! Unstarted → LibraryLoaded → ConfigPrepared → RuntimeCreated
//!           → BootstrapInvoked → {Returned | Faulted} → TornDown
//! ```
//!
//! Once the VM exists, teardown (detach, then destroy) runs exactly once on
//! every path out of [`Launcher::run`], including bootstrap lookup failures
//! and panics.

mod state;

pub use state::{LaunchState, StateTracker};

use std::path::Path;
use std::sync::Arc;

use crate::args::{classify, flag_registry, ArgumentSet};
use crate::config::{Config, ConfigError};
use crate::error::{BootstrapMissing, LaunchError};
use crate::heap::{HeapAutoSizer, HeapCeiling, HeapProposal, HeapReactor, MemoryStatus, ProcMemInfo};
use crate::options::{build_launch_options, discover_agents, AgentPattern};
use crate::runtime::{
    spawn_stop_listener, InitArgs, Outcome, RuntimeInstance, RuntimeLibrary, RuntimeSlot, StopNotifier,
};

/// Runs one embedded VM for the lifetime of a launch.
pub struct Launcher<H> {
    config: Config,
    version: String,
    slot: Arc<RuntimeSlot<H>>,
    ceiling: HeapCeiling,
    state: StateTracker,
    memory: Box<dyn MemoryStatus>,
    reactor: Option<Box<dyn HeapReactor<H>>>,
}

impl<H> Launcher<H>
where
    H: Clone + Send + Sync + 'static,
{
    pub fn new(config: Config) -> Self {
        Self {
            config,
            version: env!("CARGO_PKG_VERSION").to_string(),
            slot: Arc::new(RuntimeSlot::new()),
            ceiling: HeapCeiling::new(),
            state: StateTracker::new(),
            memory: Box::new(ProcMemInfo::default()),
            reactor: None,
        }
    }

    /// Version reported through the version property.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_memory_status(mut self, memory: impl MemoryStatus + 'static) -> Self {
        self.memory = Box::new(memory);
        self
    }

    pub fn with_reactor(mut self, reactor: impl HeapReactor<H> + 'static) -> Self {
        self.reactor = Some(Box::new(reactor));
        self
    }

    /// Slot holding the running VM's handle.
    pub fn slot(&self) -> Arc<RuntimeSlot<H>> {
        Arc::clone(&self.slot)
    }

    pub fn heap_ceiling(&self) -> HeapCeiling {
        self.ceiling.clone()
    }

    pub fn state(&self) -> LaunchState {
        self.state.get()
    }

    pub fn state_tracker(&self) -> StateTracker {
        self.state.clone()
    }

    /// Launch the VM and run the bootstrap class's `main` with the
    /// application part of `raw_args` (program name excluded).
    ///
    /// `load` resolves the runtime library from the configured path. An
    /// application exception is not an error here: it comes back as
    /// [`Outcome::Faulted`].
    pub fn run<L, F>(&self, raw_args: &[String], load: F) -> Result<Outcome, LaunchError>
    where
        L: RuntimeLibrary,
        L::Vm: RuntimeInstance<Handle = H>,
        F: FnOnce(&Path) -> Result<L, LaunchError>,
    {
        let library = load(&self.config.runtime.library_path)?;
        self.state.advance(LaunchState::LibraryLoaded);

        let args = classify(raw_args, &flag_registry());
        let (init, proposal) = self.prepare(&library, &args)?;
        self.state.advance(LaunchState::ConfigPrepared);

        let (notifier, listener) =
            spawn_stop_listener(Arc::clone(&self.slot)).map_err(|e| LaunchError::Worker(e.to_string()))?;

        let vm = match library.create(&init) {
            Ok(vm) => vm,
            Err(e) => {
                listener.shutdown();
                self.state.advance(LaunchState::TornDown);
                return Err(e);
            }
        };
        self.state.advance(LaunchState::RuntimeCreated);
        tracing::info!(options = init.options.len(), "runtime created");
        // The ceiling only describes the VM being created.
        self.ceiling.reset();

        let slot = Arc::clone(&self.slot);
        let state = self.state.clone();
        let mut vm = scopeguard::guard(vm, move |mut vm| {
            if slot.clear() {
                tracing::debug!("runtime did not announce its stop, handle withdrawn");
            }
            vm.detach_current_thread();
            vm.destroy();
            listener.shutdown();
            state.advance(LaunchState::TornDown);
            tracing::info!("runtime torn down");
        });

        self.slot.publish(vm.handle());

        let outcome = self.bootstrap(&mut *vm, notifier, &args, proposal.as_ref());
        drop(vm);
        outcome
    }

    /// Build the init args: runtime defaults with the launcher's options.
    fn prepare<L: RuntimeLibrary>(
        &self,
        library: &L,
        args: &ArgumentSet,
    ) -> Result<(InitArgs, Option<HeapProposal>), LaunchError> {
        let agents = &self.config.agents;
        let pattern = AgentPattern::new(&agents.pattern).map_err(|e| ConfigError::ValidationError {
            message: format!("agents.pattern '{}' is invalid: {}", agents.pattern, e),
        })?;
        let discovered = discover_agents(&agents.dir, &pattern);

        let proposal = HeapAutoSizer::new(&self.config.heap, self.memory.as_ref()).propose(&args.heap);
        if let Some(proposal) = &proposal {
            proposal.publish(&self.ceiling);
        }

        let options = build_launch_options(
            &self.config.properties,
            &self.version,
            discovered,
            proposal.as_ref(),
            args,
        );
        for option in &options {
            tracing::debug!(option = option.value(), source = ?option.source(), "vm option");
        }

        let mut init = library.default_init_args();
        init.options = options;
        Ok((init, proposal))
    }

    fn bootstrap<V>(
        &self,
        vm: &mut V,
        notifier: StopNotifier,
        args: &ArgumentSet,
        proposal: Option<&HeapProposal>,
    ) -> Result<Outcome, LaunchError>
    where
        V: RuntimeInstance<Handle = H>,
    {
        let runtime = &self.config.runtime;
        let lookup = |missing: BootstrapMissing| LaunchError::BootstrapLookup {
            class: runtime.bootstrap_class.clone(),
            missing,
        };

        let class = vm.find_class(&runtime.bootstrap_class).map_err(lookup)?;
        if let Err(missing) = vm.register_stop_callback(
            &class,
            &runtime.stop_callback,
            &runtime.stop_callback_signature,
            notifier,
        ) {
            // Teardown still withdraws the handle.
            tracing::warn!(
                error = %lookup(missing),
                "stop callback not registered, handle stays published until teardown"
            );
        }
        let method = vm
            .find_static_method(&class, &runtime.main_method, &runtime.main_signature)
            .map_err(lookup)?;

        let app_args: Vec<String> = args.application_args().map(String::from).collect();

        // A user who sized the heap by hand gets no reactor.
        let reactor = self.reactor.as_deref().zip(proposal);
        if let Some((reactor, proposal)) = reactor {
            reactor.engage(Arc::clone(&self.slot), proposal.ceiling_bytes());
        }

        self.state.advance(LaunchState::BootstrapInvoked);
        tracing::info!(class = %runtime.bootstrap_class, args = app_args.len(), "invoking bootstrap");
        let outcome = vm.call_static_main(&class, &method, &app_args);

        if let Some((reactor, _)) = reactor {
            reactor.disengage();
        }

        match &outcome {
            Ok(Outcome::Returned) => self.state.advance(LaunchState::Returned),
            Ok(Outcome::Faulted(fault)) => {
                tracing::warn!(fault = %fault.description, "application ended with an uncaught exception");
                self.state.advance(LaunchState::Faulted);
            }
            Err(_) => {}
        }
        outcome
    }
}
