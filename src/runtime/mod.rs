//! The embedded runtime, seen through the JNI invocation interface.
//!
//! [`RuntimeLibrary`] and [`RuntimeInstance`] are the seam between the
//! launch lifecycle and the VM. [`JvmLibrary`] implements them over a
//! dynamically loaded `libjvm.so`.

mod events;
mod jni;
mod library;
mod slot;

pub use events::{spawn_stop_listener, RuntimeEvent, StopListener, StopNotifier};
pub use jni::{JavaVm, JavaVmRef};
pub use library::{JvmLibrary, CREATE_JAVA_VM, GET_DEFAULT_INIT_ARGS};
pub use slot::{RuntimeSlot, SlotState};

use crate::error::{ApplicationFault, BootstrapMissing, LaunchError};
use crate::options::LaunchOptions;

/// VM initialization arguments: defaults from the runtime with the
/// launcher's options swapped in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitArgs {
    pub version: i32,
    pub ignore_unrecognized: bool,
    pub options: LaunchOptions,
}

/// How the bootstrap `main` ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Returned,
    Faulted(ApplicationFault),
}

/// Entry points resolved from the runtime's shared library.
pub trait RuntimeLibrary {
    type Vm: RuntimeInstance;

    /// Default initialization arguments, as the runtime reports them.
    fn default_init_args(&self) -> InitArgs;

    /// Create the VM and its primary environment on the calling thread.
    fn create(&self, args: &InitArgs) -> Result<Self::Vm, LaunchError>;
}

/// A created VM, owned by the launch lifecycle.
pub trait RuntimeInstance {
    /// Read-only reference published for other components.
    type Handle: Clone + Send + Sync + 'static;
    type Class;
    type Method;

    fn handle(&self) -> Self::Handle;

    fn find_class(&mut self, name: &str) -> Result<Self::Class, BootstrapMissing>;

    /// Bind the native method the VM calls when it is about to stop.
    fn register_stop_callback(
        &mut self,
        class: &Self::Class,
        name: &str,
        signature: &str,
        notifier: StopNotifier,
    ) -> Result<(), BootstrapMissing>;

    fn find_static_method(
        &mut self,
        class: &Self::Class,
        name: &str,
        signature: &str,
    ) -> Result<Self::Method, BootstrapMissing>;

    /// Call `method(String[])` synchronously with `args`.
    ///
    /// A pending exception afterwards is described, cleared and returned as
    /// [`Outcome::Faulted`].
    fn call_static_main(
        &mut self,
        class: &Self::Class,
        method: &Self::Method,
        args: &[String],
    ) -> Result<Outcome, LaunchError>;

    fn detach_current_thread(&mut self);

    /// Destroy the VM. Blocks until all non-daemon VM threads have ended.
    fn destroy(self);
}
