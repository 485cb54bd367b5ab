//! Shared test utilities: a scripted, in-process stand-in for the VM.

#![allow(dead_code, unused_imports)]

use jvmlaunch::error::{ApplicationFault, BootstrapMissing, LaunchError};
use jvmlaunch::heap::{HeapCeiling, MemorySnapshot, MemoryStatus};
use jvmlaunch::options::LaunchOptions;
use jvmlaunch::runtime::{
    InitArgs, Outcome, RuntimeInstance, RuntimeLibrary, RuntimeSlot, SlotState, StopNotifier,
};
use parking_lot::Mutex;
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub fn raw_args(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}

/// Handle the fake VM publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FakeHandle(pub u32);

/// Everything the launcher asked of the fake VM, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    DefaultInitArgs,
    Create(Vec<String>),
    FindClass(String),
    RegisterStop { name: String, signature: String },
    FindMethod { name: String, signature: String },
    CallMain(Vec<String>),
    Detach,
    Destroy,
}

#[derive(Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<Call>>>);

impl Journal {
    fn record(&self, call: Call) {
        self.0.lock().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().clone()
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.0.lock().iter().filter(|c| matches(c)).count()
    }

    pub fn created_options(&self) -> Option<Vec<String>> {
        self.0.lock().iter().find_map(|c| match c {
            Call::Create(options) => Some(options.clone()),
            _ => None,
        })
    }

    pub fn main_args(&self) -> Option<Vec<String>> {
        self.0.lock().iter().find_map(|c| match c {
            Call::CallMain(args) => Some(args.clone()),
            _ => None,
        })
    }
}

/// How the fake VM should behave.
#[derive(Debug, Clone, Default)]
pub struct Script {
    pub create_status: Option<i32>,
    pub missing_class: bool,
    /// Loading the class raises an exception.
    pub class_load_exception: bool,
    pub stop_registration_fails: bool,
    pub missing_method: bool,
    pub fault: Option<String>,
    /// Post the stop event from inside `main`, like a VM shutting down.
    pub stop_during_main: bool,
    pub panic_in_main: bool,
}

/// Slot states seen from inside `main`.
#[derive(Clone, Default)]
pub struct Observed(Arc<Mutex<Vec<SlotState>>>);

impl Observed {
    pub fn states(&self) -> Vec<SlotState> {
        self.0.lock().clone()
    }
}

pub struct FakeLibrary {
    pub script: Script,
    pub journal: Journal,
    pub slot: Arc<RuntimeSlot<FakeHandle>>,
    pub observed: Observed,
    ceiling: Option<HeapCeiling>,
    ceiling_at_create: Arc<Mutex<Option<u64>>>,
}

impl FakeLibrary {
    pub fn new(script: Script, slot: Arc<RuntimeSlot<FakeHandle>>) -> Self {
        Self {
            script,
            journal: Journal::default(),
            slot,
            observed: Observed::default(),
            ceiling: None,
            ceiling_at_create: Arc::default(),
        }
    }

    /// Note the published heap ceiling when the VM is created.
    pub fn with_ceiling(mut self, ceiling: HeapCeiling) -> Self {
        self.ceiling = Some(ceiling);
        self
    }

    pub fn ceiling_at_create(&self) -> Option<u64> {
        *self.ceiling_at_create.lock()
    }

    /// A second library over the same journal, slot and observations.
    pub fn share(&self) -> Self {
        Self {
            script: self.script.clone(),
            journal: self.journal.clone(),
            slot: Arc::clone(&self.slot),
            observed: self.observed.clone(),
            ceiling: self.ceiling.clone(),
            ceiling_at_create: Arc::clone(&self.ceiling_at_create),
        }
    }
}

impl RuntimeLibrary for FakeLibrary {
    type Vm = FakeVm;

    fn default_init_args(&self) -> InitArgs {
        self.journal.record(Call::DefaultInitArgs);
        InitArgs {
            version: 0x0001_0006,
            ignore_unrecognized: true,
            options: LaunchOptions::default(),
        }
    }

    fn create(&self, args: &InitArgs) -> Result<FakeVm, LaunchError> {
        self.journal
            .record(Call::Create(args.options.values().map(String::from).collect()));
        if let Some(ceiling) = &self.ceiling {
            *self.ceiling_at_create.lock() = ceiling.get();
        }
        if let Some(status) = self.script.create_status {
            return Err(LaunchError::Creation { status });
        }
        Ok(FakeVm {
            script: self.script.clone(),
            journal: self.journal.clone(),
            slot: Arc::clone(&self.slot),
            observed: self.observed.clone(),
            notifier: None,
        })
    }
}

pub struct FakeVm {
    script: Script,
    journal: Journal,
    slot: Arc<RuntimeSlot<FakeHandle>>,
    observed: Observed,
    notifier: Option<StopNotifier>,
}

pub struct FakeClass;
pub struct FakeMethod;

impl RuntimeInstance for FakeVm {
    type Handle = FakeHandle;
    type Class = FakeClass;
    type Method = FakeMethod;

    fn handle(&self) -> FakeHandle {
        FakeHandle(42)
    }

    fn find_class(&mut self, name: &str) -> Result<FakeClass, BootstrapMissing> {
        self.journal.record(Call::FindClass(name.to_string()));
        if self.script.class_load_exception {
            return Err(BootstrapMissing::ClassLoadFailed);
        }
        if self.script.missing_class {
            return Err(BootstrapMissing::Class);
        }
        Ok(FakeClass)
    }

    fn register_stop_callback(
        &mut self,
        _class: &FakeClass,
        name: &str,
        signature: &str,
        notifier: StopNotifier,
    ) -> Result<(), BootstrapMissing> {
        self.journal.record(Call::RegisterStop {
            name: name.to_string(),
            signature: signature.to_string(),
        });
        if self.script.stop_registration_fails {
            return Err(BootstrapMissing::StopCallback {
                name: name.to_string(),
                signature: signature.to_string(),
            });
        }
        self.notifier = Some(notifier);
        Ok(())
    }

    fn find_static_method(
        &mut self,
        _class: &FakeClass,
        name: &str,
        signature: &str,
    ) -> Result<FakeMethod, BootstrapMissing> {
        self.journal.record(Call::FindMethod {
            name: name.to_string(),
            signature: signature.to_string(),
        });
        if self.script.missing_method {
            return Err(BootstrapMissing::Method {
                name: name.to_string(),
                signature: signature.to_string(),
            });
        }
        Ok(FakeMethod)
    }

    fn call_static_main(
        &mut self,
        _class: &FakeClass,
        _method: &FakeMethod,
        args: &[String],
    ) -> Result<Outcome, LaunchError> {
        self.journal.record(Call::CallMain(args.to_vec()));
        self.observed.0.lock().push(self.slot.state());

        if self.script.panic_in_main {
            panic!("bootstrap blew up");
        }

        if self.script.stop_during_main {
            if let Some(notifier) = &self.notifier {
                notifier.notify_stopped();
            }
            let slot = Arc::clone(&self.slot);
            wait_for(|| slot.state() == SlotState::Cleared);
            self.observed.0.lock().push(self.slot.state());
        }

        Ok(match &self.script.fault {
            Some(description) => Outcome::Faulted(ApplicationFault {
                description: description.clone(),
            }),
            None => Outcome::Returned,
        })
    }

    fn detach_current_thread(&mut self) {
        self.journal.record(Call::Detach);
    }

    fn destroy(self) {
        self.journal.record(Call::Destroy);
    }
}

/// Poll `done` for up to two seconds.
pub fn wait_for(done: impl Fn() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if done() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    done()
}

/// Fixed memory figures, in bytes.
#[derive(Debug, Clone, Copy)]
pub struct FixedMemory {
    pub available: u64,
    pub reservable: u64,
}

impl MemoryStatus for FixedMemory {
    fn snapshot(&self) -> io::Result<MemorySnapshot> {
        Ok(MemorySnapshot {
            available: self.available,
            reservable: self.reservable,
        })
    }
}

/// Memory status that always fails.
pub struct NoMemoryInfo;

impl MemoryStatus for NoMemoryInfo {
    fn snapshot(&self) -> io::Result<MemorySnapshot> {
        Err(io::Error::new(io::ErrorKind::NotFound, "no meminfo"))
    }
}

/// [`FixedMemory`] that counts how often it is asked.
#[derive(Default)]
pub struct CountingMemory {
    pub memory: Option<FixedMemory>,
    pub reads: std::sync::atomic::AtomicUsize,
}

impl CountingMemory {
    pub fn new(memory: FixedMemory) -> Self {
        Self {
            memory: Some(memory),
            reads: Default::default(),
        }
    }

    pub fn reads(&self) -> usize {
        self.reads.load(std::sync::atomic::Ordering::SeqCst)
    }
}

impl MemoryStatus for CountingMemory {
    fn snapshot(&self) -> io::Result<MemorySnapshot> {
        self.reads.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        match &self.memory {
            Some(memory) => memory.snapshot(),
            None => NoMemoryInfo.snapshot(),
        }
    }
}
