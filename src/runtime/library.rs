//! Runtime library loading and entry point resolution.

use std::ffi::{c_void, CString};
use std::os::raw::c_char;
use std::path::{Path, PathBuf};
use std::ptr;

use jni_sys::{jint, JNIEnv, JavaVM, JavaVMInitArgs, JavaVMOption, JNI_FALSE, JNI_OK, JNI_TRUE, JNI_VERSION_1_6};
use libloading::{Library, Symbol};

use crate::error::LaunchError;
use crate::options::LaunchOptions;
use crate::runtime::{InitArgs, JavaVm, RuntimeLibrary};

/// Fills a `JavaVMInitArgs` with the runtime's defaults.
pub const GET_DEFAULT_INIT_ARGS: &str = "JNI_GetDefaultJavaVMInitArgs";
/// Creates a VM plus the calling thread's `JNIEnv`.
pub const CREATE_JAVA_VM: &str = "JNI_CreateJavaVM";

type GetDefaultInitArgsFn = unsafe extern "system" fn(args: *mut c_void) -> jint;
type CreateJavaVmFn =
    unsafe extern "system" fn(pvm: *mut *mut JavaVM, penv: *mut *mut c_void, args: *mut c_void) -> jint;

/// A loaded `libjvm` with both invocation entry points resolved.
///
/// The library is never unloaded: the VM it creates outlives any scope the
/// launcher could tie it to.
pub struct JvmLibrary {
    path: PathBuf,
    get_default_init_args: GetDefaultInitArgsFn,
    create_java_vm: CreateJavaVmFn,
}

impl JvmLibrary {
    /// Load the library at `path` and resolve the invocation API.
    pub fn load(path: &Path) -> Result<Self, LaunchError> {
        let library = unsafe { Library::new(path) }.map_err(|e| LaunchError::LibraryUnavailable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let library: &'static Library = Box::leak(Box::new(library));

        let get_default_init_args = resolve::<GetDefaultInitArgsFn>(library, path, GET_DEFAULT_INIT_ARGS)?;
        let create_java_vm = resolve::<CreateJavaVmFn>(library, path, CREATE_JAVA_VM)?;

        tracing::info!(path = %path.display(), "runtime library loaded");
        Ok(Self {
            path: path.to_path_buf(),
            get_default_init_args,
            create_java_vm,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn resolve<T: Copy + 'static>(library: &'static Library, path: &Path, symbol: &str) -> Result<T, LaunchError> {
    let found: Symbol<'static, T> =
        unsafe { library.get(symbol.as_bytes()) }.map_err(|_| LaunchError::SymbolMissing {
            path: path.to_path_buf(),
            symbol: symbol.to_string(),
        })?;
    Ok(*found)
}

fn option_strings(options: &LaunchOptions) -> Result<Vec<CString>, LaunchError> {
    options
        .values()
        .map(|value| {
            CString::new(value).map_err(|_| LaunchError::InvalidArgument {
                arg: value.to_string(),
                reason: "contains a NUL byte".to_string(),
            })
        })
        .collect()
}

impl RuntimeLibrary for JvmLibrary {
    type Vm = JavaVm;

    fn default_init_args(&self) -> InitArgs {
        let mut raw = JavaVMInitArgs {
            version: JNI_VERSION_1_6,
            nOptions: 0,
            options: ptr::null_mut(),
            ignoreUnrecognized: JNI_FALSE,
        };
        let status = unsafe { (self.get_default_init_args)(&mut raw as *mut JavaVMInitArgs as *mut c_void) };
        if status != JNI_OK {
            tracing::warn!(status, "runtime rejected requested JNI version for default args");
        }

        InitArgs {
            version: raw.version,
            ignore_unrecognized: raw.ignoreUnrecognized != JNI_FALSE,
            options: LaunchOptions::default(),
        }
    }

    fn create(&self, args: &InitArgs) -> Result<JavaVm, LaunchError> {
        let strings = option_strings(&args.options)?;
        let mut options: Vec<JavaVMOption> = strings
            .iter()
            .map(|s| JavaVMOption {
                optionString: s.as_ptr() as *mut c_char,
                extraInfo: ptr::null_mut(),
            })
            .collect();
        let count = jint::try_from(options.len()).map_err(|_| LaunchError::InvalidArgument {
            arg: format!("{} options", options.len()),
            reason: "too many VM options".to_string(),
        })?;

        let mut raw = JavaVMInitArgs {
            version: args.version,
            nOptions: count,
            options: options.as_mut_ptr(),
            ignoreUnrecognized: if args.ignore_unrecognized { JNI_TRUE } else { JNI_FALSE },
        };

        let mut vm: *mut JavaVM = ptr::null_mut();
        let mut env: *mut c_void = ptr::null_mut();
        let status = unsafe {
            (self.create_java_vm)(&mut vm, &mut env, &mut raw as *mut JavaVMInitArgs as *mut c_void)
        };
        if status != JNI_OK || vm.is_null() || env.is_null() {
            return Err(LaunchError::Creation { status });
        }

        Ok(JavaVm::new(vm, env as *mut JNIEnv))
    }
}
