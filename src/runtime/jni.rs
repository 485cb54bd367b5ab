//! [`RuntimeInstance`] over a raw `JavaVM*` / `JNIEnv*` pair.

use std::ffi::{c_void, CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use jni_sys::{
    jclass, jmethodID, jobject, jsize, jthrowable, jvalue, JNIEnv, JNINativeMethod, JavaVM,
    JNI_ERR, JNI_FALSE, JNI_OK,
};
use parking_lot::Mutex;

use crate::error::{ApplicationFault, BootstrapMissing, LaunchError};
use crate::runtime::{Outcome, RuntimeInstance, StopNotifier};

/// Where the native stop callback posts to. The callback has no user data
/// pointer, so this is the one piece of process-global state.
static STOP_SINK: Mutex<Option<StopNotifier>> = Mutex::new(None);

extern "system" fn on_vm_stop(_env: *mut JNIEnv, _class: jclass) {
    if let Some(notifier) = STOP_SINK.lock().as_ref() {
        notifier.notify_stopped();
    }
}

/// Call a `JNIEnv` function; `None` if the VM left the slot empty.
macro_rules! env_call {
    ($env:expr, $name:ident $(, $arg:expr)* $(,)?) => {{
        let env: *mut JNIEnv = $env;
        unsafe { (**env).$name.map(|f| f(env $(, $arg)*)) }
    }};
}

/// The handle published for other components: the VM and the launcher
/// thread's primary environment.
///
/// Other threads must attach through `vm` rather than use `env`.
#[derive(Debug, Clone, Copy)]
pub struct JavaVmRef {
    vm: *mut JavaVM,
    env: *mut JNIEnv,
}

// The JavaVM pointer is valid from any thread; env is only dereferenced by
// the thread that owns it.
unsafe impl Send for JavaVmRef {}
unsafe impl Sync for JavaVmRef {}

impl JavaVmRef {
    pub fn vm(&self) -> *mut JavaVM {
        self.vm
    }

    pub fn primary_env(&self) -> *mut JNIEnv {
        self.env
    }
}

/// A created VM, attached to the current thread.
pub struct JavaVm {
    vm: *mut JavaVM,
    env: *mut JNIEnv,
}

pub struct JavaClass(jclass);

pub struct StaticMethod(jmethodID);

impl JavaVm {
    pub(crate) fn new(vm: *mut JavaVM, env: *mut JNIEnv) -> Self {
        Self { vm, env }
    }

    /// Describe and clear a pending exception, if any.
    fn take_exception(&mut self) -> Option<String> {
        let pending = env_call!(self.env, ExceptionCheck).unwrap_or(JNI_FALSE) != JNI_FALSE;
        if !pending {
            return None;
        }
        let throwable: jthrowable = env_call!(self.env, ExceptionOccurred).unwrap_or(ptr::null_mut());
        // ExceptionDescribe prints the stack trace and clears the exception.
        env_call!(self.env, ExceptionDescribe);
        env_call!(self.env, ExceptionClear);

        let description = self
            .object_to_string(throwable)
            .unwrap_or_else(|| "unknown exception".to_string());
        self.delete_local(throwable);
        Some(description)
    }

    /// `obj.toString()`, or `None` if anything along the way fails.
    fn object_to_string(&mut self, obj: jobject) -> Option<String> {
        if obj.is_null() {
            return None;
        }
        let class = env_call!(self.env, GetObjectClass, obj).filter(|c| !c.is_null())?;
        let method = env_call!(
            self.env,
            GetMethodID,
            class,
            c"toString".as_ptr(),
            c"()Ljava/lang/String;".as_ptr()
        )
        .filter(|m| !m.is_null());
        self.delete_local(class);
        let method = method?;

        let string = env_call!(self.env, CallObjectMethodA, obj, method, ptr::null())
            .filter(|s| !s.is_null());
        let Some(string) = string else {
            env_call!(self.env, ExceptionClear);
            return None;
        };

        let chars = env_call!(self.env, GetStringUTFChars, string, ptr::null_mut())
            .filter(|c| !c.is_null());
        let text = chars.map(|chars| {
            let text = unsafe { CStr::from_ptr(chars) }.to_string_lossy().into_owned();
            env_call!(self.env, ReleaseStringUTFChars, string, chars);
            text
        });
        self.delete_local(string);
        text
    }

    fn delete_local(&mut self, obj: jobject) {
        if !obj.is_null() {
            env_call!(self.env, DeleteLocalRef, obj);
        }
    }

    fn new_string_array(&mut self, args: &[String]) -> Result<jobject, LaunchError> {
        let string_class = self
            .find_class("java/lang/String")
            .map_err(|missing| LaunchError::BootstrapLookup {
                class: "java/lang/String".to_string(),
                missing,
            })?;

        let len = jsize::try_from(args.len()).map_err(|_| LaunchError::InvalidArgument {
            arg: format!("{} arguments", args.len()),
            reason: "too many application arguments".to_string(),
        })?;
        let array = env_call!(self.env, NewObjectArray, len, string_class.0, ptr::null_mut())
            .unwrap_or(ptr::null_mut());
        self.delete_local(string_class.0);
        if array.is_null() {
            let reason = self
                .take_exception()
                .unwrap_or_else(|| "allocation failed".to_string());
            return Err(LaunchError::InvalidArgument {
                arg: "argument array".to_string(),
                reason,
            });
        }

        for (index, arg) in args.iter().enumerate() {
            let c_arg = CString::new(arg.as_str()).map_err(|_| LaunchError::InvalidArgument {
                arg: arg.clone(),
                reason: "contains a NUL byte".to_string(),
            })?;
            let string = env_call!(self.env, NewStringUTF, c_arg.as_ptr()).unwrap_or(ptr::null_mut());
            if string.is_null() {
                let reason = self
                    .take_exception()
                    .unwrap_or_else(|| "string allocation failed".to_string());
                return Err(LaunchError::InvalidArgument {
                    arg: arg.clone(),
                    reason,
                });
            }
            // index < len, which fits in jsize.
            env_call!(self.env, SetObjectArrayElement, array, index as jsize, string);
            self.delete_local(string);
        }
        Ok(array)
    }
}

fn c_string(s: &str) -> Option<CString> {
    CString::new(s).ok()
}

impl RuntimeInstance for JavaVm {
    type Handle = JavaVmRef;
    type Class = JavaClass;
    type Method = StaticMethod;

    fn handle(&self) -> JavaVmRef {
        JavaVmRef {
            vm: self.vm,
            env: self.env,
        }
    }

    fn find_class(&mut self, name: &str) -> Result<JavaClass, BootstrapMissing> {
        let name = c_string(name).ok_or(BootstrapMissing::Class)?;
        let class = env_call!(self.env, FindClass, name.as_ptr()).unwrap_or(ptr::null_mut());
        if !class.is_null() {
            return Ok(JavaClass(class));
        }
        match self.take_exception() {
            Some(description) => {
                tracing::debug!(exception = %description, "class load raised an exception");
                Err(BootstrapMissing::ClassLoadFailed)
            }
            None => Err(BootstrapMissing::Class),
        }
    }

    fn register_stop_callback(
        &mut self,
        class: &JavaClass,
        name: &str,
        signature: &str,
        notifier: StopNotifier,
    ) -> Result<(), BootstrapMissing> {
        let missing = || BootstrapMissing::StopCallback {
            name: name.to_string(),
            signature: signature.to_string(),
        };
        let c_name = c_string(name).ok_or_else(missing)?;
        let c_signature = c_string(signature).ok_or_else(missing)?;

        *STOP_SINK.lock() = Some(notifier);

        let method = JNINativeMethod {
            name: c_name.as_ptr() as *mut c_char,
            signature: c_signature.as_ptr() as *mut c_char,
            fnPtr: on_vm_stop as *mut c_void,
        };
        let status = env_call!(self.env, RegisterNatives, class.0, &method, 1).unwrap_or(JNI_ERR);
        if status != JNI_OK {
            self.take_exception();
            STOP_SINK.lock().take();
            return Err(missing());
        }
        Ok(())
    }

    fn find_static_method(
        &mut self,
        class: &JavaClass,
        name: &str,
        signature: &str,
    ) -> Result<StaticMethod, BootstrapMissing> {
        let missing = || BootstrapMissing::Method {
            name: name.to_string(),
            signature: signature.to_string(),
        };
        let c_name = c_string(name).ok_or_else(missing)?;
        let c_signature = c_string(signature).ok_or_else(missing)?;

        let method = env_call!(self.env, GetStaticMethodID, class.0, c_name.as_ptr(), c_signature.as_ptr())
            .unwrap_or(ptr::null_mut());
        if method.is_null() {
            self.take_exception();
            return Err(missing());
        }
        Ok(StaticMethod(method))
    }

    fn call_static_main(
        &mut self,
        class: &JavaClass,
        method: &StaticMethod,
        args: &[String],
    ) -> Result<Outcome, LaunchError> {
        let array = self.new_string_array(args)?;
        let call_args = [jvalue { l: array }];
        env_call!(self.env, CallStaticVoidMethodA, class.0, method.0, call_args.as_ptr());

        let outcome = match self.take_exception() {
            Some(description) => Outcome::Faulted(ApplicationFault { description }),
            None => Outcome::Returned,
        };
        self.delete_local(array);
        Ok(outcome)
    }

    fn detach_current_thread(&mut self) {
        let vm = self.vm;
        let status = unsafe { (**vm).DetachCurrentThread.map(|f| f(vm)) };
        if status.is_some_and(|s| s != JNI_OK) {
            tracing::warn!(status = ?status, "DetachCurrentThread failed");
        }
    }

    fn destroy(self) {
        let vm = self.vm;
        let status = unsafe { (**vm).DestroyJavaVM.map(|f| f(vm)) };
        if status.is_some_and(|s| s != JNI_OK) {
            tracing::warn!(status = ?status, "DestroyJavaVM failed");
        }
        // The VM may call back right up to the end of DestroyJavaVM.
        STOP_SINK.lock().take();
    }
}
