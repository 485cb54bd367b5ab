use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub runtime: RuntimeConfig,
    #[serde(default)]
    pub agents: AgentsConfig,
    #[serde(default)]
    pub properties: PropertiesConfig,
    #[serde(default)]
    pub heap: HeapConfig,
}

/// Where the VM lives and which entry points it must expose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Shared library providing the JNI invocation API.
    #[serde(default = "default_library_path")]
    pub library_path: PathBuf,
    /// Bootstrap class, slash separated (e.g. "io/osv/RunJava").
    #[serde(default = "default_bootstrap_class")]
    pub bootstrap_class: String,
    #[serde(default = "default_main_method")]
    pub main_method: String,
    #[serde(default = "default_main_signature")]
    pub main_signature: String,
    /// Native method on the bootstrap class the VM calls when it stops.
    #[serde(default = "default_stop_callback")]
    pub stop_callback: String,
    #[serde(default = "default_stop_callback_signature")]
    pub stop_callback_signature: String,
}

/// Native agent autoload directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentsConfig {
    #[serde(default = "default_agents_dir")]
    pub dir: PathBuf,
    /// Regex a file name must match in full to be loaded.
    #[serde(default = "default_agents_pattern")]
    pub pattern: String,
}

/// System properties every VM is created with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertiesConfig {
    #[serde(default = "default_class_path")]
    pub class_path: String,
    #[serde(default = "default_system_class_loader")]
    pub system_class_loader: String,
    #[serde(default = "default_log_manager")]
    pub log_manager: String,
    /// Property carrying the launcher version.
    #[serde(default = "default_version_property")]
    pub version_property: String,
}

/// Heap auto-sizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeapConfig {
    #[serde(default)]
    pub policy: HeapPolicy,
    /// Auto-sizing only fires when the computed ceiling is above this.
    #[serde(default = "default_min_memory_bytes")]
    pub min_memory_bytes: u64,
}

/// Whether the launcher picks `-Xmx`/`-Xms` when the user did not.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeapPolicy {
    #[default]
    Disabled,
    Auto,
}

fn default_library_path() -> PathBuf {
    PathBuf::from("/usr/lib/jvm/jre/lib/amd64/server/libjvm.so")
}

fn default_bootstrap_class() -> String {
    "io/osv/RunJava".to_string()
}

fn default_main_method() -> String {
    "main".to_string()
}

fn default_main_signature() -> String {
    "([Ljava/lang/String;)V".to_string()
}

fn default_stop_callback() -> String {
    "onVMStop".to_string()
}

fn default_stop_callback_signature() -> String {
    "()V".to_string()
}

fn default_agents_dir() -> PathBuf {
    PathBuf::from("/usr/lib/jvm/agents/autoload")
}

fn default_agents_pattern() -> String {
    r".*\.so".to_string()
}

fn default_class_path() -> String {
    "/dev/null".to_string()
}

fn default_system_class_loader() -> String {
    "io.osv.OsvSystemClassLoader".to_string()
}

fn default_log_manager() -> String {
    "io.osv.jul.IsolatingLogManager".to_string()
}

fn default_version_property() -> String {
    "osv.version".to_string()
}

fn default_min_memory_bytes() -> u64 {
    1 << 30
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            library_path: default_library_path(),
            bootstrap_class: default_bootstrap_class(),
            main_method: default_main_method(),
            main_signature: default_main_signature(),
            stop_callback: default_stop_callback(),
            stop_callback_signature: default_stop_callback_signature(),
        }
    }
}

impl Default for AgentsConfig {
    fn default() -> Self {
        Self {
            dir: default_agents_dir(),
            pattern: default_agents_pattern(),
        }
    }
}

impl Default for PropertiesConfig {
    fn default() -> Self {
        Self {
            class_path: default_class_path(),
            system_class_loader: default_system_class_loader(),
            log_manager: default_log_manager(),
            version_property: default_version_property(),
        }
    }
}

impl Default for HeapConfig {
    fn default() -> Self {
        Self {
            policy: HeapPolicy::default(),
            min_memory_bytes: default_min_memory_bytes(),
        }
    }
}
