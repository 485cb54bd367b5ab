mod loader;
mod types;

pub use loader::{ConfigError, CONFIG_ENV_VAR};
pub use types::{AgentsConfig, Config, HeapConfig, HeapPolicy, PropertiesConfig, RuntimeConfig};
