use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Set to a file path to send launcher logs there instead of stderr.
pub const LOG_ENV_VAR: &str = "JVMLAUNCH_LOG";

/// Filter for stderr when `RUST_LOG` is unset. Stderr is shared with the
/// application, so only problems are reported there.
const STDERR_DEFAULT_FILTER: &str = "warn";

/// Filter for the log file when `RUST_LOG` is unset.
const FILE_DEFAULT_FILTER: &str = "info";

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Initialize tracing.
///
/// Without `JVMLAUNCH_LOG`, warnings and errors go to stderr as plain text.
/// With it, everything from `info` up goes to a file with a unique name,
/// `{path}.{timestamp}.{pid}`, so concurrent launches never share one.
/// `RUST_LOG` overrides either default.
pub fn init_tracing() {
    let Some(log_path) = std::env::var(LOG_ENV_VAR).ok() else {
        let stderr_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .with_target(false)
            .without_time();
        let _ = tracing_subscriber::registry()
            .with(env_filter(STDERR_DEFAULT_FILTER))
            .with(stderr_layer)
            .try_init();
        return;
    };

    let pid = std::process::id();
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let unique_path = format!("{}.{}.{}", log_path, timestamp, pid);

    let Ok(file) = std::fs::File::create(&unique_path) else {
        eprintln!("Warning: Failed to create log file: {}", unique_path);
        return;
    };

    let file_layer = fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::UtcTime::rfc_3339());

    let _ = tracing_subscriber::registry()
        .with(env_filter(FILE_DEFAULT_FILTER))
        .with(file_layer)
        .try_init();
}
