use std::thread;

use anyhow::{anyhow, Context};

use jvmlaunch::cli::Cli;
use jvmlaunch::config::Config;
use jvmlaunch::lifecycle::Launcher;
use jvmlaunch::runtime::{JavaVmRef, JvmLibrary, Outcome};
use jvmlaunch::LaunchError;

fn main() {
    let cli = Cli::from_env();
    jvmlaunch::logging::init_tracing();

    let code = match run_on_worker(cli.raw_args()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("jvmlaunch: {:#}", e);
            1
        }
    };
    std::process::exit(code);
}

/// The whole launch runs on its own thread; this one only waits for it.
fn run_on_worker(args: Vec<String>) -> anyhow::Result<i32> {
    let worker = thread::Builder::new()
        .name("jvmlaunch-main".to_string())
        .spawn(move || launch(&args))
        .context("failed to start launcher thread")?;
    worker
        .join()
        .map_err(|_| anyhow!(LaunchError::Worker("launcher thread panicked".to_string())))
}

fn launch(args: &[String]) -> i32 {
    let result = Config::load()
        .map_err(LaunchError::from)
        .and_then(|config| Launcher::<JavaVmRef>::new(config).run(args, JvmLibrary::load));

    match result {
        Ok(Outcome::Returned) | Ok(Outcome::Faulted(_)) => 0,
        Err(e) => {
            tracing::debug!(error = %e, "launch failed");
            eprintln!("jvmlaunch: {}", e);
            e.exit_code()
        }
    }
}
