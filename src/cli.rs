//! Command line surface.
//!
//! Every token belongs to the VM or to the application, so the launcher
//! defines no flags of its own: help and version are left to the runtime.

use std::ffi::OsString;
use std::iter;

use clap::Parser;

/// Ends clap's own option parsing; everything after it is a value.
const ESCAPE: &str = "--";

#[derive(Debug, Parser)]
#[command(
    name = "jvmlaunch",
    about = "Run a Java application in an embedded VM",
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct Cli {
    /// Runtime flags, then the application specifier and its arguments.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, num_args = 0..)]
    args: Vec<OsString>,
}

impl Cli {
    /// Parse the process's own arguments.
    pub fn from_env() -> Self {
        Self::from_argv(std::env::args_os())
    }

    /// Parse `argv`, program name first.
    ///
    /// An escape is inserted after the program name, so a user `--` is kept
    /// as a token wherever it appears.
    pub fn from_argv<I, T>(argv: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let mut argv = argv.into_iter().map(Into::into);
        let program = argv.next().unwrap_or_else(|| OsString::from("jvmlaunch"));
        Self::parse_from(
            iter::once(program)
                .chain(iter::once(OsString::from(ESCAPE)))
                .chain(argv),
        )
    }

    /// Arguments after the program name, in order. Bytes that are not
    /// UTF-8 become U+FFFD.
    pub fn raw_args(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_every_token_verbatim() {
        let cli = Cli::from_argv(["jvmlaunch", "-Xmx256m", "-verbose:gc", "MyApp", "foo"]);
        assert_eq!(cli.raw_args(), vec!["-Xmx256m", "-verbose:gc", "MyApp", "foo"]);
    }

    #[test]
    fn help_and_version_reach_the_application() {
        let cli = Cli::from_argv(["jvmlaunch", "-jar", "app.jar", "--help", "-version"]);
        assert_eq!(cli.raw_args(), vec!["-jar", "app.jar", "--help", "-version"]);
    }

    #[test]
    fn double_dash_is_kept_in_any_position() {
        let cli = Cli::from_argv(["jvmlaunch", "--", "MyApp"]);
        assert_eq!(cli.raw_args(), vec!["--", "MyApp"]);

        let cli = Cli::from_argv(["jvmlaunch", "-Xmx1g", "--", "MyApp"]);
        assert_eq!(cli.raw_args(), vec!["-Xmx1g", "--", "MyApp"]);

        let cli = Cli::from_argv(["jvmlaunch", "MyApp", "--", "--"]);
        assert_eq!(cli.raw_args(), vec!["MyApp", "--", "--"]);
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_argument_is_converted_lossily() {
        use std::os::unix::ffi::OsStringExt;

        let bad = OsString::from_vec(vec![b'a', 0xff, b'b']);
        let cli = Cli::from_argv([OsString::from("jvmlaunch"), OsString::from("MyApp"), bad]);
        assert_eq!(cli.raw_args(), vec!["MyApp".to_string(), "a\u{FFFD}b".to_string()]);
    }

    #[test]
    fn no_arguments_is_fine() {
        let cli = Cli::from_argv(["jvmlaunch"]);
        assert!(cli.raw_args().is_empty());
    }
}
