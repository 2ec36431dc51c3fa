//! Entry point for the `homespun` binary.
//!
//! Delegates to [`homespun_cli::run`], which loads configuration, discovers
//! plugins, and prints the resulting registry as JSON.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    homespun_cli::run(std::env::args_os(), &mut stdout, &mut stderr)
}
