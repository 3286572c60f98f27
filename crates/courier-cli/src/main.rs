//! CLI entrypoint for the courier protocol tool.
//!
//! The binary delegates to [`courier_cli::run`], which loads configuration,
//! reads the protocol definition, and executes the requested command.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    courier_cli::run(std::env::args_os(), &mut stdout, &mut stderr)
}
