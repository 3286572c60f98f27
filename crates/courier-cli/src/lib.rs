//! Command-line interface runtime for the courier protocol tool.
//!
//! The runtime splits configuration flags from the command, loads the
//! layered configuration, installs telemetry, reads the protocol definition,
//! and then either lists what the protocol declares or validates a command
//! call and writes its request envelope to stdout. Configuration loading and
//! the output streams can be substituted in tests.

use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use courier_config::Config;
use courier_dispatch::{Dispatcher, WriterConnection};
use courier_schema::{Params, ProtocolDefinition, SchemaIndex};
use tracing::debug;

mod cli;
mod config;
mod errors;
mod telemetry;

#[cfg(test)]
mod tests;

use cli::{Cli, CliCommand};
use config::{ConfigLoader, OrthoConfigLoader, split_config_arguments};
use errors::AppError;

/// Tracing target for CLI operations.
const CLI_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::cli");

/// Bundles the output streams provided to the CLI runtime.
pub(crate) struct IoStreams<'a, W: Write, E: Write> {
    pub(crate) stdout: &'a mut W,
    pub(crate) stderr: &'a mut E,
}

impl<'a, W: Write, E: Write> IoStreams<'a, W, E> {
    pub(crate) const fn new(stdout: &'a mut W, stderr: &'a mut E) -> Self {
        Self { stdout, stderr }
    }
}

/// Runs the CLI using the provided arguments and output streams.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    let mut io = IoStreams::new(stdout, stderr);
    run_with_loader(args, &mut io, &OrthoConfigLoader)
}

/// Runs the CLI with a custom configuration loader.
pub(crate) fn run_with_loader<I, W, E, L>(
    args: I,
    io: &mut IoStreams<'_, W, E>,
    loader: &L,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    let args: Vec<OsString> = args.into_iter().collect();
    let split = split_config_arguments(&args);

    let cli = match Cli::try_parse_from(&split.command_arguments) {
        Ok(cli) => cli,
        Err(error) if !error.use_stderr() => {
            // `--help` and `--version` are not failures.
            let _ = write!(io.stdout, "{error}");
            return ExitCode::SUCCESS;
        }
        Err(error) => return report(io, &AppError::CliUsage(error)),
    };

    let result = loader
        .load(&split.config_arguments)
        .and_then(|config| {
            telemetry::initialise(&config)?;
            Ok(config)
        })
        .and_then(|config| execute(&cli.command, &config, io));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => report(io, &error),
    }
}

fn report<W: Write, E: Write>(io: &mut IoStreams<'_, W, E>, error: &AppError) -> ExitCode {
    let _ = writeln!(io.stderr, "{error}");
    ExitCode::FAILURE
}

fn load_schema(config: &Config) -> Result<SchemaIndex, AppError> {
    let path = config.protocol_path().ok_or(AppError::MissingProtocol)?;
    debug!(target: CLI_TARGET, path = %path, "loading protocol definition");
    let definition = ProtocolDefinition::from_path(path)?;
    Ok(SchemaIndex::new(Arc::new(definition)))
}

fn execute<W: Write, E: Write>(
    command: &CliCommand,
    config: &Config,
    io: &mut IoStreams<'_, W, E>,
) -> Result<(), AppError> {
    let schema = load_schema(config)?;
    match command {
        CliCommand::Domains => write_lines(io.stdout, schema.domain_names()),
        CliCommand::Commands { domain } => {
            let names = schema
                .domain_command_names(domain)
                .ok_or_else(|| unknown_domain(domain))?;
            write_lines(io.stdout, names)
        }
        CliCommand::Events { domain } => {
            let names = schema
                .domain_event_names(domain)
                .ok_or_else(|| unknown_domain(domain))?;
            write_lines(io.stdout, names)
        }
        CliCommand::Request { method, params } => {
            let envelope = encode_request(schema, method, params.as_deref())?;
            io.stdout.write_all(&envelope)?;
            io.stdout.flush()?;
            Ok(())
        }
    }
}

fn unknown_domain(domain: &str) -> AppError {
    AppError::UnknownDomain {
        domain: domain.to_owned(),
    }
}

fn write_lines<'n>(
    out: &mut impl Write,
    names: impl IntoIterator<Item = &'n str>,
) -> Result<(), AppError> {
    for name in names {
        writeln!(out, "{name}")?;
    }
    Ok(())
}

/// Validates the call and returns the newline-terminated request envelope.
fn encode_request(
    schema: SchemaIndex,
    method: &str,
    params: Option<&str>,
) -> Result<Vec<u8>, AppError> {
    let (domain, command) = method
        .split_once('.')
        .ok_or_else(|| AppError::InvalidMethod {
            method: method.to_owned(),
        })?;
    let bag: Params = params
        .map(serde_json::from_str::<Params>)
        .transpose()
        .map_err(AppError::ParseParams)?
        .unwrap_or_default();

    let connection = WriterConnection::new(Vec::new());
    let dispatcher = Dispatcher::with_schema(schema, &connection);
    let reply = dispatcher.send(domain, command, bag)?;
    debug!(target: CLI_TARGET, id = reply.id(), method, "encoded request");
    drop(reply);
    drop(dispatcher);

    Ok(connection.into_inner())
}
