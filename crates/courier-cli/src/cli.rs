//! CLI argument definitions for the courier tool.

use clap::{Parser, Subcommand};

/// Command-line interface for inspecting a protocol and encoding requests.
#[derive(Parser, Debug)]
#[command(name = "courier", disable_help_subcommand = true)]
pub(crate) struct Cli {
    /// The operation to perform.
    #[command(subcommand)]
    pub(crate) command: CliCommand,
}

/// Operations offered by the CLI.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub(crate) enum CliCommand {
    /// Lists the domains declared by the protocol.
    Domains,
    /// Lists the commands of a domain in declaration order.
    Commands {
        /// The domain to inspect (for example `Page`).
        #[arg(value_name = "DOMAIN")]
        domain: String,
    },
    /// Lists the events of a domain in declaration order.
    Events {
        /// The domain to inspect (for example `Page`).
        #[arg(value_name = "DOMAIN")]
        domain: String,
    },
    /// Validates a command call and writes its request envelope.
    Request {
        /// Dotted method name (for example `Page.navigate`).
        #[arg(value_name = "DOMAIN.COMMAND")]
        method: String,
        /// Parameters as a JSON object. Defaults to `{}`.
        #[arg(value_name = "PARAMS_JSON")]
        params: Option<String>,
    },
}
