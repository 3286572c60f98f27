//! Error types for the CLI runtime.

use std::io;
use std::sync::Arc;

use courier_dispatch::DispatchError;
use courier_schema::SchemaError;
use thiserror::Error;

use crate::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(Arc<ortho_config::OrthoError>),
    #[error("{0}")]
    CliUsage(clap::Error),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error("no protocol definition configured; pass --protocol-path or set COURIER_PROTOCOL_PATH")]
    MissingProtocol,
    #[error(transparent)]
    LoadProtocol(#[from] SchemaError),
    #[error("unknown domain: {domain}")]
    UnknownDomain { domain: String },
    #[error("method '{method}' must have the form DOMAIN.COMMAND")]
    InvalidMethod { method: String },
    #[error("parameters must be a JSON object: {0}")]
    ParseParams(serde_json::Error),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    #[error("failed to write output: {0}")]
    WriteOutput(#[from] io::Error),
}
