//! Errors raised while loading definitions and validating calls.
//!
//! I/O errors are wrapped in `Arc` so the error types stay cheap to clone
//! and satisfy the `result_large_err` Clippy lint.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Errors raised while loading a protocol definition.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The definition file could not be read.
    #[error("failed to read protocol definition '{}': {source}", .path.display())]
    Read {
        /// Path that was opened.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<io::Error>,
    },

    /// The definition content is not valid JSON of the expected shape.
    #[error("failed to parse protocol definition: {0}")]
    Parse(#[source] serde_json::Error),
}

/// Reasons a call is rejected before anything is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The domain is not declared by the protocol definition.
    #[error("unknown namespace: {domain}")]
    UnknownNamespace {
        /// Domain requested by the caller.
        domain: String,
    },

    /// The command is not declared under the domain.
    #[error("unknown method: {domain}.{command}")]
    UnknownMethod {
        /// Domain requested by the caller.
        domain: String,
        /// Command requested by the caller.
        command: String,
    },

    /// One or more required parameters are absent from the bag.
    #[error("{command} requires '{}' parameter", .missing.join(","))]
    MissingParameters {
        /// Command requested by the caller.
        command: String,
        /// Names of the absent parameters, in declaration order.
        missing: Vec<String>,
    },
}

impl ValidationError {
    /// Creates an unknown namespace error.
    #[must_use]
    pub fn unknown_namespace(domain: impl Into<String>) -> Self {
        Self::UnknownNamespace {
            domain: domain.into(),
        }
    }

    /// Creates an unknown method error.
    #[must_use]
    pub fn unknown_method(domain: impl Into<String>, command: impl Into<String>) -> Self {
        Self::UnknownMethod {
            domain: domain.into(),
            command: command.into(),
        }
    }

    /// Creates a missing parameters error.
    #[must_use]
    pub fn missing_parameters(command: impl Into<String>, missing: Vec<String>) -> Self {
        Self::MissingParameters {
            command: command.into(),
            missing,
        }
    }
}
