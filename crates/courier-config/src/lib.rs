//! Shared configuration for the courier tooling.
//!
//! [`Config`] is layered by `ortho_config`: built-in defaults, then an
//! optional configuration file, then `COURIER_*` environment variables, then
//! command-line flags.

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

mod defaults;
mod logging;

pub use defaults::{
    DEFAULT_LOG_FILTER, default_log_filter, default_log_filter_string, default_log_format,
};
pub use logging::{LogFormat, LogFormatParseError};

/// Runtime configuration shared by the courier binaries.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "COURIER")]
pub struct Config {
    /// `tracing` filter expression applied to log output.
    #[serde(default = "default_log_filter_string")]
    #[ortho_config(default = default_log_filter_string())]
    log_filter: String,
    /// Log output format.
    #[serde(default = "default_log_format")]
    #[ortho_config(default = default_log_format())]
    log_format: LogFormat,
    /// Path to the protocol definition JSON file.
    #[serde(default)]
    protocol_path: Option<Utf8PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            protocol_path: None,
        }
    }
}

impl Config {
    /// Returns the configured log filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Returns the configured log format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Returns the protocol definition path, when one is configured.
    #[must_use]
    pub fn protocol_path(&self) -> Option<&Utf8PathBuf> {
        self.protocol_path.as_ref()
    }

    /// Returns a copy with the protocol path replaced.
    #[must_use]
    pub fn with_protocol_path(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.protocol_path = Some(path.into());
        self
    }
}
