//! Error types surfaced by the dispatcher.

use std::fmt;
use std::io;

use courier_schema::ValidationError;
use serde_json::Value;
use thiserror::Error;

use crate::envelope::RequestId;

/// Errors returned to callers of [`crate::Dispatcher::send`] and by the
/// futures it hands out.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The call was rejected by schema validation before anything was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The request envelope could not be serialised.
    #[error("failed to encode request envelope: {0}")]
    Encode(#[source] serde_json::Error),

    /// The connection refused the serialised request.
    #[error("failed to send request {id}: {source}")]
    Connection {
        /// Id allocated to the request that could not be sent.
        id: RequestId,
        /// Underlying connection error.
        #[source]
        source: ConnectionError,
    },

    /// The remote side answered with an error.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// The dispatcher was dropped before the reply arrived.
    #[error("dispatcher dropped before request {id} was answered")]
    Disconnected {
        /// Id of the request left unanswered.
        id: RequestId,
    },
}

impl DispatchError {
    /// Wraps a connection failure for the given request.
    #[must_use]
    pub const fn connection(id: RequestId, source: ConnectionError) -> Self {
        Self::Connection { id, source }
    }

    /// Returns the remote error when the failure came from the other side.
    #[must_use]
    pub const fn as_remote(&self) -> Option<&RemoteError> {
        match self {
            Self::Remote(remote) => Some(remote),
            _ => None,
        }
    }
}

/// An error object returned by the remote side.
///
/// Displays as the remote message, unmodified.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteError {
    /// Error code, when the remote supplied a numeric one.
    pub code: Option<i64>,
    /// Human-readable message from the remote.
    pub message: String,
    /// Additional data supplied with the error.
    pub data: Option<Value>,
}

impl RemoteError {
    /// Creates an error carrying only a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            data: None,
        }
    }

    /// Interprets the `error` member of a reply.
    ///
    /// Objects contribute their `message`, `code`, and `data` members. A bare
    /// string is taken as the message. Anything else, including an object
    /// without a string `message`, is rendered as JSON text.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::String(message) => Self::new(message),
            Value::Object(mut object) => match object.remove("message") {
                Some(Value::String(message)) => Self {
                    code: object.get("code").and_then(Value::as_i64),
                    message,
                    data: object.remove("data"),
                },
                Some(other) => {
                    object.insert("message".to_owned(), other);
                    Self::new(Value::Object(object).to_string())
                }
                None => Self::new(Value::Object(object).to_string()),
            },
            other => Self::new(other.to_string()),
        }
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.message)
    }
}

impl std::error::Error for RemoteError {}

/// Failures reported by a [`crate::Connection`].
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// I/O error while writing the payload.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The connection has been closed.
    #[error("connection closed")]
    Closed,
}

/// Reasons an inbound message could not be routed.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// The text was not valid JSON.
    #[error("malformed message: {0}")]
    Decode(#[source] serde_json::Error),

    /// The message was valid JSON but not an object.
    #[error("message is not a JSON object")]
    NotAnObject,

    /// The message carried a truthy id that is not a positive integer.
    #[error("reply id {id} is not a positive integer")]
    InvalidId {
        /// The offending id value.
        id: Value,
    },

    /// The message had no id and no string method.
    #[error("event message has no method")]
    MissingMethod,

    /// The event method has no `.` separating domain and member.
    #[error("event method '{method}' has no domain separator")]
    MissingSeparator {
        /// The offending method name.
        method: String,
    },
}

impl EnvelopeError {
    /// Creates a missing separator error.
    #[must_use]
    pub fn missing_separator(method: impl Into<String>) -> Self {
        Self::MissingSeparator {
            method: method.into(),
        }
    }
}
