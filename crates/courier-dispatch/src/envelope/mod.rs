//! Message envelopes exchanged over the connection.
//!
//! Outbound requests have the shape `{"id": N, "method": "Domain.command",
//! "params": {...}}`. Inbound messages are either replies carrying the id of
//! an earlier request, or events carrying a dotted method name and no id.

use std::str::FromStr;

use courier_schema::Params;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{EnvelopeError, RemoteError};

/// Identifier correlating a request with its reply.
pub type RequestId = u64;

/// An outbound request envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestEnvelope {
    /// Unique request identifier.
    pub id: RequestId,
    /// Dotted `Domain.command` method name.
    pub method: String,
    /// Parameter bag, always serialised (as `{}` when empty).
    pub params: Params,
}

impl RequestEnvelope {
    /// Creates a request for `domain.command`.
    #[must_use]
    pub fn new(id: RequestId, domain: &str, command: &str, params: Params) -> Self {
        Self {
            id,
            method: format!("{domain}.{command}"),
            params,
        }
    }

    /// Serialises the envelope to JSON text.
    ///
    /// # Errors
    ///
    /// Returns the serialiser's error if a parameter value cannot be encoded.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// A reply to an earlier request.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplyEnvelope {
    id: RequestId,
    result: Option<Value>,
    error: Option<Value>,
}

impl ReplyEnvelope {
    /// Creates a successful reply.
    #[must_use]
    pub const fn success(id: RequestId, result: Value) -> Self {
        Self {
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Creates an error reply from a JSON error object.
    #[must_use]
    pub const fn failure(id: RequestId, error: Value) -> Self {
        Self {
            id,
            result: None,
            error: Some(error),
        }
    }

    fn from_object(id: RequestId, mut object: Map<String, Value>) -> Self {
        Self {
            id,
            result: object.remove("result"),
            error: object.remove("error").filter(is_truthy),
        }
    }

    /// Returns the id of the request being answered.
    #[must_use]
    pub const fn id(&self) -> RequestId {
        self.id
    }

    /// Returns `true` when the reply carries an error.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Consumes the reply, yielding the result or the remote error.
    ///
    /// A falsy `error` member is ignored. A reply with neither member
    /// resolves to `null`.
    pub fn into_outcome(self) -> Result<Value, RemoteError> {
        match self.error {
            Some(error) => Err(RemoteError::from_value(error)),
            None => Ok(self.result.unwrap_or(Value::Null)),
        }
    }
}

/// An unsolicited event notification.
#[derive(Debug, Clone, PartialEq)]
pub struct EventEnvelope {
    method: String,
    params: Value,
}

impl EventEnvelope {
    /// Creates an event envelope.
    #[must_use]
    pub fn new(method: impl Into<String>, params: Value) -> Self {
        Self {
            method: method.into(),
            params,
        }
    }

    /// Returns the full dotted method name.
    #[must_use]
    pub const fn method(&self) -> &str {
        self.method.as_str()
    }

    /// Returns the event payload (`null` when the message had none).
    #[must_use]
    pub const fn params(&self) -> &Value {
        &self.params
    }

    /// Splits the method at its first `.` into `(domain, member)`.
    ///
    /// Any further dots stay in the member name, so `"A.b.c"` yields
    /// `("A", "b.c")`.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::MissingSeparator`] when the method has no `.`.
    pub fn split(&self) -> Result<(&str, &str), EnvelopeError> {
        self.method
            .split_once('.')
            .ok_or_else(|| EnvelopeError::missing_separator(&self.method))
    }
}

/// A classified inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    /// A reply to a previously sent request.
    Reply(ReplyEnvelope),
    /// An event notification.
    Event(EventEnvelope),
}

impl InboundMessage {
    /// Classifies a deserialised message.
    ///
    /// A message whose `id` is truthy (not `null`, `false`, `0`, or `""`) is
    /// a reply; anything else is an event and must carry a string `method`.
    /// An `id` of `0` is therefore classified as an event.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::NotAnObject`] for non-object messages,
    /// [`EnvelopeError::InvalidId`] for a truthy id that is not a positive
    /// integer, and [`EnvelopeError::MissingMethod`] for an event without a
    /// method name.
    pub fn from_value(value: Value) -> Result<Self, EnvelopeError> {
        let Value::Object(mut object) = value else {
            return Err(EnvelopeError::NotAnObject);
        };

        match object.remove("id") {
            Some(id) if is_truthy(&id) => match id.as_u64() {
                Some(request_id) => Ok(Self::Reply(ReplyEnvelope::from_object(
                    request_id, object,
                ))),
                None => Err(EnvelopeError::InvalidId { id }),
            },
            _ => {
                let Some(Value::String(method)) = object.remove("method") else {
                    return Err(EnvelopeError::MissingMethod);
                };
                let params = object.remove("params").unwrap_or(Value::Null);
                Ok(Self::Event(EventEnvelope::new(method, params)))
            }
        }
    }
}

impl FromStr for InboundMessage {
    type Err = EnvelopeError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let value = serde_json::from_str(text).map_err(EnvelopeError::Decode)?;
        Self::from_value(value)
    }
}

/// JavaScript-style truthiness of a JSON value.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|float| float.abs() > 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
