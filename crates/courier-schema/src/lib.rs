//! Protocol schema model and lookup index for the courier dispatcher.
//!
//! The crate owns the data model of a command/event protocol definition and
//! the immutable [`SchemaIndex`] derived from it. The index answers whether a
//! domain or command exists, exposes a command's declared parameters, lists a
//! domain's commands and events for introspection, and validates a caller's
//! parameter bag before a request is sent.

mod definition;
mod error;
mod index;
mod validation;

#[cfg(test)]
mod tests;

/// Tracing target for schema operations.
pub(crate) const SCHEMA_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::schema");

pub use definition::{Command, Domain, Event, Parameter, ProtocolDefinition, ProtocolVersion};
pub use error::{SchemaError, ValidationError};
pub use index::{CommandSchema, DomainCommands, SchemaIndex};
pub use validation::Params;
