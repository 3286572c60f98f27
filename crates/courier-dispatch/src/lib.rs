//! Schema-checked request/response and event dispatch over one connection.
//!
//! A [`Dispatcher`] validates each outbound call against a
//! [`courier_schema::SchemaIndex`], assigns it a unique id, and hands the
//! serialised envelope to a [`Connection`]. The caller receives a
//! [`PendingReply`] that resolves once the matching reply is routed back in
//! through [`Dispatcher::handle_text`] or [`Dispatcher::handle_message`].
//! Inbound events are fanned out to the listeners registered for their
//! domain.

mod connection;
mod dispatcher;
mod envelope;
mod error;
mod listeners;
mod pending;

#[cfg(test)]
mod tests;

pub use connection::{Connection, WriterConnection};
pub use dispatcher::Dispatcher;
pub use envelope::{EventEnvelope, InboundMessage, ReplyEnvelope, RequestEnvelope, RequestId};
pub use error::{ConnectionError, DispatchError, EnvelopeError, RemoteError};
pub use listeners::{DomainListener, ListenerId};
pub use pending::PendingReply;
