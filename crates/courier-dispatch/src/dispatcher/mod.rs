//! Request/response correlation and event fan-out over one connection.
//!
//! The [`Dispatcher`] owns the request id sequence, the table of pending
//! requests, and the listener registry. Outbound calls are validated against
//! the [`SchemaIndex`] before an id is allocated. Inbound messages are
//! classified as replies or events and routed to the waiting caller or to the
//! listeners registered for the event's domain.
//!
//! All mutable state sits behind one mutex that is held only for table
//! updates. Connection writes and listener callbacks run with the lock
//! released, so a listener may call back into the dispatcher.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use courier_schema::{Domain, DomainCommands, Params, ProtocolDefinition, SchemaIndex};
use serde_json::Value;
use tracing::{debug, warn};

use crate::connection::Connection;
use crate::envelope::{EventEnvelope, InboundMessage, ReplyEnvelope, RequestEnvelope};
use crate::error::DispatchError;
use crate::listeners::{DomainListener, ListenerId, ListenerRegistry};
use crate::pending::{PendingReply, PendingRequests, RequestIds};

/// Tracing target for dispatch operations.
pub(crate) const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");

#[derive(Debug, Default)]
struct DispatchState {
    pending: PendingRequests,
    listeners: ListenerRegistry,
}

/// Schema-checked command dispatcher for a single connection.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use courier_dispatch::{Dispatcher, WriterConnection};
/// use courier_schema::{Command, Domain, Params, Parameter, ProtocolDefinition};
/// use futures::executor::block_on;
/// use serde_json::json;
///
/// let definition = ProtocolDefinition::new(vec![Domain::new("Page").with_command(
///     Command::new("navigate").with_parameter(Parameter::required("url")),
/// )]);
/// let dispatcher = Dispatcher::new(Arc::new(definition), WriterConnection::new(Vec::new()));
///
/// let mut params = Params::new();
/// params.insert("url".into(), json!("http://x"));
/// let reply = dispatcher.send("Page", "navigate", params).expect("valid call");
///
/// dispatcher.handle_text(r#"{"id":1,"result":{"frameId":"F1"}}"#);
/// assert_eq!(block_on(reply).expect("resolved"), json!({"frameId": "F1"}));
/// ```
pub struct Dispatcher<C> {
    schema: SchemaIndex,
    connection: C,
    request_ids: RequestIds,
    state: Mutex<DispatchState>,
}

impl<C: Connection> Dispatcher<C> {
    /// Creates a dispatcher, indexing the shared protocol definition.
    #[must_use]
    pub fn new(definition: Arc<ProtocolDefinition>, connection: C) -> Self {
        Self::with_schema(SchemaIndex::new(definition), connection)
    }

    /// Creates a dispatcher over an already built index.
    #[must_use]
    pub fn with_schema(schema: SchemaIndex, connection: C) -> Self {
        Self {
            schema,
            connection,
            request_ids: RequestIds::new(),
            state: Mutex::new(DispatchState::default()),
        }
    }

    /// Validates and sends `domain.command`, returning the reply future.
    ///
    /// Nothing is allocated or sent when validation fails. If the connection
    /// rejects the payload, the request's pending entry is discarded and the
    /// connection error is returned.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Validation`] for schema violations,
    /// [`DispatchError::Encode`] if the envelope cannot be serialised, and
    /// [`DispatchError::Connection`] if the connection refuses the payload.
    pub fn send(
        &self,
        domain: &str,
        command: &str,
        params: Params,
    ) -> Result<PendingReply, DispatchError> {
        self.schema.validate(domain, command, &params)?;

        let id = self.request_ids.next_id();
        let envelope = RequestEnvelope::new(id, domain, command, params);
        let payload = envelope.to_json().map_err(DispatchError::Encode)?;
        let reply = self.lock_state().pending.register(id);

        debug!(
            target: DISPATCH_TARGET,
            id,
            method = %envelope.method,
            "sending request"
        );

        if let Err(source) = self.connection.send(&payload) {
            self.lock_state().pending.discard(id);
            warn!(
                target: DISPATCH_TARGET,
                id,
                method = %envelope.method,
                error = %source,
                "connection rejected request"
            );
            return Err(DispatchError::connection(id, source));
        }

        Ok(reply)
    }

    /// Sends `domain.command` and returns a future of its result.
    ///
    /// The request is validated and sent before this method returns; a
    /// rejected call yields a future that fails immediately.
    pub fn call(
        &self,
        domain: &str,
        command: &str,
        params: Params,
    ) -> impl Future<Output = Result<Value, DispatchError>> + Send + use<C> {
        let sent = self.send(domain, command, params);
        async move { sent?.await }
    }

    /// Deserialises and routes one inbound frame.
    ///
    /// Malformed text is logged and dropped.
    pub fn handle_text(&self, text: &str) {
        match text.parse::<InboundMessage>() {
            Ok(message) => self.route(message),
            Err(error) => {
                warn!(
                    target: DISPATCH_TARGET,
                    %error,
                    "dropping malformed inbound message"
                );
            }
        }
    }

    /// Routes one already deserialised inbound message.
    ///
    /// Messages that are neither a reply nor a well-formed event are logged
    /// and dropped.
    pub fn handle_message(&self, message: Value) {
        match InboundMessage::from_value(message) {
            Ok(inbound) => self.route(inbound),
            Err(error) => {
                warn!(
                    target: DISPATCH_TARGET,
                    %error,
                    "dropping malformed inbound message"
                );
            }
        }
    }

    /// Routes a classified inbound message. Never fails.
    pub fn route(&self, message: InboundMessage) {
        match message {
            InboundMessage::Reply(reply) => self.complete(reply),
            InboundMessage::Event(event) => self.deliver(&event),
        }
    }

    fn complete(&self, reply: ReplyEnvelope) {
        let id = reply.id();
        let Some(completion) = self.lock_state().pending.take(id) else {
            debug!(
                target: DISPATCH_TARGET,
                id,
                "ignoring reply for unknown request"
            );
            return;
        };

        debug!(
            target: DISPATCH_TARGET,
            id = completion.id(),
            error = reply.is_error(),
            "completing request"
        );
        if !completion.complete(reply.into_outcome()) {
            debug!(
                target: DISPATCH_TARGET,
                id,
                "caller abandoned request before its reply arrived"
            );
        }
    }

    fn deliver(&self, event: &EventEnvelope) {
        let (domain, member) = match event.split() {
            Ok(parts) => parts,
            Err(error) => {
                warn!(target: DISPATCH_TARGET, %error, "dropping event");
                return;
            }
        };

        let listeners = self.lock_state().listeners.listeners_for(domain);
        if listeners.is_empty() {
            debug!(
                target: DISPATCH_TARGET,
                domain,
                member,
                "no listeners for event domain"
            );
            return;
        }

        debug!(
            target: DISPATCH_TARGET,
            domain,
            member,
            listeners = listeners.len(),
            "delivering event"
        );
        for listener in listeners {
            listener(member, event.params());
        }
    }

    /// Appends a listener for every event of `domain`.
    ///
    /// Listeners run synchronously, in registration order, on the thread
    /// that routes the event.
    pub fn register_domain_listener<F>(&self, domain: &str, listener: F) -> ListenerId
    where
        F: Fn(&str, &Value) + Send + Sync + 'static,
    {
        let shared: DomainListener = Arc::new(listener);
        self.lock_state().listeners.register(domain, shared)
    }

    /// Removes a listener. Returns `false` if it was already removed.
    pub fn remove_domain_listener(&self, id: ListenerId) -> bool {
        self.lock_state().listeners.remove(id)
    }

    /// Returns the number of listeners registered for `domain`.
    #[must_use]
    pub fn listener_count(&self, domain: &str) -> usize {
        self.lock_state().listeners.count(domain)
    }

    /// Returns the number of requests still awaiting a reply.
    #[must_use]
    pub fn pending_requests(&self) -> usize {
        self.lock_state().pending.len()
    }

    /// Returns the schema index used for validation.
    #[must_use]
    pub const fn schema(&self) -> &SchemaIndex {
        &self.schema
    }

    /// Returns the underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &C {
        &self.connection
    }

    /// Returns a domain's commands, or `None` for an unknown domain.
    #[must_use]
    pub fn domain_commands(&self, domain: &str) -> Option<&DomainCommands> {
        self.schema.domain_commands(domain)
    }

    /// Returns a domain's command names in declaration order.
    #[must_use]
    pub fn domain_command_names(&self, domain: &str) -> Option<Vec<&str>> {
        self.schema.domain_command_names(domain)
    }

    /// Returns a domain's event names in declaration order.
    #[must_use]
    pub fn domain_event_names(&self, domain: &str) -> Option<Vec<&str>> {
        self.schema.domain_event_names(domain)
    }

    /// Returns the first domain declaration with a matching name.
    #[must_use]
    pub fn domain_definition(&self, domain: &str) -> Option<&Domain> {
        self.schema.domain_definition(domain)
    }

    fn lock_state(&self) -> MutexGuard<'_, DispatchState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
