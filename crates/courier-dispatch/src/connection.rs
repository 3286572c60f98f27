//! The outbound side of the connection collaborator.
//!
//! The dispatcher neither opens nor closes connections and never frames
//! bytes itself. It hands each serialised request to [`Connection::send`] and
//! expects the owner of the connection to feed inbound messages back through
//! [`crate::Dispatcher::handle_text`] or [`crate::Dispatcher::handle_message`].

use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::ConnectionError;

/// Accepts serialised request envelopes for delivery.
///
/// Sends are fire-and-forget: the implementation must accept the payload
/// immediately or fail. There is no acknowledgement below the reply layer.
pub trait Connection: Send + Sync {
    /// Delivers one serialised envelope.
    ///
    /// # Errors
    ///
    /// Returns a [`ConnectionError`] when the payload cannot be delivered.
    /// The error is propagated to the caller of `send` unchanged.
    fn send(&self, payload: &str) -> Result<(), ConnectionError>;
}

impl<C: Connection + ?Sized> Connection for Arc<C> {
    fn send(&self, payload: &str) -> Result<(), ConnectionError> {
        (**self).send(payload)
    }
}

impl<C: Connection + ?Sized> Connection for &C {
    fn send(&self, payload: &str) -> Result<(), ConnectionError> {
        (**self).send(payload)
    }
}

/// Writes each envelope as one line of JSON to an underlying writer.
///
/// # Example
///
/// ```
/// use courier_dispatch::{Connection, WriterConnection};
///
/// let connection = WriterConnection::new(Vec::new());
/// connection.send(r#"{"id":1}"#).expect("write succeeds");
/// assert_eq!(connection.into_inner(), b"{\"id\":1}\n");
/// ```
#[derive(Debug)]
pub struct WriterConnection<W> {
    writer: Mutex<W>,
}

impl<W: Write + Send> WriterConnection<W> {
    /// Wraps a writer.
    #[must_use]
    pub const fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Returns the underlying writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send> Connection for WriterConnection<W> {
    fn send(&self, payload: &str) -> Result<(), ConnectionError> {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writer.write_all(payload.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}
