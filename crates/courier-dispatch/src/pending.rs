//! Bookkeeping for requests awaiting their replies.
//!
//! Each in-flight request owns one single-use completion channel. The sender
//! half lives in [`PendingRequests`] keyed by request id and is removed in the
//! same step that completes it, so a request can be completed at most once.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::task::{Context, Poll};

use futures::FutureExt;
use futures::channel::oneshot;
use serde_json::Value;

use crate::envelope::RequestId;
use crate::error::{DispatchError, RemoteError};

type ReplyOutcome = Result<Value, RemoteError>;

/// Monotonic request id sequence starting at 1.
#[derive(Debug)]
pub(crate) struct RequestIds {
    next: AtomicU64,
}

impl RequestIds {
    pub(crate) const fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    /// Allocates the next id. Ids are never reused.
    pub(crate) fn next_id(&self) -> RequestId {
        self.next.fetch_add(1, Ordering::SeqCst)
    }
}

/// Table of completion channels keyed by request id.
#[derive(Debug, Default)]
pub(crate) struct PendingRequests {
    senders: HashMap<RequestId, oneshot::Sender<ReplyOutcome>>,
}

impl PendingRequests {
    /// Registers a request and returns the future its caller awaits.
    pub(crate) fn register(&mut self, id: RequestId) -> PendingReply {
        let (sender, receiver) = oneshot::channel();
        self.senders.insert(id, sender);
        PendingReply { id, receiver }
    }

    /// Removes and returns the completion channel for `id`.
    pub(crate) fn take(&mut self, id: RequestId) -> Option<Completion> {
        self.senders
            .remove(&id)
            .map(|sender| Completion { id, sender })
    }

    /// Drops the entry for a request that never left the dispatcher.
    pub(crate) fn discard(&mut self, id: RequestId) {
        self.senders.remove(&id);
    }

    pub(crate) fn len(&self) -> usize {
        self.senders.len()
    }
}

/// The sending half of a pending request, detached from the table.
#[derive(Debug)]
pub(crate) struct Completion {
    id: RequestId,
    sender: oneshot::Sender<ReplyOutcome>,
}

impl Completion {
    pub(crate) const fn id(&self) -> RequestId {
        self.id
    }

    /// Completes the request. Returns `false` when the caller has already
    /// dropped its [`PendingReply`].
    pub(crate) fn complete(self, outcome: ReplyOutcome) -> bool {
        self.sender.send(outcome).is_ok()
    }
}

/// Future resolving to the reply of one request.
///
/// Resolves with the reply's `result`, fails with [`DispatchError::Remote`]
/// when the reply carries an error, and fails with
/// [`DispatchError::Disconnected`] if the dispatcher is dropped first. With
/// no reply and a live dispatcher it stays pending indefinitely.
#[derive(Debug)]
#[must_use = "a reply is only observed by awaiting it"]
pub struct PendingReply {
    id: RequestId,
    receiver: oneshot::Receiver<ReplyOutcome>,
}

impl PendingReply {
    /// Returns the id allocated to the request.
    #[must_use]
    pub const fn id(&self) -> RequestId {
        self.id
    }
}

impl Future for PendingReply {
    type Output = Result<Value, DispatchError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let id = self.id;
        self.receiver.poll_unpin(cx).map(|received| match received {
            Ok(outcome) => outcome.map_err(DispatchError::Remote),
            Err(oneshot::Canceled) => Err(DispatchError::Disconnected { id }),
        })
    }
}
