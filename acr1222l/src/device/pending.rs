// acr1222l-rs/acr1222l/src/device/pending.rs

//! Operations waiting for a card. One slot per operation kind; a new
//! registration replaces the previous one.

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use log::debug;
use tokio::sync::oneshot;

use crate::card::NdefMessage;
use crate::types::{RequestKind, Uid};
use crate::{Error, Result};

/// Completion side of a pending operation
pub type Reply<T> = oneshot::Sender<Result<T>>;

/// Handle to an operation result that may arrive later.
///
/// Can be awaited, polled with `try_take`, or waited on synchronously with
/// `wait`. A slot that is superseded, cancelled or dropped resolves to
/// `Error::Cancelled`.
#[derive(Debug)]
pub struct Pending<T> {
    rx: oneshot::Receiver<Result<T>>,
}

impl<T> Pending<T> {
    /// A handle and its completion side
    pub fn channel() -> (Reply<T>, Self) {
        let (tx, rx) = oneshot::channel();
        (tx, Self { rx })
    }

    /// A handle that is already complete
    pub fn ready(result: Result<T>) -> Self {
        let (tx, this) = Self::channel();
        let _ = tx.send(result);
        this
    }

    /// Take the result if it has arrived
    pub fn try_take(&mut self) -> Option<Result<T>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(Err(Error::Cancelled)),
        }
    }

    /// Block the current thread until the result arrives.
    /// Must not be called from inside an async runtime.
    pub fn wait(self) -> Result<T> {
        self.rx.blocking_recv().unwrap_or(Err(Error::Cancelled))
    }
}

impl<T> Future for Pending<T> {
    type Output = Result<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|r| r.unwrap_or(Err(Error::Cancelled)))
    }
}

/// A deferred operation with its arguments and completion side
#[derive(Debug)]
pub enum PendingRequest {
    ReadUuid {
        reply: Reply<Uid>,
    },
    ReadBytes {
        page: u8,
        len: u8,
        reply: Reply<Vec<u8>>,
    },
    WriteBuffer {
        page: u8,
        data: Vec<u8>,
        reply: Reply<()>,
    },
    ReadNdef {
        start_page: u8,
        end_page: u8,
        reply: Reply<NdefMessage>,
    },
}

impl PendingRequest {
    pub fn read_uuid() -> (Self, Pending<Uid>) {
        let (reply, pending) = Pending::channel();
        (Self::ReadUuid { reply }, pending)
    }

    pub fn read_bytes(page: u8, len: u8) -> (Self, Pending<Vec<u8>>) {
        let (reply, pending) = Pending::channel();
        (Self::ReadBytes { page, len, reply }, pending)
    }

    pub fn write_buffer(page: u8, data: Vec<u8>) -> (Self, Pending<()>) {
        let (reply, pending) = Pending::channel();
        (Self::WriteBuffer { page, data, reply }, pending)
    }

    pub fn read_ndef(start_page: u8, end_page: u8) -> (Self, Pending<NdefMessage>) {
        let (reply, pending) = Pending::channel();
        (
            Self::ReadNdef {
                start_page,
                end_page,
                reply,
            },
            pending,
        )
    }

    pub fn kind(&self) -> RequestKind {
        match self {
            Self::ReadUuid { .. } => RequestKind::ReadUuid,
            Self::ReadBytes { .. } => RequestKind::ReadBytes,
            Self::WriteBuffer { .. } => RequestKind::WriteBuffer,
            Self::ReadNdef { .. } => RequestKind::ReadNdef,
        }
    }

    /// True when the waiting side has gone away
    pub fn is_abandoned(&self) -> bool {
        match self {
            Self::ReadUuid { reply } => reply.is_closed(),
            Self::ReadBytes { reply, .. } => reply.is_closed(),
            Self::WriteBuffer { reply, .. } => reply.is_closed(),
            Self::ReadNdef { reply, .. } => reply.is_closed(),
        }
    }

    /// Complete with an error
    pub fn reject(self, err: Error) {
        // the receiver may already be gone
        match self {
            Self::ReadUuid { reply } => {
                let _ = reply.send(Err(err));
            }
            Self::ReadBytes { reply, .. } => {
                let _ = reply.send(Err(err));
            }
            Self::WriteBuffer { reply, .. } => {
                let _ = reply.send(Err(err));
            }
            Self::ReadNdef { reply, .. } => {
                let _ = reply.send(Err(err));
            }
        }
    }
}

/// Slots of deferred operations, at most one per kind
#[derive(Debug, Default)]
pub struct PendingQueue {
    slots: BTreeMap<RequestKind, PendingRequest>,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `request`, replacing any earlier one of the same kind.
    /// Returns true when an earlier request was replaced; its handle
    /// resolves to `Error::Cancelled`.
    pub fn register(&mut self, request: PendingRequest) -> bool {
        let kind = request.kind();
        let replaced = self.slots.insert(kind, request).is_some();
        if replaced {
            debug!("pending {} superseded", kind);
        } else {
            debug!("pending {} registered", kind);
        }
        replaced
    }

    /// Drop the slot for `kind` without completing it
    pub fn cancel(&mut self, kind: RequestKind) -> bool {
        let removed = self.slots.remove(&kind).is_some();
        if removed {
            debug!("pending {} cancelled", kind);
        }
        removed
    }

    /// Take every occupied slot, in kind order
    pub fn drain(&mut self) -> Vec<PendingRequest> {
        std::mem::take(&mut self.slots).into_values().collect()
    }

    /// Complete every slot with an error built by `make_err`
    pub fn reject_all<F>(&mut self, make_err: F) -> usize
    where
        F: Fn() -> Error,
    {
        let requests = self.drain();
        let n = requests.len();
        for request in requests {
            request.reject(make_err());
        }
        n
    }

    pub fn contains(&self, kind: RequestKind) -> bool {
        self.slots.contains_key(&kind)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
