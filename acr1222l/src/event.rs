// acr1222l-rs/acr1222l/src/event.rs

//! Messages flowing into and out of the reader manager.
//!
//! The platform backend pushes `ReaderEvent`s into a channel; the manager
//! consumes them one at a time and publishes `Notification`s to
//! subscribers. Faults go to the error callback given at initialisation.

use crate::types::ReaderState;
use crossbeam_channel::{Receiver, Sender};
use derive_more::Display;

/// Inbound event from the platform smart card service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReaderEvent {
    /// A reader appeared
    Attached { name: String },
    /// A reader disappeared (hot-unplug)
    Removed { name: String },
    /// The hardware state bitmask of a reader changed
    StatusChanged { name: String, state: ReaderState },
    /// A reader reported an error
    Error { name: String, message: String },
    /// The smart card service itself failed
    ServiceError { message: String },
}

impl ReaderEvent {
    /// Name of the reader the event concerns, if any
    pub fn reader_name(&self) -> Option<&str> {
        match self {
            Self::Attached { name }
            | Self::Removed { name }
            | Self::StatusChanged { name, .. }
            | Self::Error { name, .. } => Some(name),
            Self::ServiceError { .. } => None,
        }
    }
}

/// Outbound lifecycle notification
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Notification {
    #[display(fmt = "reader found: {}", id)]
    ReaderFound { id: String, name: String },
    #[display(fmt = "reader end: {}", id)]
    ReaderEnd { id: String },
    #[display(fmt = "card present on {}", id)]
    CardPresent { id: String },
    #[display(fmt = "card removed from {}", id)]
    CardRemoved { id: String },
}

/// Category of a fault reported through the error callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum FaultKind {
    #[display(fmt = "PCSC_ERROR")]
    PcscError,
    #[display(fmt = "READER_REMOVED")]
    ReaderRemoved,
    #[display(fmt = "READER_ERROR")]
    ReaderError,
}

/// Fault handed to the error callback
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display(fmt = "{}: {}", kind, message)]
pub struct ReaderFault {
    pub kind: FaultKind,
    pub message: String,
    pub reader: Option<String>,
}

impl ReaderFault {
    pub fn new(kind: FaultKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            reader: None,
        }
    }

    pub fn with_reader(mut self, reader: impl Into<String>) -> Self {
        self.reader = Some(reader.into());
        self
    }
}

/// Error callback signature
pub type ErrorCallback = Box<dyn FnMut(ReaderFault) + Send>;

pub type EventSender = Sender<ReaderEvent>;
pub type EventReceiver = Receiver<ReaderEvent>;
pub type NotificationSender = Sender<Notification>;
pub type NotificationReceiver = Receiver<Notification>;

/// Create an unbounded event channel
pub fn event_channel() -> (EventSender, EventReceiver) {
    crossbeam_channel::unbounded()
}
