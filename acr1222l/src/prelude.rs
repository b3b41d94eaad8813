// acr1222l-rs/acr1222l/src/prelude.rs

pub use crate::card::{NdefMessage, Tag, TagVersion};
pub use crate::config::{InterfaceMatcher, ReaderConfig};
pub use crate::device::{Pending, Session};
pub use crate::event::{FaultKind, Notification, ReaderEvent, ReaderFault};
pub use crate::manager::{LifecycleState, ReaderManager, ReaderManagerBuilder};
pub use crate::protocol::{Command, LcdRow};
pub use crate::transport::{Backend, Transport};
pub use crate::{
    CardPresence, Disposition, Error, Pack, Password, Protocol, ReaderState, RequestKind, Result,
    ShareMode, Uid,
};
