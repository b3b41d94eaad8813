// acr1222l-rs/acr1222l/src/device/mod.rs

//! Per-reader state: the connection session, card presence, the pending
//! request slots and the in-flight guard.

pub mod guard;
pub mod pending;
pub mod presence;
pub mod session;

pub use guard::{InFlight, InFlightToken};
pub use pending::{Pending, PendingQueue, PendingRequest};
pub use presence::PresenceTracker;
pub use session::{ConnectionSession, Session};
