// acr1222l-rs/acr1222l/src/lib.rs

//! acr1222l
//!
//! Driver for the ACS ACR1222L NFC reader over PC/SC: card presence
//! tracking, deferred card operations, NTAG / UltralightC tag commands
//! and the reader's LCD.
#![warn(missing_docs)]

pub mod card;
pub mod config;
pub mod constants;
pub mod crypto;
pub mod device;
pub mod error;
pub mod event;
pub mod manager;
pub mod prelude;
pub mod protocol;
pub mod test_support;
pub mod transport;
pub mod types;

// Re-export common types at crate root so `crate::Error`, `crate::Result`,
// and the newtypes in `types` are available for consumers and for
// convenient `prelude` re-exports.
pub use crate::error::*;
pub use crate::types::*;

pub use prelude::*;
