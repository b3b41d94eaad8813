// acr1222l-rs/acr1222l/src/card/operations/mod.rs

pub mod auth;
pub mod read;
pub mod write;

// Re-export the operations at the module root so callers can use
// `crate::card::operations::read_uid(...)`.
pub use auth::{authenticate, authenticate_ultralight_c};
pub use read::{fast_read, get_version, read_bytes, read_ndef, read_uid};
pub use write::write_buffer;
