// acr1222l-rs/acr1222l/src/protocol/mod.rs

pub mod apdu;
pub mod commands;
pub mod ndef;
pub mod parser;
pub mod responses;

pub use apdu::Apdu;
pub use commands::*;
pub use responses::*;
