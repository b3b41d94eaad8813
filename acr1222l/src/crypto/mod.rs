// acr1222l-rs/acr1222l/src/crypto/mod.rs

pub mod tdes;

pub use tdes::{BLOCK_SIZE, ChainedTdes, FeedbackMode};

/// Circular one byte left rotation of an 8 byte buffer
pub fn rotate_left(block: &[u8; 8]) -> [u8; 8] {
    let mut out = *block;
    out.rotate_left(1);
    out
}

/// Circular one byte right rotation of an 8 byte buffer
pub fn rotate_right(block: &[u8; 8]) -> [u8; 8] {
    let mut out = *block;
    out.rotate_right(1);
    out
}
