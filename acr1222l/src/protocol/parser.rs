// acr1222l-rs/acr1222l/src/protocol/parser.rs

use crate::{Error, Result};

/// Ensure the slice has at least `min` bytes.
pub fn ensure_len(data: &[u8], min: usize) -> Result<()> {
    if data.len() < min {
        return Err(Error::InvalidLength {
            expected: min,
            actual: data.len(),
        });
    }
    Ok(())
}

/// Read a single byte at `idx` with bounds checking.
pub fn byte_at(data: &[u8], idx: usize) -> Result<u8> {
    ensure_len(data, idx + 1)?;
    Ok(data[idx])
}

/// Return a subslice with bounds checking.
pub fn slice_at(data: &[u8], idx: usize, len: usize) -> Result<&[u8]> {
    ensure_len(data, idx + len)?;
    Ok(&data[idx..idx + len])
}

/// Bytes between `start` and the trailing two status bytes.
pub fn body_before_status(data: &[u8], start: usize) -> Result<&[u8]> {
    ensure_len(data, start + 2)?;
    Ok(&data[start..data.len() - 2])
}

/// Position of `needle` at or after `from`
pub fn find_from(data: &[u8], from: usize, needle: u8) -> Option<usize> {
    data.get(from..)?
        .iter()
        .position(|&b| b == needle)
        .map(|p| p + from)
}
