// acr1222l-rs/acr1222l/src/protocol/responses/status.rs

use crate::constants::SW_SUCCESS;
use crate::protocol::parser::ensure_len;
use crate::Result;

/// Split a response into its body and trailing status word.
pub fn split_status(resp: &[u8]) -> Result<(&[u8], [u8; 2])> {
    ensure_len(resp, 2)?;
    let (body, sw) = resp.split_at(resp.len() - 2);
    Ok((body, [sw[0], sw[1]]))
}

/// True when the response ends with `90 00`
pub fn is_success(resp: &[u8]) -> bool {
    resp.ends_with(&SW_SUCCESS)
}

/// Reader control responses carry their status in the first byte.
pub fn control_status(resp: &[u8]) -> Option<u8> {
    resp.first().copied()
}
