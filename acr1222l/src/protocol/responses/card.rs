// acr1222l-rs/acr1222l/src/protocol/responses/card.rs

use crate::constants::{SW_CARD_LOCKED, SW_SUCCESS};
use crate::protocol::parser::{byte_at, ensure_len};
use crate::protocol::responses::status::split_status;
use crate::types::Uid;
use crate::{Error, Result};

/// Decode a Get Data (UID) response; the trailing status word is dropped.
pub fn decode_uid(resp: &[u8]) -> Result<Uid> {
    let (body, _) = split_status(resp)?;
    Ok(Uid::from_bytes(body))
}

/// Decode a Read Binary response.
///
/// The reader reports success with `90` in the second to last byte;
/// anything else there is returned as `ReadFailed`.
pub fn decode_read_bytes(resp: &[u8]) -> Result<Vec<u8>> {
    let (body, sw) = split_status(resp)?;
    if sw[0] != SW_SUCCESS[0] {
        return Err(Error::ReadFailed { status: sw[0] });
    }
    Ok(body.to_vec())
}

/// Decode an Update Binary response.
///
/// Written pages answer `90 00`; a locked page answers with `FE` first.
pub fn decode_write(resp: &[u8]) -> Result<()> {
    ensure_len(resp, 1)?;
    match byte_at(resp, 0)? {
        b if b == SW_SUCCESS[0] => Ok(()),
        SW_CARD_LOCKED => Err(Error::CardLocked),
        code => Err(Error::WriteFailed { code }),
    }
}
