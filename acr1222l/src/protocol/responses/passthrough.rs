// acr1222l-rs/acr1222l/src/protocol/responses/passthrough.rs

//! InCommunicateThru responses: `D5 43 <status> <data...> 90 00`.
//! A non-zero status byte is a tag level failure, separate from transport
//! errors which never reach these decoders.

use crate::constants::PN532_CMD_PREFIX_DEVICE;
use crate::protocol::parser::{body_before_status, byte_at, ensure_len, slice_at};
use crate::types::Pack;
use crate::{Error, Result};

/// Index of the tag status byte
pub const STATUS_INDEX: usize = 2;

/// Tag status byte of a passthrough response
pub fn passthrough_status(resp: &[u8]) -> Result<u8> {
    byte_at(resp, STATUS_INDEX)
}

/// True when the response came back from the PN532 (`D5 ..`)
pub fn is_device_frame(resp: &[u8]) -> bool {
    resp.first() == Some(&PN532_CMD_PREFIX_DEVICE)
}

/// Decode the data part of a passthrough response for `command`.
/// Returns bytes 3..len-2 when the status byte is zero.
pub fn decode_passthrough(command: u8, resp: &[u8]) -> Result<Vec<u8>> {
    let status = passthrough_status(resp)?;
    if status != 0x00 {
        return Err(Error::PassthroughFailed { command, status });
    }
    Ok(body_before_status(resp, STATUS_INDEX + 1)?.to_vec())
}

/// Decode a PWD_AUTH response into the PACK.
pub fn decode_pwd_auth(resp: &[u8]) -> Result<Pack> {
    match passthrough_status(resp) {
        Ok(0x00) => {}
        _ => return Err(Error::WrongPassword),
    }
    let pack = slice_at(resp, STATUS_INDEX + 1, 2).map_err(|_| Error::WrongPassword)?;
    Pack::try_from(pack)
}

/// Extract the 8 byte ciphertext from an UltralightC AUTHENTICATE step.
/// Layout: D5 43 <status> <AF|00> <ek(8)> 90 00
pub fn decode_auth_challenge(resp: &[u8]) -> Result<[u8; 8]> {
    ensure_len(resp, 4)?;
    let status = passthrough_status(resp)?;
    if status != 0x00 {
        return Err(Error::WrongPassword);
    }
    let body = body_before_status(resp, 4)?;
    <[u8; 8]>::try_from(body).map_err(|_| Error::InvalidLength {
        expected: 8,
        actual: body.len(),
    })
}
