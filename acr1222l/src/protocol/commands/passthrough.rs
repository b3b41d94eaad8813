// acr1222l-rs/acr1222l/src/protocol/commands/passthrough.rs

//! PN532 InCommunicateThru helpers. The reader forwards the wrapped
//! sub-command verbatim to the tag in the field.

use crate::Result;
use crate::constants::{
    PN532_CMD_IN_COMMUNICATE_THRU, PN532_CMD_PREFIX_HOST, PN532_RESELECT, READER_CLA,
    TAG_CMD_ADDITIONAL_FRAME, TAG_CMD_AUTHENTICATE, TAG_CMD_FAST_READ, TAG_CMD_GET_VERSION,
    TAG_CMD_PWD_AUTH,
};
use crate::protocol::apdu::Apdu;

/// Wrap a tag sub-command and its payload.
/// Layout: FF 00 00 00 <len+3> D4 42 <subcmd> <payload...>
pub fn wrap_command(sub_command: u8, payload: &[u8]) -> Result<Vec<u8>> {
    let mut data = Vec::with_capacity(3 + payload.len());
    data.push(PN532_CMD_PREFIX_HOST);
    data.push(PN532_CMD_IN_COMMUNICATE_THRU);
    data.push(sub_command);
    data.extend_from_slice(payload);
    Apdu::with_data(READER_CLA, 0x00, 0x00, 0x00, data).encode()
}

/// PWD_AUTH with a 4 byte password
pub fn build_pwd_auth(password: &[u8; 4]) -> Result<Vec<u8>> {
    wrap_command(TAG_CMD_PWD_AUTH, password)
}

/// First UltralightC AUTHENTICATE frame (key number 0)
pub fn build_authenticate_start() -> Result<Vec<u8>> {
    wrap_command(TAG_CMD_AUTHENTICATE, &[0x00])
}

/// Second UltralightC frame carrying ek(RndA || RndB')
pub fn build_authenticate_continue(token: &[u8]) -> Result<Vec<u8>> {
    wrap_command(TAG_CMD_ADDITIONAL_FRAME, token)
}

/// FAST_READ over an inclusive page range
pub fn build_fast_read(start_page: u8, end_page: u8) -> Result<Vec<u8>> {
    wrap_command(TAG_CMD_FAST_READ, &[start_page, end_page])
}

/// GET_VERSION
pub fn build_get_version() -> Result<Vec<u8>> {
    wrap_command(TAG_CMD_GET_VERSION, &[])
}

/// Raw frame re-selecting the tag after a failed FAST_READ
pub fn build_reselect() -> &'static [u8] {
    &PN532_RESELECT
}
