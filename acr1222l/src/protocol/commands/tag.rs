// acr1222l-rs/acr1222l/src/protocol/commands/tag.rs

use crate::Result;
use crate::constants::{CMD_READ_UID, INS_READ_BINARY, INS_UPDATE_BINARY, READER_CLA};
use crate::protocol::apdu::Apdu;

/// Encode the Get Data (UID) pseudo-APDU: FF CA 00 00 00
pub fn encode_read_uid() -> Vec<u8> {
    CMD_READ_UID.to_vec()
}

/// Encode Read Binary: FF B0 00 <page> <len>
pub fn encode_read_bytes(page: u8, len: u8) -> Vec<u8> {
    vec![READER_CLA, INS_READ_BINARY, 0x00, page, len]
}

/// Encode Update Binary: FF D6 00 <page> <len> <data...>
pub fn encode_write_bytes(page: u8, data: &[u8]) -> Result<Vec<u8>> {
    Apdu::with_data(READER_CLA, INS_UPDATE_BINARY, 0x00, page, data).encode()
}
