// acr1222l-rs/acr1222l/src/card/operations/read.rs

use log::{debug, info};

use crate::card::info::{NdefMessage, TagVersion};
use crate::constants::{TAG_CMD_FAST_READ, TAG_CMD_GET_VERSION};
use crate::device::Session;
use crate::protocol::ndef::parse_text_message;
use crate::protocol::{Command, build_reselect, decode_passthrough, decode_read_bytes, decode_uid};
use crate::types::Uid;
use crate::Result;

/// Bytes returned by one Read Binary during the page-by-page fallback
const PAGE_SIZE: u8 = 4;

/// Read the UID of the card in the field.
pub fn read_uid(session: &mut Session) -> Result<Uid> {
    let resp = session.execute(&Command::ReadUid)?;
    let uid = decode_uid(&resp)?;
    debug!("card uid read: {}", uid.to_hex());
    Ok(uid)
}

/// Read `len` bytes starting at `page`.
pub fn read_bytes(session: &mut Session, page: u8, len: u8) -> Result<Vec<u8>> {
    let resp = session.execute(&Command::ReadBytes { page, len })?;
    let data = decode_read_bytes(&resp)?;
    debug!("read {} bytes at page {:#04x}", data.len(), page);
    Ok(data)
}

/// FAST_READ over the inclusive page range.
pub fn fast_read(session: &mut Session, start_page: u8, end_page: u8) -> Result<Vec<u8>> {
    debug!(
        "fast read from page {:#04x} to page {:#04x}",
        start_page, end_page
    );
    let resp = session.execute(&Command::Passthrough {
        sub_command: TAG_CMD_FAST_READ,
        payload: vec![start_page, end_page],
    })?;
    decode_passthrough(TAG_CMD_FAST_READ, &resp)
}

/// GET_VERSION
pub fn get_version(session: &mut Session) -> Result<TagVersion> {
    let resp = session.execute(&Command::Passthrough {
        sub_command: TAG_CMD_GET_VERSION,
        payload: Vec::new(),
    })?;
    let payload = decode_passthrough(TAG_CMD_GET_VERSION, &resp)?;
    TagVersion::parse(&payload)
}

/// Read user memory and decode the first NDEF Text record.
///
/// FAST_READ is tried first. Tags that refuse it are re-selected and read
/// one page at a time.
pub fn read_ndef(session: &mut Session, start_page: u8, end_page: u8) -> Result<NdefMessage> {
    let data = match fast_read(session, start_page, end_page) {
        Ok(data) => data,
        Err(e) => {
            info!("fast read failed ({}), retrying with READ", e);
            session.execute(&Command::Raw(build_reselect().to_vec()))?;
            let mut data = Vec::new();
            for page in start_page..=end_page {
                data.extend(read_bytes(session, page, PAGE_SIZE)?);
            }
            data
        }
    };

    let record = parse_text_message(&data)?;
    let uid = read_uid(session)?;
    debug!("ndef text on {}: {:?}", uid.to_hex(), record.text);
    Ok(NdefMessage::new(record, data, &uid))
}
