// acr1222l-rs/acr1222l/src/protocol/ndef.rs

//! Minimal NDEF reader: locates the first record in raw tag memory and
//! decodes well-known Text payloads. Encoding is not supported.

use crate::constants::{NDEF_MESSAGE_TLV, NDEF_RECORD_MARKER, NDEF_RTD_TEXT};
use crate::protocol::parser::{byte_at, find_from, slice_at};
use crate::{Error, Result};

const FLAG_SR: u8 = 0x10;
const FLAG_IL: u8 = 0x08;
const TNF_MASK: u8 = 0x07;
const TNF_WELL_KNOWN: u8 = 0x01;

const TEXT_UTF16: u8 = 0x80;
const TEXT_LANG_MASK: u8 = 0x3F;

/// One decoded NDEF record (borrowing from the source buffer)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record<'a> {
    pub tnf: u8,
    pub record_type: &'a [u8],
    pub id: &'a [u8],
    pub payload: &'a [u8],
}

impl Record<'_> {
    pub fn is_text(&self) -> bool {
        self.tnf == TNF_WELL_KNOWN && self.record_type.first() == Some(&NDEF_RTD_TEXT)
    }
}

/// Decoded Text record payload
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextRecord {
    pub language: String,
    pub text: String,
}

/// Slice of `data` holding the NDEF message, starting at the first record
/// marker. When the marker follows a Message TLV header (`03 <len>` or
/// `03 FF <len16>`) the slice is bounded by that length, otherwise it runs
/// to the end of the buffer. The record header bounds the record itself,
/// so `FE`/`00` bytes inside a payload are never treated as terminators.
pub fn locate_message(data: &[u8]) -> Result<&[u8]> {
    let start = find_from(data, 0, NDEF_RECORD_MARKER)
        .ok_or_else(|| Error::Protocol("bytes do not contain an NDEF message".into()))?;

    let end = match tlv_length(data, start) {
        Some(len) => (start + len).min(data.len()),
        None => data.len(),
    };

    Ok(&data[start..end])
}

fn tlv_length(data: &[u8], start: usize) -> Option<usize> {
    match data.get(..start)? {
        [.., NDEF_MESSAGE_TLV, 0xFF, hi, lo] => Some(u16::from_be_bytes([*hi, *lo]) as usize),
        [.., NDEF_MESSAGE_TLV, len] if *len != 0xFF => Some(*len as usize),
        _ => None,
    }
}

/// Decode the record at the start of `msg`.
pub fn decode_record(msg: &[u8]) -> Result<Record<'_>> {
    let header = byte_at(msg, 0).map_err(truncated)?;
    let type_len = byte_at(msg, 1).map_err(truncated)? as usize;

    let mut idx = 2;
    let payload_len = if header & FLAG_SR != 0 {
        let n = byte_at(msg, idx).map_err(truncated)? as usize;
        idx += 1;
        n
    } else {
        let b = slice_at(msg, idx, 4).map_err(truncated)?;
        idx += 4;
        u32::from_be_bytes([b[0], b[1], b[2], b[3]]) as usize
    };

    let id_len = if header & FLAG_IL != 0 {
        let n = byte_at(msg, idx).map_err(truncated)? as usize;
        idx += 1;
        n
    } else {
        0
    };

    let record_type = slice_at(msg, idx, type_len).map_err(truncated)?;
    idx += type_len;
    let id = slice_at(msg, idx, id_len).map_err(truncated)?;
    idx += id_len;
    let payload = slice_at(msg, idx, payload_len).map_err(truncated)?;

    Ok(Record {
        tnf: header & TNF_MASK,
        record_type,
        id,
        payload,
    })
}

/// Decode a Text record payload: status byte, language code, text.
pub fn decode_text_payload(payload: &[u8]) -> Result<TextRecord> {
    let status = byte_at(payload, 0).map_err(truncated)?;
    let lang_len = (status & TEXT_LANG_MASK) as usize;
    let lang = slice_at(payload, 1, lang_len).map_err(truncated)?;
    let body = &payload[1 + lang_len..];

    let text = if status & TEXT_UTF16 != 0 {
        decode_utf16(body)?
    } else {
        String::from_utf8(body.to_vec())
            .map_err(|e| Error::Protocol(format!("invalid UTF-8 in text record: {}", e)))?
    };

    Ok(TextRecord {
        language: String::from_utf8_lossy(lang).into_owned(),
        text,
    })
}

/// Locate, decode and interpret the first record of `data` as Text.
pub fn parse_text_message(data: &[u8]) -> Result<TextRecord> {
    let msg = locate_message(data)?;
    let record = decode_record(msg)?;
    if !record.is_text() {
        return Err(Error::Protocol("unknown NDEF message".into()));
    }
    decode_text_payload(record.payload)
}

fn decode_utf16(body: &[u8]) -> Result<String> {
    if body.len() % 2 != 0 {
        return Err(Error::Protocol("odd length UTF-16 text".into()));
    }
    let mut units: Vec<u16> = body.chunks(2).map(|c| u16::from_be_bytes([c[0], c[1]])).collect();
    // BOM
    let bom = units.first().copied();
    match bom {
        Some(0xFEFF) => {
            units.remove(0);
        }
        Some(0xFFFE) => {
            units.remove(0);
            units.iter_mut().for_each(|u| *u = u.swap_bytes());
        }
        _ => {}
    }
    String::from_utf16(&units).map_err(|e| Error::Protocol(format!("invalid UTF-16: {}", e)))
}

fn truncated(_: Error) -> Error {
    Error::Protocol("truncated NDEF record".into())
}
