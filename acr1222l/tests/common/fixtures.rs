// fixtures.rs - commonly used test payloads and frames

use super::with_success;

pub fn sample_uid_bytes() -> [u8; 7] {
    [0x04, 0x5A, 0x3C, 0x12, 0x8B, 0x6F, 0x80]
}

/// Read UID answer (UID + 90 00)
pub fn uid_response() -> Vec<u8> {
    with_success(&sample_uid_bytes())
}

/// UltralightC factory key "BREAKMEIFYOUCAN!"
pub fn ultralight_c_key() -> [u8; 16] {
    *b"BREAKMEIFYOUCAN!"
}

pub fn wrong_key() -> [u8; 16] {
    [0u8; 16]
}

/// Four pages of user memory: an NDEF TLV with one Text record "hello"
/// (language "en") followed by the terminator.
pub fn ndef_hello_memory() -> Vec<u8> {
    vec![
        0x03, 0x0C, 0xD1, 0x01, 0x08, 0x54, 0x02, 0x65, 0x6E, 0x68, 0x65, 0x6C, 0x6C, 0x6F, 0xFE,
        0x00,
    ]
}

/// GET_VERSION payload of an NTAG213
pub fn ntag213_version() -> [u8; 8] {
    [0x00, 0x04, 0x04, 0x02, 0x01, 0x00, 0x0F, 0x03]
}
