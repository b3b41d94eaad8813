// acr1222l-rs/acr1222l/src/card/info.rs

use crate::protocol::ndef::TextRecord;
use crate::types::Uid;
use crate::{Error, Result};

/// GET_VERSION answer of an NTAG / Ultralight tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TagVersion {
    pub vendor: u8,
    pub product_type: u8,
    pub product_subtype: u8,
    pub major: u8,
    pub minor: u8,
    pub storage_size: u8,
    pub protocol: u8,
}

impl TagVersion {
    /// Length of the GET_VERSION payload
    pub const LEN: usize = 8;

    /// Parse the 8 byte payload (fixed header byte first)
    pub fn parse(payload: &[u8]) -> Result<Self> {
        if payload.len() != Self::LEN {
            return Err(Error::InvalidLength {
                expected: Self::LEN,
                actual: payload.len(),
            });
        }
        Ok(Self {
            vendor: payload[1],
            product_type: payload[2],
            product_subtype: payload[3],
            major: payload[4],
            minor: payload[5],
            storage_size: payload[6],
            protocol: payload[7],
        })
    }

    pub fn is_nxp(&self) -> bool {
        self.vendor == 0x04
    }

    /// User memory in bytes. When the low bit of the size byte is set the
    /// real size lies between this value and twice it.
    pub fn storage_bytes(&self) -> usize {
        1usize << (self.storage_size >> 1)
    }

    /// Best-effort product name for common NXP tags
    pub fn product_name(&self) -> Option<&'static str> {
        if !self.is_nxp() {
            return None;
        }
        match (self.product_type, self.storage_size) {
            (0x04, 0x0F) => Some("NTAG213"),
            (0x04, 0x11) => Some("NTAG215"),
            (0x04, 0x13) => Some("NTAG216"),
            (0x03, 0x0B) => Some("MF0UL11"),
            (0x03, 0x0E) => Some("MF0UL21"),
            _ => None,
        }
    }
}

/// Result of an NDEF read: the decoded Text record, the raw user memory
/// it was found in and the tag UID.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NdefMessage {
    pub text: String,
    pub language: String,
    pub original_bytes: Vec<u8>,
    pub uid: Vec<u8>,
}

impl NdefMessage {
    pub fn new(record: TextRecord, original_bytes: Vec<u8>, uid: &Uid) -> Self {
        Self {
            text: record.text,
            language: record.language,
            original_bytes,
            uid: uid.as_bytes().to_vec(),
        }
    }

    /// Upper-case hex UID
    pub fn uid_hex(&self) -> String {
        hex::encode_upper(&self.uid)
    }
}
