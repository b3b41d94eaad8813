// acr1222l-rs/acr1222l/src/types.rs

use crate::Error;
use derive_more::Display;
use std::convert::TryFrom;

/// Card UID as returned by Get Data (4, 7 or 10 bytes, status word removed)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Uid(Vec<u8>);

impl Uid {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Upper-case hex form used in logs and on the LCD
    pub fn to_hex(&self) -> String {
        hex::encode_upper(&self.0)
    }
}

impl From<Vec<u8>> for Uid {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

/// PACK - Password Acknowledge (2 バイト)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pack([u8; 2]);

impl Pack {
    pub fn from_bytes(bytes: [u8; 2]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 2] {
        &self.0
    }
}

impl TryFrom<&[u8]> for Pack {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        if bytes.len() != 2 {
            return Err(Error::InvalidLength {
                expected: 2,
                actual: bytes.len(),
            });
        }
        Ok(Self([bytes[0], bytes[1]]))
    }
}

/// NTAG/Ultralight PWD_AUTH password (4 バイト)
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Password([u8; 4]);

impl Password {
    pub const fn new(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(****)")
    }
}

/// Hardware state bitmask reported by the platform for one reader
/// (`SCARD_STATE_*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReaderState(u32);

impl ReaderState {
    pub const UNAWARE: Self = Self(0x0000);
    pub const IGNORE: Self = Self(0x0001);
    pub const CHANGED: Self = Self(0x0002);
    pub const UNKNOWN: Self = Self(0x0004);
    pub const UNAVAILABLE: Self = Self(0x0008);
    pub const EMPTY: Self = Self(0x0010);
    pub const PRESENT: Self = Self(0x0020);
    pub const ATRMATCH: Self = Self(0x0040);
    pub const EXCLUSIVE: Self = Self(0x0080);
    pub const INUSE: Self = Self(0x0100);
    pub const MUTE: Self = Self(0x0200);
    pub const UNPOWERED: Self = Self(0x0400);

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(&self) -> u32 {
        self.0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub const fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }

    /// Bits that differ between `self` and `other`
    pub const fn changes(&self, other: Self) -> Self {
        Self(self.0 ^ other.0)
    }
}

impl std::ops::BitOr for ReaderState {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Card communication protocol(s), using the PC/SC `SCARD_PROTOCOL_*` values.
/// The same newtype is used for the requested mask and the negotiated value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[display(fmt = "{:#x}", _0)]
pub struct Protocol(u32);

impl Protocol {
    pub const UNDEFINED: Self = Self(0x0);
    pub const T0: Self = Self(0x1);
    pub const T1: Self = Self(0x2);
    pub const RAW: Self = Self(0x4);
    /// T0 or T1, the card decides
    pub const ANY: Self = Self(0x3);

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(&self) -> u32 {
        self.0
    }
}

/// Share mode used when opening a connection session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ShareMode {
    #[display(fmt = "EXCLUSIVE")]
    Exclusive,
    #[display(fmt = "SHARED")]
    Shared,
    #[display(fmt = "DIRECT")]
    Direct,
}

/// What happens to the card when a session is closed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Disposition {
    #[default]
    LeaveCard,
    ResetCard,
    UnpowerCard,
    EjectCard,
}

/// Edge-derived card presence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
pub enum CardPresence {
    #[default]
    #[display(fmt = "ABSENT")]
    Absent,
    #[display(fmt = "PRESENT")]
    Present,
}

/// Kinds of operation that may wait for a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
pub enum RequestKind {
    #[display(fmt = "read-bytes")]
    ReadBytes,
    #[display(fmt = "read-uuid")]
    ReadUuid,
    #[display(fmt = "write-buffer")]
    WriteBuffer,
    #[display(fmt = "read-ndef")]
    ReadNdef,
}
