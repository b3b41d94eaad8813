// acr1222l-rs/acr1222l/src/protocol/apdu.rs

use crate::{Error, Result};

/// Maximum data length a short APDU can declare
pub const MAX_SHORT_DATA: usize = 255;

/// Short command APDU as understood by the reader.
/// Format: [CLA] [INS] [P1] [P2] [P3] [Data(P3)]
///
/// P3 is Lc when data is present, Le for read commands, and 0x00 for
/// header-only commands (the reader always expects five bytes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Apdu {
    pub cla: u8,
    pub ins: u8,
    pub p1: u8,
    pub p2: u8,
    pub data: Vec<u8>,
    pub le: Option<u8>,
}

impl Apdu {
    /// Header-only command (P3 = 0x00)
    pub fn new(cla: u8, ins: u8, p1: u8, p2: u8) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data: Vec::new(),
            le: None,
        }
    }

    /// Command carrying data; P3 becomes Lc
    pub fn with_data(cla: u8, ins: u8, p1: u8, p2: u8, data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            ..Self::new(cla, ins, p1, p2)
        }
    }

    /// Command expecting `le` bytes back; P3 becomes Le
    pub fn with_le(cla: u8, ins: u8, p1: u8, p2: u8, le: u8) -> Self {
        Self {
            le: Some(le),
            ..Self::new(cla, ins, p1, p2)
        }
    }

    /// Encode into wire bytes.
    pub fn encode(&self) -> Result<Vec<u8>> {
        if self.data.len() > MAX_SHORT_DATA {
            return Err(Error::InvalidLength {
                expected: MAX_SHORT_DATA,
                actual: self.data.len(),
            });
        }

        let mut out = Vec::with_capacity(5 + self.data.len());
        out.extend_from_slice(&[self.cla, self.ins, self.p1, self.p2]);
        if !self.data.is_empty() {
            out.push(self.data.len() as u8);
            out.extend_from_slice(&self.data);
        } else {
            out.push(self.le.unwrap_or(0x00));
        }
        Ok(out)
    }

    /// Decode wire bytes. A five byte frame has no data and its P3 is
    /// reported as `le`; longer frames must declare exactly the trailing
    /// data length in P3.
    pub fn decode(frame: &[u8]) -> Result<Self> {
        if frame.len() < 5 {
            return Err(Error::InvalidLength {
                expected: 5,
                actual: frame.len(),
            });
        }

        let mut apdu = Self::new(frame[0], frame[1], frame[2], frame[3]);
        let p3 = frame[4] as usize;
        let trailing = &frame[5..];

        if trailing.is_empty() {
            apdu.le = Some(frame[4]);
            return Ok(apdu);
        }

        if p3 != trailing.len() {
            return Err(Error::InvalidLength {
                expected: 5 + p3,
                actual: frame.len(),
            });
        }
        apdu.data = trailing.to_vec();
        Ok(apdu)
    }

    /// The P3 byte as it appears on the wire
    pub fn declared_len(&self) -> u8 {
        if self.data.is_empty() {
            self.le.unwrap_or(0)
        } else {
            self.data.len() as u8
        }
    }
}
