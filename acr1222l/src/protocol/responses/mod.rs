// acr1222l-rs/acr1222l/src/protocol/responses/mod.rs

pub mod card;
pub mod passthrough;
pub mod status;

pub use card::{decode_read_bytes, decode_uid, decode_write};
pub use passthrough::{
    decode_auth_challenge, decode_passthrough, decode_pwd_auth, passthrough_status,
};
pub use status::{control_status, is_success, split_status};

/// Coarse classification of a transmit response, used for logging and
/// by callers that only need to know which layer failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseClass {
    /// Ends with `90 00`
    Success,
    /// PN532 frame with a non-zero tag status byte
    TagFailure(u8),
    /// Anything else; carries the first status byte
    Failure(u8),
}

impl ResponseClass {
    pub fn classify(resp: &[u8]) -> Self {
        if passthrough::is_device_frame(resp) {
            if let Ok(status) = passthrough_status(resp) {
                if status != 0 {
                    return Self::TagFailure(status);
                }
            }
        }
        if is_success(resp) {
            return Self::Success;
        }
        let sw1 = match resp.len() {
            0 => 0,
            1 => resp[0],
            n => resp[n - 2],
        };
        Self::Failure(sw1)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}
