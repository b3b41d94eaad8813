// acr1222l-rs/acr1222l/src/protocol/commands/mod.rs

pub mod lcd;
pub mod passthrough;
pub mod tag;

pub use lcd::{LcdRow, encode_backlight, encode_lcd_clear, encode_lcd_contrast, encode_lcd_text};
pub use passthrough::{
    build_authenticate_continue, build_authenticate_start, build_fast_read, build_get_version,
    build_pwd_auth, build_reselect, wrap_command,
};
pub use tag::{encode_read_bytes, encode_read_uid, encode_write_bytes};

use crate::Result;

/// High-level Command enum. Per-command encoders live in
/// `protocol::commands::<group>.rs`; this type is what the session layer
/// sends and logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Backlight { on: bool },
    LcdText { row: LcdRow, text: String },
    LcdContrast { level: u8 },
    LcdClear,
    ReadUid,
    ReadBytes { page: u8, len: u8 },
    WriteBytes { page: u8, data: Vec<u8> },
    /// Tag sub-command forwarded through InCommunicateThru
    Passthrough { sub_command: u8, payload: Vec<u8> },
    /// Frame sent verbatim (e.g. the PN532 reselect)
    Raw(Vec<u8>),
}

impl Command {
    /// Short name used in log lines
    pub fn name(&self) -> &'static str {
        match self {
            Self::Backlight { .. } => "backlight",
            Self::LcdText { .. } => "lcd-text",
            Self::LcdContrast { .. } => "lcd-contrast",
            Self::LcdClear => "lcd-clear",
            Self::ReadUid => "read-uid",
            Self::ReadBytes { .. } => "read-bytes",
            Self::WriteBytes { .. } => "write-bytes",
            Self::Passthrough { .. } => "passthrough",
            Self::Raw(_) => "raw",
        }
    }

    /// Commands handled by the reader itself go through the control
    /// channel; everything else is transmitted to the card.
    pub fn is_control(&self) -> bool {
        matches!(
            self,
            Self::Backlight { .. } | Self::LcdText { .. } | Self::LcdContrast { .. } | Self::LcdClear
        )
    }

    /// Encode the command into wire bytes.
    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(match self {
            Self::Backlight { on } => encode_backlight(*on),
            Self::LcdText { row, text } => encode_lcd_text(text, *row),
            Self::LcdContrast { level } => encode_lcd_contrast(*level),
            Self::LcdClear => encode_lcd_clear(),
            Self::ReadUid => encode_read_uid(),
            Self::ReadBytes { page, len } => encode_read_bytes(*page, *len),
            Self::WriteBytes { page, data } => encode_write_bytes(*page, data)?,
            Self::Passthrough {
                sub_command,
                payload,
            } => wrap_command(*sub_command, payload)?,
            Self::Raw(bytes) => bytes.clone(),
        })
    }
}
