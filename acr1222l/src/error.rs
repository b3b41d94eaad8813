// acr1222l-rs/acr1222l/src/error.rs

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("no reader connected")]
    NoReader,

    #[error("error connecting to reader '{reader}': {source}")]
    Connect {
        reader: String,
        #[source]
        source: Box<Error>,
    },

    #[error("error disconnecting from reader '{reader}': {source}")]
    Disconnect {
        reader: String,
        #[source]
        source: Box<Error>,
    },

    #[error("card not present")]
    CardNotPresent,

    #[error("write failed, card is locked")]
    CardLocked,

    #[error("wrong password, authentication failed")]
    WrongPassword,

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("reader '{0}' removed")]
    ReaderRemoved(String),

    #[error("control operation failed on reader '{reader}': status={status:#04x}")]
    ControlFailed { reader: String, status: u8 },

    #[error("read failed: status={status:#04x}")]
    ReadFailed { status: u8 },

    #[error("write failed with error code {code:#04x}")]
    WriteFailed { code: u8 },

    #[error("tag command {command:#04x} failed: status={status:#04x}")]
    PassthroughFailed { command: u8, status: u8 },

    #[error("invalid length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("invalid key length: {0} (expected 16 or 24 bytes)")]
    InvalidKey(usize),

    #[error("another command sequence is in flight")]
    Busy,

    #[error("request cancelled before completion")]
    Cancelled,

    #[error("reader service closed")]
    ServiceClosed,

    #[error("reader service not initialized")]
    NotInitialized,

    #[error("transport error: {0}")]
    Transport(String),

    #[cfg(feature = "pcsc")]
    #[error("pcsc error: {0}")]
    Pcsc(#[from] pcsc::Error),
}

impl Error {
    /// Stable status string for callers that dispatch on error kinds
    /// rather than on the enum (UI layers, logs).
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoReader => "NO_READER",
            Self::Connect { .. } => "CONNECT_ERROR",
            Self::Disconnect { .. } => "DISCONNECT_ERROR",
            Self::CardNotPresent => "CARD_NOT_PRESENT",
            Self::CardLocked => "CARD_LOCKED",
            Self::WrongPassword => "WRONG_PASSWORD",
            Self::Protocol(_) => "PROTOCOL_ERROR",
            Self::ReaderRemoved(_) => "READER_REMOVED",
            Self::ControlFailed { .. } => "CONTROL_FAILED",
            Self::ReadFailed { .. } => "READ_FAILED",
            Self::WriteFailed { .. } => "WRITE_FAILED",
            Self::PassthroughFailed { command, .. } => match *command {
                crate::constants::TAG_CMD_FAST_READ => "FAST_READ_FAILED",
                crate::constants::TAG_CMD_GET_VERSION => "GET_VERSION_FAILED",
                _ => "TAG_COMMAND_FAILED",
            },
            Self::InvalidLength { .. } => "INVALID_LENGTH",
            Self::InvalidKey(_) => "INVALID_KEY",
            Self::Busy => "READER_BUSY",
            Self::Cancelled => "CANCELLED",
            Self::ServiceClosed => "SERVICE_CLOSED",
            Self::NotInitialized => "NOT_INITIALIZED",
            Self::Transport(_) => "READER_ERROR",
            #[cfg(feature = "pcsc")]
            Self::Pcsc(_) => "READER_ERROR",
        }
    }

    /// Errors raised by the transport itself rather than by a command
    /// status. A card pulled mid-command surfaces as one of these.
    pub fn is_transport(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Connect { .. } | Self::Disconnect { .. } => true,
            #[cfg(feature = "pcsc")]
            Self::Pcsc(_) => true,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
