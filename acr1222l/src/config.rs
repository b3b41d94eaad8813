// acr1222l-rs/acr1222l/src/config.rs

//! Reader configuration. Platform defaults are fixed at compile time.

use crate::constants::{
    CONTROL_MAX_RESPONSE, ESCAPE_CONTROL_CODE, NDEF_DEFAULT_END_PAGE, NDEF_DEFAULT_START_PAGE,
    READER_NAME_PREFIX, TRANSMIT_MAX_RESPONSE, scard_ctl_code,
};
use crate::types::{Protocol, ShareMode};

/// Share mode for card sessions (SHARED on Windows, DIRECT elsewhere)
pub const CARD_SHARE_MODE: ShareMode = if cfg!(windows) {
    ShareMode::Shared
} else {
    ShareMode::Direct
};

/// Protocol requested for card sessions: T0 or T1, the card decides
pub const CARD_PROTOCOL: Protocol = Protocol::ANY;

/// Protocol requested for direct control sessions
pub const CONTROL_PROTOCOL: Protocol = if cfg!(windows) {
    Protocol::UNDEFINED
} else {
    Protocol::RAW
};

/// The ACR1222L shows up as several readers (PICC plus SAM slots).
/// Only the PICC interface is used; which name it gets depends on the
/// platform's driver.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InterfaceMatcher {
    /// Every fragment must occur in the lower-cased reader name
    fragments: Vec<String>,
}

impl InterfaceMatcher {
    pub fn new<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fragments: fragments
                .into_iter()
                .map(|s| s.into().to_lowercase())
                .collect(),
        }
    }

    /// Matcher for the current platform
    pub fn platform() -> Self {
        if cfg!(windows) {
            Self::new(["picc 0"])
        } else if cfg!(target_os = "macos") {
            Self::new(["picc", "(1)"])
        } else {
            Self::new(["00 00"])
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.fragments.iter().all(|f| lower.contains(f.as_str()))
    }
}

impl Default for InterfaceMatcher {
    fn default() -> Self {
        Self::platform()
    }
}

/// Short reader id used in notifications:
/// model prefix removed, first space replaced by `_`, upper-cased.
pub fn reader_id(name: &str) -> String {
    name.replace(READER_NAME_PREFIX, "")
        .replacen(' ', "_", 1)
        .to_uppercase()
}

/// Reader manager configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReaderConfig {
    pub card_share_mode: ShareMode,
    pub card_protocol: Protocol,
    pub control_share_mode: ShareMode,
    pub control_protocol: Protocol,
    pub control_code: u32,
    pub transmit_max_response: usize,
    pub control_max_response: usize,
    pub matcher: InterfaceMatcher,
    pub ndef_start_page: u8,
    pub ndef_end_page: u8,
    /// Re-initialise automatically after the reader is unplugged
    pub reinitialize_on_removal: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            card_share_mode: CARD_SHARE_MODE,
            card_protocol: CARD_PROTOCOL,
            control_share_mode: ShareMode::Direct,
            control_protocol: CONTROL_PROTOCOL,
            control_code: scard_ctl_code(ESCAPE_CONTROL_CODE),
            transmit_max_response: TRANSMIT_MAX_RESPONSE,
            control_max_response: CONTROL_MAX_RESPONSE,
            matcher: InterfaceMatcher::platform(),
            ndef_start_page: NDEF_DEFAULT_START_PAGE,
            ndef_end_page: NDEF_DEFAULT_END_PAGE,
            reinitialize_on_removal: true,
        }
    }
}

impl ReaderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_card_session(mut self, share_mode: ShareMode, protocol: Protocol) -> Self {
        self.card_share_mode = share_mode;
        self.card_protocol = protocol;
        self
    }

    pub fn with_control_session(mut self, share_mode: ShareMode, protocol: Protocol) -> Self {
        self.control_share_mode = share_mode;
        self.control_protocol = protocol;
        self
    }

    pub fn with_control_code(mut self, code: u32) -> Self {
        self.control_code = code;
        self
    }

    pub fn with_matcher(mut self, matcher: InterfaceMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn with_ndef_range(mut self, start_page: u8, end_page: u8) -> Self {
        self.ndef_start_page = start_page;
        self.ndef_end_page = end_page;
        self
    }

    pub fn with_reinitialize_on_removal(mut self, enabled: bool) -> Self {
        self.reinitialize_on_removal = enabled;
        self
    }
}
