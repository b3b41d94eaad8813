// acr1222l-rs/acr1222l/src/constants.rs
//! Command bytes, status words and PC/SC constants used across the crate

/// Pseudo-APDU class byte used by the reader for its own commands
pub const READER_CLA: u8 = 0xFF;

/// Backlight control: `FF 00 64 {FF|00} 00`
pub const CMD_BACKLIGHT_ON: [u8; 5] = [0xFF, 0x00, 0x64, 0xFF, 0x00];
pub const CMD_BACKLIGHT_OFF: [u8; 5] = [0xFF, 0x00, 0x64, 0x00, 0x00];

/// Get Data (UID) pseudo-APDU
pub const CMD_READ_UID: [u8; 5] = [0xFF, 0xCA, 0x00, 0x00, 0x00];

/// Clear the LCD
pub const CMD_LCD_CLEAR: [u8; 5] = [0xFF, 0x00, 0x60, 0x00, 0x00];

/// LCD text header without the row byte: `FF 00 68`
pub const LCD_TEXT_HEADER: [u8; 3] = [0xFF, 0x00, 0x68];
/// LCD contrast instruction byte (`FF 00 6C <level> 00`)
pub const LCD_CONTRAST_INS: u8 = 0x6C;
pub const LCD_CONTRAST_MAX: u8 = 0x0F;

/// Row offsets for the two-line character display
pub const LCD_ROW_1: u8 = 0x00;
pub const LCD_ROW_2: u8 = 0x40;
/// Characters per LCD row
pub const LCD_ROW_WIDTH: usize = 16;

/// Read Binary / Update Binary instruction bytes
pub const INS_READ_BINARY: u8 = 0xB0;
pub const INS_UPDATE_BINARY: u8 = 0xD6;

/// PN532 host->device prefix (D4) and device->host prefix (D5)
pub const PN532_CMD_PREFIX_HOST: u8 = 0xD4;
pub const PN532_CMD_PREFIX_DEVICE: u8 = 0xD5;

/// PN532 InCommunicateThru command / response codes
pub const PN532_CMD_IN_COMMUNICATE_THRU: u8 = 0x42;
pub const PN532_RESP_IN_COMMUNICATE_THRU: u8 = 0x43;

/// Bytes the vendor wrap adds to the declared length on top of the payload
/// (D4, 42 and the sub-command byte)
pub const PASSTHROUGH_OVERHEAD: usize = 3;

/// Frame sent raw to re-select a tag after a failed FAST_READ
pub const PN532_RESELECT: [u8; 3] = [0xD4, 0x54, 0x01];

/// NTAG / Ultralight sub-commands carried through InCommunicateThru
pub const TAG_CMD_GET_VERSION: u8 = 0x60;
pub const TAG_CMD_FAST_READ: u8 = 0x3A;
pub const TAG_CMD_AUTHENTICATE: u8 = 0x1A;
pub const TAG_CMD_PWD_AUTH: u8 = 0x1B;
pub const TAG_CMD_ADDITIONAL_FRAME: u8 = 0xAF;

/// Success status word
pub const SW_SUCCESS: [u8; 2] = [0x90, 0x00];
/// First byte of the status returned when a write hits a locked page
pub const SW_CARD_LOCKED: u8 = 0xFE;

/// NDEF short well-known record header (MB | ME | SR | TNF=1)
pub const NDEF_RECORD_MARKER: u8 = 0xD1;
/// NDEF Message TLV tag
pub const NDEF_MESSAGE_TLV: u8 = 0x03;
/// Well-known record type `T`
pub const NDEF_RTD_TEXT: u8 = b'T';

/// Default user memory range read by `read_ndef`
pub const NDEF_DEFAULT_START_PAGE: u8 = 0x04;
pub const NDEF_DEFAULT_END_PAGE: u8 = 0x27;

/// Response buffer sizes handed to the platform
pub const TRANSMIT_MAX_RESPONSE: usize = 1024;
pub const CONTROL_MAX_RESPONSE: usize = 40;

/// Vendor escape code used for reader peripheral commands
pub const ESCAPE_CONTROL_CODE: u32 = 3500;

/// Build a `SCARD_CTL_CODE` value in the host PC/SC encoding.
pub const fn scard_ctl_code(code: u32) -> u32 {
    if cfg!(windows) {
        (0x31 << 16) | (code << 2)
    } else {
        0x4200_0000 + code
    }
}

/// Model prefix stripped from device names to form reader ids
pub const READER_NAME_PREFIX: &str = "ACS ACR1222 3S PICC Reader ";
