// acr1222l-rs/acr1222l/src/protocol/commands/lcd.rs

use crate::constants::{
    CMD_BACKLIGHT_OFF, CMD_BACKLIGHT_ON, CMD_LCD_CLEAR, LCD_CONTRAST_INS, LCD_CONTRAST_MAX,
    LCD_ROW_1, LCD_ROW_2, LCD_ROW_WIDTH, LCD_TEXT_HEADER,
};

/// LCD row selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LcdRow {
    First,
    Second,
}

impl LcdRow {
    /// Row 1 for `1`, row 2 for anything else
    pub fn from_number(row: u8) -> Self {
        if row == 1 { Self::First } else { Self::Second }
    }

    pub fn offset(&self) -> u8 {
        match self {
            Self::First => LCD_ROW_1,
            Self::Second => LCD_ROW_2,
        }
    }
}

/// Encode a backlight on/off command (5 bytes, only the toggle differs)
pub fn encode_backlight(on: bool) -> Vec<u8> {
    if on {
        CMD_BACKLIGHT_ON.to_vec()
    } else {
        CMD_BACKLIGHT_OFF.to_vec()
    }
}

/// Encode an LCD text command.
/// Layout: FF 00 68 <row offset> <len=16> <text padded/truncated to 16>
///
/// Non-ASCII characters are replaced with `?` since the display only
/// has a single-byte character ROM.
pub fn encode_lcd_text(text: &str, row: LcdRow) -> Vec<u8> {
    let mut field: Vec<u8> = text
        .chars()
        .take(LCD_ROW_WIDTH)
        .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
        .collect();
    field.resize(LCD_ROW_WIDTH, b' ');

    let mut out = Vec::with_capacity(LCD_TEXT_HEADER.len() + 2 + LCD_ROW_WIDTH);
    out.extend_from_slice(&LCD_TEXT_HEADER);
    out.push(row.offset());
    out.push(field.len() as u8);
    out.extend_from_slice(&field);
    out
}

/// Encode an LCD contrast command; levels above 0x0F are clamped.
pub fn encode_lcd_contrast(level: u8) -> Vec<u8> {
    vec![0xFF, 0x00, LCD_CONTRAST_INS, level.min(LCD_CONTRAST_MAX), 0x00]
}

/// Encode the LCD clear command
pub fn encode_lcd_clear() -> Vec<u8> {
    CMD_LCD_CLEAR.to_vec()
}
