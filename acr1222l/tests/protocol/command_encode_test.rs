use acr1222l::protocol::{
    Apdu, Command, LcdRow, build_fast_read, build_pwd_auth, encode_backlight, encode_lcd_text,
    wrap_command,
};

#[test]
fn backlight_frames_differ_in_toggle_byte_only() {
    assert_eq!(encode_backlight(true), vec![0xFF, 0x00, 0x64, 0xFF, 0x00]);
    assert_eq!(encode_backlight(false), vec![0xFF, 0x00, 0x64, 0x00, 0x00]);
}

#[test]
fn read_uid_frame() {
    assert_eq!(
        Command::ReadUid.encode().unwrap(),
        vec![0xFF, 0xCA, 0x00, 0x00, 0x00]
    );
}

#[test]
fn lcd_text_hi_on_first_row() {
    let cmd = encode_lcd_text("HI", LcdRow::First);
    assert_eq!(cmd.len(), 4 + 1 + 16);
    assert_eq!(&cmd[..5], &[0xFF, 0x00, 0x68, 0x00, 0x10]);
    assert_eq!(&cmd[5..7], b"HI");
    assert!(cmd[7..].iter().all(|&b| b == b' '));
}

#[test]
fn lcd_text_second_row_offset() {
    let cmd = encode_lcd_text("HI", LcdRow::from_number(2));
    assert_eq!(cmd[3], 0x40);
}

#[test]
fn lcd_text_is_truncated_to_sixteen() {
    let cmd = encode_lcd_text("0123456789ABCDEFGHIJ", LcdRow::First);
    assert_eq!(&cmd[5..], b"0123456789ABCDEF");
}

#[test]
fn pwd_auth_wrap_length_and_bridge_bytes() {
    let pwd = [0x12, 0x34, 0x56, 0x78];
    let cmd = build_pwd_auth(&pwd).unwrap();
    assert_eq!(cmd[4] as usize, pwd.len() + 3);
    assert_eq!(&cmd[5..7], &[0xD4, 0x42]);
    assert_eq!(cmd[7], 0x1B);
    assert_eq!(&cmd[8..], &pwd);

    let apdu = Apdu::decode(&cmd).unwrap();
    assert_eq!(apdu.declared_len() as usize, apdu.data.len());
}

#[test]
fn fast_read_carries_page_range() {
    let cmd = build_fast_read(0x04, 0x27).unwrap();
    assert_eq!(cmd, wrap_command(0x3A, &[0x04, 0x27]).unwrap());
    assert_eq!(&cmd[7..], &[0x3A, 0x04, 0x27]);
}

#[test]
fn read_and_write_binary() {
    assert_eq!(
        Command::ReadBytes { page: 0x04, len: 16 }.encode().unwrap(),
        vec![0xFF, 0xB0, 0x00, 0x04, 0x10]
    );
    assert_eq!(
        Command::WriteBytes {
            page: 0x2B,
            data: vec![0xFF, 0xFF, 0xFF, 0xFE]
        }
        .encode()
        .unwrap(),
        vec![0xFF, 0xD6, 0x00, 0x2B, 0x04, 0xFF, 0xFF, 0xFF, 0xFE]
    );
}

#[test]
fn control_commands_are_routed_to_control() {
    assert!(Command::LcdClear.is_control());
    assert!(Command::Backlight { on: true }.is_control());
    assert!(!Command::ReadUid.is_control());
    assert!(!Command::Raw(vec![0xD4, 0x54, 0x01]).is_control());
}
