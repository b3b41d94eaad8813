use acr1222l::transport::mock::MockCall;
use acr1222l::{Error, ShareMode};

use crate::common::{insert_card, ready_mock_manager};

const ACK: [u8; 2] = [0x90, 0x00];

#[test]
fn write_to_lcd_sends_backlight_then_rows() {
    let (manager, _, picc) = ready_mock_manager().unwrap();
    for _ in 0..3 {
        picc.push_response(ACK.to_vec());
    }
    manager.write_to_lcd("HELLO", "WORLD").unwrap();

    let frames = picc.controlled();
    assert_eq!(frames.len(), 3);
    assert_eq!(frames[0], vec![0xFF, 0x00, 0x64, 0xFF, 0x00]);
    assert_eq!(&frames[1][..5], &[0xFF, 0x00, 0x68, 0x00, 0x10]);
    assert_eq!(&frames[2][..5], &[0xFF, 0x00, 0x68, 0x40, 0x10]);

    // a direct session was opened for the sequence and closed after it
    let calls = picc.calls();
    assert!(matches!(calls.first(), Some(MockCall::Connect(ShareMode::Direct, _))));
    assert!(matches!(calls.last(), Some(MockCall::Disconnect(_))));
    assert!(!picc.is_connected());
}

#[test]
fn second_sequence_is_busy() {
    let (manager, _, picc) = ready_mock_manager().unwrap();
    let _token = manager.in_flight().try_acquire().unwrap();
    assert!(matches!(manager.clear_lcd(), Err(Error::Busy)));
    assert!(matches!(manager.turn_on_backlight(), Err(Error::Busy)));
    assert!(picc.calls().is_empty());
}

#[test]
fn failed_sequence_rolls_back() {
    let (manager, _, picc) = ready_mock_manager().unwrap();
    picc.push_response(ACK.to_vec());
    picc.push_failure("card removed");

    let err = manager.write_to_lcd("HELLO", "WORLD").unwrap_err();
    assert!(err.is_transport());
    assert!(!picc.is_connected());
    assert!(!manager.in_flight().is_held());

    // the guard is free again
    picc.push_response(ACK.to_vec());
    picc.push_response(ACK.to_vec());
    manager.clear_lcd().unwrap();
}

#[test]
fn control_status_other_than_90_fails() {
    let (manager, _, picc) = ready_mock_manager().unwrap();
    picc.push_response(vec![0x63, 0x00]);
    let err = manager.set_lcd_contrast(0x20).unwrap_err();
    assert_eq!(err.code(), "CONTROL_FAILED");
    assert_eq!(picc.controlled()[0], vec![0xFF, 0x00, 0x6C, 0x0F, 0x00]);
}

#[test]
fn lcd_reuses_open_card_session() {
    let (manager, backend, picc) = ready_mock_manager().unwrap();
    insert_card(&backend);
    manager.process_events();
    assert!(picc.is_connected());
    picc.clear_calls();

    picc.push_response(ACK.to_vec());
    manager.turn_off_backlight().unwrap();
    assert_eq!(picc.calls().len(), 1);
    assert!(picc.is_connected());
}

#[test]
fn lcd_needs_a_reader() {
    let (manager, _, _) = crate::common::mock_manager();
    manager.initialize(|_| {}).unwrap();
    assert!(matches!(manager.clear_lcd(), Err(Error::NoReader)));
}
