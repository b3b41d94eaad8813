use acr1222l::config::ReaderConfig;
use acr1222l::device::Session;
use acr1222l::protocol::Command;
use acr1222l::transport::mock::{MockCall, MockTransport};
use acr1222l::{Error, Protocol, ShareMode};

use crate::common::PICC_NAME;

fn session() -> (Session, MockTransport) {
    let mock = MockTransport::new(PICC_NAME);
    let session = Session::new(Box::new(mock.clone()), &ReaderConfig::default());
    (session, mock)
}

#[test]
fn connect_is_idempotent() {
    let (mut s, mock) = session();
    s.connect(ShareMode::Shared, Protocol::ANY).unwrap();
    s.connect(ShareMode::Shared, Protocol::ANY).unwrap();
    let connects = mock
        .calls()
        .iter()
        .filter(|c| matches!(c, MockCall::Connect(..)))
        .count();
    assert_eq!(connects, 1);
    assert_eq!(s.connection().unwrap().protocol, Some(Protocol::T1));
}

#[test]
fn connect_failure_carries_reader_id() {
    let (mut s, mock) = session();
    mock.set_connect_failures(1);
    let err = s.connect(ShareMode::Shared, Protocol::ANY).unwrap_err();
    assert_eq!(err.code(), "CONNECT_ERROR");
    assert!(err.to_string().contains("00_00"));
    assert!(!s.is_connected());
}

#[test]
fn failed_disconnect_still_closes() {
    let (mut s, mock) = session();
    s.connect(ShareMode::Shared, Protocol::ANY).unwrap();
    mock.set_disconnect_failures(1);
    assert!(matches!(s.disconnect(), Err(Error::Disconnect { .. })));
    assert!(!s.is_connected());
    // nothing open any more
    assert!(s.disconnect().is_ok());
}

#[test]
fn transmit_without_session() {
    let (mut s, _) = session();
    assert!(matches!(
        s.execute(&Command::ReadUid),
        Err(Error::CardNotPresent)
    ));
    assert!(matches!(
        s.execute(&Command::LcdClear),
        Err(Error::NoReader)
    ));
}

#[test]
fn control_uses_configured_code() {
    let config = ReaderConfig::default().with_control_code(0x1234);
    let mock = MockTransport::new(PICC_NAME);
    let mut s = Session::new(Box::new(mock.clone()), &config);
    s.connect(ShareMode::Direct, Protocol::RAW).unwrap();
    mock.push_response(vec![0x90, 0x00]);
    s.execute(&Command::Backlight { on: true }).unwrap();
    assert!(mock
        .calls()
        .contains(&MockCall::Control(0x1234, vec![0xFF, 0x00, 0x64, 0xFF, 0x00])));
}

#[test]
fn with_session_closes_what_it_opened() {
    let (mut s, mock) = session();
    let result: acr1222l::Result<()> = s.with_session(ShareMode::Direct, Protocol::RAW, |_| {
        Err(Error::Transport("boom".into()))
    });
    assert!(result.is_err());
    assert!(!s.is_connected());
    assert!(!mock.is_connected());
}
