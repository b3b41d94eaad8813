use acr1222l::Error;
use acr1222l::protocol::{
    ResponseClass, decode_passthrough, decode_pwd_auth, decode_read_bytes, decode_uid,
    decode_write,
};

use crate::common::fixtures;

#[test]
fn uid_without_status_word() {
    let uid = decode_uid(&fixtures::uid_response()).unwrap();
    assert_eq!(uid.as_bytes(), &fixtures::sample_uid_bytes());
}

#[test]
fn classify_success_and_failures() {
    assert_eq!(ResponseClass::classify(&[0x01, 0x90, 0x00]), ResponseClass::Success);
    assert_eq!(
        ResponseClass::classify(&[0xD5, 0x43, 0x01, 0x90, 0x00]),
        ResponseClass::TagFailure(0x01)
    );
    assert_eq!(ResponseClass::classify(&[0x63, 0x00]), ResponseClass::Failure(0x63));
    assert!(!ResponseClass::classify(&[]).is_success());
}

#[test]
fn read_failure_status() {
    match decode_read_bytes(&[0x63, 0x00]) {
        Err(Error::ReadFailed { status }) => assert_eq!(status, 0x63),
        other => panic!("expected ReadFailed, got {:?}", other),
    }
}

#[test]
fn write_locked_and_failed() {
    assert!(decode_write(&[0x90, 0x00]).is_ok());
    assert!(matches!(decode_write(&[0xFE, 0x00]), Err(Error::CardLocked)));
    let err = decode_write(&[0x63, 0x00]).unwrap_err();
    assert_eq!(err.code(), "WRITE_FAILED");
}

#[test]
fn pwd_auth_refused_is_wrong_password() {
    assert!(matches!(
        decode_pwd_auth(&[0xD5, 0x43, 0x01, 0x90, 0x00]),
        Err(Error::WrongPassword)
    ));
    let pack = decode_pwd_auth(&[0xD5, 0x43, 0x00, 0xAB, 0xCD, 0x90, 0x00]).unwrap();
    assert_eq!(pack.as_bytes(), &[0xAB, 0xCD]);
}

#[test]
fn passthrough_too_short_is_an_error() {
    assert!(decode_passthrough(0x3A, &[0xD5]).is_err());
}
