use acr1222l::Error;
use acr1222l::protocol::ndef::{decode_record, locate_message, parse_text_message};

use crate::common::fixtures;

#[test]
fn text_record_from_tag_memory() {
    let record = parse_text_message(&fixtures::ndef_hello_memory()).unwrap();
    assert_eq!(record.language, "en");
    assert_eq!(record.text, "hello");
}

#[test]
fn message_bounded_by_tlv_length() {
    let memory = fixtures::ndef_hello_memory();
    let msg = locate_message(&memory).unwrap();
    assert_eq!(msg.first(), Some(&0xD1));
    assert_eq!(msg.len(), 12);
}

#[test]
fn missing_marker_is_protocol_error() {
    match parse_text_message(&[0x03, 0x00, 0xFE, 0x00]) {
        Err(Error::Protocol(msg)) => assert!(msg.contains("NDEF")),
        other => panic!("expected Protocol, got {:?}", other),
    }
}

#[test]
fn uri_record_is_not_text() {
    // D1 01 04 'U' 01 'a' '.' 'b'
    let memory = [0xD1, 0x01, 0x04, 0x55, 0x01, 0x61, 0x2E, 0x62, 0xFE];
    let record = decode_record(locate_message(&memory).unwrap()).unwrap();
    assert!(!record.is_text());
    assert!(matches!(parse_text_message(&memory), Err(Error::Protocol(_))));
}

#[test]
fn utf16_text() {
    // status 0x82: UTF-16, language length 2
    let memory = [0xD1, 0x01, 0x07, 0x54, 0x82, 0x6A, 0x61, 0x30, 0x42, 0x30, 0x44];
    let record = parse_text_message(&memory).unwrap();
    assert_eq!(record.language, "ja");
    assert_eq!(record.text, "あい");
}

#[test]
fn utf16_text_with_byte_order_mark() {
    // 03 0D | D1 01 09 'T' 82 'e' 'n' FE FF 00 'h' 00 'i' | FE
    let memory = [
        0x03, 0x0D, 0xD1, 0x01, 0x09, 0x54, 0x82, 0x65, 0x6E, 0xFE, 0xFF, 0x00, 0x68, 0x00, 0x69,
        0xFE,
    ];
    assert_eq!(parse_text_message(&memory).unwrap().text, "hi");

    // little endian BOM
    let memory = [0xD1, 0x01, 0x09, 0x54, 0x82, 0x65, 0x6E, 0xFF, 0xFE, 0x68, 0x00, 0x69, 0x00];
    assert_eq!(parse_text_message(&memory).unwrap().text, "hi");
}

#[test]
fn utf16_zero_bytes_stay_in_payload() {
    let memory = [0xD1, 0x01, 0x07, 0x54, 0x82, 0x65, 0x6E, 0x00, 0x68, 0x00, 0x69, 0x00, 0x00];
    let record = parse_text_message(&memory).unwrap();
    assert_eq!(record.language, "en");
    assert_eq!(record.text, "hi");
}

#[test]
fn payload_length_of_fe() {
    // short record whose payload length byte is 0xFE
    let mut memory = vec![0xD1, 0x01, 0xFE, 0x54, 0x02, 0x65, 0x6E];
    memory.extend(std::iter::repeat_n(b'z', 0xFE - 3));
    memory.extend_from_slice(&[0xFE, 0x00]);
    let record = parse_text_message(&memory).unwrap();
    assert_eq!(record.text, "z".repeat(0xFE - 3));
}
