// acr1222l-rs/acr1222l/src/test_support.rs

//! Test support helpers intended for use by unit and integration tests.
//!
//! These helpers centralize common MockBackend / MockTransport setup so
//! tests across the crate and tests/ directory can reuse the same logic.
#![allow(dead_code)]

use crate::config::{InterfaceMatcher, ReaderConfig};
use crate::constants::{
    PN532_CMD_PREFIX_DEVICE, PN532_CMD_PREFIX_HOST, PN532_CMD_IN_COMMUNICATE_THRU,
    PN532_RESP_IN_COMMUNICATE_THRU, SW_SUCCESS, TAG_CMD_ADDITIONAL_FRAME, TAG_CMD_AUTHENTICATE,
};
use crate::crypto::{ChainedTdes, rotate_left};
use crate::event::ReaderEvent;
use crate::manager::ReaderManager;
use crate::transport::mock::{MockBackend, MockTransport};
use crate::types::ReaderState;
use crate::Result;

/// PICC interface name as reported by pcsc-lite
pub const PICC_NAME: &str = "ACS ACR1222 3S PICC Reader 00 00";
/// One of the SAM slots of the same device
pub const SAM_NAME: &str = "ACS ACR1222 3S PICC Reader 00 01";

/// RndB used by the emulated UltralightC tag
pub const TAG_RND_B: [u8; 8] = [0xB0, 0xB1, 0xB2, 0xB3, 0xB4, 0xB5, 0xB6, 0xB7];

/// Config that matches `PICC_NAME` on every platform
#[doc(hidden)]
pub fn mock_config() -> ReaderConfig {
    ReaderConfig::default().with_matcher(InterfaceMatcher::new(["00 00"]))
}

/// A manager over a MockBackend with the PICC and one SAM reader
/// registered. Nothing is started yet.
#[doc(hidden)]
pub fn mock_manager() -> (ReaderManager<MockBackend>, MockBackend, MockTransport) {
    mock_manager_with(mock_config())
}

#[doc(hidden)]
pub fn mock_manager_with(
    config: ReaderConfig,
) -> (ReaderManager<MockBackend>, MockBackend, MockTransport) {
    let backend = MockBackend::new();
    let picc = MockTransport::new(PICC_NAME);
    backend.add_reader(picc.clone());
    backend.add_reader(MockTransport::new(SAM_NAME));
    let manager = ReaderManager::new(backend.clone(), config);
    (manager, backend, picc)
}

/// Convenience: initialized manager whose PICC reader has been found.
#[doc(hidden)]
pub fn ready_mock_manager() -> Result<(ReaderManager<MockBackend>, MockBackend, MockTransport)> {
    let (manager, backend, picc) = mock_manager();
    manager.initialize(|_| {})?;
    attach_reader(&backend, PICC_NAME);
    manager.process_events();
    Ok((manager, backend, picc))
}

#[doc(hidden)]
pub fn attach_reader(backend: &MockBackend, name: &str) -> bool {
    backend.emit(ReaderEvent::Attached { name: name.into() })
}

/// Status event with the card present bit flipped on
#[doc(hidden)]
pub fn insert_card(backend: &MockBackend) -> bool {
    backend.emit(ReaderEvent::StatusChanged {
        name: PICC_NAME.into(),
        state: ReaderState::PRESENT | ReaderState::CHANGED,
    })
}

/// Status event with the empty bit flipped on
#[doc(hidden)]
pub fn remove_card(backend: &MockBackend) -> bool {
    backend.emit(ReaderEvent::StatusChanged {
        name: PICC_NAME.into(),
        state: ReaderState::EMPTY | ReaderState::CHANGED,
    })
}

/// Append the `90 00` success status
#[doc(hidden)]
pub fn with_success(data: &[u8]) -> Vec<u8> {
    let mut out = data.to_vec();
    out.extend_from_slice(&SW_SUCCESS);
    out
}

/// Successful InCommunicateThru answer carrying `data`
#[doc(hidden)]
pub fn passthrough_ok(data: &[u8]) -> Vec<u8> {
    let mut out = vec![PN532_CMD_PREFIX_DEVICE, PN532_RESP_IN_COMMUNICATE_THRU, 0x00];
    out.extend_from_slice(data);
    out.extend_from_slice(&SW_SUCCESS);
    out
}

/// InCommunicateThru answer with a tag error status
#[doc(hidden)]
pub fn passthrough_failed(status: u8) -> Vec<u8> {
    let mut out = vec![PN532_CMD_PREFIX_DEVICE, PN532_RESP_IN_COMMUNICATE_THRU, status];
    out.extend_from_slice(&SW_SUCCESS);
    out
}

/// Sub-command and payload of a wrapped `FF 00 00 00 Lc D4 42 ..` frame
fn split_passthrough(frame: &[u8]) -> Option<(u8, &[u8])> {
    match frame {
        [0xFF, 0x00, 0x00, 0x00, _, PN532_CMD_PREFIX_HOST, PN532_CMD_IN_COMMUNICATE_THRU, sub, rest @ ..] => {
            Some((*sub, rest))
        }
        _ => None,
    }
}

/// Make `transport` answer like an UltralightC tag holding `key`.
///
/// The tag sends ek(RndB) for `1A 00`, checks RndB' in the reader's
/// token and answers ek(RndA') for `AF ..`. A token that does not carry
/// RndB' gets a tag error status back.
#[doc(hidden)]
pub fn mock_ultralight_c_tag(transport: &MockTransport, key: &[u8]) -> Result<()> {
    let key = key.to_vec();
    let mut cipher = ChainedTdes::new(&key)?;
    transport.set_responder(move |frame| {
        let (sub, payload) = split_passthrough(frame)?;
        match sub {
            TAG_CMD_AUTHENTICATE => {
                cipher = ChainedTdes::new(&key).ok()?;
                let ek_rnd_b = cipher.encrypt(&TAG_RND_B).ok()?;
                let mut data = vec![TAG_CMD_ADDITIONAL_FRAME];
                data.extend_from_slice(&ek_rnd_b);
                Some(passthrough_ok(&data))
            }
            TAG_CMD_ADDITIONAL_FRAME => {
                let token = cipher.decrypt(payload).ok()?;
                if token.len() != 16 || token[8..] != rotate_left(&TAG_RND_B) {
                    return Some(passthrough_failed(0x01));
                }
                let rnd_a = <[u8; 8]>::try_from(&token[..8]).ok()?;
                let ek_rnd_a_rot = cipher.encrypt(&rotate_left(&rnd_a)).ok()?;
                let mut data = vec![0x00];
                data.extend_from_slice(&ek_rnd_a_rot);
                Some(passthrough_ok(&data))
            }
            _ => None,
        }
    });
    Ok(())
}
