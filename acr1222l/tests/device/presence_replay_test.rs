use acr1222l::{Error, Notification, RequestKind};

use crate::common::{self, fixtures, insert_card, ready_mock_manager, remove_card};

#[test]
fn read_uuid_resolves_once_card_arrives() {
    common::init_logging();
    let (manager, backend, picc) = ready_mock_manager().unwrap();
    let rx = manager.subscribe();

    let mut handle = manager.read_uuid();
    assert!(handle.try_take().is_none());

    picc.push_response(fixtures::uid_response());
    insert_card(&backend);
    manager.process_events();

    let uid = handle.try_take().unwrap().unwrap();
    assert_eq!(uid.as_bytes(), &fixtures::sample_uid_bytes());
    assert_eq!(
        rx.try_recv().unwrap(),
        Notification::CardPresent { id: "00_00".into() }
    );
}

#[test]
fn identical_status_does_not_replay_twice() {
    let (manager, backend, picc) = ready_mock_manager().unwrap();
    let _handle = manager.read_uuid();
    picc.push_response(fixtures::uid_response());
    picc.push_response(fixtures::uid_response());

    insert_card(&backend);
    insert_card(&backend);
    manager.process_events();

    assert_eq!(picc.transmitted().len(), 1);
    assert_eq!(picc.pending_responses(), 1);
}

#[test]
fn last_registration_wins() {
    let (manager, backend, picc) = ready_mock_manager().unwrap();
    let mut first = manager.read_uuid();
    let mut second = manager.read_uuid();

    picc.push_response(fixtures::uid_response());
    insert_card(&backend);
    manager.process_events();

    assert!(matches!(first.try_take(), Some(Err(Error::Cancelled))));
    assert!(second.try_take().unwrap().is_ok());
    assert_eq!(picc.transmitted().len(), 1);
}

#[test]
fn present_card_is_used_directly() {
    let (manager, backend, picc) = ready_mock_manager().unwrap();
    insert_card(&backend);
    manager.process_events();

    picc.push_response(vec![0x01, 0x02, 0x03, 0x04, 0x90, 0x00]);
    let mut handle = manager.read_bytes(0x04, 4, false);
    assert_eq!(handle.try_take().unwrap().unwrap(), vec![0x01, 0x02, 0x03, 0x04]);
    assert!(!manager.is_pending(RequestKind::ReadBytes));
}

#[test]
fn write_after_reinsert() {
    let (manager, backend, picc) = ready_mock_manager().unwrap();
    insert_card(&backend);
    remove_card(&backend);
    manager.process_events();
    assert!(!manager.card_present());

    let mut handle = manager.write_buffer(&[0xFF, 0xFF, 0xFF, 0xFE], 0x2B);
    picc.push_response(vec![0xFE, 0x00]);
    insert_card(&backend);
    manager.process_events();

    assert!(matches!(handle.try_take(), Some(Err(Error::CardLocked))));
}

#[test]
fn connect_failure_keeps_request_waiting() {
    let (manager, backend, picc) = ready_mock_manager().unwrap();
    let mut handle = manager.read_uuid();
    picc.set_connect_failures(1);

    insert_card(&backend);
    manager.process_events();
    assert!(handle.try_take().is_none());
    assert!(manager.is_pending(RequestKind::ReadUuid));

    picc.push_response(fixtures::uid_response());
    remove_card(&backend);
    insert_card(&backend);
    manager.process_events();
    assert!(handle.try_take().unwrap().is_ok());
}

#[test]
fn card_not_present_without_session() {
    let (manager, backend, picc) = ready_mock_manager().unwrap();
    let rx = manager.subscribe();
    picc.set_connect_failures(1);

    insert_card(&backend);
    manager.process_events();
    assert!(!picc.is_connected());
    assert!(!manager.card_present());
    // connect failed: no CardPresent yet
    assert!(rx.try_recv().is_err());

    let mut handle = manager.read_bytes(0x04, 4, false);
    assert!(matches!(handle.try_take(), Some(Err(Error::CardNotPresent))));

    remove_card(&backend);
    insert_card(&backend);
    manager.process_events();
    assert!(picc.is_connected());
    assert!(manager.card_present());
}

#[tokio::test]
async fn pending_handle_can_be_awaited() {
    let (manager, backend, picc) = ready_mock_manager().unwrap();
    let handle = manager.read_uuid();
    picc.push_response(fixtures::uid_response());
    insert_card(&backend);
    manager.process_events();

    let uid = handle.await.unwrap();
    assert_eq!(uid.to_hex(), "045A3C128B6F80");
}
