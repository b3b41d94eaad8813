use std::sync::{Arc, Mutex};

use acr1222l::event::{FaultKind, ReaderEvent, ReaderFault};
use acr1222l::{Error, LifecycleState, Notification, ReaderConfig};

use crate::common::{
    PICC_NAME, SAM_NAME, attach_reader, insert_card, mock_config, mock_manager,
    mock_manager_with,
};

fn collect_faults() -> (Arc<Mutex<Vec<ReaderFault>>>, impl FnMut(ReaderFault) + Send + 'static) {
    let faults = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&faults);
    (faults, move |fault: ReaderFault| sink.lock().unwrap().push(fault))
}

#[test]
fn hot_unplug_rejects_pending_and_reinitializes() {
    let (manager, backend, _picc) = mock_manager();
    let (faults, on_error) = collect_faults();
    manager.initialize(on_error).unwrap();
    let rx = manager.subscribe();
    attach_reader(&backend, PICC_NAME);
    manager.process_events();

    let mut handle = manager.read_uuid();
    backend.emit(ReaderEvent::Removed {
        name: PICC_NAME.into(),
    });
    manager.process_events();

    match handle.try_take() {
        Some(Err(Error::ReaderRemoved(id))) => assert_eq!(id, "00_00"),
        other => panic!("expected ReaderRemoved, got {:?}", other),
    }
    let faults = faults.lock().unwrap();
    assert_eq!(faults.len(), 1);
    assert_eq!(faults[0].kind, FaultKind::ReaderRemoved);
    assert_eq!(faults[0].reader.as_deref(), Some("00_00"));

    assert!(!manager.has_reader());
    assert_eq!(manager.state(), LifecycleState::Ready);
    assert_eq!(backend.stops(), 1);
    assert_eq!(backend.starts(), 2);

    let notes: Vec<_> = rx.try_iter().collect();
    assert_eq!(
        notes,
        vec![
            Notification::ReaderFound {
                id: "00_00".into(),
                name: PICC_NAME.into()
            },
            Notification::ReaderEnd { id: "00_00".into() },
        ]
    );

    // the restarted service picks the reader up again
    attach_reader(&backend, PICC_NAME);
    manager.process_events();
    assert!(manager.has_reader());
}

#[test]
fn unplug_without_reinitialize_stays_down() {
    let (manager, backend, _) =
        mock_manager_with(mock_config().with_reinitialize_on_removal(false));
    manager.initialize(|_| {}).unwrap();
    attach_reader(&backend, PICC_NAME);
    manager.process_events();

    backend.emit(ReaderEvent::Removed {
        name: PICC_NAME.into(),
    });
    manager.process_events();
    assert_eq!(manager.state(), LifecycleState::Uninitialized);
    assert_eq!(backend.starts(), 1);
    assert!(!backend.is_running());
}

#[test]
fn removal_of_other_interface_is_ignored() {
    let (manager, backend, _) = mock_manager();
    manager.initialize(|_| {}).unwrap();
    attach_reader(&backend, PICC_NAME);
    attach_reader(&backend, SAM_NAME);
    manager.process_events();

    backend.emit(ReaderEvent::Removed {
        name: SAM_NAME.into(),
    });
    manager.process_events();
    assert!(manager.has_reader());
    assert_eq!(backend.stops(), 0);
}

#[test]
fn close_rejects_with_service_closed() {
    let (manager, backend, _) = mock_manager();
    manager.initialize(|_| {}).unwrap();
    attach_reader(&backend, PICC_NAME);
    manager.process_events();

    let mut uid = manager.read_uuid();
    let mut ndef = manager.read_ndef(4, 7);
    manager.close();

    assert!(matches!(uid.try_take(), Some(Err(Error::ServiceClosed))));
    assert!(matches!(ndef.try_take(), Some(Err(Error::ServiceClosed))));
    assert_eq!(manager.state(), LifecycleState::Uninitialized);
    assert!(!backend.is_running());

    // a closed manager can be started again
    manager.initialize(|_| {}).unwrap();
    assert_eq!(backend.starts(), 2);
}

#[test]
fn reader_error_clears_reader() {
    let (manager, backend, _) = mock_manager();
    let (faults, on_error) = collect_faults();
    manager.initialize(on_error).unwrap();
    attach_reader(&backend, PICC_NAME);
    insert_card(&backend);
    manager.process_events();
    assert!(manager.card_present());

    backend.emit(ReaderEvent::Error {
        name: PICC_NAME.into(),
        message: "reader unresponsive".into(),
    });
    manager.process_events();

    assert!(!manager.has_reader());
    assert!(!manager.card_present());
    let faults = faults.lock().unwrap();
    assert_eq!(faults[0].kind, FaultKind::ReaderError);
    assert_eq!(faults[0].to_string(), "READER_ERROR: reader unresponsive");
}

#[test]
fn service_error_is_reported() {
    let (manager, backend, _) = mock_manager();
    let (faults, on_error) = collect_faults();
    manager.initialize(on_error).unwrap();
    backend.emit(ReaderEvent::ServiceError {
        message: "service stopped".into(),
    });
    manager.process_events();
    assert_eq!(faults.lock().unwrap()[0].kind, FaultKind::PcscError);
}

#[test]
fn default_config_is_platform_specific() {
    let config = ReaderConfig::default();
    if cfg!(windows) {
        assert!(config.matcher.matches("ACS ACR1222 3S PICC Reader PICC 0"));
    } else if cfg!(target_os = "macos") {
        assert!(config.matcher.matches("ACS ACR1222 3S PICC Reader(1)"));
    } else {
        assert!(config.matcher.matches(PICC_NAME));
        assert!(!config.matcher.matches(SAM_NAME));
    }
}
