use rand::SeedableRng;
use rand::rngs::StdRng;

use acr1222l::{Error, Password};

use crate::common::{
    fixtures, insert_card, mock_ultralight_c_tag, passthrough_failed, passthrough_ok,
    ready_mock_manager,
};

#[test]
fn ultralight_c_accepts_right_key() {
    let (manager, backend, picc) = ready_mock_manager().unwrap();
    insert_card(&backend);
    manager.process_events();

    mock_ultralight_c_tag(&picc, &fixtures::ultralight_c_key()).unwrap();
    let mut rng = StdRng::seed_from_u64(7);
    manager
        .authenticate_ultralight_c_with(&fixtures::ultralight_c_key(), &mut rng)
        .unwrap();

    let frames = picc.transmitted();
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0], vec![0xFF, 0x00, 0x00, 0x00, 0x04, 0xD4, 0x42, 0x1A, 0x00]);
    assert_eq!(frames[1][4], 16 + 3);
    assert_eq!(frames[1][7], 0xAF);
    assert!(!manager.in_flight().is_held());
}

#[test]
fn ultralight_c_wrong_key_is_wrong_password() {
    let (manager, backend, picc) = ready_mock_manager().unwrap();
    insert_card(&backend);
    manager.process_events();

    mock_ultralight_c_tag(&picc, &fixtures::ultralight_c_key()).unwrap();
    let result = manager.authenticate_ultralight_c(&fixtures::wrong_key());
    assert!(matches!(result, Err(Error::WrongPassword)));
    assert!(!manager.in_flight().is_held());
}

#[test]
fn ultralight_c_needs_a_card() {
    let (manager, _, picc) = ready_mock_manager().unwrap();
    let result = manager.authenticate_ultralight_c(&fixtures::ultralight_c_key());
    assert!(matches!(result, Err(Error::CardNotPresent)));
    assert!(picc.transmitted().is_empty());
}

#[test]
fn ultralight_c_rejects_bad_key_length() {
    let (manager, backend, _) = ready_mock_manager().unwrap();
    insert_card(&backend);
    manager.process_events();
    assert!(matches!(
        manager.authenticate_ultralight_c(&[0u8; 10]),
        Err(Error::InvalidKey(10))
    ));
}

#[test]
fn ultralight_c_is_busy_while_a_sequence_runs() {
    let (manager, backend, _) = ready_mock_manager().unwrap();
    insert_card(&backend);
    manager.process_events();

    let _token = manager.in_flight().try_acquire().unwrap();
    assert!(matches!(
        manager.authenticate_ultralight_c(&fixtures::ultralight_c_key()),
        Err(Error::Busy)
    ));
}

#[test]
fn first_step_refused() {
    let (manager, backend, picc) = ready_mock_manager().unwrap();
    insert_card(&backend);
    manager.process_events();

    picc.push_response(passthrough_failed(0x01));
    let err = manager
        .authenticate_ultralight_c(&fixtures::ultralight_c_key())
        .unwrap_err();
    assert_eq!(err.code(), "TAG_COMMAND_FAILED");
}

#[test]
fn pwd_auth_returns_pack() {
    let (manager, backend, picc) = ready_mock_manager().unwrap();
    insert_card(&backend);
    manager.process_events();

    picc.push_response(passthrough_ok(&[0x80, 0x80]));
    let pack = manager
        .authenticate(&Password::new([0xFF, 0xFF, 0xFF, 0xFF]))
        .unwrap();
    assert_eq!(pack.as_bytes(), &[0x80, 0x80]);

    picc.push_response(passthrough_failed(0x01));
    let err = manager
        .authenticate(&Password::new([0x00, 0x00, 0x00, 0x00]))
        .unwrap_err();
    assert_eq!(err.code(), "WRONG_PASSWORD");
}

#[test]
fn get_version_of_present_tag() {
    let (manager, backend, picc) = ready_mock_manager().unwrap();
    insert_card(&backend);
    manager.process_events();

    picc.push_response(passthrough_ok(&fixtures::ntag213_version()));
    let version = manager.get_version().unwrap();
    assert_eq!(version.product_name(), Some("NTAG213"));
    assert_eq!(version.storage_bytes(), 128);
}
