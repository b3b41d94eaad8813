#![cfg(feature = "pcsc")]

use std::time::Duration;

use serial_test::serial;

use anyhow::{Context, Result};

use crate::common;

// These tests require a real ACR1222L. They are marked `#[ignore]` so CI
// does not attempt to run them. Run manually with:
//
// cargo test -p acr1222l --test hardware --features pcsc -- --ignored

#[test]
#[ignore]
#[serial]
fn lcd_roundtrip() -> Result<()> {
    let Some(manager) = common::open_reader(Duration::from_secs(3))? else {
        return Ok(());
    };
    manager
        .write_to_lcd("acr1222l-rs", "hardware test")
        .context("write_to_lcd")?;
    manager.set_lcd_contrast(0x08).context("set_lcd_contrast")?;
    manager.clear_lcd().context("clear_lcd")?;
    manager.close();
    Ok(())
}

#[test]
#[ignore]
#[serial]
fn read_uid_of_presented_card() -> Result<()> {
    let Some(manager) = common::open_reader(Duration::from_secs(3))? else {
        return Ok(());
    };
    let mut handle = manager.read_uuid();
    // present a tag within ten seconds
    for _ in 0..100 {
        manager.wait_event(Duration::from_millis(100))?;
        if let Some(result) = handle.try_take() {
            let uid = result.context("read_uuid")?;
            anyhow::ensure!(
                matches!(uid.as_bytes().len(), 4 | 7 | 10),
                "unexpected UID length: {}",
                uid.to_hex()
            );
            break;
        }
    }
    manager.close();
    Ok(())
}
