#![cfg(feature = "pcsc")]

//! 共通: 実機テスト用ヘルパー
//!
//! `--features pcsc` でコンパイルされる実機テスト用。PC/SC サービスや
//! リーダーが無い環境（CI 等）では `Ok(None)` を返す。

use std::time::{Duration, Instant};

use acr1222l::transport::PcscBackend;
use acr1222l::{ReaderManager, ReaderManagerBuilder, Result};

/// Start a manager on the PC/SC backend and wait up to `timeout` for the
/// PICC interface to show up.
///
/// - Ok(Some(manager)) : reader found
/// - Ok(None) : no reader or no service (allowed in CI)
/// - Err(e) : anything else
pub fn open_reader(timeout: Duration) -> Result<Option<ReaderManager<PcscBackend>>> {
    let _ = env_logger::builder().is_test(true).try_init();
    let manager = ReaderManagerBuilder::pcsc().build()?;
    if manager.initialize(|fault| log::warn!("{}", fault)).is_err() {
        return Ok(None);
    }
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        manager.wait_event(Duration::from_millis(100))?;
        if manager.has_reader() {
            return Ok(Some(manager));
        }
    }
    manager.close();
    Ok(None)
}
