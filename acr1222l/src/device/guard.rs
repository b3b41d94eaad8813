// acr1222l-rs/acr1222l/src/device/guard.rs

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::{Error, Result};

/// In-flight flag for multi-step command sequences. A second sequence
/// arriving while the flag is held is rejected with `Error::Busy`.
#[derive(Debug, Clone, Default)]
pub struct InFlight(Arc<AtomicBool>);

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the flag. It is released when the returned token drops,
    /// whether the sequence finished, failed or unwound.
    pub fn try_acquire(&self) -> Result<InFlightToken> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| Error::Busy)?;
        Ok(InFlightToken(Arc::clone(&self.0)))
    }

    pub fn is_held(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Proof of holding the in-flight flag
#[derive(Debug)]
pub struct InFlightToken(Arc<AtomicBool>);

impl Drop for InFlightToken {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
