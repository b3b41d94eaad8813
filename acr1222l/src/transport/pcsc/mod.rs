// acr1222l-rs/acr1222l/src/transport/pcsc/mod.rs

#![cfg(feature = "pcsc")]

//! PC/SC binding. `PcscBackend` owns the context and the monitor thread;
//! `PcscTransport` wraps one `pcsc::Card` for a named reader.

mod monitor;

use std::ffi::CString;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;

use log::{debug, warn};
use pcsc::{Card, Context, Protocols, Scope};

use crate::event::EventSender;
use crate::transport::traits::{Backend, Transport};
use crate::types::{Disposition, Protocol, ShareMode};
use crate::{Error, Result};

/// Default `get_status_change` timeout of the monitor loop
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// PC/SC platform service
pub struct PcscBackend {
    context: Option<Context>,
    running: Arc<AtomicBool>,
    monitor: Option<JoinHandle<()>>,
    poll_interval: Duration,
}

impl std::fmt::Debug for PcscBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PcscBackend")
            .field("established", &self.context.is_some())
            .field("running", &self.running.load(Ordering::SeqCst))
            .field("poll_interval", &self.poll_interval)
            .finish()
    }
}

impl Default for PcscBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl PcscBackend {
    pub fn new() -> Self {
        Self {
            context: None,
            running: Arc::new(AtomicBool::new(false)),
            monitor: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    fn context(&mut self) -> Result<Context> {
        if let Some(ctx) = &self.context {
            return Ok(ctx.clone());
        }
        let ctx = Context::establish(Scope::User)?;
        self.context = Some(ctx.clone());
        Ok(ctx)
    }
}

impl Backend for PcscBackend {
    fn start(&mut self, events: EventSender) -> Result<()> {
        if self.running.load(Ordering::SeqCst) {
            return Ok(());
        }
        let ctx = self.context()?;
        self.running.store(true, Ordering::SeqCst);
        let running = Arc::clone(&self.running);
        let interval = self.poll_interval;
        let handle = std::thread::Builder::new()
            .name("acr1222l-monitor".into())
            .spawn(move || monitor::run(ctx, events, running, interval))
            .map_err(|e| Error::Transport(format!("failed to spawn monitor: {}", e)))?;
        self.monitor = Some(handle);
        debug!("pcsc monitor started");
        Ok(())
    }

    fn open(&mut self, name: &str) -> Result<Box<dyn Transport>> {
        let ctx = self.context()?;
        Ok(Box::new(PcscTransport::new(ctx, name)?))
    }

    fn stop(&mut self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }
        if let Some(ctx) = &self.context {
            // wakes get_status_change
            if let Err(e) = ctx.cancel() {
                warn!("pcsc cancel failed: {}", e);
            }
        }
        if let Some(handle) = self.monitor.take() {
            if handle.join().is_err() {
                warn!("pcsc monitor thread panicked");
            }
        }
        // a fresh context for the next start
        self.context = None;
        debug!("pcsc monitor stopped");
    }
}

impl Drop for PcscBackend {
    fn drop(&mut self) {
        self.stop();
    }
}

/// One reader handle over PC/SC
pub struct PcscTransport {
    context: Context,
    name: String,
    reader: CString,
    card: Option<Card>,
}

impl std::fmt::Debug for PcscTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PcscTransport")
            .field("name", &self.name)
            .field("connected", &self.card.is_some())
            .finish()
    }
}

impl PcscTransport {
    pub fn new(context: Context, name: &str) -> Result<Self> {
        let reader = CString::new(name)
            .map_err(|_| Error::Transport(format!("invalid reader name '{}'", name)))?;
        Ok(Self {
            context,
            name: name.to_string(),
            reader,
            card: None,
        })
    }

    fn card(&mut self) -> Result<&mut Card> {
        self.card.as_mut().ok_or(Error::CardNotPresent)
    }
}

fn to_share_mode(mode: ShareMode) -> pcsc::ShareMode {
    match mode {
        ShareMode::Exclusive => pcsc::ShareMode::Exclusive,
        ShareMode::Shared => pcsc::ShareMode::Shared,
        ShareMode::Direct => pcsc::ShareMode::Direct,
    }
}

fn to_protocols(protocol: Protocol) -> Protocols {
    let bits = protocol.bits();
    let mut out = Protocols::UNDEFINED;
    if bits & Protocol::T0.bits() != 0 {
        out |= Protocols::T0;
    }
    if bits & Protocol::T1.bits() != 0 {
        out |= Protocols::T1;
    }
    if bits & Protocol::RAW.bits() != 0 {
        out |= Protocols::RAW;
    }
    out
}

fn from_protocol(protocol: pcsc::Protocol) -> Protocol {
    match protocol {
        pcsc::Protocol::T0 => Protocol::T0,
        pcsc::Protocol::T1 => Protocol::T1,
        pcsc::Protocol::RAW => Protocol::RAW,
    }
}

fn to_disposition(disposition: Disposition) -> pcsc::Disposition {
    match disposition {
        Disposition::LeaveCard => pcsc::Disposition::LeaveCard,
        Disposition::ResetCard => pcsc::Disposition::ResetCard,
        Disposition::UnpowerCard => pcsc::Disposition::UnpowerCard,
        Disposition::EjectCard => pcsc::Disposition::EjectCard,
    }
}

impl Transport for PcscTransport {
    fn name(&self) -> &str {
        &self.name
    }

    fn connect(&mut self, share_mode: ShareMode, protocol: Protocol) -> Result<Option<Protocol>> {
        if let Some(old) = self.card.take() {
            let _ = old.disconnect(pcsc::Disposition::LeaveCard);
        }
        let card = self
            .context
            .connect(&self.reader, to_share_mode(share_mode), to_protocols(protocol))?;
        let negotiated = match share_mode {
            ShareMode::Direct => None,
            _ => card.status2_owned()?.protocol2().map(from_protocol),
        };
        self.card = Some(card);
        Ok(negotiated)
    }

    fn disconnect(&mut self, disposition: Disposition) -> Result<()> {
        match self.card.take() {
            Some(card) => card
                .disconnect(to_disposition(disposition))
                .map_err(|(_, e)| Error::from(e)),
            None => Ok(()),
        }
    }

    fn control(&mut self, code: u32, frame: &[u8], max_response: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; max_response];
        let card = self.card()?;
        let resp = card.control(code as _, frame, &mut buf)?;
        Ok(resp.to_vec())
    }

    fn transmit(&mut self, frame: &[u8], max_response: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; max_response];
        let card = self.card()?;
        let resp = card.transmit(frame, &mut buf)?;
        Ok(resp.to_vec())
    }
}
