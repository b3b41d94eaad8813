// acr1222l-rs/acr1222l/src/manager/mod.rs

//! Reader lifecycle manager.
//!
//! Owns the backend, the session of the matched PICC reader, the card
//! presence tracker and the pending request slots. Platform events are
//! fed in one at a time (`handle_event`, `process_events`, `wait_event`);
//! user operations may be called from any thread.
//!
//! Lock order: pending slots, then session, then presence.

use std::time::Duration;

use crossbeam_channel::RecvTimeoutError;
use derive_more::Display;
use log::{debug, error, info, trace, warn};
use parking_lot::Mutex;
use rand::RngCore;

use crate::card::{NdefMessage, TagVersion, operations};
use crate::config::{ReaderConfig, reader_id};
use crate::device::{InFlight, Pending, PendingQueue, PendingRequest, PresenceTracker, Session};
use crate::event::{
    ErrorCallback, EventReceiver, FaultKind, Notification, NotificationReceiver,
    NotificationSender, ReaderEvent, ReaderFault, event_channel,
};
use crate::protocol::{Command, LcdRow};
use crate::transport::Backend;
use crate::types::{CardPresence, Pack, Password, ReaderState, RequestKind, Uid};
use crate::{Error, Result};

mod builder;
pub use builder::ReaderManagerBuilder;

/// Lifecycle of the whole subsystem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
pub enum LifecycleState {
    #[default]
    #[display(fmt = "UNINITIALIZED")]
    Uninitialized,
    #[display(fmt = "INITIALIZING")]
    Initializing,
    #[display(fmt = "READY")]
    Ready,
}

#[derive(Default)]
struct Lifecycle {
    state: LifecycleState,
    events: Option<EventReceiver>,
}

/// Drives one ACR1222L through discovery, card presence and hot-unplug.
pub struct ReaderManager<B: Backend> {
    config: ReaderConfig,
    backend: Mutex<B>,
    lifecycle: Mutex<Lifecycle>,
    on_error: Mutex<Option<ErrorCallback>>,
    session: Mutex<Option<Session>>,
    presence: Mutex<PresenceTracker>,
    pending: Mutex<PendingQueue>,
    subscribers: Mutex<Vec<NotificationSender>>,
    in_flight: InFlight,
}

impl<B: Backend> std::fmt::Debug for ReaderManager<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReaderManager")
            .field("state", &self.state())
            .field("reader", &self.reader_id())
            .field("presence", &self.presence.lock().presence())
            .field("pending", &self.pending.lock().len())
            .finish()
    }
}

impl<B: Backend> ReaderManager<B> {
    pub fn new(backend: B, config: ReaderConfig) -> Self {
        Self {
            config,
            backend: Mutex::new(backend),
            lifecycle: Mutex::new(Lifecycle::default()),
            on_error: Mutex::new(None),
            session: Mutex::new(None),
            presence: Mutex::new(PresenceTracker::new()),
            pending: Mutex::new(PendingQueue::new()),
            subscribers: Mutex::new(Vec::new()),
            in_flight: InFlight::new(),
        }
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    pub fn state(&self) -> LifecycleState {
        self.lifecycle.lock().state
    }

    /// True once a reader matching the configured interface was found
    pub fn has_reader(&self) -> bool {
        self.session.lock().is_some()
    }

    pub fn reader_id(&self) -> Option<String> {
        self.session.lock().as_ref().map(|s| s.id().to_string())
    }

    /// A card is tapped and a session to it is open
    pub fn card_present(&self) -> bool {
        let connected = self.session.lock().as_ref().is_some_and(|s| s.is_connected());
        connected && self.presence.lock().is_present()
    }

    /// Whether a request of `kind` is waiting for a card
    pub fn is_pending(&self, kind: RequestKind) -> bool {
        self.pending.lock().contains(kind)
    }

    /// Guard shared by the multi-step command sequences
    pub fn in_flight(&self) -> &InFlight {
        &self.in_flight
    }

    /// Receive lifecycle notifications from now on
    pub fn subscribe(&self) -> NotificationReceiver {
        let (tx, rx) = crossbeam_channel::unbounded();
        self.subscribers.lock().push(tx);
        rx
    }

    // ------------------------------------------------------------------
    // lifecycle
    // ------------------------------------------------------------------

    /// Start the platform service and begin receiving reader events.
    /// Calling it again while ready does nothing.
    pub fn initialize<F>(&self, on_error: F) -> Result<()>
    where
        F: FnMut(ReaderFault) + Send + 'static,
    {
        {
            let lifecycle = self.lifecycle.lock();
            if lifecycle.state != LifecycleState::Uninitialized {
                debug!("reader service already {}", lifecycle.state);
                return Ok(());
            }
        }
        *self.on_error.lock() = Some(Box::new(on_error));
        self.start_service()
    }

    fn start_service(&self) -> Result<()> {
        let mut lifecycle = self.lifecycle.lock();
        if lifecycle.state != LifecycleState::Uninitialized {
            return Ok(());
        }
        lifecycle.state = LifecycleState::Initializing;
        let (tx, rx) = event_channel();
        if let Err(e) = self.backend.lock().start(tx) {
            error!("failed to start reader service: {}", e);
            lifecycle.state = LifecycleState::Uninitialized;
            return Err(e);
        }
        lifecycle.events = Some(rx);
        lifecycle.state = LifecycleState::Ready;
        info!("reader service initialized");
        Ok(())
    }

    /// Stop the service. Waiting requests fail with `ServiceClosed`.
    pub fn close(&self) {
        {
            let mut lifecycle = self.lifecycle.lock();
            if lifecycle.state == LifecycleState::Uninitialized {
                return;
            }
            self.backend.lock().stop();
            lifecycle.events = None;
            lifecycle.state = LifecycleState::Uninitialized;
        }
        let removed = self.session.lock().take();
        if let Some(mut session) = removed {
            session.disconnect_quietly();
            self.notify(Notification::ReaderEnd {
                id: session.id().to_string(),
            });
        }
        self.presence.lock().reset();
        let rejected = self.pending.lock().reject_all(|| Error::ServiceClosed);
        if rejected > 0 {
            debug!("{} pending request(s) rejected on close", rejected);
        }
        info!("reader service closed");
    }

    fn ensure_ready(&self) -> Result<()> {
        match self.state() {
            LifecycleState::Ready => Ok(()),
            _ => Err(Error::NotInitialized),
        }
    }

    // ------------------------------------------------------------------
    // events
    // ------------------------------------------------------------------

    /// Handle every event already queued by the backend. Returns how many
    /// were handled.
    pub fn process_events(&self) -> usize {
        let Some(rx) = self.lifecycle.lock().events.clone() else {
            return 0;
        };
        let mut handled = 0;
        for event in rx.try_iter() {
            self.handle_event(event);
            handled += 1;
        }
        handled
    }

    /// Wait up to `timeout` for one event and handle it. Returns false on
    /// timeout.
    pub fn wait_event(&self, timeout: Duration) -> Result<bool> {
        let rx = self
            .lifecycle
            .lock()
            .events
            .clone()
            .ok_or(Error::NotInitialized)?;
        match rx.recv_timeout(timeout) {
            Ok(event) => {
                self.handle_event(event);
                Ok(true)
            }
            Err(RecvTimeoutError::Timeout) => Ok(false),
            Err(RecvTimeoutError::Disconnected) => Err(Error::ServiceClosed),
        }
    }

    pub fn handle_event(&self, event: ReaderEvent) {
        if self.state() == LifecycleState::Uninitialized {
            debug!("event ignored, service not running: {:?}", event);
            return;
        }
        trace!("event: {:?}", event);
        match event {
            ReaderEvent::Attached { name } => self.on_attached(&name),
            ReaderEvent::Removed { name } => self.on_removed(&name),
            ReaderEvent::StatusChanged { name, state } => self.on_status(&name, state),
            ReaderEvent::Error { name, message } => self.on_reader_error(&name, &message),
            ReaderEvent::ServiceError { message } => {
                error!("smart card service error: {}", message);
                self.report(ReaderFault::new(FaultKind::PcscError, message));
            }
        }
    }

    fn is_current(&self, name: &str) -> bool {
        self.session
            .lock()
            .as_ref()
            .is_some_and(|s| s.name() == name)
    }

    fn on_attached(&self, name: &str) {
        if !self.config.matcher.matches(name) {
            debug!("ignoring reader interface '{}'", name);
            return;
        }
        let mut guard = self.session.lock();
        if guard.as_ref().is_some_and(|s| s.name() == name) {
            return;
        }
        let opened = self.backend.lock().open(name);
        let transport = match opened {
            Ok(t) => t,
            Err(e) => {
                drop(guard);
                warn!("could not open reader '{}': {}", name, e);
                self.report(
                    ReaderFault::new(FaultKind::ReaderError, e.to_string()).with_reader(reader_id(name)),
                );
                return;
            }
        };
        if let Some(mut previous) = guard.take() {
            warn!("replacing reader {}", previous.id());
            previous.disconnect_quietly();
        }
        let session = Session::new(transport, &self.config);
        let id = session.id().to_string();
        *guard = Some(session);
        drop(guard);

        *self.presence.lock() = PresenceTracker::new();
        info!("reader found: {} ({})", id, name);
        self.notify(Notification::ReaderFound {
            id,
            name: name.to_string(),
        });
    }

    fn on_status(&self, name: &str, state: ReaderState) {
        if !self.is_current(name) {
            trace!("status of '{}' ignored", name);
            return;
        }
        let transition = self.presence.lock().observe(state);
        match transition {
            Some(CardPresence::Present) => self.on_card_present(),
            Some(CardPresence::Absent) => self.on_card_removed(),
            None => {}
        }
    }

    fn on_card_present(&self) {
        let mut pending = self.pending.lock();
        let mut guard = self.session.lock();
        let Some(session) = guard.as_mut() else {
            return;
        };
        let id = session.id().to_string();
        info!("card present on {}", id);

        if let Err(e) = session.connect(self.config.card_share_mode, self.config.card_protocol) {
            // presence stays; the next status event sorts it out
            warn!("{}", e);
            return;
        }

        let requests = pending.drain();
        if !requests.is_empty() {
            debug!("replaying {} pending request(s)", requests.len());
        }
        for request in requests {
            if request.is_abandoned() {
                debug!("pending {} abandoned by caller", request.kind());
                continue;
            }
            if let Some(retry) = replay(session, request) {
                pending.register(retry);
            }
        }
        drop(guard);
        drop(pending);

        self.notify(Notification::CardPresent { id });
    }

    fn on_card_removed(&self) {
        let id = {
            let mut guard = self.session.lock();
            guard.as_mut().map(|s| {
                s.disconnect_quietly();
                s.id().to_string()
            })
        };
        if let Some(id) = id {
            info!("card removed from {}", id);
            self.notify(Notification::CardRemoved { id });
        }
    }

    fn on_removed(&self, name: &str) {
        let removed = {
            let mut guard = self.session.lock();
            if guard.as_ref().is_some_and(|s| s.name() == name) {
                guard.take()
            } else {
                None
            }
        };
        let Some(mut session) = removed else {
            debug!("reader '{}' removed", name);
            return;
        };
        let id = session.id().to_string();
        warn!("reader {} removed", id);

        self.notify(Notification::ReaderEnd { id: id.clone() });
        session.disconnect_quietly();
        drop(session);
        self.presence.lock().reset();

        self.report(
            ReaderFault::new(FaultKind::ReaderRemoved, format!("reader {} removed", id))
                .with_reader(id.clone()),
        );
        let rejected = self
            .pending
            .lock()
            .reject_all(|| Error::ReaderRemoved(id.clone()));
        if rejected > 0 {
            debug!("{} pending request(s) rejected", rejected);
        }

        {
            let mut lifecycle = self.lifecycle.lock();
            self.backend.lock().stop();
            lifecycle.events = None;
            lifecycle.state = LifecycleState::Uninitialized;
        }

        if self.config.reinitialize_on_removal {
            info!("re-initializing reader service");
            if let Err(e) = self.start_service() {
                self.report(ReaderFault::new(FaultKind::PcscError, e.to_string()));
            }
        }
    }

    fn on_reader_error(&self, name: &str, message: &str) {
        let removed = {
            let mut guard = self.session.lock();
            if guard.as_ref().is_some_and(|s| s.name() == name) {
                guard.take()
            } else {
                None
            }
        };
        let Some(mut session) = removed else {
            debug!("error on reader '{}' ignored: {}", name, message);
            return;
        };
        error!("reader {} error: {}", session.id(), message);
        session.disconnect_quietly();
        self.presence.lock().reset();
        self.report(ReaderFault::new(FaultKind::ReaderError, message).with_reader(session.id()));
    }

    fn notify(&self, notification: Notification) {
        debug!("{}", notification);
        self.subscribers
            .lock()
            .retain(|tx| tx.send(notification.clone()).is_ok());
    }

    fn report(&self, fault: ReaderFault) {
        if let Some(callback) = self.on_error.lock().as_mut() {
            callback(fault);
        }
    }

    // ------------------------------------------------------------------
    // card operations that wait for a card
    // ------------------------------------------------------------------

    fn submit<T, F, D>(&self, wait_for_card: bool, op: F, defer: D) -> Pending<T>
    where
        F: FnOnce(&mut Session) -> Result<T>,
        D: FnOnce() -> (PendingRequest, Pending<T>),
    {
        if let Err(e) = self.ensure_ready() {
            return Pending::ready(Err(e));
        }
        let mut pending = self.pending.lock();
        {
            let mut guard = self.session.lock();
            if let Some(session) = guard.as_mut() {
                if session.is_connected() && self.presence.lock().is_present() {
                    return Pending::ready(op(session));
                }
            }
        }
        if !wait_for_card {
            return Pending::ready(Err(Error::CardNotPresent));
        }
        let (request, handle) = defer();
        debug!("no card present, {} waits for one", request.kind());
        pending.register(request);
        handle
    }

    /// UID of the next card (or the current one)
    pub fn read_uuid(&self) -> Pending<Uid> {
        self.submit(true, operations::read_uid, PendingRequest::read_uuid)
    }

    /// `len` bytes from `page`. With `wait_for_card` false the call fails
    /// with `CardNotPresent` instead of waiting.
    pub fn read_bytes(&self, page: u8, len: u8, wait_for_card: bool) -> Pending<Vec<u8>> {
        self.submit(
            wait_for_card,
            |s| operations::read_bytes(s, page, len),
            || PendingRequest::read_bytes(page, len),
        )
    }

    pub fn write_buffer(&self, data: &[u8], page: u8) -> Pending<()> {
        self.submit(
            true,
            |s| operations::write_buffer(s, page, data),
            || PendingRequest::write_buffer(page, data.to_vec()),
        )
    }

    /// Text record stored between `start_page` and `end_page`
    pub fn read_ndef(&self, start_page: u8, end_page: u8) -> Pending<NdefMessage> {
        let _token = match self.in_flight.try_acquire() {
            Ok(token) => token,
            Err(e) => return Pending::ready(Err(e)),
        };
        self.submit(
            true,
            |s| operations::read_ndef(s, start_page, end_page),
            || PendingRequest::read_ndef(start_page, end_page),
        )
    }

    /// `read_ndef` over the configured page range
    pub fn read_ndef_default(&self) -> Pending<NdefMessage> {
        self.read_ndef(self.config.ndef_start_page, self.config.ndef_end_page)
    }

    pub fn stop_read_uuid(&self) -> bool {
        self.pending.lock().cancel(RequestKind::ReadUuid)
    }

    pub fn stop_read_bytes(&self) -> bool {
        self.pending.lock().cancel(RequestKind::ReadBytes)
    }

    pub fn stop_write_buffer(&self) -> bool {
        self.pending.lock().cancel(RequestKind::WriteBuffer)
    }

    pub fn stop_ndef_read(&self) -> bool {
        self.pending.lock().cancel(RequestKind::ReadNdef)
    }

    // ------------------------------------------------------------------
    // card operations that need a card now
    // ------------------------------------------------------------------

    fn with_card<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&mut Session) -> Result<T>,
    {
        self.ensure_ready()?;
        let mut guard = self.session.lock();
        let session = guard.as_mut().ok_or(Error::NoReader)?;
        if !session.is_connected() || !self.presence.lock().is_present() {
            return Err(Error::CardNotPresent);
        }
        op(session)
    }

    /// NTAG password authentication
    pub fn authenticate(&self, password: &Password) -> Result<Pack> {
        self.with_card(|s| operations::authenticate(s, password))
    }

    /// UltralightC 3DES mutual authentication
    pub fn authenticate_ultralight_c(&self, key: &[u8]) -> Result<()> {
        self.authenticate_ultralight_c_with(key, &mut rand::rng())
    }

    pub fn authenticate_ultralight_c_with<R>(&self, key: &[u8], rng: &mut R) -> Result<()>
    where
        R: RngCore + ?Sized,
    {
        let _token = self.in_flight.try_acquire()?;
        self.with_card(|s| operations::authenticate_ultralight_c(s, key, rng))
    }

    pub fn fast_read(&self, start_page: u8, end_page: u8) -> Result<Vec<u8>> {
        self.with_card(|s| operations::fast_read(s, start_page, end_page))
    }

    pub fn get_version(&self) -> Result<TagVersion> {
        self.with_card(operations::get_version)
    }

    // ------------------------------------------------------------------
    // LCD and backlight
    // ------------------------------------------------------------------

    /// Run `f` as one guarded control sequence. A direct session is opened
    /// when none is open and closed again afterwards.
    fn control_sequence<F>(&self, what: &str, f: F) -> Result<()>
    where
        F: FnOnce(&mut Session) -> Result<()>,
    {
        self.ensure_ready()?;
        let _token = self.in_flight.try_acquire()?;
        let mut guard = self.session.lock();
        let session = guard.as_mut().ok_or(Error::NoReader)?;
        debug!("{} on {}", what, session.id());
        session
            .with_session(
                self.config.control_share_mode,
                self.config.control_protocol,
                f,
            )
            .inspect_err(|e| warn!("{} failed: {}", what, e))
    }

    pub fn turn_on_backlight(&self) -> Result<()> {
        self.control_sequence("backlight on", |s| {
            s.execute(&Command::Backlight { on: true }).map(drop)
        })
    }

    pub fn turn_off_backlight(&self) -> Result<()> {
        self.control_sequence("backlight off", |s| {
            s.execute(&Command::Backlight { on: false }).map(drop)
        })
    }

    /// Contrast 0..=15; larger values are clamped
    pub fn set_lcd_contrast(&self, level: u8) -> Result<()> {
        self.control_sequence("lcd contrast", |s| {
            s.execute(&Command::LcdContrast { level }).map(drop)
        })
    }

    /// Backlight on, then one line of text per row
    pub fn write_to_lcd(&self, row1: &str, row2: &str) -> Result<()> {
        self.control_sequence("lcd write", |s| {
            s.execute(&Command::Backlight { on: true })?;
            s.execute(&Command::LcdText {
                row: LcdRow::First,
                text: row1.to_string(),
            })?;
            s.execute(&Command::LcdText {
                row: LcdRow::Second,
                text: row2.to_string(),
            })?;
            Ok(())
        })
    }

    /// Backlight off and clear both rows
    pub fn clear_lcd(&self) -> Result<()> {
        self.control_sequence("lcd clear", |s| {
            s.execute(&Command::Backlight { on: false })?;
            s.execute(&Command::LcdClear)?;
            Ok(())
        })
    }
}

/// Run one pending request against the card. Returns the request when it
/// should wait for the next card instead.
fn replay(session: &mut Session, request: PendingRequest) -> Option<PendingRequest> {
    let kind = request.kind();
    match request {
        PendingRequest::ReadUuid { reply } => {
            let result = operations::read_uid(session);
            log_replay(kind, &result);
            let _ = reply.send(result);
        }
        PendingRequest::ReadBytes { page, len, reply } => {
            let result = operations::read_bytes(session, page, len);
            log_replay(kind, &result);
            let _ = reply.send(result);
        }
        PendingRequest::WriteBuffer { page, data, reply } => {
            let result = operations::write_buffer(session, page, &data);
            log_replay(kind, &result);
            let _ = reply.send(result);
        }
        PendingRequest::ReadNdef {
            start_page,
            end_page,
            reply,
        } => match operations::read_ndef(session, start_page, end_page) {
            Err(e) if e.is_transport() => {
                info!("{} interrupted ({}), waiting for the next card", kind, e);
                return Some(PendingRequest::ReadNdef {
                    start_page,
                    end_page,
                    reply,
                });
            }
            result => {
                log_replay(kind, &result);
                let _ = reply.send(result);
            }
        },
    }
    None
}

fn log_replay<T>(kind: RequestKind, result: &Result<T>) {
    match result {
        Ok(_) => debug!("pending {} fulfilled", kind),
        Err(e) => warn!("pending {} failed: {}", kind, e),
    }
}
