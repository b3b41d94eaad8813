// acr1222l-rs/acr1222l/src/transport/mock.rs

use crate::event::{EventSender, ReaderEvent};
use crate::transport::traits::{Backend, Transport};
use crate::types::{Disposition, Protocol, ShareMode};
use crate::{Error, Result};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

/// Scripted answer for a transmit/control call
pub type Responder = Box<dyn FnMut(&[u8]) -> Option<Vec<u8>> + Send>;

/// One recorded call on a `MockTransport`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Connect(ShareMode, Protocol),
    Disconnect(Disposition),
    Control(u32, Vec<u8>),
    Transmit(Vec<u8>),
}

/// Queued reply; `Fail` surfaces as a transport error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockReply {
    Data(Vec<u8>),
    Fail(String),
}

#[derive(Default)]
struct MockState {
    calls: Vec<MockCall>,
    responses: VecDeque<MockReply>,
    responder: Option<Responder>,
    negotiated: Option<Protocol>,
    connect_failures: usize,
    disconnect_failures: usize,
    connected: bool,
}

/// Mock transport for unit tests. It records every call and answers
/// transmit/control from the queued responses, then from the responder.
///
/// Clones share state, so a test can keep one handle and give another to
/// the code under test.
#[derive(Clone)]
pub struct MockTransport {
    name: String,
    state: Arc<Mutex<MockState>>,
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("MockTransport")
            .field("name", &self.name)
            .field("calls", &state.calls.len())
            .field("queued", &state.responses.len())
            .field("connected", &state.connected)
            .finish()
    }
}

impl MockTransport {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Arc::new(Mutex::new(MockState {
                negotiated: Some(Protocol::T1),
                ..MockState::default()
            })),
        }
    }

    pub fn push_response(&self, resp: Vec<u8>) {
        self.state.lock().responses.push_back(MockReply::Data(resp));
    }

    /// Queue a transport-level failure
    pub fn push_failure(&self, message: impl Into<String>) {
        self.state
            .lock()
            .responses
            .push_back(MockReply::Fail(message.into()));
    }

    /// Answer frames not covered by the queue
    pub fn set_responder<F>(&self, f: F)
    where
        F: FnMut(&[u8]) -> Option<Vec<u8>> + Send + 'static,
    {
        self.state.lock().responder = Some(Box::new(f));
    }

    /// Protocol reported by card connects (`None` mimics a direct session)
    pub fn set_negotiated(&self, protocol: Option<Protocol>) {
        self.state.lock().negotiated = protocol;
    }

    /// Number of subsequent connect calls that should fail
    pub fn set_connect_failures(&self, n: usize) {
        self.state.lock().connect_failures = n;
    }

    /// Number of subsequent disconnect calls that should fail
    pub fn set_disconnect_failures(&self, n: usize) {
        self.state.lock().disconnect_failures = n;
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.state.lock().calls.clone()
    }

    /// Frames passed to `transmit`, in order
    pub fn transmitted(&self) -> Vec<Vec<u8>> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                MockCall::Transmit(f) => Some(f.clone()),
                _ => None,
            })
            .collect()
    }

    /// Frames passed to `control`, in order
    pub fn controlled(&self) -> Vec<Vec<u8>> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                MockCall::Control(_, f) => Some(f.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    pub fn is_connected(&self) -> bool {
        self.state.lock().connected
    }

    pub fn pending_responses(&self) -> usize {
        self.state.lock().responses.len()
    }

    fn reply(&self, frame: &[u8]) -> Result<Vec<u8>> {
        let mut state = self.state.lock();
        if let Some(reply) = state.responses.pop_front() {
            return match reply {
                MockReply::Data(d) => Ok(d),
                MockReply::Fail(msg) => Err(Error::Transport(msg)),
            };
        }
        match state.responder.as_mut().and_then(|r| r(frame)) {
            Some(d) => Ok(d),
            None => Err(Error::Transport("no response queued".into())),
        }
    }
}

impl Transport for MockTransport {
    fn name(&self) -> &str {
        &self.name
    }

    fn connect(&mut self, share_mode: ShareMode, protocol: Protocol) -> Result<Option<Protocol>> {
        let mut state = self.state.lock();
        state.calls.push(MockCall::Connect(share_mode, protocol));
        if state.connect_failures > 0 {
            state.connect_failures -= 1;
            return Err(Error::Transport("sharing violation".into()));
        }
        state.connected = true;
        Ok(match share_mode {
            ShareMode::Direct => None,
            _ => state.negotiated,
        })
    }

    fn disconnect(&mut self, disposition: Disposition) -> Result<()> {
        let mut state = self.state.lock();
        state.calls.push(MockCall::Disconnect(disposition));
        if state.disconnect_failures > 0 {
            state.disconnect_failures -= 1;
            return Err(Error::Transport("invalid handle".into()));
        }
        state.connected = false;
        Ok(())
    }

    fn control(&mut self, code: u32, frame: &[u8], _max_response: usize) -> Result<Vec<u8>> {
        self.state
            .lock()
            .calls
            .push(MockCall::Control(code, frame.to_vec()));
        self.reply(frame)
    }

    fn transmit(&mut self, frame: &[u8], _max_response: usize) -> Result<Vec<u8>> {
        self.state
            .lock()
            .calls
            .push(MockCall::Transmit(frame.to_vec()));
        self.reply(frame)
    }
}

#[derive(Default)]
struct BackendState {
    readers: HashMap<String, MockTransport>,
    events: Option<EventSender>,
    starts: usize,
    stops: usize,
    fail_start: bool,
}

/// Mock platform service. Tests register readers, then inject events
/// with `emit`, which are delivered to whatever sender `start` received.
#[derive(Clone, Default)]
pub struct MockBackend {
    state: Arc<Mutex<BackendState>>,
}

impl std::fmt::Debug for MockBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("MockBackend")
            .field("readers", &state.readers.len())
            .field("starts", &state.starts)
            .field("stops", &state.stops)
            .finish()
    }
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a reader transport that `open` will hand out
    pub fn add_reader(&self, transport: MockTransport) {
        let name = transport.name().to_string();
        self.state.lock().readers.insert(name, transport);
    }

    /// Deliver an event to the manager. Returns false when not started.
    pub fn emit(&self, event: ReaderEvent) -> bool {
        match self.state.lock().events.as_ref() {
            Some(tx) => tx.send(event).is_ok(),
            None => false,
        }
    }

    pub fn set_fail_start(&self, fail: bool) {
        self.state.lock().fail_start = fail;
    }

    pub fn starts(&self) -> usize {
        self.state.lock().starts
    }

    pub fn stops(&self) -> usize {
        self.state.lock().stops
    }

    pub fn is_running(&self) -> bool {
        self.state.lock().events.is_some()
    }
}

impl Backend for MockBackend {
    fn start(&mut self, events: EventSender) -> Result<()> {
        let mut state = self.state.lock();
        if state.fail_start {
            return Err(Error::Transport("service not available".into()));
        }
        state.starts += 1;
        state.events = Some(events);
        Ok(())
    }

    fn open(&mut self, name: &str) -> Result<Box<dyn Transport>> {
        match self.state.lock().readers.get(name) {
            Some(t) => Ok(Box::new(t.clone())),
            None => Err(Error::NoReader),
        }
    }

    fn stop(&mut self) {
        let mut state = self.state.lock();
        if state.events.take().is_some() {
            state.stops += 1;
        }
    }
}
