// acr1222l-rs/acr1222l/src/device/session.rs

use log::{debug, trace, warn};

use crate::config::{ReaderConfig, reader_id};
use crate::protocol::Command;
use crate::protocol::responses::control_status;
use crate::transport::Transport;
use crate::types::{Disposition, Protocol, ShareMode};
use crate::{Error, Result};

/// An open connection on the reader handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionSession {
    pub share_mode: ShareMode,
    /// Negotiated protocol; `None` for direct sessions
    pub protocol: Option<Protocol>,
}

/// Transport adapter for one reader: tracks the connection session and
/// turns commands into transmit or control calls.
pub struct Session {
    transport: Box<dyn Transport>,
    id: String,
    connection: Option<ConnectionSession>,
    control_code: u32,
    transmit_max_response: usize,
    control_max_response: usize,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("reader", &self.transport.name())
            .field("id", &self.id)
            .field("connection", &self.connection)
            .finish()
    }
}

impl Session {
    pub fn new(transport: Box<dyn Transport>, config: &ReaderConfig) -> Self {
        let id = reader_id(transport.name());
        Self {
            transport,
            id,
            connection: None,
            control_code: config.control_code,
            transmit_max_response: config.transmit_max_response,
            control_max_response: config.control_max_response,
        }
    }

    /// Device name as reported by the platform
    pub fn name(&self) -> &str {
        self.transport.name()
    }

    /// Short reader id (`00_00`, `PICC_0`, ...)
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    pub fn connection(&self) -> Option<ConnectionSession> {
        self.connection
    }

    /// Open a connection session. An already open session is reused and
    /// its protocol returned.
    pub fn connect(&mut self, share_mode: ShareMode, protocol: Protocol) -> Result<Option<Protocol>> {
        if let Some(conn) = self.connection {
            return Ok(conn.protocol);
        }
        debug!(
            "connect '{}' requested with share mode {} and protocol {}",
            self.id, share_mode, protocol
        );
        let negotiated = self
            .transport
            .connect(share_mode, protocol)
            .map_err(|e| Error::Connect {
                reader: self.id.clone(),
                source: Box::new(e),
            })?;
        match negotiated {
            Some(p) => debug!("reader '{}' connected with protocol {}", self.id, p),
            None => debug!("reader '{}' connected ({})", self.id, share_mode),
        }
        self.connection = Some(ConnectionSession {
            share_mode,
            protocol: negotiated,
        });
        Ok(negotiated)
    }

    /// Close the connection session. The session is considered closed
    /// even when the platform reports an error.
    pub fn disconnect(&mut self) -> Result<()> {
        if self.connection.take().is_none() {
            return Ok(());
        }
        match self.transport.disconnect(Disposition::LeaveCard) {
            Ok(()) => {
                debug!("disconnected '{}'", self.id);
                Ok(())
            }
            Err(e) => Err(Error::Disconnect {
                reader: self.id.clone(),
                source: Box::new(e),
            }),
        }
    }

    /// Disconnect, logging instead of failing
    pub fn disconnect_quietly(&mut self) {
        if let Err(e) = self.disconnect() {
            warn!("{}", e);
        }
    }

    /// Send a card command over the open session
    pub fn transmit(&mut self, frame: &[u8]) -> Result<Vec<u8>> {
        if self.connection.is_none() {
            return Err(Error::CardNotPresent);
        }
        trace!("transmit to {}: {}", self.id, hex::encode(frame));
        let resp = self.transport.transmit(frame, self.transmit_max_response)?;
        trace!("response from {}: {}", self.id, hex::encode(&resp));
        Ok(resp)
    }

    /// Send a reader peripheral command. The reader acknowledges with
    /// `90` in the first byte.
    pub fn control(&mut self, frame: &[u8]) -> Result<Vec<u8>> {
        if self.connection.is_none() {
            return Err(Error::NoReader);
        }
        trace!("control to {}: {}", self.id, hex::encode(frame));
        let resp = self
            .transport
            .control(self.control_code, frame, self.control_max_response)?;
        match control_status(&resp) {
            Some(0x90) => Ok(resp),
            status => Err(Error::ControlFailed {
                reader: self.id.clone(),
                status: status.unwrap_or(0),
            }),
        }
    }

    /// Encode and dispatch a command through the right channel
    pub fn execute(&mut self, command: &Command) -> Result<Vec<u8>> {
        let frame = command.encode()?;
        debug!("{} -> {}", command.name(), self.id);
        if command.is_control() {
            self.control(&frame)
        } else {
            self.transmit(&frame)
        }
    }

    /// Run `f` on a session of at least the given kind. When no session is
    /// open one is opened first and closed again afterwards, whatever `f`
    /// returned.
    pub fn with_session<T, F>(&mut self, share_mode: ShareMode, protocol: Protocol, f: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        let opened = if self.is_connected() {
            false
        } else {
            self.connect(share_mode, protocol)?;
            true
        };
        let result = f(self);
        if opened {
            self.disconnect_quietly();
        }
        result
    }
}
