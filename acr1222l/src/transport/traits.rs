// acr1222l-rs/acr1222l/src/transport/traits.rs

use crate::Result;
use crate::event::EventSender;
use crate::types::{Disposition, Protocol, ShareMode};

/// Transport trait abstracts one reader handle away from the session and
/// card logic. Calls are blocking; the caller serialises them.
pub trait Transport: Send {
    /// Device name as reported by the platform
    fn name(&self) -> &str;

    /// Open a connection session. Returns the negotiated protocol, or
    /// `None` for direct sessions where nothing was negotiated.
    fn connect(&mut self, share_mode: ShareMode, protocol: Protocol) -> Result<Option<Protocol>>;

    /// Close the connection session
    fn disconnect(&mut self, disposition: Disposition) -> Result<()>;

    /// Reader peripheral command (escape / control channel)
    fn control(&mut self, code: u32, frame: &[u8], max_response: usize) -> Result<Vec<u8>>;

    /// Card command over the connected session
    fn transmit(&mut self, frame: &[u8], max_response: usize) -> Result<Vec<u8>>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn connect(&mut self, share_mode: ShareMode, protocol: Protocol) -> Result<Option<Protocol>> {
        (**self).connect(share_mode, protocol)
    }

    fn disconnect(&mut self, disposition: Disposition) -> Result<()> {
        (**self).disconnect(disposition)
    }

    fn control(&mut self, code: u32, frame: &[u8], max_response: usize) -> Result<Vec<u8>> {
        (**self).control(code, frame, max_response)
    }

    fn transmit(&mut self, frame: &[u8], max_response: usize) -> Result<Vec<u8>> {
        (**self).transmit(frame, max_response)
    }
}

/// Platform smart card service. Produces reader events and opens
/// transports for discovered readers.
pub trait Backend: Send {
    /// Start delivering `ReaderEvent`s into `events`
    fn start(&mut self, events: EventSender) -> Result<()>;

    /// Open a transport for the named reader
    fn open(&mut self, name: &str) -> Result<Box<dyn Transport>>;

    /// Stop delivering events. Safe to call when not started.
    fn stop(&mut self);
}
