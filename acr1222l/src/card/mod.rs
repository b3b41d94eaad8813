// acr1222l-rs/acr1222l/src/card/mod.rs

use rand::RngCore;

use crate::device::Session;
use crate::types::{Pack, Password, Uid};
use crate::Result;

mod info;
pub use info::{NdefMessage, TagVersion};

pub mod operations;

/// The tag currently in the field, borrowed through an open session.
pub struct Tag<'a> {
    session: &'a mut Session,
}

impl<'a> Tag<'a> {
    pub fn new(session: &'a mut Session) -> Self {
        Self { session }
    }

    pub fn read_uid(&mut self) -> Result<Uid> {
        operations::read_uid(self.session)
    }

    pub fn read_bytes(&mut self, page: u8, len: u8) -> Result<Vec<u8>> {
        operations::read_bytes(self.session, page, len)
    }

    pub fn write_buffer(&mut self, page: u8, data: &[u8]) -> Result<()> {
        operations::write_buffer(self.session, page, data)
    }

    pub fn fast_read(&mut self, start_page: u8, end_page: u8) -> Result<Vec<u8>> {
        operations::fast_read(self.session, start_page, end_page)
    }

    pub fn get_version(&mut self) -> Result<TagVersion> {
        operations::get_version(self.session)
    }

    pub fn read_ndef(&mut self, start_page: u8, end_page: u8) -> Result<NdefMessage> {
        operations::read_ndef(self.session, start_page, end_page)
    }

    pub fn authenticate(&mut self, password: &Password) -> Result<Pack> {
        operations::authenticate(self.session, password)
    }

    /// UltralightC authentication with the thread-local RNG
    pub fn authenticate_ultralight_c(&mut self, key: &[u8]) -> Result<()> {
        operations::authenticate_ultralight_c(self.session, key, &mut rand::rng())
    }

    /// UltralightC authentication with a caller-supplied RNG
    pub fn authenticate_ultralight_c_with<R: RngCore + ?Sized>(
        &mut self,
        key: &[u8],
        rng: &mut R,
    ) -> Result<()> {
        operations::authenticate_ultralight_c(self.session, key, rng)
    }
}
