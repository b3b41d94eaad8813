// acr1222l-rs/acr1222l/src/card/operations/write.rs

use log::{debug, warn};

use crate::device::Session;
use crate::protocol::{Command, decode_write};
use crate::{Error, Result};

/// Write `data` starting at `page` with a single Update Binary.
pub fn write_buffer(session: &mut Session, page: u8, data: &[u8]) -> Result<()> {
    let resp = session.execute(&Command::WriteBytes {
        page,
        data: data.to_vec(),
    })?;
    match decode_write(&resp) {
        Ok(()) => {
            debug!("wrote {} bytes at page {:#04x}", data.len(), page);
            Ok(())
        }
        Err(Error::CardLocked) => {
            warn!("write failed, card is locked");
            Err(Error::CardLocked)
        }
        Err(e) => {
            warn!("write at page {:#04x} failed: {}", page, e);
            Err(e)
        }
    }
}
