// acr1222l-rs/acr1222l/src/card/operations/auth.rs

use log::{debug, warn};
use rand::RngCore;
use zeroize::Zeroizing;

use crate::constants::{TAG_CMD_ADDITIONAL_FRAME, TAG_CMD_AUTHENTICATE, TAG_CMD_PWD_AUTH};
use crate::crypto::{ChainedTdes, rotate_left, rotate_right};
use crate::device::Session;
use crate::protocol::{Command, decode_auth_challenge, decode_pwd_auth, passthrough_status};
use crate::types::{Pack, Password};
use crate::{Error, Result};

/// NTAG PWD_AUTH. Returns the PACK on success.
pub fn authenticate(session: &mut Session, password: &Password) -> Result<Pack> {
    let resp = session.execute(&Command::Passthrough {
        sub_command: TAG_CMD_PWD_AUTH,
        payload: password.as_bytes().to_vec(),
    })?;
    match decode_pwd_auth(&resp) {
        Ok(pack) => {
            debug!("authentication successful, PACK {}", hex::encode(pack.as_bytes()));
            Ok(pack)
        }
        Err(e) => {
            warn!("wrong password, authentication failed");
            Err(e)
        }
    }
}

/// UltralightC three pass mutual authentication.
///
/// `key` is the 16 byte 3DES key (24 byte keys are accepted as well).
/// The tag proves knowledge of the key by returning RndA rotated; a
/// mismatch, a refused second step or a malformed answer all end in
/// `WrongPassword`.
pub fn authenticate_ultralight_c<R>(session: &mut Session, key: &[u8], rng: &mut R) -> Result<()>
where
    R: RngCore + ?Sized,
{
    let mut des = ChainedTdes::new(key)?;

    let mut rnd_a = Zeroizing::new([0u8; 8]);
    rng.fill_bytes(&mut rnd_a[..]);

    // 1A 00 -> ek(RndB)
    let resp = session.execute(&Command::Passthrough {
        sub_command: TAG_CMD_AUTHENTICATE,
        payload: vec![0x00],
    })?;
    let status = passthrough_status(&resp)?;
    if status != 0x00 {
        return Err(Error::PassthroughFailed {
            command: TAG_CMD_AUTHENTICATE,
            status,
        });
    }
    let ek_rnd_b = decode_auth_challenge(&resp)?;
    let rnd_b = Zeroizing::new(to_block(&des.decrypt(&ek_rnd_b)?)?);
    let rnd_b_rot = Zeroizing::new(rotate_left(&rnd_b));

    // AF ek(RndA || RndB') -> ek(RndA')
    let mut token = Zeroizing::new(Vec::with_capacity(16));
    token.extend_from_slice(&rnd_a[..]);
    token.extend_from_slice(&rnd_b_rot[..]);
    let challenge = des.encrypt(&token)?;

    let resp = session.execute(&Command::Passthrough {
        sub_command: TAG_CMD_ADDITIONAL_FRAME,
        payload: challenge,
    })?;
    let ek_rnd_a_rot = match decode_auth_challenge(&resp) {
        Ok(block) => block,
        Err(e) => {
            debug!("second authentication step refused: {}", e);
            return Err(Error::WrongPassword);
        }
    };
    let rnd_a_rot = Zeroizing::new(to_block(&des.decrypt(&ek_rnd_a_rot)?)?);
    let rnd_a2 = Zeroizing::new(rotate_right(&rnd_a_rot));

    if *rnd_a2 != *rnd_a {
        warn!("wrong key, UltralightC authentication failed");
        return Err(Error::WrongPassword);
    }
    debug!("UltralightC authentication successful");
    Ok(())
}

fn to_block(data: &[u8]) -> Result<[u8; 8]> {
    <[u8; 8]>::try_from(data).map_err(|_| Error::InvalidLength {
        expected: 8,
        actual: data.len(),
    })
}
