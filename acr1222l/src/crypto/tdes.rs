// acr1222l-rs/acr1222l/src/crypto/tdes.rs

use cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit, generic_array::GenericArray};
use des::TdesEde3;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{Error, Result};

/// DES block size
pub const BLOCK_SIZE: usize = 8;

type Block = GenericArray<u8, cipher::consts::U8>;

/// How the feedback vector advances between calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedbackMode {
    /// One vector for both directions: every call leaves the tail of the
    /// ciphertext it produced or consumed. This is what UltralightC tags
    /// expect during AUTHENTICATE.
    #[default]
    Shared,
    /// Encryption and decryption each keep their own vector
    Independent,
}

/// Triple-DES (EDE3) in CBC mode whose feedback vector carries over from
/// one call to the next.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ChainedTdes {
    key: [u8; 24],
    encrypt_iv: [u8; BLOCK_SIZE],
    decrypt_iv: [u8; BLOCK_SIZE],
    #[zeroize(skip)]
    mode: FeedbackMode,
}

impl std::fmt::Debug for ChainedTdes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainedTdes")
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

impl ChainedTdes {
    /// Key material is 16 bytes (K1 K2, expanded to K1 K2 K1) or 24 bytes.
    /// The feedback vector starts at zero.
    pub fn new(key: &[u8]) -> Result<Self> {
        Self::with_mode(key, FeedbackMode::Shared)
    }

    pub fn with_mode(key: &[u8], mode: FeedbackMode) -> Result<Self> {
        let mut full = [0u8; 24];
        match key.len() {
            16 => {
                full[..16].copy_from_slice(key);
                full[16..].copy_from_slice(&key[..8]);
            }
            24 => full.copy_from_slice(key),
            n => return Err(Error::InvalidKey(n)),
        }
        Ok(Self {
            key: full,
            encrypt_iv: [0; BLOCK_SIZE],
            decrypt_iv: [0; BLOCK_SIZE],
            mode,
        })
    }

    pub fn mode(&self) -> FeedbackMode {
        self.mode
    }

    /// Reset the feedback vector(s) to zero
    pub fn reset(&mut self) {
        self.encrypt_iv = [0; BLOCK_SIZE];
        self.decrypt_iv = [0; BLOCK_SIZE];
    }

    /// Encrypt a whole number of blocks (no padding)
    pub fn encrypt(&mut self, plain: &[u8]) -> Result<Vec<u8>> {
        let mut blocks = to_blocks(plain)?;
        let mut enc = cbc::Encryptor::<TdesEde3>::new_from_slices(&self.key, &self.encrypt_iv)
            .map_err(|_| Error::InvalidKey(self.key.len()))?;
        enc.encrypt_blocks_mut(&mut blocks);

        let out: Vec<u8> = blocks.iter().flat_map(|b| b.iter().copied()).collect();
        self.advance_after_encrypt(tail(&out));
        Ok(out)
    }

    /// Decrypt a whole number of blocks (no padding)
    pub fn decrypt(&mut self, cipher_text: &[u8]) -> Result<Vec<u8>> {
        let mut blocks = to_blocks(cipher_text)?;
        let mut dec = cbc::Decryptor::<TdesEde3>::new_from_slices(&self.key, &self.decrypt_iv)
            .map_err(|_| Error::InvalidKey(self.key.len()))?;
        dec.decrypt_blocks_mut(&mut blocks);

        self.advance_after_decrypt(tail(cipher_text));
        Ok(blocks.iter().flat_map(|b| b.iter().copied()).collect())
    }

    fn advance_after_encrypt(&mut self, last: [u8; BLOCK_SIZE]) {
        self.encrypt_iv = last;
        if self.mode == FeedbackMode::Shared {
            self.decrypt_iv = last;
        }
    }

    fn advance_after_decrypt(&mut self, last: [u8; BLOCK_SIZE]) {
        self.decrypt_iv = last;
        if self.mode == FeedbackMode::Shared {
            self.encrypt_iv = last;
        }
    }
}

fn to_blocks(data: &[u8]) -> Result<Vec<Block>> {
    if data.is_empty() || data.len() % BLOCK_SIZE != 0 {
        let expected = data.len().div_ceil(BLOCK_SIZE).max(1) * BLOCK_SIZE;
        return Err(Error::InvalidLength {
            expected,
            actual: data.len(),
        });
    }
    Ok(data
        .chunks_exact(BLOCK_SIZE)
        .map(Block::clone_from_slice)
        .collect())
}

// caller guarantees at least one block
fn tail(data: &[u8]) -> [u8; BLOCK_SIZE] {
    let mut out = [0u8; BLOCK_SIZE];
    out.copy_from_slice(&data[data.len() - BLOCK_SIZE..]);
    out
}
