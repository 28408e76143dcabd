//! Seed material for key generation.

use std::io::Read;

use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::EntropyError;

/// Length of the seed handed to the key generator.
pub const SEED_LEN: usize = 32;

/// A source of seed material. Failure is fatal to the caller; implementations
/// must never fall back to a weaker source.
pub trait EntropySource {
    fn next_seed(&mut self) -> Result<[u8; SEED_LEN], EntropyError>;
}

/// The operating system's CSPRNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn next_seed(&mut self) -> Result<[u8; SEED_LEN], EntropyError> {
        let mut seed = [0u8; SEED_LEN];
        OsRng
            .try_fill_bytes(&mut seed)
            .map_err(|e| EntropyError::Unavailable(e.to_string()))?;
        Ok(seed)
    }
}

/// Seed material read from a byte stream such as a random device.
pub struct ReaderEntropy<R> {
    reader: R,
}

impl<R: Read> ReaderEntropy<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: Read> EntropySource for ReaderEntropy<R> {
    fn next_seed(&mut self) -> Result<[u8; SEED_LEN], EntropyError> {
        let mut seed = [0u8; SEED_LEN];
        let mut filled = 0;
        while filled < SEED_LEN {
            match self.reader.read(&mut seed[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(EntropyError::Unavailable(e.to_string())),
            }
        }
        if filled < SEED_LEN {
            return Err(EntropyError::ShortRead {
                wanted: SEED_LEN,
                got: filled,
            });
        }
        Ok(seed)
    }
}
