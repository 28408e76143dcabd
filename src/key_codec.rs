//! Hex text encoding of internal key records.
//!
//! A key file is the decimal bit length on its own line followed by a hex
//! block (see [`crate::encoding`]) of the record body. Field order is fixed:
//! modulus, then (private keys only) the private exponent, then the public
//! exponent, then (private keys only) the two prime factors.

use std::fs;
use std::path::Path;

use crate::encoding::{read_hex_block, write_hex_block};
use crate::error::{Error, FormatError};
use crate::types::key::{check_bits, PrivateKey, PublicKey, MODULUS_LEN, PRIME_LEN};

/// A key record with a fixed-length body.
pub trait KeyRecord: Sized {
    /// Length in bytes of the record body (everything after the bit length).
    const BODY_LEN: usize;

    fn bits(&self) -> u32;

    /// Significant bits in the stored modulus.
    fn modulus_bits(&self) -> usize;

    /// Serialize the body fields in record order.
    fn body(&self) -> Vec<u8>;

    /// Rebuild a record from a body of exactly `BODY_LEN` bytes.
    fn from_body(bits: u32, body: &[u8]) -> Result<Self, FormatError>;
}

impl KeyRecord for PublicKey {
    const BODY_LEN: usize = 2 * MODULUS_LEN;

    fn bits(&self) -> u32 {
        self.bits
    }

    fn modulus_bits(&self) -> usize {
        self.modulus().bits()
    }

    fn body(&self) -> Vec<u8> {
        let mut body = Vec::with_capacity(Self::BODY_LEN);
        body.extend_from_slice(&self.modulus);
        body.extend_from_slice(&self.exponent);
        body
    }

    fn from_body(bits: u32, body: &[u8]) -> Result<Self, FormatError> {
        let mut fields = Fields::new(body, Self::BODY_LEN)?;
        Ok(Self {
            bits,
            modulus: fields.take(),
            exponent: fields.take(),
        })
    }
}

impl KeyRecord for PrivateKey {
    const BODY_LEN: usize = 3 * MODULUS_LEN + 2 * PRIME_LEN;

    fn bits(&self) -> u32 {
        self.bits
    }

    fn modulus_bits(&self) -> usize {
        self.modulus().bits()
    }

    fn body(&self) -> Vec<u8> {
        let mut body = Vec::with_capacity(Self::BODY_LEN);
        body.extend_from_slice(&self.modulus);
        body.extend_from_slice(&self.private_exponent);
        body.extend_from_slice(&self.public_exponent);
        body.extend_from_slice(&self.primes[0]);
        body.extend_from_slice(&self.primes[1]);
        body
    }

    fn from_body(bits: u32, body: &[u8]) -> Result<Self, FormatError> {
        let mut fields = Fields::new(body, Self::BODY_LEN)?;
        Ok(Self {
            bits,
            modulus: fields.take(),
            private_exponent: fields.take(),
            public_exponent: fields.take(),
            primes: [fields.take(), fields.take()],
        })
    }
}

/// Sequential fixed-width reader over a body whose length is checked up front.
struct Fields<'a> {
    rest: &'a [u8],
}

impl<'a> Fields<'a> {
    fn new(body: &'a [u8], expected: usize) -> Result<Self, FormatError> {
        if body.len() != expected {
            return Err(FormatError::WrongLength {
                expected,
                actual: body.len(),
            });
        }
        Ok(Self { rest: body })
    }

    fn take<const N: usize>(&mut self) -> [u8; N] {
        let (head, tail) = self.rest.split_at(N);
        self.rest = tail;
        let mut out = [0u8; N];
        out.copy_from_slice(head);
        out
    }
}

/// Encode a key record as hex text.
pub fn encode_hex<K: KeyRecord>(key: &K) -> String {
    let mut out = format!("{}\n", key.bits());
    write_hex_block(&mut out, &key.body());
    out
}

/// Decode a key record from hex text.
///
/// The bit length must be in range and no smaller than the modulus it
/// describes. A larger value is accepted, so public keys carrying the
/// default length still decode.
pub fn decode_hex<K: KeyRecord>(text: &str) -> Result<K, FormatError> {
    let mut lines = text.lines().skip_while(|l| l.trim().is_empty());

    let bits_line = lines.next().ok_or(FormatError::MissingBits)?.trim();
    let bits: u32 = bits_line
        .parse()
        .map_err(|_| FormatError::InvalidBits(bits_line.to_string()))?;

    let body = read_hex_block(&mut lines)?;
    let key = K::from_body(bits, &body)?;
    check_bits(bits)?;

    let modulus_bits = key.modulus_bits();
    if modulus_bits > bits as usize {
        return Err(FormatError::BitsBelowModulus { bits, modulus_bits });
    }
    Ok(key)
}

/// Read and decode a key file.
pub fn load_key<K: KeyRecord>(path: &Path) -> Result<K, Error> {
    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    Ok(decode_hex(&text)?)
}

/// Encode a key and write it to `path`, replacing any existing file.
pub fn save_key<K: KeyRecord>(path: &Path, key: &K) -> Result<(), Error> {
    fs::write(path, encode_hex(key)).map_err(|e| Error::io(path, e))
}
