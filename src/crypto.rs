//! RSA raw transform, padding block and key generation.
//!
//! The raw transform is plain modular exponentiation with no padding of its
//! own. Signing and the encrypt/decrypt self-test both wrap their payload in
//! the block built by [`pad_block`]:
//!
//! ```text
//! 00 01 FF .. FF 00 || payload
//! ```
//!
//! sized to the byte width of the modulus. The payload for signatures is the
//! hex digest string itself (no DigestInfo), so these signatures are not
//! accepted by tools expecting PKCS#1 v1.5 signatures.

use rand::rngs::{OsRng, StdRng};
use rand::SeedableRng;
use rsa::hazmat::rsa_decrypt_and_check;
use rsa::pkcs8::EncodePublicKey;
use rsa::{BigUint, RsaPrivateKey};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::bridge;
use crate::entropy::EntropySource;
use crate::error::{CryptoError, Error, FormatError};
use crate::types::key::{KeyPair, PrivateKey, PublicKey, MAX_KEY_BITS, MIN_KEY_BITS};
use crate::types::signature::SIGNATURE_LEN;

/// Bytes of fixed overhead in a padding block.
pub const PADDING_OVERHEAD: usize = 11;

/// Smallest modulus width that leaves room for one payload byte.
pub const MIN_MODULUS_WIDTH: usize = PADDING_OVERHEAD + 1;

/// Byte width of a modulus, `ceil(bits / 8)`.
pub fn modulus_width(modulus: &BigUint) -> usize {
    (modulus.bits() + 7) / 8
}

/// Build the padding block for `payload` at `width` bytes.
///
/// Payloads longer than `width - 11` bytes are truncated.
pub fn pad_block(payload: &[u8], width: usize) -> Result<Vec<u8>, CryptoError> {
    if width < MIN_MODULUS_WIDTH {
        return Err(CryptoError::InvalidModulus);
    }
    let payload = &payload[..payload.len().min(width - PADDING_OVERHEAD)];
    let filler = width - 3 - payload.len();

    let mut block = Vec::with_capacity(width);
    block.push(0x00);
    block.push(0x01);
    block.resize(2 + filler, 0xff);
    block.push(0x00);
    block.extend_from_slice(payload);
    Ok(block)
}

/// Strip a padding block and return its payload.
pub fn unpad_block(block: &[u8]) -> Result<&[u8], CryptoError> {
    if block.len() < MIN_MODULUS_WIDTH || block[0] != 0x00 || block[1] != 0x01 {
        return Err(CryptoError::Padding);
    }
    let separator = block[2..]
        .iter()
        .position(|b| *b != 0xff)
        .map(|i| i + 2)
        .ok_or(CryptoError::Padding)?;
    if block[separator] != 0x00 || separator < 10 {
        return Err(CryptoError::Padding);
    }
    Ok(&block[separator + 1..])
}

/// `input ^ exponent mod modulus`.
///
/// Fails on a modulus that cannot belong to an RSA key, a zero exponent, or
/// an input not reduced modulo the modulus.
pub fn raw_transform(
    input: &BigUint,
    exponent: &BigUint,
    modulus: &BigUint,
) -> Result<BigUint, CryptoError> {
    check_modulus(modulus)?;
    if *exponent == BigUint::from(0u32) {
        return Err(CryptoError::InvalidExponent);
    }
    if input >= modulus {
        return Err(CryptoError::InputOutOfRange);
    }
    Ok(input.modpow(exponent, modulus))
}

pub(crate) fn check_modulus(modulus: &BigUint) -> Result<(), CryptoError> {
    let even = modulus.to_bytes_be().last().map_or(true, |b| b & 1 == 0);
    if even || modulus_width(modulus) < MIN_MODULUS_WIDTH {
        return Err(CryptoError::InvalidModulus);
    }
    Ok(())
}

/// Big-endian bytes of `value` right-aligned in a signature-sized buffer.
pub(crate) fn right_aligned(value: &BigUint) -> Result<[u8; SIGNATURE_LEN], CryptoError> {
    let bytes = value.to_bytes_be();
    if bytes.len() > SIGNATURE_LEN {
        return Err(CryptoError::InputOutOfRange);
    }
    let mut out = [0u8; SIGNATURE_LEN];
    out[SIGNATURE_LEN - bytes.len()..].copy_from_slice(&bytes);
    Ok(out)
}

/// Pad `payload` and apply the private-key transform.
///
/// The exponentiation runs on the rebuilt `rsa` key: blinded, CRT when the
/// primes allow it, and checked against the public exponent before the
/// result is returned.
pub fn encrypt_private(
    key: &PrivateKey,
    payload: &[u8],
) -> Result<[u8; SIGNATURE_LEN], CryptoError> {
    let modulus = key.modulus();
    check_modulus(&modulus)?;
    let block = pad_block(payload, modulus_width(&modulus))?;

    let rsa_key = bridge::private_to_rsa(key)?;
    let input = BigUint::from_bytes_be(&block);
    let output = rsa_decrypt_and_check(&rsa_key, Some(&mut OsRng), &input)?;
    right_aligned(&output)
}

/// Apply the public-key transform and strip the padding block.
pub fn decrypt_public(
    key: &PublicKey,
    ciphertext: &[u8; SIGNATURE_LEN],
) -> Result<Vec<u8>, CryptoError> {
    let modulus = key.modulus();
    let width = modulus_width(&modulus);
    let output = raw_transform(
        &BigUint::from_bytes_be(ciphertext),
        &key.exponent(),
        &modulus,
    )?;
    let aligned = right_aligned(&output)?;
    let block = &aligned[SIGNATURE_LEN - width..];
    Ok(unpad_block(block)?.to_vec())
}

/// Generate a key pair of exactly `bits` modulus bits and exponent 65537.
///
/// The generator is seeded from `entropy`; an entropy failure aborts
/// generation.
pub fn generate_key_pair(bits: u32, entropy: &mut dyn EntropySource) -> Result<KeyPair, Error> {
    if !(MIN_KEY_BITS..=MAX_KEY_BITS).contains(&bits) {
        return Err(CryptoError::UnsupportedKeySize(bits).into());
    }
    let seed = entropy.next_seed()?;
    let mut rng = StdRng::from_seed(seed);

    debug!(bits, "generating RSA key pair");
    let key = RsaPrivateKey::new(&mut rng, bits as usize).map_err(CryptoError::from)?;
    let private_key = bridge::private_from_rsa(&key)?;
    let public_key = private_key.public_key();

    Ok(KeyPair {
        private_key,
        public_key,
    })
}

/// SHA-256 fingerprint of the key's SubjectPublicKeyInfo DER, as
/// `"sha256:<hex>"`.
pub fn key_id(key: &PublicKey) -> Result<String, Error> {
    let rsa_key = bridge::public_to_rsa(key)?;
    let der = rsa_key
        .to_public_key_der()
        .map_err(|e| FormatError::Pem(e.to_string()))?;
    let hash = Sha256::digest(der.as_bytes());
    Ok(format!("sha256:{}", hex::encode(hash)))
}
