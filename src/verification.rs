//! Signature verification against a single public key.

use std::path::Path;

use rsa::BigUint;
use tracing::debug;

use crate::crypto::{check_modulus, modulus_width, pad_block, raw_transform, right_aligned};
use crate::digest::{content_digest, Content, ContentDigest};
use crate::error::CryptoError;
use crate::types::key::PublicKey;
use crate::types::signature::Signature;

/// Check `signature` over `content` with `key`.
///
/// `Ok(false)` means the signature does not match. An `Err` means the check
/// could not run at all: unreadable content or a key the transform cannot
/// use.
pub fn verify(
    content: &Content<'_>,
    signature: &Signature,
    key: &PublicKey,
) -> Result<bool, CryptoError> {
    let digest = content_digest(content)?;
    verify_digest(&digest, signature, key)
}

/// Check `signature` against an already computed digest.
///
/// Both the recovered block and the expected block are compared as full
/// 256-byte buffers. A signature value not below the modulus cannot have
/// come from this key and is reported as a mismatch.
pub fn verify_digest(
    digest: &ContentDigest,
    signature: &Signature,
    key: &PublicKey,
) -> Result<bool, CryptoError> {
    let modulus = key.modulus();
    check_modulus(&modulus)?;
    let exponent = key.exponent();
    if exponent == BigUint::from(0u32) {
        return Err(CryptoError::InvalidExponent);
    }

    let value = BigUint::from_bytes_be(signature.as_bytes());
    if value >= modulus {
        debug!("signature value exceeds modulus");
        return Ok(false);
    }
    let recovered = right_aligned(&raw_transform(&value, &exponent, &modulus)?)?;

    let block = pad_block(digest.to_hex().as_bytes(), modulus_width(&modulus))?;
    let expected = right_aligned(&BigUint::from_bytes_be(&block))?;

    Ok(recovered == expected)
}

/// Verify a signature over the bytes of a file.
pub fn verify_file(path: &Path, signature: &Signature, key: &PublicKey) -> Result<bool, CryptoError> {
    verify(&Content::File(path), signature, key)
}

/// Verify a signature over the bytes of a string, cut to
/// `MAX_STRING_CONTENT_LEN` bytes as [`crate::signing::sign_string`] does.
pub fn verify_string(text: &str, signature: &Signature, key: &PublicKey) -> Result<bool, CryptoError> {
    verify(&Content::bounded_text(text), signature, key)
}
