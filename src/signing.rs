//! Content signing with a private key.

use std::path::Path;

use tracing::debug;

use crate::crypto::encrypt_private;
use crate::digest::{content_digest, Content, ContentDigest};
use crate::error::CryptoError;
use crate::types::key::PrivateKey;
use crate::types::signature::Signature;

/// Sign `content` with `key`.
///
/// Hashes the content, pads the hex digest to the modulus width and applies
/// the private-key transform. The result is always 256 bytes, zero-filled on
/// the left for keys narrower than the maximum size.
pub fn sign(content: &Content<'_>, key: &PrivateKey) -> Result<Signature, CryptoError> {
    let digest = content_digest(content)?;
    sign_digest(&digest, key)
}

/// Sign an already computed digest.
pub fn sign_digest(digest: &ContentDigest, key: &PrivateKey) -> Result<Signature, CryptoError> {
    debug!(digest = %digest.to_hex(), bits = key.bits(), "signing digest");
    let output = encrypt_private(key, digest.to_hex().as_bytes())?;
    Ok(Signature::from_bytes(output))
}

/// Sign the bytes of a file.
pub fn sign_file(path: &Path, key: &PrivateKey) -> Result<Signature, CryptoError> {
    sign(&Content::File(path), key)
}

/// Sign the bytes of a string, cut to `MAX_STRING_CONTENT_LEN` bytes.
pub fn sign_string(text: &str, key: &PrivateKey) -> Result<Signature, CryptoError> {
    sign(&Content::bounded_text(text), key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{decrypt_public, generate_key_pair};
    use crate::digest::MAX_STRING_CONTENT_LEN;
    use crate::entropy::OsEntropy;
    use crate::types::signature::SIGNATURE_LEN;
    use tempfile::tempdir;

    #[test]
    fn test_signature_recovers_digest() {
        let pair = generate_key_pair(512, &mut OsEntropy).unwrap();
        let signature = sign_string("hello", &pair.private_key).unwrap();

        let payload = decrypt_public(&pair.public_key, signature.as_bytes()).unwrap();
        assert_eq!(payload, b"5d41402abc4b2a76b9719d911017c592");
    }

    #[test]
    fn test_signing_is_deterministic() {
        let pair = generate_key_pair(512, &mut OsEntropy).unwrap();
        let a = sign_string("same content", &pair.private_key).unwrap();
        let b = sign_string("same content", &pair.private_key).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_file_and_string_paths_match() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("content.txt");
        std::fs::write(&path, "file body").unwrap();

        let pair = generate_key_pair(512, &mut OsEntropy).unwrap();
        let from_file = sign_file(&path, &pair.private_key).unwrap();
        let from_string = sign_string("file body", &pair.private_key).unwrap();
        assert_eq!(from_file, from_string);
    }

    #[test]
    fn test_long_strings_are_truncated() {
        let pair = generate_key_pair(512, &mut OsEntropy).unwrap();
        let prefix = "a".repeat(MAX_STRING_CONTENT_LEN);
        let long = format!("{}tail that is never hashed", prefix);

        let signature = sign_string(&long, &pair.private_key).unwrap();
        assert_eq!(signature, sign_string(&prefix, &pair.private_key).unwrap());
        assert_ne!(
            signature,
            sign(&Content::Bytes(long.as_bytes()), &pair.private_key).unwrap()
        );
    }

    #[test]
    fn test_narrow_key_is_left_zero_filled() {
        let pair = generate_key_pair(512, &mut OsEntropy).unwrap();
        let signature = sign_string("x", &pair.private_key).unwrap();
        let bytes = signature.as_bytes();
        assert_eq!(bytes.len(), SIGNATURE_LEN);
        assert!(bytes[..SIGNATURE_LEN - 64].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_unreadable_content_fails() {
        let dir = tempdir().unwrap();
        let pair = generate_key_pair(512, &mut OsEntropy).unwrap();
        let err = sign_file(&dir.path().join("missing"), &pair.private_key).unwrap_err();
        assert!(matches!(err, CryptoError::Content { .. }));
    }

    #[test]
    fn test_malformed_key_fails() {
        let pair = generate_key_pair(512, &mut OsEntropy).unwrap();
        let mut broken = pair.private_key.clone();
        broken.modulus = [0u8; crate::types::key::MODULUS_LEN];
        let err = sign_string("x", &broken).unwrap_err();
        assert!(matches!(err, CryptoError::InvalidModulus));
    }
}
