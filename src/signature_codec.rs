//! Hex text and raw byte encodings of [`Signature`].

use std::fs;
use std::path::Path;

use crate::encoding::{read_hex_block, write_hex_block};
use crate::error::{Error, FormatError};
use crate::types::signature::{Signature, SIGNATURE_LEN};

/// Encode a signature as a hex block.
pub fn encode_hex(signature: &Signature) -> String {
    let mut out = String::with_capacity(SIGNATURE_LEN * 2 + 16);
    write_hex_block(&mut out, &signature.0);
    out
}

/// Decode a signature from a hex block.
pub fn decode_hex(text: &str) -> Result<Signature, FormatError> {
    let mut lines = text.lines().skip_while(|l| l.trim().is_empty());
    let bytes = read_hex_block(&mut lines)?;
    decode_raw(&bytes)
}

/// The raw 256-byte form.
pub fn encode_raw(signature: &Signature) -> Vec<u8> {
    signature.0.to_vec()
}

/// Decode the raw form; the input must be exactly 256 bytes.
pub fn decode_raw(bytes: &[u8]) -> Result<Signature, FormatError> {
    let array: [u8; SIGNATURE_LEN] = bytes.try_into().map_err(|_| FormatError::WrongLength {
        expected: SIGNATURE_LEN,
        actual: bytes.len(),
    })?;
    Ok(Signature(array))
}

/// Read a hex signature file.
pub fn load_signature(path: &Path) -> Result<Signature, Error> {
    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    Ok(decode_hex(&text)?)
}

/// Write a hex signature file.
pub fn save_signature(path: &Path, signature: &Signature) -> Result<(), Error> {
    fs::write(path, encode_hex(signature)).map_err(|e| Error::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample() -> Signature {
        let mut bytes = [0u8; SIGNATURE_LEN];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = (i * 7) as u8;
        }
        Signature::from_bytes(bytes)
    }

    #[test]
    fn test_hex_form_is_eight_lines() {
        let text = encode_hex(&sample());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 9);
        assert!(lines[..8].iter().all(|l| l.len() == 64));
        assert_eq!(lines[8], ".");
    }

    #[test]
    fn test_hex_and_raw_agree() {
        let sig = sample();
        let raw = encode_raw(&sig);
        assert_eq!(raw.len(), SIGNATURE_LEN);

        let from_raw = decode_raw(&raw).unwrap();
        assert_eq!(decode_hex(&encode_hex(&from_raw)).unwrap(), from_raw);
        assert_eq!(from_raw, sig);
    }

    #[test]
    fn test_decode_raw_rejects_wrong_length() {
        assert_eq!(
            decode_raw(&[0u8; 128]),
            Err(FormatError::WrongLength {
                expected: SIGNATURE_LEN,
                actual: 128
            })
        );
        assert!(decode_raw(&[0u8; SIGNATURE_LEN + 1]).is_err());
    }

    #[test]
    fn test_decode_hex_rejects_short_block() {
        let err = decode_hex("00ff\n.\n").unwrap_err();
        assert_eq!(
            err,
            FormatError::WrongLength {
                expected: SIGNATURE_LEN,
                actual: 2
            }
        );
    }

    #[test]
    fn test_signature_file_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("content.sig");
        save_signature(&path, &sample()).unwrap();
        assert_eq!(load_signature(&path).unwrap(), sample());
    }
}
