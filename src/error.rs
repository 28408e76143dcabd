use std::path::PathBuf;

use thiserror::Error;

/// Crate-level error. Each variant wraps one member of the failure taxonomy so
/// call sites can tell a malformed input from a failed transform.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Entropy error: {0}")]
    Entropy(#[from] EntropyError),

    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("Trust error: {0}")]
    Trust(#[from] TrustError),

    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Wrap an I/O failure together with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

/// The platform randomness source could not supply seed material.
#[derive(Debug, Error)]
pub enum EntropyError {
    #[error("platform randomness source unavailable: {0}")]
    Unavailable(String),

    #[error("short read from randomness source: wanted {wanted} bytes, got {got}")]
    ShortRead { wanted: usize, got: usize },
}

/// Malformed text, length or structure on decode.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("invalid hex digit {0:?}")]
    InvalidHex(char),

    #[error("odd number of hex digits")]
    OddHexLength,

    #[error("missing '.' terminator line")]
    MissingTerminator,

    #[error("missing bit length line")]
    MissingBits,

    #[error("invalid bit length line {0:?}")]
    InvalidBits(String),

    #[error("bit length {0} outside supported range 512..=1024")]
    BitsOutOfRange(u32),

    #[error("bit length {bits} is smaller than the {modulus_bits}-bit modulus")]
    BitsBelowModulus { bits: u32, modulus_bits: usize },

    #[error("wrong record length: expected {expected} bytes, got {actual}")]
    WrongLength { expected: usize, actual: usize },

    #[error("{field} needs {actual} bytes but only {max} fit")]
    FieldTooWide {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    #[error("expected 2 prime factors, found {0}")]
    UnsupportedPrimeCount(usize),

    #[error("input is not UTF-8 text")]
    NotText,

    #[error("unrecognized conversion token {0:?}")]
    UnknownToken(String),

    #[error("PEM error: {0}")]
    Pem(String),
}

/// The raw transform failed, or structurally valid inputs were unusable.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("cannot read content {}: {source}", .path.display())]
    Content {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("modulus is zero, even, or too small for the padding block")]
    InvalidModulus,

    #[error("exponent is zero")]
    InvalidExponent,

    #[error("transform input is not smaller than the modulus")]
    InputOutOfRange,

    #[error("unsupported key size {0}: must be within 512..=1024 bits")]
    UnsupportedKeySize(u32),

    #[error("malformed padding block")]
    Padding,

    #[error("key rejected by RSA primitive: {0}")]
    Rsa(String),
}

impl From<rsa::Error> for CryptoError {
    fn from(err: rsa::Error) -> Self {
        CryptoError::Rsa(err.to_string())
    }
}

/// Outcome of a trust-directory resolution that found no usable key.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrustError {
    #[error("no trusted key verifies the signature")]
    NoMatch,

    #[error("no decodable public keys in {0}")]
    EmptyDirectory(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_are_single_line() {
        let errors: Vec<Error> = vec![
            EntropyError::ShortRead { wanted: 32, got: 4 }.into(),
            FormatError::WrongLength {
                expected: 256,
                actual: 12,
            }
            .into(),
            CryptoError::InvalidModulus.into(),
            TrustError::NoMatch.into(),
            Error::io(
                "/nonexistent",
                std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
            ),
        ];
        for err in errors {
            assert!(!err.to_string().contains('\n'), "{}", err);
        }
    }

    #[test]
    fn test_trust_error_wraps() {
        let err: Error = TrustError::EmptyDirectory("certs".to_string()).into();
        assert!(matches!(
            err,
            Error::Trust(TrustError::EmptyDirectory(ref location)) if location == "certs"
        ));
        assert_eq!(
            err.to_string(),
            "Trust error: no decodable public keys in certs"
        );
    }
}
