//! # keysign
//!
//! RSA key generation, content signing and signature verification with a
//! compact fixed-width key format.
//!
//! ## Features
//!
//! - **Key Generation**: 512 to 1024-bit RSA key pairs seeded from the OS
//! - **Signing**: MD5 content digest, padded and raised to the private exponent
//! - **Verification**: against one public key, or against a directory of
//!   trusted keys where the first match wins
//! - **Hex Key Files**: fixed-width records, one per file, line oriented
//! - **PEM Interop**: key conversion to and from PKCS#1 / PKCS#8 / SPKI PEM
//!
//! ## Quick Start
//!
//! ```rust
//! use keysign::crypto::generate_key_pair;
//! use keysign::entropy::OsEntropy;
//! use keysign::signing::sign_string;
//! use keysign::verification::verify_string;
//!
//! let pair = generate_key_pair(512, &mut OsEntropy).unwrap();
//! let signature = sign_string("Hello, World!", &pair.private_key).unwrap();
//!
//! assert!(verify_string("Hello, World!", &signature, &pair.public_key).unwrap());
//! assert!(!verify_string("Hello, World?", &signature, &pair.public_key).unwrap());
//! ```
//!
//! ## Error Handling
//!
//! Decoders return [`error::FormatError`], transforms return
//! [`error::CryptoError`], and directory resolution adds
//! [`error::TrustError`]. A signature that simply does not match is
//! `Ok(false)`, never an error.

pub mod bridge;
pub mod crypto;
pub mod digest;
pub mod encoding;
pub mod entropy;
pub mod error;
pub mod key_codec;
pub mod resolver;
pub mod signature_codec;
pub mod signing;
pub mod types;
pub mod verification;

pub use error::{CryptoError, EntropyError, Error, FormatError, TrustError};
pub use types::conversion::{ConversionRequest, Direction, KeyKind};
pub use types::key::{KeyPair, PrivateKey, PublicKey};
pub use types::signature::Signature;
