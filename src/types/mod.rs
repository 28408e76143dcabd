//! Immutable value records shared by the codecs, the signer and the verifier.

pub mod conversion;
pub mod key;
pub mod signature;
