use std::fs::File;
use std::io;
use std::path::Path;

use md5::{Digest, Md5};

use crate::error::CryptoError;

/// Longest string, in bytes, accepted as signed string content.
pub const MAX_STRING_CONTENT_LEN: usize = 511;

/// Content to be signed or verified.
///
/// Both variants feed the same digest, so a file and a string with identical
/// bytes produce identical signatures.
#[derive(Debug, Clone, Copy)]
pub enum Content<'a> {
    File(&'a Path),
    Bytes(&'a [u8]),
}

impl<'a> Content<'a> {
    /// String content, cut to `MAX_STRING_CONTENT_LEN` bytes.
    pub fn bounded_text(text: &'a str) -> Self {
        let bytes = text.as_bytes();
        Content::Bytes(&bytes[..bytes.len().min(MAX_STRING_CONTENT_LEN)])
    }
}

/// MD5 digest of some content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentDigest([u8; 16]);

impl ContentDigest {
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Lowercase hex form; these 32 ASCII bytes are what gets padded and signed.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

/// Hash the given content. Files are streamed rather than read whole.
pub fn content_digest(content: &Content<'_>) -> Result<ContentDigest, CryptoError> {
    let mut hasher = Md5::new();
    match content {
        Content::File(path) => {
            let to_err = |source| CryptoError::Content {
                path: path.to_path_buf(),
                source,
            };
            let mut file = File::open(path).map_err(to_err)?;
            io::copy(&mut file, &mut hasher).map_err(to_err)?;
        }
        Content::Bytes(bytes) => hasher.update(bytes),
    }
    Ok(ContentDigest(hasher.finalize().into()))
}
