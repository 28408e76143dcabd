//! Trust-anchor resolution.
//!
//! Verifies a signature against a flat set of trusted public keys and reports
//! the first one that accepts it. Candidates are independent; no issuer or
//! subject relationship between them is inspected.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::bridge;
use crate::crypto::key_id;
use crate::digest::{content_digest, Content};
use crate::error::{Error, TrustError};
use crate::key_codec;
use crate::types::key::PublicKey;
use crate::types::signature::Signature;
use crate::verification::verify_digest;

/// A trusted public key and the name it is known by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustAnchor {
    /// File name for directory anchors, caller-chosen otherwise.
    pub identity: String,
    pub path: Option<PathBuf>,
    pub key: PublicKey,
}

impl TrustAnchor {
    pub fn new(identity: &str, key: PublicKey) -> Self {
        Self {
            identity: identity.to_string(),
            path: None,
            key,
        }
    }
}

// ---------------------------------------------------------------------------
// Anchor sources
// ---------------------------------------------------------------------------

/// Supplies candidate trust anchors in a fixed order.
pub trait TrustAnchorSource {
    /// Load every usable candidate. Unusable entries are skipped, not fatal.
    fn load_anchors(&self) -> Result<Vec<TrustAnchor>, Error>;

    /// Where the anchors come from, for diagnostics.
    fn location(&self) -> String;
}

/// Public-key files in a directory, visited in file-name order.
///
/// Each regular file is decoded as a hex public key, or failing that as a PEM
/// public key. Subdirectories and dot-files are ignored.
pub struct DirectoryAnchors {
    dir: PathBuf,
}

impl DirectoryAnchors {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }
}

impl TrustAnchorSource for DirectoryAnchors {
    fn load_anchors(&self) -> Result<Vec<TrustAnchor>, Error> {
        let mut entries: Vec<fs::DirEntry> = fs::read_dir(&self.dir)
            .map_err(|e| Error::io(&self.dir, e))?
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(dir = %self.dir.display(), error = %e, "skipping unreadable entry");
                    None
                }
            })
            .collect();
        entries.sort_by_key(|e| e.file_name());

        let mut anchors = Vec::new();
        for entry in entries {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }
            let path = entry.path();
            // follows symlinks, unlike DirEntry::file_type
            if !path.is_file() {
                continue;
            }
            match read_candidate(&path) {
                Ok(key) => anchors.push(TrustAnchor {
                    identity: name,
                    path: Some(path),
                    key,
                }),
                Err(e) => warn!(candidate = %path.display(), error = %e, "skipping candidate"),
            }
        }
        Ok(anchors)
    }

    fn location(&self) -> String {
        self.dir.display().to_string()
    }
}

fn read_candidate(path: &Path) -> Result<PublicKey, Error> {
    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    if text.contains("-----BEGIN") {
        return bridge::public_key_from_pem(&text);
    }
    Ok(key_codec::decode_hex(&text)?)
}

/// A fixed, in-memory list of anchors, tried in the given order.
pub struct AnchorSet {
    anchors: Vec<TrustAnchor>,
}

impl AnchorSet {
    pub fn new(anchors: Vec<TrustAnchor>) -> Self {
        Self { anchors }
    }
}

impl TrustAnchorSource for AnchorSet {
    fn load_anchors(&self) -> Result<Vec<TrustAnchor>, Error> {
        Ok(self.anchors.clone())
    }

    fn location(&self) -> String {
        "in-memory anchor set".to_string()
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Return the first anchor under which `signature` verifies over `content`.
///
/// The content is hashed once. A candidate whose key the transform rejects
/// is logged and skipped. Fails with [`TrustError::EmptyDirectory`] when the
/// source yields no candidates and [`TrustError::NoMatch`] when none verifies.
pub fn resolve(
    content: &Content<'_>,
    signature: &Signature,
    source: &dyn TrustAnchorSource,
) -> Result<TrustAnchor, Error> {
    let anchors = source.load_anchors()?;
    if anchors.is_empty() {
        return Err(TrustError::EmptyDirectory(source.location()).into());
    }

    let digest = content_digest(content)?;
    for anchor in anchors {
        match verify_digest(&digest, signature, &anchor.key) {
            Ok(true) => {
                match key_id(&anchor.key) {
                    Ok(id) => info!(identity = %anchor.identity, key_id = %id, "signature verified"),
                    Err(_) => info!(identity = %anchor.identity, "signature verified"),
                }
                return Ok(anchor);
            }
            Ok(false) => debug!(identity = %anchor.identity, "no match"),
            Err(e) => warn!(identity = %anchor.identity, error = %e, "candidate key unusable"),
        }
    }
    Err(TrustError::NoMatch.into())
}

/// [`resolve`] over the public keys stored in `dir`.
pub fn resolve_in_directory(
    content: &Content<'_>,
    signature: &Signature,
    dir: &Path,
) -> Result<TrustAnchor, Error> {
    resolve(content, signature, &DirectoryAnchors::new(dir))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
