use std::fs;
use std::io;
use std::path::Path;

use keysign::crypto::{decrypt_public, encrypt_private, generate_key_pair};
use keysign::digest::Content;
use keysign::entropy::OsEntropy;
use keysign::{bridge, key_codec, resolver, signature_codec, signing, verification};
use keysign::{ConversionRequest, Direction, Error, PrivateKey, PublicKey};
use tracing::debug;

/// Plaintext used by the encrypt/decrypt self-test.
const TEST_CRYPT_MESSAGE: &[u8] = b"encryption test successful";

/// Result of a command that ran to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// The command ran but its check failed (invalid signature).
    Rejected,
}

pub fn genkey(bits: u32, private_path: &Path, public_path: &Path) -> Result<Outcome, Error> {
    println!(
        "creating keys in {} and {}",
        private_path.display(),
        public_path.display()
    );
    let pair = generate_key_pair(bits, &mut OsEntropy)?;
    key_codec::save_key(private_path, &pair.private_key)?;
    key_codec::save_key(public_path, &pair.public_key)?;
    Ok(Outcome::Success)
}

pub fn sign(file: &Path, private_path: &Path) -> Result<Outcome, Error> {
    let key: PrivateKey = key_codec::load_key(private_path)?;
    let signature = signing::sign_file(file, &key)?;
    print!("{}", signature_codec::encode_hex(&signature));
    Ok(Outcome::Success)
}

pub fn sign_string(text: &str, private_path: &Path) -> Result<Outcome, Error> {
    let key: PrivateKey = key_codec::load_key(private_path)?;
    let signature = signing::sign_string(text, &key)?;
    print!("{}", signature_codec::encode_hex(&signature));
    Ok(Outcome::Success)
}

pub fn verify(file: &Path, signature_path: &Path, public_path: &Path) -> Result<Outcome, Error> {
    let key: PublicKey = key_codec::load_key(public_path)?;
    let signature = signature_codec::load_signature(signature_path)?;
    let valid = verification::verify_file(file, &signature, &key)?;
    Ok(report(valid))
}

pub fn verify_string(text: &str, signature_path: &Path, public_path: &Path) -> Result<Outcome, Error> {
    let key: PublicKey = key_codec::load_key(public_path)?;
    let signature = signature_codec::load_signature(signature_path)?;
    let valid = verification::verify_string(text, &signature, &key)?;
    Ok(report(valid))
}

fn report(valid: bool) -> Outcome {
    if valid {
        println!("signature is valid");
        Outcome::Success
    } else {
        println!("signature is invalid");
        Outcome::Rejected
    }
}

pub fn test_crypt(private_path: &Path, public_path: &Path) -> Result<Outcome, Error> {
    let private_key: PrivateKey = key_codec::load_key(private_path)?;
    let public_key: PublicKey = key_codec::load_key(public_path)?;

    let ciphertext = encrypt_private(&private_key, TEST_CRYPT_MESSAGE)?;
    let plaintext = decrypt_public(&public_key, &ciphertext)?;
    println!("out: {}", String::from_utf8_lossy(&plaintext));
    Ok(Outcome::Success)
}

pub fn convkey(request: ConversionRequest, input: &Path, output: &Path) -> Result<Outcome, Error> {
    bridge::convert_key_file(request, input, output)?;
    debug!(output = %output.display(), "key written");
    Ok(Outcome::Success)
}

pub fn convsig(direction: Direction, input: &Path, output: &Path) -> Result<Outcome, Error> {
    bridge::convert_signature_file(direction, input, output)?;
    debug!(output = %output.display(), "signature written");
    Ok(Outcome::Success)
}

/// The CA directory must exist but is not consulted: candidates in
/// `cert_dir` are trusted as they are.
pub fn cert_verify(
    file: &Path,
    signature_path: &Path,
    cert_dir: &Path,
    ca_dir: &Path,
) -> Result<Outcome, Error> {
    let meta = fs::metadata(ca_dir).map_err(|e| Error::io(ca_dir, e))?;
    if !meta.is_dir() {
        return Err(Error::io(
            ca_dir,
            io::Error::new(io::ErrorKind::InvalidInput, "not a directory"),
        ));
    }

    debug!(ca_dir = %ca_dir.display(), "chain validation not performed");

    let signature = signature_codec::load_signature(signature_path)?;
    let anchor = resolver::resolve_in_directory(&Content::File(file), &signature, cert_dir)?;
    println!("signature verified using certificate '{}'", anchor.identity);
    Ok(Outcome::Success)
}

#[cfg(test)]
mod tests {
    use super::*;
    use keysign::digest::MAX_STRING_CONTENT_LEN;
    use keysign::{KeyPair, TrustError};
    use std::path::PathBuf;
    use tempfile::{tempdir, TempDir};

    struct Workspace {
        dir: TempDir,
        pair: KeyPair,
    }

    impl Workspace {
        fn new() -> Self {
            let dir = tempdir().unwrap();
            genkey(512, &dir.path().join("private.key"), &dir.path().join("public.key")).unwrap();
            let pair = KeyPair {
                private_key: key_codec::load_key(&dir.path().join("private.key")).unwrap(),
                public_key: key_codec::load_key(&dir.path().join("public.key")).unwrap(),
            };
            Self { dir, pair }
        }

        fn path(&self, name: &str) -> PathBuf {
            self.dir.path().join(name)
        }

        fn string_signature(&self, text: &str) -> PathBuf {
            let path = self.path("string.sig");
            let signature = signing::sign_string(text, &self.pair.private_key).unwrap();
            signature_codec::save_signature(&path, &signature).unwrap();
            path
        }
    }

    #[test]
    fn test_genkey_writes_matching_pair() {
        let ws = Workspace::new();
        assert_eq!(ws.pair.private_key.public_key(), ws.pair.public_key);
        assert_eq!(ws.pair.public_key.bits(), 512);
    }

    #[test]
    fn test_verify_string_outcomes() {
        let ws = Workspace::new();
        let sig = ws.string_signature("encryption test successful");
        let public = ws.path("public.key");

        assert_eq!(
            verify_string("encryption test successful", &sig, &public).unwrap(),
            Outcome::Success
        );
        assert_eq!(
            verify_string("encryption test successfuL", &sig, &public).unwrap(),
            Outcome::Rejected
        );
    }

    #[test]
    fn test_verify_string_uses_signing_bound() {
        let ws = Workspace::new();
        let prefix = "z".repeat(MAX_STRING_CONTENT_LEN);
        let sig = ws.string_signature(&prefix);

        let long = format!("{}ignored", prefix);
        assert_eq!(
            verify_string(&long, &sig, &ws.path("public.key")).unwrap(),
            Outcome::Success
        );
    }

    #[test]
    fn test_verify_file_outcomes() {
        let ws = Workspace::new();
        let content = ws.path("release.tar.gz");
        fs::write(&content, b"release bytes").unwrap();
        let sig = ws.path("release.sig");
        let signature = signing::sign_file(&content, &ws.pair.private_key).unwrap();
        signature_codec::save_signature(&sig, &signature).unwrap();

        assert_eq!(
            verify(&content, &sig, &ws.path("public.key")).unwrap(),
            Outcome::Success
        );
        fs::write(&content, b"release bytes!").unwrap();
        assert_eq!(
            verify(&content, &sig, &ws.path("public.key")).unwrap(),
            Outcome::Rejected
        );
    }

    #[test]
    fn test_missing_inputs_are_errors() {
        let ws = Workspace::new();
        let err = verify_string("x", &ws.path("absent.sig"), &ws.path("public.key")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));

        let err = sign(&ws.path("absent.txt"), &ws.path("private.key")).unwrap_err();
        assert!(matches!(err, Error::Crypto(_)));
    }

    #[test]
    fn test_test_crypt_round_trips() {
        let ws = Workspace::new();
        assert_eq!(
            test_crypt(&ws.path("private.key"), &ws.path("public.key")).unwrap(),
            Outcome::Success
        );
    }

    fn cert_setup(ws: &Workspace) -> (PathBuf, PathBuf, PathBuf) {
        let content = ws.path("payload.txt");
        fs::write(&content, b"payload").unwrap();
        let sig = ws.path("payload.sig");
        let signature = signing::sign_file(&content, &ws.pair.private_key).unwrap();
        signature_codec::save_signature(&sig, &signature).unwrap();

        let certs = ws.path("certs");
        fs::create_dir(&certs).unwrap();
        (content, sig, certs)
    }

    #[test]
    fn test_cert_verify_requires_ca_directory() {
        let ws = Workspace::new();
        let (content, sig, certs) = cert_setup(&ws);
        key_codec::save_key(&certs.join("signer.pub"), &ws.pair.public_key).unwrap();

        let err = cert_verify(&content, &sig, &certs, &ws.path("no_such_ca")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));

        let err = cert_verify(&content, &sig, &certs, &content).unwrap_err();
        assert!(matches!(err, Error::Io { ref path, .. } if path == &content));
    }

    #[test]
    fn test_cert_verify_resolves_signer() {
        let ws = Workspace::new();
        let (content, sig, certs) = cert_setup(&ws);
        let ca = ws.path("ca");
        fs::create_dir(&ca).unwrap();

        let err = cert_verify(&content, &sig, &certs, &ca).unwrap_err();
        assert!(matches!(err, Error::Trust(TrustError::EmptyDirectory(_))));

        key_codec::save_key(&certs.join("signer.pub"), &ws.pair.public_key).unwrap();
        assert_eq!(
            cert_verify(&content, &sig, &certs, &ca).unwrap(),
            Outcome::Success
        );
    }
}
