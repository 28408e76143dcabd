/// Size in bytes of every signature, independent of the key size.
pub const SIGNATURE_LEN: usize = 256;

/// Output of the private-key raw transform, right-aligned in a fixed buffer.
///
/// Carries no key id, timestamp or algorithm tag; it only means something
/// next to the exact content and key it was made with.
#[derive(Clone, PartialEq, Eq)]
pub struct Signature(pub(crate) [u8; SIGNATURE_LEN]);

impl Signature {
    pub fn from_bytes(bytes: [u8; SIGNATURE_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LEN] {
        &self.0
    }
}

impl std::fmt::Debug for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Signature({})", hex::encode(self.0))
    }
}
