use rsa::BigUint;

use crate::error::FormatError;

/// Smallest supported modulus size in bits.
pub const MIN_KEY_BITS: u32 = 512;

/// Largest supported modulus size in bits.
pub const MAX_KEY_BITS: u32 = 1024;

/// Width in bytes reserved for the modulus and for each exponent.
pub const MODULUS_LEN: usize = (MAX_KEY_BITS as usize + 7) / 8;

/// Width in bytes reserved for each prime factor.
pub const PRIME_LEN: usize = MODULUS_LEN / 2;

/// Bit length assumed for public keys whose standard encoding does not state one.
pub const DEFAULT_PUBLIC_KEY_BITS: u32 = 1024;

/// Public exponent used for newly generated keys.
pub const RSA_PUBLIC_EXPONENT: u32 = 65537;

/// An RSA public key in the fixed-width internal layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    pub(crate) bits: u32,
    pub(crate) modulus: [u8; MODULUS_LEN],
    pub(crate) exponent: [u8; MODULUS_LEN],
}

/// An RSA private key in the fixed-width internal layout.
///
/// Shares its modulus and public exponent with the matching [`PublicKey`].
/// The prime factors are kept so the key can be written out in a standard
/// encoding without refactoring the modulus.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey {
    pub(crate) bits: u32,
    pub(crate) modulus: [u8; MODULUS_LEN],
    pub(crate) private_exponent: [u8; MODULUS_LEN],
    pub(crate) public_exponent: [u8; MODULUS_LEN],
    pub(crate) primes: [[u8; PRIME_LEN]; 2],
}

/// A freshly generated key pair.
#[derive(Debug, Clone)]
pub struct KeyPair {
    pub private_key: PrivateKey,
    pub public_key: PublicKey,
}

impl PublicKey {
    /// Build a public key from its numeric fields.
    pub fn from_components(
        bits: u32,
        modulus: &BigUint,
        exponent: &BigUint,
    ) -> Result<Self, FormatError> {
        check_bits(bits)?;
        Ok(Self {
            bits,
            modulus: fixed_width(modulus, "modulus")?,
            exponent: fixed_width(exponent, "public exponent")?,
        })
    }

    pub fn bits(&self) -> u32 {
        self.bits
    }

    pub fn modulus(&self) -> BigUint {
        BigUint::from_bytes_be(&self.modulus)
    }

    pub fn exponent(&self) -> BigUint {
        BigUint::from_bytes_be(&self.exponent)
    }
}

impl PrivateKey {
    /// Build a private key from its numeric fields.
    pub fn from_components(
        bits: u32,
        modulus: &BigUint,
        private_exponent: &BigUint,
        public_exponent: &BigUint,
        primes: [&BigUint; 2],
    ) -> Result<Self, FormatError> {
        check_bits(bits)?;
        Ok(Self {
            bits,
            modulus: fixed_width(modulus, "modulus")?,
            private_exponent: fixed_width(private_exponent, "private exponent")?,
            public_exponent: fixed_width(public_exponent, "public exponent")?,
            primes: [
                fixed_width(primes[0], "prime factor")?,
                fixed_width(primes[1], "prime factor")?,
            ],
        })
    }

    pub fn bits(&self) -> u32 {
        self.bits
    }

    pub fn modulus(&self) -> BigUint {
        BigUint::from_bytes_be(&self.modulus)
    }

    pub fn private_exponent(&self) -> BigUint {
        BigUint::from_bytes_be(&self.private_exponent)
    }

    pub fn public_exponent(&self) -> BigUint {
        BigUint::from_bytes_be(&self.public_exponent)
    }

    pub fn primes(&self) -> [BigUint; 2] {
        [
            BigUint::from_bytes_be(&self.primes[0]),
            BigUint::from_bytes_be(&self.primes[1]),
        ]
    }

    /// The public half of this key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            bits: self.bits,
            modulus: self.modulus,
            exponent: self.public_exponent,
        }
    }
}

// Secret fields stay out of logs.
impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKey")
            .field("bits", &self.bits)
            .field("modulus", &hex::encode(self.modulus))
            .finish_non_exhaustive()
    }
}

/// Reject bit lengths outside `MIN_KEY_BITS..=MAX_KEY_BITS`.
pub fn check_bits(bits: u32) -> Result<(), FormatError> {
    if (MIN_KEY_BITS..=MAX_KEY_BITS).contains(&bits) {
        Ok(())
    } else {
        Err(FormatError::BitsOutOfRange(bits))
    }
}

/// Big-endian bytes of `value`, left zero-filled to `N`.
pub(crate) fn fixed_width<const N: usize>(
    value: &BigUint,
    field: &'static str,
) -> Result<[u8; N], FormatError> {
    let bytes = value.to_bytes_be();
    // to_bytes_be() yields [0] for zero
    let first = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    let bytes = &bytes[first..];
    if bytes.len() > N {
        return Err(FormatError::FieldTooWide {
            field,
            max: N,
            actual: bytes.len(),
        });
    }
    let mut out = [0u8; N];
    out[N - bytes.len()..].copy_from_slice(bytes);
    Ok(out)
}
