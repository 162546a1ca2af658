//! Algorithm identifiers carried in handshake messages, and the digests
//! used to hash ServerKeyExchange parameters.

use digest::DynDigest;
use md5::Md5;
use sha1::Sha1;
use sha2::{Sha224, Sha256, Sha384, Sha512};
use tlswire_types::{InternalError, TlsError};

/// TLS 1.2 HashAlgorithm registry value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct HashAlgorithm(pub u8);

impl HashAlgorithm {
    pub const NONE: Self = Self(0);
    pub const MD5: Self = Self(1);
    pub const SHA1: Self = Self(2);
    pub const SHA224: Self = Self(3);
    pub const SHA256: Self = Self(4);
    pub const SHA384: Self = Self(5);
    pub const SHA512: Self = Self(6);

    fn hasher(self) -> Option<Box<dyn DynDigest>> {
        let h: Box<dyn DynDigest> = match self {
            Self::MD5 => Box::new(Md5::default()),
            Self::SHA1 => Box::new(Sha1::default()),
            Self::SHA224 => Box::new(Sha224::default()),
            Self::SHA256 => Box::new(Sha256::default()),
            Self::SHA384 => Box::new(Sha384::default()),
            Self::SHA512 => Box::new(Sha512::default()),
            _ => return None,
        };
        Some(h)
    }

    /// Digest `data` with this algorithm.
    ///
    /// `NONE` and unregistered values are a caller error.
    pub fn digest(self, data: &[u8]) -> Result<Vec<u8>, TlsError> {
        let mut h = self
            .hasher()
            .ok_or(InternalError::InvalidHashAlgorithm(self.0))?;
        h.update(data);
        Ok(h.finalize().into_vec())
    }
}

/// TLS 1.2 SignatureAlgorithm registry value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SignatureAlgorithm(pub u8);

impl SignatureAlgorithm {
    pub const ANONYMOUS: Self = Self(0);
    pub const RSA: Self = Self(1);
    pub const DSA: Self = Self(2);
    pub const ECDSA: Self = Self(3);
}

/// A TLS 1.2 (hash, signature) algorithm pair as one 16-bit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SignatureScheme(pub u16);

impl SignatureScheme {
    pub const RSA_PKCS1_MD5: Self = Self(0x0101);
    pub const RSA_PKCS1_SHA1: Self = Self(0x0201);
    pub const RSA_PKCS1_SHA224: Self = Self(0x0301);
    pub const RSA_PKCS1_SHA256: Self = Self(0x0401);
    pub const RSA_PKCS1_SHA384: Self = Self(0x0501);
    pub const RSA_PKCS1_SHA512: Self = Self(0x0601);
    pub const DSA_SHA1: Self = Self(0x0202);
    pub const ECDSA_SHA1: Self = Self(0x0203);
    pub const ECDSA_SECP256R1_SHA256: Self = Self(0x0403);
    pub const ECDSA_SECP384R1_SHA384: Self = Self(0x0503);
    pub const ECDSA_SECP521R1_SHA512: Self = Self(0x0603);

    pub const fn new(hash: HashAlgorithm, signature: SignatureAlgorithm) -> Self {
        Self(((hash.0 as u16) << 8) | signature.0 as u16)
    }

    pub const fn hash(self) -> HashAlgorithm {
        HashAlgorithm((self.0 >> 8) as u8)
    }

    pub const fn signature(self) -> SignatureAlgorithm {
        SignatureAlgorithm(self.0 as u8)
    }
}

/// Named group identifiers (RFC 4492 / RFC 7919).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NamedGroup(pub u16);

impl NamedGroup {
    pub const SECP192R1: Self = Self(0x0013);
    pub const SECP224R1: Self = Self(0x0015);
    pub const SECP256R1: Self = Self(0x0017);
    pub const SECP384R1: Self = Self(0x0018);
    pub const SECP521R1: Self = Self(0x0019);
    pub const X25519: Self = Self(0x001D);
    pub const X448: Self = Self(0x001E);
    pub const FFDHE2048: Self = Self(0x0100);
    pub const FFDHE3072: Self = Self(0x0101);
    pub const FFDHE4096: Self = Self(0x0102);
}

/// ECParameters curve_type selector (RFC 4492 Section 5.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EcCurveType(pub u8);

impl EcCurveType {
    pub const EXPLICIT_PRIME: Self = Self(1);
    pub const EXPLICIT_CHAR2: Self = Self(2);
    pub const NAMED_CURVE: Self = Self(3);
}

/// Legacy (pre-TLS 1.2) signed-parameter hash: MD5 followed by SHA-1.
pub fn md5_sha1(data: &[u8]) -> Result<Vec<u8>, TlsError> {
    let mut out = HashAlgorithm::MD5.digest(data)?;
    out.extend(HashAlgorithm::SHA1.digest(data)?);
    Ok(out)
}
