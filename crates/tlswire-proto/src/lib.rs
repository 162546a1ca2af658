#![forbid(unsafe_code)]
#![doc = "TLS/SSL handshake message codecs and ServerHello verification for tlswire."]

pub mod alert;
pub mod config;
pub mod crypt;
pub mod extensions;
pub mod handshake;
pub mod record;

pub use tlswire_types::{InternalError, ProtocolVersion, Rejection, TlsError};

/// Cipher suite identifier.
///
/// SSLv3+ suites are 16-bit; SSLv2 cipher kinds are 24-bit, so the value
/// is held as `u32`. An SSLv3+ suite appears in SSLv2 cipher-spec lists
/// with a zero top byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct CipherSuite(pub u32);

impl CipherSuite {
    pub const TLS_NULL_WITH_NULL_NULL: Self = Self(0x0000);

    // Signaling values
    pub const TLS_EMPTY_RENEGOTIATION_INFO_SCSV: Self = Self(0x00FF);
    pub const TLS_FALLBACK_SCSV: Self = Self(0x5600);

    // RSA key exchange
    pub const TLS_RSA_WITH_NULL_MD5: Self = Self(0x0001);
    pub const TLS_RSA_WITH_NULL_SHA: Self = Self(0x0002);
    pub const TLS_RSA_WITH_RC4_128_MD5: Self = Self(0x0004);
    pub const TLS_RSA_WITH_RC4_128_SHA: Self = Self(0x0005);
    pub const TLS_RSA_WITH_3DES_EDE_CBC_SHA: Self = Self(0x000A);
    pub const TLS_RSA_WITH_AES_128_CBC_SHA: Self = Self(0x002F);
    pub const TLS_RSA_WITH_AES_256_CBC_SHA: Self = Self(0x0035);
    pub const TLS_RSA_WITH_NULL_SHA256: Self = Self(0x003B);
    pub const TLS_RSA_WITH_AES_128_CBC_SHA256: Self = Self(0x003C);
    pub const TLS_RSA_WITH_AES_256_CBC_SHA256: Self = Self(0x003D);
    pub const TLS_RSA_WITH_AES_128_GCM_SHA256: Self = Self(0x009C);
    pub const TLS_RSA_WITH_AES_256_GCM_SHA384: Self = Self(0x009D);

    // Ephemeral DH, RSA-signed
    pub const TLS_DHE_RSA_WITH_3DES_EDE_CBC_SHA: Self = Self(0x0016);
    pub const TLS_DHE_RSA_WITH_AES_128_CBC_SHA: Self = Self(0x0033);
    pub const TLS_DHE_RSA_WITH_AES_256_CBC_SHA: Self = Self(0x0039);
    pub const TLS_DHE_RSA_WITH_AES_128_CBC_SHA256: Self = Self(0x0067);
    pub const TLS_DHE_RSA_WITH_AES_256_CBC_SHA256: Self = Self(0x006B);
    pub const TLS_DHE_RSA_WITH_AES_128_GCM_SHA256: Self = Self(0x009E);
    pub const TLS_DHE_RSA_WITH_AES_256_GCM_SHA384: Self = Self(0x009F);
    pub const TLS_DHE_RSA_WITH_CHACHA20_POLY1305_SHA256: Self = Self(0xCCAA);

    // Anonymous DH
    pub const TLS_DH_ANON_WITH_RC4_128_MD5: Self = Self(0x0018);
    pub const TLS_DH_ANON_WITH_3DES_EDE_CBC_SHA: Self = Self(0x001B);
    pub const TLS_DH_ANON_WITH_AES_128_CBC_SHA: Self = Self(0x0034);
    pub const TLS_DH_ANON_WITH_AES_256_CBC_SHA: Self = Self(0x003A);
    pub const TLS_DH_ANON_WITH_AES_128_CBC_SHA256: Self = Self(0x006C);
    pub const TLS_DH_ANON_WITH_AES_256_CBC_SHA256: Self = Self(0x006D);
    pub const TLS_DH_ANON_WITH_AES_128_GCM_SHA256: Self = Self(0x00A6);
    pub const TLS_DH_ANON_WITH_AES_256_GCM_SHA384: Self = Self(0x00A7);

    // SRP (RFC 5054)
    pub const TLS_SRP_SHA_WITH_3DES_EDE_CBC_SHA: Self = Self(0xC01A);
    pub const TLS_SRP_SHA_RSA_WITH_3DES_EDE_CBC_SHA: Self = Self(0xC01B);
    pub const TLS_SRP_SHA_WITH_AES_128_CBC_SHA: Self = Self(0xC01D);
    pub const TLS_SRP_SHA_RSA_WITH_AES_128_CBC_SHA: Self = Self(0xC01E);
    pub const TLS_SRP_SHA_WITH_AES_256_CBC_SHA: Self = Self(0xC020);
    pub const TLS_SRP_SHA_RSA_WITH_AES_256_CBC_SHA: Self = Self(0xC021);

    // ECDHE, ECDSA-signed
    pub const TLS_ECDHE_ECDSA_WITH_AES_128_CBC_SHA: Self = Self(0xC009);
    pub const TLS_ECDHE_ECDSA_WITH_AES_256_CBC_SHA: Self = Self(0xC00A);
    pub const TLS_ECDHE_ECDSA_WITH_AES_128_GCM_SHA256: Self = Self(0xC02B);
    pub const TLS_ECDHE_ECDSA_WITH_AES_256_GCM_SHA384: Self = Self(0xC02C);
    pub const TLS_ECDHE_ECDSA_WITH_CHACHA20_POLY1305_SHA256: Self = Self(0xCCA9);

    // ECDHE, RSA-signed
    pub const TLS_ECDHE_RSA_WITH_NULL_SHA: Self = Self(0xC010);
    pub const TLS_ECDHE_RSA_WITH_RC4_128_SHA: Self = Self(0xC011);
    pub const TLS_ECDHE_RSA_WITH_3DES_EDE_CBC_SHA: Self = Self(0xC012);
    pub const TLS_ECDHE_RSA_WITH_AES_128_CBC_SHA: Self = Self(0xC013);
    pub const TLS_ECDHE_RSA_WITH_AES_256_CBC_SHA: Self = Self(0xC014);
    pub const TLS_ECDHE_RSA_WITH_AES_128_CBC_SHA256: Self = Self(0xC027);
    pub const TLS_ECDHE_RSA_WITH_AES_256_CBC_SHA384: Self = Self(0xC028);
    pub const TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256: Self = Self(0xC02F);
    pub const TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384: Self = Self(0xC030);
    pub const TLS_ECDHE_RSA_WITH_CHACHA20_POLY1305_SHA256: Self = Self(0xCCA8);

    // Anonymous ECDH
    pub const TLS_ECDH_ANON_WITH_NULL_SHA: Self = Self(0xC015);
    pub const TLS_ECDH_ANON_WITH_RC4_128_SHA: Self = Self(0xC016);
    pub const TLS_ECDH_ANON_WITH_3DES_EDE_CBC_SHA: Self = Self(0xC017);
    pub const TLS_ECDH_ANON_WITH_AES_128_CBC_SHA: Self = Self(0xC018);
    pub const TLS_ECDH_ANON_WITH_AES_256_CBC_SHA: Self = Self(0xC019);

    // SSLv2 cipher kinds (24-bit)
    pub const SSL_CK_RC4_128_WITH_MD5: Self = Self(0x010080);
    pub const SSL_CK_RC4_128_EXPORT40_WITH_MD5: Self = Self(0x020080);
    pub const SSL_CK_RC2_128_CBC_WITH_MD5: Self = Self(0x030080);
    pub const SSL_CK_RC2_128_CBC_EXPORT40_WITH_MD5: Self = Self(0x040080);
    pub const SSL_CK_IDEA_128_CBC_WITH_MD5: Self = Self(0x050080);
    pub const SSL_CK_DES_64_CBC_WITH_MD5: Self = Self(0x060040);
    pub const SSL_CK_DES_192_EDE3_CBC_WITH_MD5: Self = Self(0x0700C0);

    /// True for the 24-bit cipher kinds that only exist in SSLv2.
    pub fn is_ssl2_only(self) -> bool {
        self.0 > 0xFFFF
    }

    /// Key exchange algorithm of this suite, if it is one this crate can
    /// build key exchange messages for.
    pub fn key_exchange(self) -> Option<KeyExchangeAlgorithm> {
        use KeyExchangeAlgorithm::*;
        let kx = match self.0 {
            0x0001 | 0x0002 | 0x0004 | 0x0005 | 0x000A | 0x002F | 0x0035 | 0x003B | 0x003C
            | 0x003D | 0x009C | 0x009D => Rsa,
            0x0016 | 0x0033 | 0x0039 | 0x0067 | 0x006B | 0x009E | 0x009F | 0xCCAA => DheRsa,
            0x0018 | 0x001B | 0x0034 | 0x003A | 0x006C | 0x006D | 0x00A6 | 0x00A7 => DhAnon,
            0xC01A | 0xC01D | 0xC020 => SrpSha,
            0xC01B | 0xC01E | 0xC021 => SrpShaRsa,
            0xC009 | 0xC00A | 0xC02B | 0xC02C | 0xCCA9 => EcdheEcdsa,
            0xC010..=0xC014 | 0xC027 | 0xC028 | 0xC02F | 0xC030 | 0xCCA8 => EcdheRsa,
            0xC015..=0xC019 => EcdhAnon,
            _ => return None,
        };
        Some(kx)
    }
}

/// Key exchange algorithm selected by a cipher suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyExchangeAlgorithm {
    Rsa,
    DheRsa,
    DhAnon,
    SrpSha,
    SrpShaRsa,
    EcdheRsa,
    EcdheEcdsa,
    EcdhAnon,
}

/// Groups of key exchange algorithms sharing a message layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyExchangeFamily {
    Rsa,
    Dh,
    Srp,
    Ecdh,
}

impl KeyExchangeAlgorithm {
    pub fn family(self) -> KeyExchangeFamily {
        match self {
            Self::Rsa => KeyExchangeFamily::Rsa,
            Self::DheRsa | Self::DhAnon => KeyExchangeFamily::Dh,
            Self::SrpSha | Self::SrpShaRsa => KeyExchangeFamily::Srp,
            Self::EcdheRsa | Self::EcdheEcdsa | Self::EcdhAnon => KeyExchangeFamily::Ecdh,
        }
    }

    /// True when the ServerKeyExchange for this algorithm carries a signature.
    pub fn is_signed(self) -> bool {
        matches!(
            self,
            Self::DheRsa | Self::SrpShaRsa | Self::EcdheRsa | Self::EcdheEcdsa
        )
    }
}

/// Certificate type negotiated through the `cert_type` extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CertificateType(pub u8);

impl CertificateType {
    pub const X509: Self = Self(0);
    pub const OPENPGP: Self = Self(1);
}
