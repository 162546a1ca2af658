use crate::version::ProtocolVersion;

/// Big number and randomness errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CryptoError {
    #[error("invalid argument")]
    InvalidArg,
    #[error("big number: division by zero")]
    BnDivisionByZero,
    #[error("big number: random generation failed")]
    BnRandGenFail,
    #[error("big number: prime generation failed")]
    BnPrimeGenFail,
}

/// Reason a received ServerHello was refused by the verifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("extension 0x{0:04x} was not advertised by the client")]
    ExtensionNotAdvertised(u16),
    #[error("extension 0x{0:04x} appears more than once")]
    DuplicateExtension(u16),
    #[error("cipher suite 0x{0:04x} was not offered")]
    SuiteNotOffered(u32),
    #[error("compression method {0} was not offered")]
    CompressionNotOffered(u8),
    #[error("server version {server} is newer than offered {client}")]
    VersionNewerThanOffered {
        server: ProtocolVersion,
        client: ProtocolVersion,
    },
    #[error("server version {version} outside of configured range {min}..={max}")]
    VersionOutOfPolicy {
        version: ProtocolVersion,
        min: ProtocolVersion,
        max: ProtocolVersion,
    },
    #[error("certificate type {0} was not offered")]
    CertificateTypeNotOffered(u8),
}

/// Faults caused by the calling code rather than by bytes off the wire.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InternalError {
    #[error("cipher suite 0x{0:04x} has no codec for this key exchange message")]
    UnknownCipherSuite(u32),
    #[error("protocol version not set")]
    MissingVersion,
    #[error("invalid hash algorithm selector {0}")]
    InvalidHashAlgorithm(u8),
    #[error("extension 0x{0:04x} present more than once")]
    DuplicateExtension(u16),
    #[error("{field}: value {value} exceeds maximum {max}")]
    ValueOutOfRange {
        field: &'static str,
        value: usize,
        max: usize,
    },
    #[error("server selected a certificate type but the client hello carries no cert_type extension")]
    MissingClientCertType,
    #[error("signature algorithm not set")]
    MissingSignatureAlgorithm,
    #[error("key exchange parameters do not match cipher suite 0x{0:04x}")]
    KeyExchangeMismatch(u32),
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}

/// TLS codec and negotiation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TlsError {
    #[error("out of data: need {need} bytes, {remaining} remaining")]
    OutOfData { need: usize, remaining: usize },
    #[error("length mismatch: declared {declared} bytes, body spans {actual}")]
    LengthMismatch { declared: usize, actual: usize },
    #[error("illegal value: {0}")]
    IllegalValue(String),
    #[error("illegal parameter: {0}")]
    IllegalParameter(Rejection),
    #[error("protocol version: {0}")]
    ProtocolVersion(Rejection),
    #[error("internal error: {0}")]
    Internal(#[from] InternalError),
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),
}

impl TlsError {
    /// True for faults raised by the caller's own usage rather than by the peer.
    pub fn is_internal(&self) -> bool {
        matches!(self, TlsError::Internal(_) | TlsError::Crypto(_))
    }
}
