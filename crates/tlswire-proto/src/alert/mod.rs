//! TLS alert protocol.

use std::fmt;

use tlswire_types::TlsError;
use tlswire_utils::codec::Parser;

/// Alert severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AlertLevel {
    Warning = 1,
    Fatal = 2,
}

/// Alert description codes (SSLv3 through TLS 1.2 registry).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AlertDescription {
    CloseNotify = 0,
    UnexpectedMessage = 10,
    BadRecordMac = 20,
    /// Deprecated in TLS 1.2; replaced by BadRecordMac.
    DecryptionFailed = 21,
    RecordOverflow = 22,
    DecompressionFailure = 30,
    HandshakeFailure = 40,
    /// SSLv3 only.
    NoCertificate = 41,
    BadCertificate = 42,
    UnsupportedCertificate = 43,
    CertificateRevoked = 44,
    CertificateExpired = 45,
    CertificateUnknown = 46,
    IllegalParameter = 47,
    UnknownCa = 48,
    AccessDenied = 49,
    DecodeError = 50,
    DecryptError = 51,
    ExportRestriction = 60,
    ProtocolVersion = 70,
    InsufficientSecurity = 71,
    InternalError = 80,
    InappropriateFallback = 86,
    UserCanceled = 90,
    NoRenegotiation = 100,
    UnsupportedExtension = 110,
    UnrecognizedName = 112,
    UnknownPskIdentity = 115,
}

impl AlertLevel {
    /// Convert from u8 to AlertLevel.
    pub fn from_u8(v: u8) -> Result<Self, u8> {
        match v {
            1 => Ok(AlertLevel::Warning),
            2 => Ok(AlertLevel::Fatal),
            _ => Err(v),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AlertLevel::Warning => "warning",
            AlertLevel::Fatal => "fatal",
        }
    }
}

impl AlertDescription {
    /// Convert from u8 to AlertDescription.
    pub fn from_u8(v: u8) -> Result<Self, u8> {
        use AlertDescription::*;
        Ok(match v {
            0 => CloseNotify,
            10 => UnexpectedMessage,
            20 => BadRecordMac,
            21 => DecryptionFailed,
            22 => RecordOverflow,
            30 => DecompressionFailure,
            40 => HandshakeFailure,
            41 => NoCertificate,
            42 => BadCertificate,
            43 => UnsupportedCertificate,
            44 => CertificateRevoked,
            45 => CertificateExpired,
            46 => CertificateUnknown,
            47 => IllegalParameter,
            48 => UnknownCa,
            49 => AccessDenied,
            50 => DecodeError,
            51 => DecryptError,
            60 => ExportRestriction,
            70 => ProtocolVersion,
            71 => InsufficientSecurity,
            80 => InternalError,
            86 => InappropriateFallback,
            90 => UserCanceled,
            100 => NoRenegotiation,
            110 => UnsupportedExtension,
            112 => UnrecognizedName,
            115 => UnknownPskIdentity,
            _ => return Err(v),
        })
    }

    pub fn name(self) -> &'static str {
        use AlertDescription::*;
        match self {
            CloseNotify => "close_notify",
            UnexpectedMessage => "unexpected_message",
            BadRecordMac => "bad_record_mac",
            DecryptionFailed => "decryption_failed",
            RecordOverflow => "record_overflow",
            DecompressionFailure => "decompression_failure",
            HandshakeFailure => "handshake_failure",
            NoCertificate => "no_certificate",
            BadCertificate => "bad_certificate",
            UnsupportedCertificate => "unsupported_certificate",
            CertificateRevoked => "certificate_revoked",
            CertificateExpired => "certificate_expired",
            CertificateUnknown => "certificate_unknown",
            IllegalParameter => "illegal_parameter",
            UnknownCa => "unknown_ca",
            AccessDenied => "access_denied",
            DecodeError => "decode_error",
            DecryptError => "decrypt_error",
            ExportRestriction => "export_restriction",
            ProtocolVersion => "protocol_version",
            InsufficientSecurity => "insufficient_security",
            InternalError => "internal_error",
            InappropriateFallback => "inappropriate_fallback",
            UserCanceled => "user_canceled",
            NoRenegotiation => "no_renegotiation",
            UnsupportedExtension => "unsupported_extension",
            UnrecognizedName => "unrecognized_name",
            UnknownPskIdentity => "unknown_psk_identity",
        }
    }
}

/// A TLS alert message.
///
/// Level and description are kept as raw codes so that alerts with
/// unregistered values survive a decode/encode cycle unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alert {
    pub level: u8,
    pub description: u8,
}

impl Alert {
    /// A fatal alert with the given description.
    pub fn new(description: AlertDescription) -> Self {
        Self::with_level(description, AlertLevel::Fatal)
    }

    pub fn with_level(description: AlertDescription, level: AlertLevel) -> Self {
        Self {
            level: level as u8,
            description: description as u8,
        }
    }

    pub fn level(&self) -> Result<AlertLevel, u8> {
        AlertLevel::from_u8(self.level)
    }

    pub fn description(&self) -> Result<AlertDescription, u8> {
        AlertDescription::from_u8(self.description)
    }

    /// Registry name of the level, or `unknown(N)`.
    pub fn level_name(&self) -> String {
        match self.level() {
            Ok(level) => level.name().to_string(),
            Err(v) => format!("unknown({v})"),
        }
    }

    /// Registry name of the description, or `unknown(N)`.
    pub fn description_name(&self) -> String {
        match self.description() {
            Ok(desc) => desc.name().to_string(),
            Err(v) => format!("unknown({v})"),
        }
    }

    pub fn decode(p: &mut Parser<'_>) -> Result<Self, TlsError> {
        let level = p.read_u8()?;
        let description = p.read_u8()?;
        Ok(Self { level, description })
    }

    pub fn encode(&self) -> Vec<u8> {
        vec![self.level, self.description]
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Alert, level:{}, description:{}",
            self.level_name(),
            self.description_name()
        )
    }
}
