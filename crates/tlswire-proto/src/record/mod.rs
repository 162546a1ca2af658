//! Record headers for SSLv2 and SSLv3+ framing.

use std::fmt;

use tlswire_types::{InternalError, ProtocolVersion, TlsError};
use tlswire_utils::codec::{Parser, Writer};

/// Record content types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ContentType {
    ChangeCipherSpec = 20,
    Alert = 21,
    Handshake = 22,
    ApplicationData = 23,
    Heartbeat = 24,
}

impl ContentType {
    pub fn from_u8(v: u8) -> Result<Self, u8> {
        match v {
            20 => Ok(ContentType::ChangeCipherSpec),
            21 => Ok(ContentType::Alert),
            22 => Ok(ContentType::Handshake),
            23 => Ok(ContentType::ApplicationData),
            24 => Ok(ContentType::Heartbeat),
            _ => Err(v),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ContentType::ChangeCipherSpec => "change_cipher_spec",
            ContentType::Alert => "alert",
            ContentType::Handshake => "handshake",
            ContentType::ApplicationData => "application_data",
            ContentType::Heartbeat => "heartbeat",
        }
    }
}

/// Fixed 5-byte SSLv3+ record header.
///
/// The content type is kept raw; rejecting unknown types is the record
/// layer's decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader3 {
    pub content_type: u8,
    pub version: ProtocolVersion,
    pub length: usize,
}

impl RecordHeader3 {
    pub const LEN: usize = 5;

    pub fn new(content_type: ContentType, version: ProtocolVersion, length: usize) -> Self {
        Self {
            content_type: content_type as u8,
            version,
            length,
        }
    }

    pub fn decode(p: &mut Parser<'_>) -> Result<Self, TlsError> {
        let content_type = p.read_u8()?;
        let version = ProtocolVersion::from_u16(p.read_u16()?);
        let length = p.read_u16()? as usize;
        Ok(Self {
            content_type,
            version,
            length,
        })
    }

    /// Content type name, `unknown(N)` for unregistered codes.
    pub fn type_name(&self) -> String {
        ContentType::from_u8(self.content_type)
            .map(|t| t.name().to_string())
            .unwrap_or_else(|v| format!("unknown({v})"))
    }

    pub fn encode(&self) -> Result<Vec<u8>, TlsError> {
        let mut w = Writer::new();
        w.write_u8(self.content_type)
            .write_u16(self.version.to_u16())
            .write_uint(self.length, 2)?;
        Ok(w.finish())
    }
}

/// SSLv2 record header.
///
/// Two bytes when the top bit of the first byte is set (no padding, up to
/// 0x7fff bytes); otherwise three bytes with a 14-bit length, the
/// security-escape flag in bit 6 and a trailing padding length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecordHeader2 {
    pub length: usize,
    pub padding: u8,
    pub security_escape: bool,
}

impl RecordHeader2 {
    const MAX_SHORT_LENGTH: usize = 0x7FFF;
    const MAX_LONG_LENGTH: usize = 0x3FFF;

    pub fn new(length: usize, padding: u8, security_escape: bool) -> Self {
        Self {
            length,
            padding,
            security_escape,
        }
    }

    /// SSLv2 records only carry handshake messages before encryption starts.
    pub fn content_type(&self) -> ContentType {
        ContentType::Handshake
    }

    pub fn version(&self) -> ProtocolVersion {
        ProtocolVersion::new(2, 0)
    }

    /// Encoded size of this header.
    pub fn header_len(&self) -> usize {
        if self.padding == 0 && !self.security_escape {
            2
        } else {
            3
        }
    }

    pub fn decode(p: &mut Parser<'_>) -> Result<Self, TlsError> {
        let first = p.read_u8()?;
        let second = p.read_u8()? as usize;
        if first & 0x80 != 0 {
            return Ok(Self {
                length: ((first as usize & 0x7F) << 8) | second,
                padding: 0,
                security_escape: false,
            });
        }
        let padding = p.read_u8()?;
        Ok(Self {
            length: ((first as usize & 0x3F) << 8) | second,
            padding,
            security_escape: first & 0x40 != 0,
        })
    }

    /// Encode using the shortest header that can carry the length,
    /// padding and escape flag.
    pub fn encode(&self) -> Result<Vec<u8>, TlsError> {
        if self.header_len() == 2 {
            if self.length > Self::MAX_SHORT_LENGTH {
                return Err(InternalError::ValueOutOfRange {
                    field: "ssl2 record length",
                    value: self.length,
                    max: Self::MAX_SHORT_LENGTH,
                }
                .into());
            }
            return Ok(vec![0x80 | (self.length >> 8) as u8, self.length as u8]);
        }

        if self.length > Self::MAX_LONG_LENGTH {
            return Err(InternalError::ValueOutOfRange {
                field: "ssl2 record length",
                value: self.length,
                max: Self::MAX_LONG_LENGTH,
            }
            .into());
        }
        let mut first = (self.length >> 8) as u8;
        if self.security_escape {
            first |= 0x40;
        }
        Ok(vec![first, self.length as u8, self.padding])
    }
}

impl fmt::Display for RecordHeader3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SSLv3 record,version({}.{}),content type({}),length({})",
            self.version.major,
            self.version.minor,
            self.type_name(),
            self.length
        )
    }
}

impl fmt::Display for RecordHeader2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SSLv2 record,length({}),padding({}),security escape({})",
            self.length, self.padding, self.security_escape
        )
    }
}

/// ChangeCipherSpec message body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChangeCipherSpec;

impl ChangeCipherSpec {
    pub fn decode(p: &mut Parser<'_>) -> Result<Self, TlsError> {
        match p.read_u8()? {
            1 => Ok(ChangeCipherSpec),
            v => Err(TlsError::IllegalValue(format!(
                "change_cipher_spec value {v}"
            ))),
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        vec![1]
    }
}
