//! Handshake message types, framing and dispatch.
//!
//! SSLv3+ messages are framed as `msg_type(1) length(3) body`; each
//! message's `encode` emits the whole frame and its `decode` consumes the
//! length and body, leaving the type byte to [`HandshakeMessage`]. SSLv2
//! messages carry no length of their own: `msg_type(1) body`.

pub mod codec;
pub mod codec12;
pub mod codec_ssl2;
pub mod verify;

pub use codec::{
    Certificate, ClientHello, Finished, HelloRequest, NextProtocol, ServerHello, ServerHelloDone,
};
pub use codec12::{
    CertificateRequest, CertificateVerify, ClientKeyExchange, ClientKeyParams, EcBasis,
    EcParameters, ServerKeyExchange, ServerKeyParams,
};
pub use codec_ssl2::{ClientFinished, ClientMasterKey, ServerFinished, ServerHello2};
pub use verify::{verify_server_hello, ServerHelloVerifier};

use tlswire_types::{ProtocolVersion, TlsError};
use tlswire_utils::codec::{Parser, Writer};

use crate::extensions::ExtensionRegistry;
use crate::CipherSuite;

/// SSLv3+ handshake message types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum HandshakeType {
    HelloRequest = 0,
    ClientHello = 1,
    ServerHello = 2,
    Certificate = 11,
    ServerKeyExchange = 12,
    CertificateRequest = 13,
    ServerHelloDone = 14,
    CertificateVerify = 15,
    ClientKeyExchange = 16,
    Finished = 20,
    NextProtocol = 67,
}

impl HandshakeType {
    pub fn from_u8(v: u8) -> Result<Self, u8> {
        use HandshakeType::*;
        Ok(match v {
            0 => HelloRequest,
            1 => ClientHello,
            2 => ServerHello,
            11 => Certificate,
            12 => ServerKeyExchange,
            13 => CertificateRequest,
            14 => ServerHelloDone,
            15 => CertificateVerify,
            16 => ClientKeyExchange,
            20 => Finished,
            67 => NextProtocol,
            _ => return Err(v),
        })
    }
}

/// SSLv2 handshake message types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Ssl2HandshakeType {
    Error = 0,
    ClientHello = 1,
    ClientMasterKey = 2,
    ClientFinished = 3,
    ServerHello = 4,
    ServerVerify = 5,
    ServerFinished = 6,
    RequestCertificate = 7,
    ClientCertificate = 8,
}

impl Ssl2HandshakeType {
    pub fn from_u8(v: u8) -> Result<Self, u8> {
        use Ssl2HandshakeType::*;
        Ok(match v {
            0 => Error,
            1 => ClientHello,
            2 => ClientMasterKey,
            3 => ClientFinished,
            4 => ServerHello,
            5 => ServerVerify,
            6 => ServerFinished,
            7 => RequestCertificate,
            8 => ClientCertificate,
            _ => return Err(v),
        })
    }
}

/// Negotiated state some message layouts depend on.
#[derive(Debug, Clone, Copy)]
pub struct DecodeContext<'a> {
    pub version: ProtocolVersion,
    /// Selects the key exchange layout; irrelevant for other messages.
    pub cipher_suite: CipherSuite,
    pub registry: &'a ExtensionRegistry,
}

impl DecodeContext<'static> {
    /// Context with no cipher suite chosen yet and the standard registry.
    pub fn new(version: ProtocolVersion) -> Self {
        Self {
            version,
            cipher_suite: CipherSuite::TLS_NULL_WITH_NULL_NULL,
            registry: ExtensionRegistry::standard(),
        }
    }
}

impl<'a> DecodeContext<'a> {
    pub fn with_cipher_suite(mut self, cipher_suite: CipherSuite) -> Self {
        self.cipher_suite = cipher_suite;
        self
    }

    pub fn with_registry(self, registry: &ExtensionRegistry) -> DecodeContext<'_> {
        DecodeContext {
            version: self.version,
            cipher_suite: self.cipher_suite,
            registry,
        }
    }
}

/// An SSLv3+ handshake message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandshakeMessage {
    HelloRequest(HelloRequest),
    ClientHello(ClientHello),
    ServerHello(ServerHello),
    Certificate(Certificate),
    ServerKeyExchange(ServerKeyExchange),
    CertificateRequest(CertificateRequest),
    ServerHelloDone(ServerHelloDone),
    CertificateVerify(CertificateVerify),
    ClientKeyExchange(ClientKeyExchange),
    Finished(Finished),
    NextProtocol(NextProtocol),
}

impl HandshakeMessage {
    pub fn msg_type(&self) -> HandshakeType {
        match self {
            Self::HelloRequest(_) => HandshakeType::HelloRequest,
            Self::ClientHello(_) => HandshakeType::ClientHello,
            Self::ServerHello(_) => HandshakeType::ServerHello,
            Self::Certificate(_) => HandshakeType::Certificate,
            Self::ServerKeyExchange(_) => HandshakeType::ServerKeyExchange,
            Self::CertificateRequest(_) => HandshakeType::CertificateRequest,
            Self::ServerHelloDone(_) => HandshakeType::ServerHelloDone,
            Self::CertificateVerify(_) => HandshakeType::CertificateVerify,
            Self::ClientKeyExchange(_) => HandshakeType::ClientKeyExchange,
            Self::Finished(_) => HandshakeType::Finished,
            Self::NextProtocol(_) => HandshakeType::NextProtocol,
        }
    }

    /// Decode exactly one message spanning all of `bytes`.
    pub fn decode(bytes: &[u8], ctx: &DecodeContext<'_>) -> Result<Self, TlsError> {
        let mut p = Parser::new(bytes);
        let msg = Self::decode_from(&mut p, ctx)?;
        if !p.is_empty() {
            return Err(TlsError::IllegalValue(format!(
                "{} trailing bytes after {:?}",
                p.remaining_len(),
                msg.msg_type()
            )));
        }
        Ok(msg)
    }

    /// Decode the next message from a stream of handshake bytes.
    pub fn decode_from(p: &mut Parser<'_>, ctx: &DecodeContext<'_>) -> Result<Self, TlsError> {
        let raw = p.read_u8()?;
        let msg_type = HandshakeType::from_u8(raw)
            .map_err(|v| TlsError::IllegalValue(format!("unknown handshake type {v}")))?;
        log::trace!(
            "decoding {:?}, {} bytes available, version {}",
            msg_type,
            p.remaining_len(),
            ctx.version
        );
        let version = Some(ctx.version);
        Ok(match msg_type {
            HandshakeType::HelloRequest => Self::HelloRequest(HelloRequest::decode(p)?),
            HandshakeType::ClientHello => {
                Self::ClientHello(ClientHello::decode_with(p, ctx.registry)?)
            }
            HandshakeType::ServerHello => {
                Self::ServerHello(ServerHello::decode_with(p, ctx.registry)?)
            }
            HandshakeType::Certificate => Self::Certificate(Certificate::decode(p)?),
            HandshakeType::ServerKeyExchange => Self::ServerKeyExchange(
                ServerKeyExchange::decode(p, ctx.cipher_suite, ctx.version)?,
            ),
            HandshakeType::CertificateRequest => {
                Self::CertificateRequest(CertificateRequest::decode(p, ctx.version)?)
            }
            HandshakeType::ServerHelloDone => Self::ServerHelloDone(ServerHelloDone::decode(p)?),
            HandshakeType::CertificateVerify => {
                Self::CertificateVerify(CertificateVerify::decode(p, ctx.version)?)
            }
            HandshakeType::ClientKeyExchange => Self::ClientKeyExchange(
                ClientKeyExchange::decode(p, ctx.cipher_suite, version)?,
            ),
            HandshakeType::Finished => Self::Finished(Finished::decode(p, ctx.version)?),
            HandshakeType::NextProtocol => Self::NextProtocol(NextProtocol::decode(p)?),
        })
    }

    pub fn encode(&self) -> Result<Vec<u8>, TlsError> {
        match self {
            Self::HelloRequest(m) => m.encode(),
            Self::ClientHello(m) => m.encode(),
            Self::ServerHello(m) => m.encode(),
            Self::Certificate(m) => m.encode(),
            Self::ServerKeyExchange(m) => m.encode(),
            Self::CertificateRequest(m) => m.encode(),
            Self::ServerHelloDone(m) => m.encode(),
            Self::CertificateVerify(m) => m.encode(),
            Self::ClientKeyExchange(m) => m.encode(),
            Self::Finished(m) => m.encode(),
            Self::NextProtocol(m) => m.encode(),
        }
    }
}

/// An SSLv2 handshake message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ssl2Message {
    ClientHello(ClientHello),
    ServerHello(ServerHello2),
    ClientMasterKey(ClientMasterKey),
    ClientFinished(ClientFinished),
    ServerFinished(ServerFinished),
}

impl Ssl2Message {
    pub fn msg_type(&self) -> Ssl2HandshakeType {
        match self {
            Self::ClientHello(_) => Ssl2HandshakeType::ClientHello,
            Self::ServerHello(_) => Ssl2HandshakeType::ServerHello,
            Self::ClientMasterKey(_) => Ssl2HandshakeType::ClientMasterKey,
            Self::ClientFinished(_) => Ssl2HandshakeType::ClientFinished,
            Self::ServerFinished(_) => Ssl2HandshakeType::ServerFinished,
        }
    }

    /// Decode one message occupying the whole record payload.
    pub fn decode(bytes: &[u8]) -> Result<Self, TlsError> {
        let mut p = Parser::new(bytes);
        let raw = p.read_u8()?;
        let msg_type = Ssl2HandshakeType::from_u8(raw)
            .map_err(|v| TlsError::IllegalValue(format!("unknown SSLv2 handshake type {v}")))?;
        log::trace!(
            "decoding SSLv2 {:?}, {} bytes",
            msg_type,
            p.remaining_len()
        );
        let msg = match msg_type {
            Ssl2HandshakeType::ClientHello => Self::ClientHello(ClientHello::decode_ssl2(&mut p)?),
            Ssl2HandshakeType::ServerHello => Self::ServerHello(ServerHello2::decode(&mut p)?),
            Ssl2HandshakeType::ClientMasterKey => {
                Self::ClientMasterKey(ClientMasterKey::decode(&mut p)?)
            }
            Ssl2HandshakeType::ClientFinished => {
                Self::ClientFinished(ClientFinished::decode(&mut p)?)
            }
            Ssl2HandshakeType::ServerFinished => {
                Self::ServerFinished(ServerFinished::decode(&mut p)?)
            }
            other => {
                return Err(TlsError::IllegalValue(format!(
                    "unsupported SSLv2 handshake type {other:?}"
                )))
            }
        };
        if !p.is_empty() {
            return Err(TlsError::IllegalValue(format!(
                "{} trailing bytes after SSLv2 {:?}",
                p.remaining_len(),
                msg_type
            )));
        }
        Ok(msg)
    }

    pub fn encode(&self) -> Result<Vec<u8>, TlsError> {
        match self {
            Self::ClientHello(m) => m.encode_ssl2(),
            Self::ServerHello(m) => m.encode(),
            Self::ClientMasterKey(m) => m.encode(),
            Self::ClientFinished(m) => m.encode(),
            Self::ServerFinished(m) => m.encode(),
        }
    }
}

/// Frame an SSLv3+ message body written by `body`.
pub(crate) fn wrap_handshake<F>(msg_type: HandshakeType, body: F) -> Result<Vec<u8>, TlsError>
where
    F: FnOnce(&mut Writer) -> Result<(), TlsError>,
{
    let mut w = Writer::new();
    w.write_u8(msg_type as u8);
    w.with_length_prefix(3, body)?;
    Ok(w.finish())
}

/// Frame an SSLv2 message body written by `body`.
pub(crate) fn wrap_ssl2<F>(msg_type: Ssl2HandshakeType, body: F) -> Result<Vec<u8>, TlsError>
where
    F: FnOnce(&mut Writer) -> Result<(), TlsError>,
{
    let mut w = Writer::new();
    w.write_u8(msg_type as u8);
    body(&mut w)?;
    Ok(w.finish())
}

pub(crate) fn read_random(p: &mut Parser<'_>) -> Result<[u8; 32], TlsError> {
    let mut random = [0u8; 32];
    random.copy_from_slice(p.read_fixed(32)?);
    Ok(random)
}
