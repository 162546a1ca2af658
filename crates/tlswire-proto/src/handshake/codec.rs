//! Hello messages and the simple SSLv3+ handshake messages.

use std::fmt;

use subtle::ConstantTimeEq;
use tlswire_types::{InternalError, ProtocolVersion, TlsError};
use tlswire_utils::codec::{Parser, Writer};

use crate::extensions::{
    decode_extension_block, encode_extension_block, find_extension, remove_extension,
    upsert_extension, Extension, ExtensionContext, ExtensionPayload, ExtensionRegistry,
    ExtensionType, ServerName,
};
use crate::{CertificateType, CipherSuite};

use super::{read_random, wrap_handshake, wrap_ssl2, HandshakeType, Ssl2HandshakeType};

const MAX_SESSION_ID_LEN: usize = 32;

fn read_session_id(p: &mut Parser<'_>) -> Result<Vec<u8>, TlsError> {
    let session_id = p.read_var_bytes(1)?;
    if session_id.len() > MAX_SESSION_ID_LEN {
        return Err(TlsError::IllegalValue(format!(
            "session id of {} bytes",
            session_id.len()
        )));
    }
    Ok(session_id.to_vec())
}

fn write_session_id(w: &mut Writer, session_id: &[u8]) -> Result<(), TlsError> {
    if session_id.len() > MAX_SESSION_ID_LEN {
        return Err(InternalError::ValueOutOfRange {
            field: "session id length",
            value: session_id.len(),
            max: MAX_SESSION_ID_LEN,
        }
        .into());
    }
    w.write_var_bytes(session_id, 1)?;
    Ok(())
}

fn hex_string(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Trailing `,extensions([..])` of the hello summaries, listing type codes.
fn fmt_extension_types(
    f: &mut fmt::Formatter<'_>,
    extensions: &Option<Vec<Extension>>,
) -> fmt::Result {
    if let Some(extensions) = extensions {
        let types: Vec<String> = extensions
            .iter()
            .map(|e| format!("0x{:04x}", e.extension_type.0))
            .collect();
        write!(f, ",extensions([{}])", types.join(", "))?;
    }
    Ok(())
}

/// Look up the single extension of `extension_type`.
fn unique_extension(
    extensions: &Option<Vec<Extension>>,
    extension_type: ExtensionType,
) -> Result<Option<&Extension>, TlsError> {
    let mut found = extensions
        .iter()
        .flatten()
        .filter(|e| e.extension_type == extension_type);
    let first = found.next();
    if found.next().is_some() {
        return Err(InternalError::DuplicateExtension(extension_type.0).into());
    }
    Ok(first)
}

// ---------------------------------------------------------------------------
// ClientHello
// ---------------------------------------------------------------------------

/// ClientHello, in either SSLv3+ or SSLv2 framing.
///
/// An SSLv2 challenge is stored right-aligned in `random`; the number of
/// challenge bytes is remembered so the SSLv2 encoding reproduces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientHello {
    pub client_version: ProtocolVersion,
    pub random: [u8; 32],
    pub session_id: Vec<u8>,
    pub cipher_suites: Vec<CipherSuite>,
    pub compression_methods: Vec<u8>,
    /// `None` when the hello carries no extension block at all.
    pub extensions: Option<Vec<Extension>>,
    challenge_len: usize,
}

impl Default for ClientHello {
    fn default() -> Self {
        Self {
            client_version: ProtocolVersion::default(),
            random: [0u8; 32],
            session_id: Vec::new(),
            cipher_suites: Vec::new(),
            compression_methods: Vec::new(),
            extensions: None,
            challenge_len: 32,
        }
    }
}

impl ClientHello {
    /// A hello offering `cipher_suites` and only the null compression method.
    pub fn create(
        client_version: ProtocolVersion,
        random: [u8; 32],
        session_id: &[u8],
        cipher_suites: &[CipherSuite],
    ) -> Self {
        Self {
            client_version,
            random,
            session_id: session_id.to_vec(),
            cipher_suites: cipher_suites.to_vec(),
            compression_methods: vec![0],
            ..Self::default()
        }
    }

    /// A hello for SSLv2 framing, with `challenge` standing in for the random.
    pub fn create_ssl2(
        client_version: ProtocolVersion,
        challenge: &[u8],
        session_id: &[u8],
        cipher_suites: &[CipherSuite],
    ) -> Self {
        let mut hello = Self::create(client_version, [0u8; 32], session_id, cipher_suites);
        hello.set_challenge(challenge);
        hello
    }

    pub fn with_extensions(mut self, extensions: Vec<Extension>) -> Self {
        self.extensions = Some(extensions);
        self
    }

    /// The SSLv2 challenge: the trailing bytes of `random`.
    pub fn challenge(&self) -> &[u8] {
        &self.random[32 - self.challenge_len..]
    }

    /// Left-pad a short challenge with zeros; keep the last 32 bytes of a
    /// long one.
    pub fn set_challenge(&mut self, challenge: &[u8]) {
        let tail = &challenge[challenge.len().saturating_sub(32)..];
        self.random = [0u8; 32];
        self.random[32 - tail.len()..].copy_from_slice(tail);
        self.challenge_len = tail.len();
    }

    /// The extension of `extension_type`, failing if the list holds more
    /// than one.
    pub fn get_extension(&self, extension_type: ExtensionType) -> Result<Option<&Extension>, TlsError> {
        unique_extension(&self.extensions, extension_type)
    }

    /// Offered certificate types; X.509 alone when not advertised.
    pub fn certificate_types(&self) -> Vec<CertificateType> {
        match find_extension(&self.extensions, ExtensionType::CERT_TYPE).map(|e| &e.payload) {
            Some(ExtensionPayload::CertTypes(types)) => types.clone(),
            _ => vec![CertificateType::X509],
        }
    }

    /// `[X509]` is the implied default and removes the extension.
    pub fn set_certificate_types(&mut self, types: &[CertificateType]) {
        if types == [CertificateType::X509] {
            remove_extension(&mut self.extensions, ExtensionType::CERT_TYPE);
        } else {
            upsert_extension(
                &mut self.extensions,
                Extension::new(
                    ExtensionType::CERT_TYPE,
                    ExtensionPayload::CertTypes(types.to_vec()),
                ),
            );
        }
    }

    pub fn srp_username(&self) -> Option<&[u8]> {
        match find_extension(&self.extensions, ExtensionType::SRP).map(|e| &e.payload) {
            Some(ExtensionPayload::SrpIdentity(name)) => Some(name),
            _ => None,
        }
    }

    pub fn set_srp_username(&mut self, username: Option<&[u8]>) {
        match username {
            Some(name) => upsert_extension(
                &mut self.extensions,
                Extension::new(
                    ExtensionType::SRP,
                    ExtensionPayload::SrpIdentity(name.to_vec()),
                ),
            ),
            None => remove_extension(&mut self.extensions, ExtensionType::SRP),
        }
    }

    pub fn tack(&self) -> bool {
        find_extension(&self.extensions, ExtensionType::TACK).is_some()
    }

    pub fn set_tack(&mut self, enabled: bool) {
        if enabled {
            upsert_extension(
                &mut self.extensions,
                Extension::new(ExtensionType::TACK, ExtensionPayload::Tack(Vec::new())),
            );
        } else {
            remove_extension(&mut self.extensions, ExtensionType::TACK);
        }
    }

    pub fn supports_npn(&self) -> bool {
        find_extension(&self.extensions, ExtensionType::SUPPORTS_NPN).is_some()
    }

    pub fn set_supports_npn(&mut self, enabled: bool) {
        if enabled {
            upsert_extension(
                &mut self.extensions,
                Extension::new(
                    ExtensionType::SUPPORTS_NPN,
                    ExtensionPayload::NextProtocols(Vec::new()),
                ),
            );
        } else {
            remove_extension(&mut self.extensions, ExtensionType::SUPPORTS_NPN);
        }
    }

    /// First host_name entry of server_name, or empty.
    pub fn server_name(&self) -> &[u8] {
        match find_extension(&self.extensions, ExtensionType::SERVER_NAME).map(|e| &e.payload) {
            Some(ExtensionPayload::ServerNames(Some(names))) => names
                .iter()
                .find(|n| n.name_type == ServerName::HOST_NAME)
                .map(|n| n.name.as_slice())
                .unwrap_or_default(),
            _ => &[],
        }
    }

    /// Replace the first host_name entry, keeping entries of other types.
    pub fn set_server_name(&mut self, name: &[u8]) {
        let mut names = match find_extension(&self.extensions, ExtensionType::SERVER_NAME)
            .map(|e| &e.payload)
        {
            Some(ExtensionPayload::ServerNames(Some(names))) => names.clone(),
            _ => Vec::new(),
        };
        match names
            .iter_mut()
            .find(|n| n.name_type == ServerName::HOST_NAME)
        {
            Some(entry) => entry.name = name.to_vec(),
            None => names.insert(0, ServerName::host_name(name)),
        }
        upsert_extension(
            &mut self.extensions,
            Extension::new(
                ExtensionType::SERVER_NAME,
                ExtensionPayload::ServerNames(Some(names)),
            ),
        );
    }

    pub fn decode(p: &mut Parser<'_>) -> Result<Self, TlsError> {
        Self::decode_with(p, ExtensionRegistry::standard())
    }

    pub fn decode_with(p: &mut Parser<'_>, registry: &ExtensionRegistry) -> Result<Self, TlsError> {
        p.scoped(3, |p| {
            let client_version = ProtocolVersion::from_u16(p.read_u16()?);
            let random = read_random(p)?;
            let session_id = read_session_id(p)?;
            let cipher_suites = p
                .read_var_list(2, 2)?
                .into_iter()
                .map(CipherSuite)
                .collect();
            let compression_methods = p.read_var_bytes(1)?.to_vec();
            let extensions = decode_extension_block(p, ExtensionContext::CLIENT_HELLO, registry)?;

            if let Some(exts) = &extensions {
                for (i, ext) in exts.iter().enumerate() {
                    if exts[..i].iter().any(|e| e.extension_type == ext.extension_type) {
                        return Err(TlsError::IllegalValue(format!(
                            "duplicate extension 0x{:04x} in client hello",
                            ext.extension_type.0
                        )));
                    }
                }
            }

            Ok(Self {
                client_version,
                random,
                session_id,
                cipher_suites,
                compression_methods,
                extensions,
                challenge_len: 32,
            })
        })
    }

    /// SSLv2 body: `version cs_len sid_len chal_len specs sid challenge`.
    pub fn decode_ssl2(p: &mut Parser<'_>) -> Result<Self, TlsError> {
        let client_version = ProtocolVersion::from_u16(p.read_u16()?);
        let specs_len = p.read_u16()? as usize;
        let session_id_len = p.read_u16()? as usize;
        let challenge_len = p.read_u16()? as usize;
        if specs_len % 3 != 0 {
            return Err(TlsError::IllegalValue(format!(
                "cipher spec length {specs_len} is not a multiple of 3"
            )));
        }
        let cipher_suites = p
            .read_list(3, specs_len / 3)?
            .into_iter()
            .map(CipherSuite)
            .collect();
        if session_id_len > MAX_SESSION_ID_LEN {
            return Err(TlsError::IllegalValue(format!(
                "session id of {session_id_len} bytes"
            )));
        }
        let session_id = p.read_fixed(session_id_len)?.to_vec();
        let challenge = p.read_fixed(challenge_len)?;

        let mut hello = Self {
            client_version,
            session_id,
            cipher_suites,
            compression_methods: vec![0],
            ..Self::default()
        };
        hello.set_challenge(challenge);
        Ok(hello)
    }

    pub fn encode(&self) -> Result<Vec<u8>, TlsError> {
        wrap_handshake(HandshakeType::ClientHello, |w| {
            w.write_u16(self.client_version.to_u16())
                .write_fixed(&self.random);
            write_session_id(w, &self.session_id)?;
            let suites: Vec<u32> = self.cipher_suites.iter().map(|c| c.0).collect();
            w.write_var_list(&suites, 2, 2)?;
            w.write_var_bytes(&self.compression_methods, 1)?;
            encode_extension_block(w, self.extensions.as_deref())
        })
    }

    pub fn encode_ssl2(&self) -> Result<Vec<u8>, TlsError> {
        let challenge = self.challenge();
        wrap_ssl2(Ssl2HandshakeType::ClientHello, |w| {
            w.write_u16(self.client_version.to_u16());
            w.write_uint(self.cipher_suites.len() * 3, 2)?;
            w.write_uint(self.session_id.len(), 2)?;
            w.write_uint(challenge.len(), 2)?;
            let suites: Vec<u32> = self.cipher_suites.iter().map(|c| c.0).collect();
            w.write_list(&suites, 3)?;
            w.write_fixed(&self.session_id).write_fixed(challenge);
            Ok(())
        })
    }
}

impl fmt::Display for ClientHello {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suites: Vec<String> = self
            .cipher_suites
            .iter()
            .map(|c| format!("0x{:04x}", c.0))
            .collect();
        write!(
            f,
            "client_hello,version({}.{}),random(...),session ID({}),cipher suites([{}]),\
             compression methods({:?})",
            self.client_version.major,
            self.client_version.minor,
            hex_string(&self.session_id),
            suites.join(", "),
            self.compression_methods
        )?;
        fmt_extension_types(f, &self.extensions)
    }
}

// ---------------------------------------------------------------------------
// ServerHello
// ---------------------------------------------------------------------------

/// ServerHello.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerHello {
    pub server_version: ProtocolVersion,
    pub random: [u8; 32],
    pub session_id: Vec<u8>,
    pub cipher_suite: CipherSuite,
    pub compression_method: u8,
    /// Kept in received order; duplicates are left for the verifier.
    pub extensions: Option<Vec<Extension>>,
}

impl Default for ServerHello {
    fn default() -> Self {
        Self {
            server_version: ProtocolVersion::default(),
            random: [0u8; 32],
            session_id: Vec::new(),
            cipher_suite: CipherSuite::TLS_NULL_WITH_NULL_NULL,
            compression_method: 0,
            extensions: None,
        }
    }
}

impl ServerHello {
    pub fn create(
        server_version: ProtocolVersion,
        random: [u8; 32],
        session_id: &[u8],
        cipher_suite: CipherSuite,
    ) -> Self {
        Self {
            server_version,
            random,
            session_id: session_id.to_vec(),
            cipher_suite,
            ..Self::default()
        }
    }

    pub fn with_extensions(mut self, extensions: Vec<Extension>) -> Self {
        self.extensions = Some(extensions);
        self
    }

    pub fn get_extension(&self, extension_type: ExtensionType) -> Result<Option<&Extension>, TlsError> {
        unique_extension(&self.extensions, extension_type)
    }

    /// Chosen certificate type; X.509 when the server sent none.
    ///
    /// A cert_type payload that is not exactly one type is an illegal value,
    /// the same as on decode.
    pub fn certificate_type(&self) -> Result<CertificateType, TlsError> {
        match find_extension(&self.extensions, ExtensionType::CERT_TYPE).map(|e| &e.payload) {
            None => Ok(CertificateType::X509),
            Some(ExtensionPayload::CertType(t)) => Ok(*t),
            Some(ExtensionPayload::Opaque(raw)) if raw.len() == 1 => Ok(CertificateType(raw[0])),
            Some(other) => Err(TlsError::IllegalValue(format!(
                "server cert_type payload {other:?} is not a single type"
            ))),
        }
    }

    /// X.509 is implied, so `None` and `Some(X509)` both drop the extension.
    pub fn set_certificate_type(&mut self, certificate_type: Option<CertificateType>) {
        match certificate_type {
            None | Some(CertificateType::X509) => {
                remove_extension(&mut self.extensions, ExtensionType::CERT_TYPE)
            }
            Some(t) => upsert_extension(
                &mut self.extensions,
                Extension::new(ExtensionType::CERT_TYPE, ExtensionPayload::CertType(t)),
            ),
        }
    }

    /// Protocols advertised through next protocol negotiation.
    pub fn next_protos(&self) -> Option<&[Vec<u8>]> {
        match find_extension(&self.extensions, ExtensionType::SUPPORTS_NPN).map(|e| &e.payload) {
            Some(ExtensionPayload::NextProtocols(protos)) => Some(protos),
            _ => None,
        }
    }

    pub fn set_next_protos(&mut self, protocols: Option<Vec<Vec<u8>>>) {
        match protocols {
            Some(protos) => upsert_extension(
                &mut self.extensions,
                Extension::new(
                    ExtensionType::SUPPORTS_NPN,
                    ExtensionPayload::NextProtocols(protos),
                ),
            ),
            None => remove_extension(&mut self.extensions, ExtensionType::SUPPORTS_NPN),
        }
    }

    pub fn tack_ext(&self) -> Option<&[u8]> {
        match find_extension(&self.extensions, ExtensionType::TACK).map(|e| &e.payload) {
            Some(ExtensionPayload::Tack(data)) | Some(ExtensionPayload::Opaque(data)) => {
                Some(data)
            }
            _ => None,
        }
    }

    pub fn set_tack_ext(&mut self, tack: Option<Vec<u8>>) {
        match tack {
            Some(data) => upsert_extension(
                &mut self.extensions,
                Extension::new(ExtensionType::TACK, ExtensionPayload::Tack(data)),
            ),
            None => remove_extension(&mut self.extensions, ExtensionType::TACK),
        }
    }

    pub fn decode(p: &mut Parser<'_>) -> Result<Self, TlsError> {
        Self::decode_with(p, ExtensionRegistry::standard())
    }

    pub fn decode_with(p: &mut Parser<'_>, registry: &ExtensionRegistry) -> Result<Self, TlsError> {
        p.scoped(3, |p| {
            let server_version = ProtocolVersion::from_u16(p.read_u16()?);
            let random = read_random(p)?;
            let session_id = read_session_id(p)?;
            let cipher_suite = CipherSuite(p.read_u16()? as u32);
            let compression_method = p.read_u8()?;
            let extensions = decode_extension_block(p, ExtensionContext::SERVER_HELLO, registry)?;
            Ok(Self {
                server_version,
                random,
                session_id,
                cipher_suite,
                compression_method,
                extensions,
            })
        })
    }

    pub fn encode(&self) -> Result<Vec<u8>, TlsError> {
        wrap_handshake(HandshakeType::ServerHello, |w| {
            w.write_u16(self.server_version.to_u16())
                .write_fixed(&self.random);
            write_session_id(w, &self.session_id)?;
            w.write_uint(self.cipher_suite.0 as usize, 2)?
                .write_u8(self.compression_method);
            encode_extension_block(w, self.extensions.as_deref())
        })
    }
}

impl fmt::Display for ServerHello {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "server_hello,version({}.{}),random(...),session ID({}),cipher(0x{:04x}),\
             compression method({})",
            self.server_version.major,
            self.server_version.minor,
            hex_string(&self.session_id),
            self.cipher_suite.0,
            self.compression_method
        )?;
        fmt_extension_types(f, &self.extensions)
    }
}

// ---------------------------------------------------------------------------
// Empty-bodied messages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HelloRequest;

impl HelloRequest {
    pub fn decode(p: &mut Parser<'_>) -> Result<Self, TlsError> {
        p.scoped(3, |_| Ok(HelloRequest))
    }

    pub fn encode(&self) -> Result<Vec<u8>, TlsError> {
        wrap_handshake(HandshakeType::HelloRequest, |_| Ok(()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ServerHelloDone;

impl ServerHelloDone {
    pub fn decode(p: &mut Parser<'_>) -> Result<Self, TlsError> {
        p.scoped(3, |_| Ok(ServerHelloDone))
    }

    pub fn encode(&self) -> Result<Vec<u8>, TlsError> {
        wrap_handshake(HandshakeType::ServerHelloDone, |_| Ok(()))
    }
}

// ---------------------------------------------------------------------------
// Certificate
// ---------------------------------------------------------------------------

/// Certificate chain, each entry opaque DER.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Certificate {
    pub certificate_list: Vec<Vec<u8>>,
}

impl Certificate {
    pub fn new(certificate_list: Vec<Vec<u8>>) -> Self {
        Self { certificate_list }
    }

    pub fn decode(p: &mut Parser<'_>) -> Result<Self, TlsError> {
        p.scoped(3, |p| {
            p.scoped(3, |p| {
                let mut certificate_list = Vec::new();
                while !p.is_empty() {
                    certificate_list.push(p.read_var_bytes(3)?.to_vec());
                }
                Ok(Self { certificate_list })
            })
        })
    }

    pub fn encode(&self) -> Result<Vec<u8>, TlsError> {
        wrap_handshake(HandshakeType::Certificate, |w| {
            w.with_length_prefix(3, |w| {
                for cert in &self.certificate_list {
                    w.write_var_bytes(cert, 3)?;
                }
                Ok(())
            })?;
            Ok(())
        })
    }
}

// ---------------------------------------------------------------------------
// Finished
// ---------------------------------------------------------------------------

/// Finished. 36 bytes of verify data in SSLv3, 12 afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finished {
    pub verify_data: Vec<u8>,
}

impl Finished {
    pub fn new(verify_data: Vec<u8>) -> Self {
        Self { verify_data }
    }

    pub fn verify_data_len(version: ProtocolVersion) -> usize {
        if version == ProtocolVersion::SSL3 {
            36
        } else {
            12
        }
    }

    /// Constant-time comparison against the locally computed value.
    pub fn verify(&self, expected: &[u8]) -> bool {
        self.verify_data.as_slice().ct_eq(expected).into()
    }

    pub fn decode(p: &mut Parser<'_>, version: ProtocolVersion) -> Result<Self, TlsError> {
        let len = Self::verify_data_len(version);
        p.scoped(3, |p| {
            Ok(Self {
                verify_data: p.read_fixed(len)?.to_vec(),
            })
        })
    }

    pub fn encode(&self) -> Result<Vec<u8>, TlsError> {
        wrap_handshake(HandshakeType::Finished, |w| {
            w.write_fixed(&self.verify_data);
            Ok(())
        })
    }
}

// ---------------------------------------------------------------------------
// NextProtocol
// ---------------------------------------------------------------------------

/// Protocol selected by the client through next protocol negotiation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NextProtocol {
    pub next_proto: Vec<u8>,
}

impl NextProtocol {
    pub fn new(next_proto: Vec<u8>) -> Self {
        Self { next_proto }
    }

    pub fn decode(p: &mut Parser<'_>) -> Result<Self, TlsError> {
        p.scoped(3, |p| {
            let next_proto = p.read_var_bytes(1)?.to_vec();
            p.read_var_bytes(1)?;
            Ok(Self { next_proto })
        })
    }

    /// The body is padded so its length is a multiple of 32.
    pub fn encode(&self) -> Result<Vec<u8>, TlsError> {
        let padding = vec![0u8; 32 - ((self.next_proto.len() + 2) % 32)];
        wrap_handshake(HandshakeType::NextProtocol, |w| {
            w.write_var_bytes(&self.next_proto, 1)?
                .write_var_bytes(&padding, 1)?;
            Ok(())
        })
    }
}
