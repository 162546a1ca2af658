//! Hello extensions: typed payloads, the generic `type(2) length(2)`
//! frame, and the registry that decides how a payload is interpreted.

mod registry;

pub use registry::{ExtensionDecoder, ExtensionRegistry, ExtensionRegistryBuilder};

use tlswire_types::TlsError;
use tlswire_utils::codec::{Parser, Writer};

use crate::CertificateType;

/// TLS extension type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExtensionType(pub u16);

impl ExtensionType {
    pub const SERVER_NAME: Self = Self(0);
    pub const CERT_TYPE: Self = Self(9);
    pub const SUPPORTED_GROUPS: Self = Self(10);
    pub const EC_POINT_FORMATS: Self = Self(11);
    pub const SRP: Self = Self(12);
    pub const SIGNATURE_ALGORITHMS: Self = Self(13);
    pub const HEARTBEAT: Self = Self(15);
    pub const APPLICATION_LAYER_PROTOCOL_NEGOTIATION: Self = Self(16);
    pub const ENCRYPT_THEN_MAC: Self = Self(22);
    pub const EXTENDED_MASTER_SECRET: Self = Self(23);
    pub const SESSION_TICKET: Self = Self(35);
    pub const SUPPORTS_NPN: Self = Self(13172);
    pub const TACK: Self = Self(62208);
    pub const RENEGOTIATION_INFO: Self = Self(0xFF01);
}

/// Hello message an extension is carried in.
///
/// Bits may be combined when registering a decoder for several contexts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExtensionContext(pub u32);

impl ExtensionContext {
    pub const CLIENT_HELLO: Self = Self(0x0001);
    pub const SERVER_HELLO: Self = Self(0x0002);

    /// Returns true if `other` context is included in this context.
    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// The single-bit contexts set in this mask.
    pub fn split(self) -> impl Iterator<Item = ExtensionContext> {
        (0..32)
            .map(|bit| 1u32 << bit)
            .filter(move |bit| self.0 & bit != 0)
            .map(ExtensionContext)
    }
}

/// One entry of a server_name list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerName {
    pub name_type: u8,
    pub name: Vec<u8>,
}

impl ServerName {
    pub const HOST_NAME: u8 = 0;

    pub fn host_name(name: impl Into<Vec<u8>>) -> Self {
        Self {
            name_type: Self::HOST_NAME,
            name: name.into(),
        }
    }
}

/// Decoded extension payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionPayload {
    /// server_name. `None` is the empty payload a server echoes back.
    ServerNames(Option<Vec<ServerName>>),
    /// cert_type as offered by a client.
    CertTypes(Vec<CertificateType>),
    /// cert_type as chosen by a server.
    CertType(CertificateType),
    /// SRP identity (RFC 5054), 1-byte length.
    SrpIdentity(Vec<u8>),
    /// Next protocol negotiation. Empty from the client.
    NextProtocols(Vec<Vec<u8>>),
    /// TACK, carried uninterpreted.
    Tack(Vec<u8>),
    Opaque(Vec<u8>),
}

impl ExtensionPayload {
    pub fn encode(&self, w: &mut Writer) -> Result<(), TlsError> {
        match self {
            Self::ServerNames(None) => {}
            Self::ServerNames(Some(names)) => {
                w.with_length_prefix(2, |w| {
                    for entry in names {
                        w.write_u8(entry.name_type).write_var_bytes(&entry.name, 2)?;
                    }
                    Ok(())
                })?;
            }
            Self::CertTypes(types) => {
                let raw: Vec<u8> = types.iter().map(|t| t.0).collect();
                w.write_var_bytes(&raw, 1)?;
            }
            Self::CertType(t) => {
                w.write_u8(t.0);
            }
            Self::SrpIdentity(identity) => {
                w.write_var_bytes(identity, 1)?;
            }
            Self::NextProtocols(protocols) => {
                for proto in protocols {
                    w.write_var_bytes(proto, 1)?;
                }
            }
            Self::Tack(data) | Self::Opaque(data) => {
                w.write_fixed(data);
            }
        }
        Ok(())
    }

    /// Payload bytes, without the extension frame.
    pub fn to_bytes(&self) -> Result<Vec<u8>, TlsError> {
        let mut w = Writer::new();
        self.encode(&mut w)?;
        Ok(w.finish())
    }
}

pub fn decode_server_names(p: &mut Parser<'_>) -> Result<ExtensionPayload, TlsError> {
    if p.is_empty() {
        return Ok(ExtensionPayload::ServerNames(None));
    }
    let names = p.scoped(2, |p| {
        let mut names = Vec::new();
        while !p.is_empty() {
            let name_type = p.read_u8()?;
            let name = p.read_var_bytes(2)?.to_vec();
            names.push(ServerName { name_type, name });
        }
        Ok(names)
    })?;
    Ok(ExtensionPayload::ServerNames(Some(names)))
}

pub fn decode_cert_types(p: &mut Parser<'_>) -> Result<ExtensionPayload, TlsError> {
    let types = p.read_var_bytes(1)?;
    Ok(ExtensionPayload::CertTypes(
        types.iter().copied().map(CertificateType).collect(),
    ))
}

/// The server's choice is exactly one byte.
pub fn decode_cert_type(p: &mut Parser<'_>) -> Result<ExtensionPayload, TlsError> {
    match p.read_remaining() {
        [t] => Ok(ExtensionPayload::CertType(CertificateType(*t))),
        other => Err(TlsError::IllegalValue(format!(
            "cert_type payload of {} bytes",
            other.len()
        ))),
    }
}

pub fn decode_srp_identity(p: &mut Parser<'_>) -> Result<ExtensionPayload, TlsError> {
    Ok(ExtensionPayload::SrpIdentity(p.read_var_bytes(1)?.to_vec()))
}

pub fn decode_next_protocols(p: &mut Parser<'_>) -> Result<ExtensionPayload, TlsError> {
    let mut protocols = Vec::new();
    while !p.is_empty() {
        protocols.push(p.read_var_bytes(1)?.to_vec());
    }
    Ok(ExtensionPayload::NextProtocols(protocols))
}

pub fn decode_tack(p: &mut Parser<'_>) -> Result<ExtensionPayload, TlsError> {
    Ok(ExtensionPayload::Tack(p.read_remaining().to_vec()))
}

/// A single hello extension.
#[derive(Debug, Clone)]
pub struct Extension {
    pub extension_type: ExtensionType,
    pub payload: ExtensionPayload,
}

impl Extension {
    pub fn new(extension_type: ExtensionType, payload: ExtensionPayload) -> Self {
        Self {
            extension_type,
            payload,
        }
    }

    /// An extension whose payload is kept as raw bytes.
    pub fn opaque(extension_type: ExtensionType, data: impl Into<Vec<u8>>) -> Self {
        Self::new(extension_type, ExtensionPayload::Opaque(data.into()))
    }

    /// Read one extension, interpreting the payload with the decoder
    /// registered for its type in `context`.
    pub fn decode(
        p: &mut Parser<'_>,
        context: ExtensionContext,
        registry: &ExtensionRegistry,
    ) -> Result<Self, TlsError> {
        let extension_type = ExtensionType(p.read_u16()?);
        let payload = p.scoped(2, |body| match registry.decoder(extension_type, context) {
            Some(decode) => decode(body),
            None => Ok(ExtensionPayload::Opaque(body.read_remaining().to_vec())),
        })?;
        Ok(Self {
            extension_type,
            payload,
        })
    }

    pub fn encode(&self, w: &mut Writer) -> Result<(), TlsError> {
        w.write_u16(self.extension_type.0);
        w.with_length_prefix(2, |w| self.payload.encode(w))?;
        Ok(())
    }
}

/// Extensions compare by type code and serialized payload, so an opaque
/// payload equals a typed one carrying the same bytes.
impl PartialEq for Extension {
    fn eq(&self, other: &Self) -> bool {
        if self.extension_type != other.extension_type {
            return false;
        }
        match (self.payload.to_bytes(), other.payload.to_bytes()) {
            (Ok(a), Ok(b)) => a == b,
            _ => self.payload == other.payload,
        }
    }
}

impl Eq for Extension {}

/// Read the optional extension block at the end of a hello.
///
/// No bytes left means no block at all, which is distinct from an empty one.
pub fn decode_extension_block(
    p: &mut Parser<'_>,
    context: ExtensionContext,
    registry: &ExtensionRegistry,
) -> Result<Option<Vec<Extension>>, TlsError> {
    if p.is_empty() {
        return Ok(None);
    }
    let extensions = p.scoped(2, |p| {
        let mut extensions = Vec::new();
        while !p.is_empty() {
            extensions.push(Extension::decode(p, context, registry)?);
        }
        Ok(extensions)
    })?;
    Ok(Some(extensions))
}

pub fn encode_extension_block(
    w: &mut Writer,
    extensions: Option<&[Extension]>,
) -> Result<(), TlsError> {
    if let Some(extensions) = extensions {
        w.with_length_prefix(2, |w| {
            for ext in extensions {
                ext.encode(w)?;
            }
            Ok(())
        })?;
    }
    Ok(())
}

pub(crate) fn find_extension(
    extensions: &Option<Vec<Extension>>,
    extension_type: ExtensionType,
) -> Option<&Extension> {
    extensions
        .as_deref()?
        .iter()
        .find(|e| e.extension_type == extension_type)
}

/// Replace the first extension of the same type, or append.
pub(crate) fn upsert_extension(extensions: &mut Option<Vec<Extension>>, ext: Extension) {
    let list = extensions.get_or_insert_with(Vec::new);
    match list
        .iter_mut()
        .find(|e| e.extension_type == ext.extension_type)
    {
        Some(slot) => *slot = ext,
        None => list.push(ext),
    }
}

pub(crate) fn remove_extension(
    extensions: &mut Option<Vec<Extension>>,
    extension_type: ExtensionType,
) {
    if let Some(list) = extensions {
        list.retain(|e| e.extension_type != extension_type);
    }
}
