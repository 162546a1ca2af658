//! Decoder registry for extension payloads.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use tlswire_types::TlsError;
use tlswire_utils::codec::Parser;

use super::{
    decode_cert_type, decode_cert_types, decode_next_protocols, decode_server_names,
    decode_srp_identity, decode_tack, ExtensionContext, ExtensionPayload, ExtensionType,
};

/// Payload decoder. Runs over exactly the bytes of one extension.
pub type ExtensionDecoder =
    Arc<dyn Fn(&mut Parser<'_>) -> Result<ExtensionPayload, TlsError> + Send + Sync>;

/// Immutable map from (type, hello context) to payload decoder.
///
/// Types without a decoder for the context are kept as opaque bytes.
#[derive(Clone, Default)]
pub struct ExtensionRegistry {
    decoders: HashMap<(ExtensionType, ExtensionContext), ExtensionDecoder>,
}

impl ExtensionRegistry {
    pub fn builder() -> ExtensionRegistryBuilder {
        ExtensionRegistryBuilder::default()
    }

    /// The shared registry with the decoders this crate knows about.
    pub fn standard() -> &'static ExtensionRegistry {
        static STANDARD: OnceLock<ExtensionRegistry> = OnceLock::new();
        STANDARD.get_or_init(|| ExtensionRegistryBuilder::standard().build())
    }

    /// A registry that keeps every payload opaque.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn decoder(
        &self,
        extension_type: ExtensionType,
        context: ExtensionContext,
    ) -> Option<&ExtensionDecoder> {
        self.decoders.get(&(extension_type, context))
    }

    pub fn is_registered(&self, extension_type: ExtensionType, context: ExtensionContext) -> bool {
        self.decoders.contains_key(&(extension_type, context))
    }

    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }
}

impl fmt::Debug for ExtensionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.decoders.keys().map(|(t, c)| (t.0, c.0)).collect();
        keys.sort_unstable();
        f.debug_struct("ExtensionRegistry")
            .field("decoders", &keys)
            .finish()
    }
}

/// Builder for [`ExtensionRegistry`].
#[derive(Default)]
pub struct ExtensionRegistryBuilder {
    decoders: HashMap<(ExtensionType, ExtensionContext), ExtensionDecoder>,
}

impl ExtensionRegistryBuilder {
    /// Builder preloaded with the standard decoders.
    pub fn standard() -> Self {
        let client = ExtensionContext::CLIENT_HELLO;
        let server = ExtensionContext::SERVER_HELLO;
        let both = ExtensionContext(client.0 | server.0);
        Self::default()
            .register(ExtensionType::SERVER_NAME, client, decode_server_names)
            .register(ExtensionType::CERT_TYPE, client, decode_cert_types)
            .register(ExtensionType::CERT_TYPE, server, decode_cert_type)
            .register(ExtensionType::SRP, client, decode_srp_identity)
            .register(ExtensionType::SUPPORTS_NPN, both, decode_next_protocols)
            .register(ExtensionType::TACK, both, decode_tack)
    }

    /// Register `decoder` for every context bit set in `context`.
    ///
    /// A later registration replaces an earlier one for the same key.
    pub fn register<F>(
        mut self,
        extension_type: ExtensionType,
        context: ExtensionContext,
        decoder: F,
    ) -> Self
    where
        F: Fn(&mut Parser<'_>) -> Result<ExtensionPayload, TlsError> + Send + Sync + 'static,
    {
        let decoder: ExtensionDecoder = Arc::new(decoder);
        for ctx in context.split() {
            if self
                .decoders
                .insert((extension_type, ctx), Arc::clone(&decoder))
                .is_some()
            {
                log::warn!(
                    "replacing decoder for extension 0x{:04x} in context {:#x}",
                    extension_type.0,
                    ctx.0
                );
            }
        }
        self
    }

    pub fn build(self) -> ExtensionRegistry {
        ExtensionRegistry {
            decoders: self.decoders,
        }
    }
}
