//! ServerHello sanity checks against the ClientHello that solicited it.

use std::collections::HashSet;

use tlswire_types::{InternalError, Rejection, TlsError};

use crate::config::HandshakeSettings;
use crate::extensions::{ExtensionPayload, ExtensionType};
use crate::CipherSuite;

use super::{ClientHello, ServerHello};

/// Checks received ServerHellos against one ClientHello and the local
/// version policy.
#[derive(Debug, Clone)]
pub struct ServerHelloVerifier<'a> {
    client_hello: &'a ClientHello,
    settings: HandshakeSettings,
}

impl<'a> ServerHelloVerifier<'a> {
    /// Verifier using [`HandshakeSettings::default`].
    pub fn new(client_hello: &'a ClientHello) -> Self {
        Self {
            client_hello,
            settings: HandshakeSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: HandshakeSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &HandshakeSettings {
        &self.settings
    }

    /// Accept `server_hello` or report the first violated rule.
    ///
    /// Rules are checked in a fixed order: extensions advertised,
    /// extensions unique, suite offered, no compression, version not newer
    /// than offered, version within policy, certificate type offered.
    pub fn verify(&self, server_hello: &ServerHello) -> Result<(), TlsError> {
        let ch = self.client_hello;

        let mut advertised: HashSet<ExtensionType> = ch
            .extensions
            .iter()
            .flatten()
            .map(|e| e.extension_type)
            .collect();
        // Renegotiation support signalled through the SCSV counts as the
        // extension.
        if ch
            .cipher_suites
            .contains(&CipherSuite::TLS_EMPTY_RENEGOTIATION_INFO_SCSV)
        {
            advertised.insert(ExtensionType::RENEGOTIATION_INFO);
        }

        let server_extensions: Vec<ExtensionType> = server_hello
            .extensions
            .iter()
            .flatten()
            .map(|e| e.extension_type)
            .collect();
        if let Some(ext) = server_extensions.iter().find(|t| !advertised.contains(*t)) {
            log::debug!("server sent unadvertised extension 0x{:04x}", ext.0);
            return Err(TlsError::IllegalParameter(
                Rejection::ExtensionNotAdvertised(ext.0),
            ));
        }

        let mut seen = HashSet::with_capacity(server_extensions.len());
        if let Some(ext) = server_extensions.iter().find(|t| !seen.insert(**t)) {
            log::debug!("server sent extension 0x{:04x} more than once", ext.0);
            return Err(TlsError::IllegalParameter(Rejection::DuplicateExtension(
                ext.0,
            )));
        }

        let suite = server_hello.cipher_suite;
        if !ch.cipher_suites.contains(&suite) {
            log::debug!("server selected cipher suite 0x{:04x} which was not offered", suite.0);
            return Err(TlsError::IllegalParameter(Rejection::SuiteNotOffered(
                suite.0,
            )));
        }

        if server_hello.compression_method != 0 {
            log::debug!(
                "server selected compression method {}",
                server_hello.compression_method
            );
            return Err(TlsError::IllegalParameter(
                Rejection::CompressionNotOffered(server_hello.compression_method),
            ));
        }

        let version = server_hello.server_version;
        if version > ch.client_version {
            log::debug!(
                "server version {} is newer than offered {}",
                version,
                ch.client_version
            );
            return Err(TlsError::ProtocolVersion(
                Rejection::VersionNewerThanOffered {
                    server: version,
                    client: ch.client_version,
                },
            ));
        }
        if !self.settings.accepts_version(version) {
            log::debug!(
                "server version {} outside {}..={}",
                version,
                self.settings.min_version,
                self.settings.max_version
            );
            return Err(TlsError::ProtocolVersion(Rejection::VersionOutOfPolicy {
                version,
                min: self.settings.min_version,
                max: self.settings.max_version,
            }));
        }

        if server_hello
            .get_extension(ExtensionType::CERT_TYPE)?
            .is_some()
        {
            let offered = match ch.get_extension(ExtensionType::CERT_TYPE)? {
                Some(ext) => match &ext.payload {
                    ExtensionPayload::CertTypes(types) => types,
                    _ => return Err(InternalError::MissingClientCertType.into()),
                },
                None => return Err(InternalError::MissingClientCertType.into()),
            };
            let chosen = server_hello.certificate_type()?;
            if !offered.contains(&chosen) {
                log::debug!("server chose certificate type {} which was not offered", chosen.0);
                return Err(TlsError::IllegalParameter(
                    Rejection::CertificateTypeNotOffered(chosen.0),
                ));
            }
        }

        Ok(())
    }
}

/// One-shot form of [`ServerHelloVerifier::verify`].
pub fn verify_server_hello(
    client_hello: &ClientHello,
    server_hello: &ServerHello,
    settings: &HandshakeSettings,
) -> Result<(), TlsError> {
    ServerHelloVerifier::new(client_hello)
        .with_settings(settings.clone())
        .verify(server_hello)
}
