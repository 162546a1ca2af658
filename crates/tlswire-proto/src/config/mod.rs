//! Handshake policy settings with builder pattern.

use tlswire_types::{InternalError, ProtocolVersion, TlsError};

use crate::CertificateType;

/// Version and certificate policy consulted when checking a ServerHello.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandshakeSettings {
    /// Lowest version the client accepts.
    pub min_version: ProtocolVersion,
    /// Highest version the client accepts.
    pub max_version: ProtocolVersion,
    /// Certificate types in order of preference.
    pub certificate_types: Vec<CertificateType>,
}

impl HandshakeSettings {
    pub fn builder() -> HandshakeSettingsBuilder {
        HandshakeSettingsBuilder::default()
    }

    /// True when `version` lies within `[min_version, max_version]`.
    pub fn accepts_version(&self, version: ProtocolVersion) -> bool {
        self.min_version <= version && version <= self.max_version
    }
}

impl Default for HandshakeSettings {
    fn default() -> Self {
        Self {
            min_version: ProtocolVersion::TLS1_0,
            max_version: ProtocolVersion::TLS1_2,
            certificate_types: vec![CertificateType::X509],
        }
    }
}

/// Builder for `HandshakeSettings`.
#[derive(Debug, Clone)]
pub struct HandshakeSettingsBuilder {
    settings: HandshakeSettings,
}

impl Default for HandshakeSettingsBuilder {
    fn default() -> Self {
        Self {
            settings: HandshakeSettings::default(),
        }
    }
}

impl HandshakeSettingsBuilder {
    pub fn min_version(mut self, version: ProtocolVersion) -> Self {
        self.settings.min_version = version;
        self
    }

    pub fn max_version(mut self, version: ProtocolVersion) -> Self {
        self.settings.max_version = version;
        self
    }

    pub fn certificate_types(mut self, types: &[CertificateType]) -> Self {
        self.settings.certificate_types = types.to_vec();
        self
    }

    pub fn build(self) -> Result<HandshakeSettings, TlsError> {
        let s = self.settings;
        if s.min_version > s.max_version {
            return Err(invalid(format!(
                "min_version {} above max_version {}",
                s.min_version, s.max_version
            )));
        }
        if s.min_version < ProtocolVersion::SSL3 {
            return Err(invalid(format!(
                "min_version {} below SSLv3",
                s.min_version
            )));
        }
        if s.max_version > ProtocolVersion::TLS1_3 {
            return Err(invalid(format!(
                "max_version {} is not a known version",
                s.max_version
            )));
        }
        if s.certificate_types.is_empty() {
            return Err(invalid("no certificate types".to_string()));
        }
        Ok(s)
    }
}

fn invalid(msg: String) -> TlsError {
    InternalError::InvalidSettings(msg).into()
}
