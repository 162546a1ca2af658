//! SSLv2 handshake messages.
//!
//! SSLv2 bodies put every length field up front and the variable data after
//! them, and cipher specs are three bytes wide. The SSLv2-framed
//! ClientHello lives with the other hellos in [`super::codec`].

use tlswire_types::{ProtocolVersion, TlsError};
use tlswire_utils::codec::{Parser, Writer};

use crate::CipherSuite;

use super::{wrap_ssl2, Ssl2HandshakeType};

fn read_cipher_specs(p: &mut Parser<'_>, len: usize) -> Result<Vec<CipherSuite>, TlsError> {
    if len % 3 != 0 {
        return Err(TlsError::IllegalValue(format!(
            "cipher spec length {len} is not a multiple of 3"
        )));
    }
    Ok(p.read_list(3, len / 3)?.into_iter().map(CipherSuite).collect())
}

fn write_cipher_specs(w: &mut Writer, specs: &[CipherSuite]) -> Result<(), TlsError> {
    let values: Vec<u32> = specs.iter().map(|c| c.0).collect();
    w.write_list(&values, 3)?;
    Ok(())
}

/// SSLv2 SERVER-HELLO (type 4).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ServerHello2 {
    pub session_id_hit: u8,
    pub certificate_type: u8,
    pub server_version: ProtocolVersion,
    pub certificate: Vec<u8>,
    pub ciphers: Vec<CipherSuite>,
    /// The connection id.
    pub session_id: Vec<u8>,
}

impl ServerHello2 {
    pub fn create(
        session_id_hit: u8,
        certificate_type: u8,
        server_version: ProtocolVersion,
        certificate: &[u8],
        ciphers: &[CipherSuite],
        session_id: &[u8],
    ) -> Self {
        Self {
            session_id_hit,
            certificate_type,
            server_version,
            certificate: certificate.to_vec(),
            ciphers: ciphers.to_vec(),
            session_id: session_id.to_vec(),
        }
    }

    pub fn decode(p: &mut Parser<'_>) -> Result<Self, TlsError> {
        let session_id_hit = p.read_u8()?;
        let certificate_type = p.read_u8()?;
        let server_version = ProtocolVersion::from_u16(p.read_u16()?);
        let certificate_len = p.read_u16()? as usize;
        let ciphers_len = p.read_u16()? as usize;
        let session_id_len = p.read_u16()? as usize;
        let certificate = p.read_fixed(certificate_len)?.to_vec();
        let ciphers = read_cipher_specs(p, ciphers_len)?;
        let session_id = p.read_fixed(session_id_len)?.to_vec();
        Ok(Self {
            session_id_hit,
            certificate_type,
            server_version,
            certificate,
            ciphers,
            session_id,
        })
    }

    pub fn encode(&self) -> Result<Vec<u8>, TlsError> {
        wrap_ssl2(Ssl2HandshakeType::ServerHello, |w| {
            w.write_u8(self.session_id_hit)
                .write_u8(self.certificate_type)
                .write_u16(self.server_version.to_u16());
            w.write_uint(self.certificate.len(), 2)?;
            w.write_uint(self.ciphers.len() * 3, 2)?;
            w.write_uint(self.session_id.len(), 2)?;
            w.write_fixed(&self.certificate);
            write_cipher_specs(w, &self.ciphers)?;
            w.write_fixed(&self.session_id);
            Ok(())
        })
    }
}

/// SSLv2 CLIENT-MASTER-KEY (type 2).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClientMasterKey {
    pub cipher: CipherSuite,
    pub clear_key: Vec<u8>,
    pub encrypted_key: Vec<u8>,
    pub key_argument: Vec<u8>,
}

impl ClientMasterKey {
    pub fn create(
        cipher: CipherSuite,
        clear_key: &[u8],
        encrypted_key: &[u8],
        key_argument: &[u8],
    ) -> Self {
        Self {
            cipher,
            clear_key: clear_key.to_vec(),
            encrypted_key: encrypted_key.to_vec(),
            key_argument: key_argument.to_vec(),
        }
    }

    pub fn decode(p: &mut Parser<'_>) -> Result<Self, TlsError> {
        let cipher = CipherSuite(p.read_u24()?);
        let clear_len = p.read_u16()? as usize;
        let encrypted_len = p.read_u16()? as usize;
        let argument_len = p.read_u16()? as usize;
        Ok(Self {
            cipher,
            clear_key: p.read_fixed(clear_len)?.to_vec(),
            encrypted_key: p.read_fixed(encrypted_len)?.to_vec(),
            key_argument: p.read_fixed(argument_len)?.to_vec(),
        })
    }

    pub fn encode(&self) -> Result<Vec<u8>, TlsError> {
        wrap_ssl2(Ssl2HandshakeType::ClientMasterKey, |w| {
            w.write_uint(self.cipher.0 as usize, 3)?;
            w.write_uint(self.clear_key.len(), 2)?;
            w.write_uint(self.encrypted_key.len(), 2)?;
            w.write_uint(self.key_argument.len(), 2)?;
            w.write_fixed(&self.clear_key)
                .write_fixed(&self.encrypted_key)
                .write_fixed(&self.key_argument);
            Ok(())
        })
    }
}

/// SSLv2 CLIENT-FINISHED (type 3). The verify data runs to the end of the
/// record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClientFinished {
    pub verify_data: Vec<u8>,
}

impl ClientFinished {
    pub fn new(verify_data: &[u8]) -> Self {
        Self {
            verify_data: verify_data.to_vec(),
        }
    }

    pub fn decode(p: &mut Parser<'_>) -> Result<Self, TlsError> {
        Ok(Self::new(p.read_remaining()))
    }

    pub fn encode(&self) -> Result<Vec<u8>, TlsError> {
        wrap_ssl2(Ssl2HandshakeType::ClientFinished, |w| {
            w.write_fixed(&self.verify_data);
            Ok(())
        })
    }
}

/// SSLv2 SERVER-FINISHED (type 6). Carries the session id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ServerFinished {
    pub verify_data: Vec<u8>,
}

impl ServerFinished {
    pub fn new(verify_data: &[u8]) -> Self {
        Self {
            verify_data: verify_data.to_vec(),
        }
    }

    pub fn decode(p: &mut Parser<'_>) -> Result<Self, TlsError> {
        Ok(Self::new(p.read_remaining()))
    }

    pub fn encode(&self) -> Result<Vec<u8>, TlsError> {
        wrap_ssl2(Ssl2HandshakeType::ServerFinished, |w| {
            w.write_fixed(&self.verify_data);
            Ok(())
        })
    }
}
