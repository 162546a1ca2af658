//! Key exchange and client authentication messages.
//!
//! The layout of ClientKeyExchange and ServerKeyExchange depends on the
//! negotiated cipher suite, and ServerKeyExchange, CertificateRequest and
//! CertificateVerify gain signature algorithm fields from TLS 1.2 on, so
//! their decoders take the suite and version as arguments.

use tlswire_bignum::BigNum;
use tlswire_types::{InternalError, ProtocolVersion, TlsError};
use tlswire_utils::codec::{Parser, Writer};

use crate::crypt::{md5_sha1, EcCurveType, NamedGroup, SignatureScheme};
use crate::{CipherSuite, KeyExchangeAlgorithm, KeyExchangeFamily};

use super::{wrap_handshake, HandshakeType};

fn key_exchange_of(suite: CipherSuite) -> Result<KeyExchangeAlgorithm, TlsError> {
    suite
        .key_exchange()
        .ok_or_else(|| InternalError::UnknownCipherSuite(suite.0).into())
}

fn read_bignum(p: &mut Parser<'_>) -> Result<BigNum, TlsError> {
    Ok(BigNum::from_bytes_be(p.read_var_bytes(2)?))
}

fn write_bignum(w: &mut Writer, n: &BigNum) -> Result<(), TlsError> {
    w.write_var_bytes(&n.to_bytes_be(), 2)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// ClientKeyExchange
// ---------------------------------------------------------------------------

/// Client key material, by key exchange family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientKeyParams {
    /// RSA-encrypted premaster secret.
    Rsa { encrypted_premaster: Vec<u8> },
    /// Client Diffie-Hellman public value.
    Dh { yc: BigNum },
    /// Client SRP public value.
    Srp { a: BigNum },
    /// Client ECDH public point.
    Ecdh { point: Vec<u8> },
}

impl ClientKeyParams {
    fn family(&self) -> KeyExchangeFamily {
        match self {
            Self::Rsa { .. } => KeyExchangeFamily::Rsa,
            Self::Dh { .. } => KeyExchangeFamily::Dh,
            Self::Srp { .. } => KeyExchangeFamily::Srp,
            Self::Ecdh { .. } => KeyExchangeFamily::Ecdh,
        }
    }
}

/// ClientKeyExchange (type 16).
///
/// The protocol version only matters for RSA key exchange, where SSLv3
/// omits the length prefix of the encrypted premaster secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientKeyExchange {
    pub cipher_suite: CipherSuite,
    pub version: Option<ProtocolVersion>,
    pub params: Option<ClientKeyParams>,
}

impl ClientKeyExchange {
    pub fn new(cipher_suite: CipherSuite, version: Option<ProtocolVersion>) -> Self {
        Self {
            cipher_suite,
            version,
            params: None,
        }
    }

    pub fn create_rsa(mut self, encrypted_premaster: &[u8]) -> Self {
        self.params = Some(ClientKeyParams::Rsa {
            encrypted_premaster: encrypted_premaster.to_vec(),
        });
        self
    }

    pub fn create_dh(mut self, yc: BigNum) -> Self {
        self.params = Some(ClientKeyParams::Dh { yc });
        self
    }

    pub fn create_srp(mut self, a: BigNum) -> Self {
        self.params = Some(ClientKeyParams::Srp { a });
        self
    }

    pub fn create_ecdh(mut self, point: &[u8]) -> Self {
        self.params = Some(ClientKeyParams::Ecdh {
            point: point.to_vec(),
        });
        self
    }

    fn rsa_version(&self) -> Result<ProtocolVersion, TlsError> {
        Ok(self.version.ok_or(InternalError::MissingVersion)?)
    }

    /// Decode the length and body; the type byte has already been read.
    pub fn decode(
        p: &mut Parser<'_>,
        cipher_suite: CipherSuite,
        version: Option<ProtocolVersion>,
    ) -> Result<Self, TlsError> {
        let mut cke = Self::new(cipher_suite, version);
        let params = p.scoped(3, |p| {
            let family = key_exchange_of(cipher_suite)?.family();
            Ok(match family {
                KeyExchangeFamily::Rsa => {
                    let encrypted_premaster = if cke.rsa_version()? >= ProtocolVersion::TLS1_0 {
                        p.read_var_bytes(2)?
                    } else {
                        p.read_remaining()
                    };
                    ClientKeyParams::Rsa {
                        encrypted_premaster: encrypted_premaster.to_vec(),
                    }
                }
                KeyExchangeFamily::Dh => ClientKeyParams::Dh { yc: read_bignum(p)? },
                KeyExchangeFamily::Srp => ClientKeyParams::Srp { a: read_bignum(p)? },
                KeyExchangeFamily::Ecdh => ClientKeyParams::Ecdh {
                    point: p.read_var_bytes(1)?.to_vec(),
                },
            })
        })?;
        cke.params = Some(params);
        Ok(cke)
    }

    pub fn encode(&self) -> Result<Vec<u8>, TlsError> {
        let family = key_exchange_of(self.cipher_suite)?.family();
        let params = self
            .params
            .as_ref()
            .filter(|params| params.family() == family)
            .ok_or(InternalError::KeyExchangeMismatch(self.cipher_suite.0))?;
        wrap_handshake(HandshakeType::ClientKeyExchange, |w| {
            match params {
                ClientKeyParams::Rsa {
                    encrypted_premaster,
                } => {
                    if self.rsa_version()? >= ProtocolVersion::TLS1_0 {
                        w.write_var_bytes(encrypted_premaster, 2)?;
                    } else {
                        w.write_fixed(encrypted_premaster);
                    }
                }
                ClientKeyParams::Dh { yc } => write_bignum(w, yc)?,
                ClientKeyParams::Srp { a } => write_bignum(w, a)?,
                ClientKeyParams::Ecdh { point } => {
                    w.write_var_bytes(point, 1)?;
                }
            }
            Ok(())
        })
    }
}

// ---------------------------------------------------------------------------
// ServerKeyExchange
// ---------------------------------------------------------------------------

/// Reduction polynomial of a characteristic-2 curve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EcBasis {
    Trinomial { k: Vec<u8> },
    Pentanomial { k1: Vec<u8>, k2: Vec<u8>, k3: Vec<u8> },
}

const EC_BASIS_TRINOMIAL: u8 = 1;
const EC_BASIS_PENTANOMIAL: u8 = 2;

/// ECParameters (RFC 4492 Section 5.4). Field elements and points are
/// kept as their opaque encodings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EcParameters {
    NamedCurve(NamedGroup),
    ExplicitPrime {
        prime: Vec<u8>,
        a: Vec<u8>,
        b: Vec<u8>,
        base: Vec<u8>,
        order: Vec<u8>,
        cofactor: Vec<u8>,
    },
    ExplicitChar2 {
        m: u16,
        basis: EcBasis,
        a: Vec<u8>,
        b: Vec<u8>,
        base: Vec<u8>,
        order: Vec<u8>,
        cofactor: Vec<u8>,
    },
}

fn read_opaque8(p: &mut Parser<'_>) -> Result<Vec<u8>, TlsError> {
    Ok(p.read_var_bytes(1)?.to_vec())
}

impl EcParameters {
    pub fn decode(p: &mut Parser<'_>) -> Result<Self, TlsError> {
        let curve_type = EcCurveType(p.read_u8()?);
        match curve_type {
            EcCurveType::NAMED_CURVE => Ok(Self::NamedCurve(NamedGroup(p.read_u16()?))),
            EcCurveType::EXPLICIT_PRIME => Ok(Self::ExplicitPrime {
                prime: read_opaque8(p)?,
                a: read_opaque8(p)?,
                b: read_opaque8(p)?,
                base: read_opaque8(p)?,
                order: read_opaque8(p)?,
                cofactor: read_opaque8(p)?,
            }),
            EcCurveType::EXPLICIT_CHAR2 => {
                let m = p.read_u16()?;
                let basis = match p.read_u8()? {
                    EC_BASIS_TRINOMIAL => EcBasis::Trinomial {
                        k: read_opaque8(p)?,
                    },
                    EC_BASIS_PENTANOMIAL => EcBasis::Pentanomial {
                        k1: read_opaque8(p)?,
                        k2: read_opaque8(p)?,
                        k3: read_opaque8(p)?,
                    },
                    other => {
                        return Err(TlsError::IllegalValue(format!(
                            "unknown characteristic-2 basis {other}"
                        )))
                    }
                };
                Ok(Self::ExplicitChar2 {
                    m,
                    basis,
                    a: read_opaque8(p)?,
                    b: read_opaque8(p)?,
                    base: read_opaque8(p)?,
                    order: read_opaque8(p)?,
                    cofactor: read_opaque8(p)?,
                })
            }
            other => Err(TlsError::IllegalValue(format!(
                "unknown EC curve type {}",
                other.0
            ))),
        }
    }

    pub fn encode(&self, w: &mut Writer) -> Result<(), TlsError> {
        match self {
            Self::NamedCurve(group) => {
                w.write_u8(EcCurveType::NAMED_CURVE.0).write_u16(group.0);
            }
            Self::ExplicitPrime {
                prime,
                a,
                b,
                base,
                order,
                cofactor,
            } => {
                w.write_u8(EcCurveType::EXPLICIT_PRIME.0);
                for field in [prime, a, b, base, order, cofactor] {
                    w.write_var_bytes(field, 1)?;
                }
            }
            Self::ExplicitChar2 {
                m,
                basis,
                a,
                b,
                base,
                order,
                cofactor,
            } => {
                w.write_u8(EcCurveType::EXPLICIT_CHAR2.0).write_u16(*m);
                match basis {
                    EcBasis::Trinomial { k } => {
                        w.write_u8(EC_BASIS_TRINOMIAL).write_var_bytes(k, 1)?;
                    }
                    EcBasis::Pentanomial { k1, k2, k3 } => {
                        w.write_u8(EC_BASIS_PENTANOMIAL);
                        for k in [k1, k2, k3] {
                            w.write_var_bytes(k, 1)?;
                        }
                    }
                }
                for field in [a, b, base, order, cofactor] {
                    w.write_var_bytes(field, 1)?;
                }
            }
        }
        Ok(())
    }
}

/// Server key exchange parameters, by key exchange family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerKeyParams {
    Dh {
        p: BigNum,
        g: BigNum,
        ys: BigNum,
    },
    Srp {
        n: BigNum,
        g: BigNum,
        s: Vec<u8>,
        b: BigNum,
    },
    Ecdh {
        curve: EcParameters,
        point: Vec<u8>,
    },
}

impl ServerKeyParams {
    fn family(&self) -> KeyExchangeFamily {
        match self {
            Self::Dh { .. } => KeyExchangeFamily::Dh,
            Self::Srp { .. } => KeyExchangeFamily::Srp,
            Self::Ecdh { .. } => KeyExchangeFamily::Ecdh,
        }
    }

    fn decode(p: &mut Parser<'_>, cipher_suite: CipherSuite) -> Result<Self, TlsError> {
        let params = match key_exchange_of(cipher_suite)?.family() {
            KeyExchangeFamily::Rsa => {
                return Err(InternalError::KeyExchangeMismatch(cipher_suite.0).into())
            }
            KeyExchangeFamily::Dh => Self::Dh {
                p: read_bignum(p)?,
                g: read_bignum(p)?,
                ys: read_bignum(p)?,
            },
            KeyExchangeFamily::Srp => Self::Srp {
                n: read_bignum(p)?,
                g: read_bignum(p)?,
                s: read_opaque8(p)?,
                b: read_bignum(p)?,
            },
            KeyExchangeFamily::Ecdh => Self::Ecdh {
                curve: EcParameters::decode(p)?,
                point: read_opaque8(p)?,
            },
        };
        Ok(params)
    }

    fn encode(&self, w: &mut Writer) -> Result<(), TlsError> {
        match self {
            Self::Dh { p, g, ys } => {
                write_bignum(w, p)?;
                write_bignum(w, g)?;
                write_bignum(w, ys)?;
            }
            Self::Srp { n, g, s, b } => {
                write_bignum(w, n)?;
                write_bignum(w, g)?;
                w.write_var_bytes(s, 1)?;
                write_bignum(w, b)?;
            }
            Self::Ecdh { curve, point } => {
                curve.encode(w)?;
                w.write_var_bytes(point, 1)?;
            }
        }
        Ok(())
    }
}

/// ServerKeyExchange (type 12).
///
/// Signed key exchanges carry a signature after the parameters; from
/// TLS 1.2 on it is preceded by the (hash, signature) algorithm pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerKeyExchange {
    pub cipher_suite: CipherSuite,
    pub version: ProtocolVersion,
    pub params: Option<ServerKeyParams>,
    pub signature_algorithm: SignatureScheme,
    pub signature: Vec<u8>,
}

impl ServerKeyExchange {
    pub fn new(cipher_suite: CipherSuite, version: ProtocolVersion) -> Self {
        Self {
            cipher_suite,
            version,
            params: None,
            signature_algorithm: SignatureScheme::default(),
            signature: Vec::new(),
        }
    }

    pub fn create_dh(mut self, p: BigNum, g: BigNum, ys: BigNum) -> Self {
        self.params = Some(ServerKeyParams::Dh { p, g, ys });
        self
    }

    pub fn create_srp(mut self, n: BigNum, g: BigNum, s: &[u8], b: BigNum) -> Self {
        self.params = Some(ServerKeyParams::Srp {
            n,
            g,
            s: s.to_vec(),
            b,
        });
        self
    }

    pub fn create_ecdh(mut self, curve: EcParameters, point: &[u8]) -> Self {
        self.params = Some(ServerKeyParams::Ecdh {
            curve,
            point: point.to_vec(),
        });
        self
    }

    pub fn with_signature(mut self, algorithm: SignatureScheme, signature: &[u8]) -> Self {
        self.signature_algorithm = algorithm;
        self.signature = signature.to_vec();
        self
    }

    fn has_signature_algorithm(&self) -> bool {
        self.version.has_signature_algorithms()
    }

    /// Serialized key exchange parameters, the part covered by the
    /// signature.
    pub fn params_bytes(&self) -> Result<Vec<u8>, TlsError> {
        let family = key_exchange_of(self.cipher_suite)?.family();
        let params = self
            .params
            .as_ref()
            .filter(|params| params.family() == family)
            .ok_or(InternalError::KeyExchangeMismatch(self.cipher_suite.0))?;
        let mut w = Writer::new();
        params.encode(&mut w)?;
        Ok(w.finish())
    }

    /// Digest to be signed or verified:
    /// `client_random || server_random || params`, hashed with MD5||SHA-1
    /// before TLS 1.2 and with the hash of `signature_algorithm` after.
    pub fn hash(&self, client_random: &[u8], server_random: &[u8]) -> Result<Vec<u8>, TlsError> {
        let params = self.params_bytes()?;
        let mut data = Vec::with_capacity(client_random.len() + server_random.len() + params.len());
        data.extend_from_slice(client_random);
        data.extend_from_slice(server_random);
        data.extend_from_slice(&params);
        if self.has_signature_algorithm() {
            self.signature_algorithm.hash().digest(&data)
        } else {
            md5_sha1(&data)
        }
    }

    pub fn decode(
        p: &mut Parser<'_>,
        cipher_suite: CipherSuite,
        version: ProtocolVersion,
    ) -> Result<Self, TlsError> {
        let mut ske = Self::new(cipher_suite, version);
        p.scoped(3, |p| {
            let kx = key_exchange_of(cipher_suite)?;
            ske.params = Some(ServerKeyParams::decode(p, cipher_suite)?);
            if kx.is_signed() {
                if ske.has_signature_algorithm() {
                    ske.signature_algorithm = SignatureScheme(p.read_u16()?);
                }
                ske.signature = p.read_var_bytes(2)?.to_vec();
            }
            Ok(())
        })?;
        Ok(ske)
    }

    pub fn encode(&self) -> Result<Vec<u8>, TlsError> {
        let params = self.params_bytes()?;
        let signed = key_exchange_of(self.cipher_suite)?.is_signed();
        wrap_handshake(HandshakeType::ServerKeyExchange, |w| {
            w.write_fixed(&params);
            if signed {
                if self.has_signature_algorithm() {
                    w.write_u16(self.signature_algorithm.0);
                }
                w.write_var_bytes(&self.signature, 2)?;
            }
            Ok(())
        })
    }
}

// ---------------------------------------------------------------------------
// CertificateRequest / CertificateVerify
// ---------------------------------------------------------------------------

/// ClientCertificateType registry value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientCertificateType(pub u8);

impl ClientCertificateType {
    pub const RSA_SIGN: Self = Self(1);
    pub const DSS_SIGN: Self = Self(2);
    pub const RSA_FIXED_DH: Self = Self(3);
    pub const DSS_FIXED_DH: Self = Self(4);
    pub const ECDSA_SIGN: Self = Self(64);
}

/// CertificateRequest (type 13).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateRequest {
    pub version: ProtocolVersion,
    pub certificate_types: Vec<ClientCertificateType>,
    /// Only on the wire from TLS 1.2 on.
    pub supported_signature_algs: Vec<SignatureScheme>,
    /// DER-encoded distinguished names.
    pub certificate_authorities: Vec<Vec<u8>>,
}

impl CertificateRequest {
    pub fn new(version: ProtocolVersion) -> Self {
        Self {
            version,
            certificate_types: Vec::new(),
            supported_signature_algs: Vec::new(),
            certificate_authorities: Vec::new(),
        }
    }

    pub fn create(
        mut self,
        certificate_types: &[ClientCertificateType],
        certificate_authorities: &[Vec<u8>],
        supported_signature_algs: &[SignatureScheme],
    ) -> Self {
        self.certificate_types = certificate_types.to_vec();
        self.certificate_authorities = certificate_authorities.to_vec();
        self.supported_signature_algs = supported_signature_algs.to_vec();
        self
    }

    pub fn decode(p: &mut Parser<'_>, version: ProtocolVersion) -> Result<Self, TlsError> {
        let mut cr = Self::new(version);
        p.scoped(3, |p| {
            cr.certificate_types = p
                .read_var_bytes(1)?
                .iter()
                .map(|&t| ClientCertificateType(t))
                .collect();
            if version.has_signature_algorithms() {
                cr.supported_signature_algs = p
                    .read_var_list(2, 2)?
                    .into_iter()
                    .map(|v| SignatureScheme(v as u16))
                    .collect();
            }
            cr.certificate_authorities = p.scoped(2, |p| {
                let mut names = Vec::new();
                while !p.is_empty() {
                    names.push(p.read_var_bytes(2)?.to_vec());
                }
                Ok(names)
            })?;
            Ok(())
        })?;
        Ok(cr)
    }

    pub fn encode(&self) -> Result<Vec<u8>, TlsError> {
        wrap_handshake(HandshakeType::CertificateRequest, |w| {
            let types: Vec<u8> = self.certificate_types.iter().map(|t| t.0).collect();
            w.write_var_bytes(&types, 1)?;
            if self.version.has_signature_algorithms() {
                let algs: Vec<u32> = self
                    .supported_signature_algs
                    .iter()
                    .map(|s| u32::from(s.0))
                    .collect();
                w.write_var_list(&algs, 2, 2)?;
            }
            w.with_length_prefix(2, |w| {
                for name in &self.certificate_authorities {
                    w.write_var_bytes(name, 2)?;
                }
                Ok(())
            })?;
            Ok(())
        })
    }
}

/// CertificateVerify (type 15).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateVerify {
    pub version: ProtocolVersion,
    /// Required from TLS 1.2 on, ignored before.
    pub signature_algorithm: Option<SignatureScheme>,
    pub signature: Vec<u8>,
}

impl CertificateVerify {
    pub fn new(version: ProtocolVersion) -> Self {
        Self {
            version,
            signature_algorithm: None,
            signature: Vec::new(),
        }
    }

    pub fn create(mut self, signature: &[u8], signature_algorithm: Option<SignatureScheme>) -> Self {
        self.signature = signature.to_vec();
        self.signature_algorithm = signature_algorithm;
        self
    }

    pub fn decode(p: &mut Parser<'_>, version: ProtocolVersion) -> Result<Self, TlsError> {
        let mut cv = Self::new(version);
        p.scoped(3, |p| {
            if version.has_signature_algorithms() {
                cv.signature_algorithm = Some(SignatureScheme(p.read_u16()?));
            }
            cv.signature = p.read_var_bytes(2)?.to_vec();
            Ok(())
        })?;
        Ok(cv)
    }

    pub fn encode(&self) -> Result<Vec<u8>, TlsError> {
        let algorithm = if self.version.has_signature_algorithms() {
            Some(
                self.signature_algorithm
                    .ok_or(InternalError::MissingSignatureAlgorithm)?,
            )
        } else {
            None
        };
        wrap_handshake(HandshakeType::CertificateVerify, |w| {
            if let Some(algorithm) = algorithm {
                w.write_u16(algorithm.0);
            }
            w.write_var_bytes(&self.signature, 2)?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypt::{HashAlgorithm, SignatureAlgorithm};

    fn hex(s: &str) -> Vec<u8> {
        let s: String = s.split_whitespace().collect();
        (0..s.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap())
            .collect()
    }

    fn big(bits: usize, plus: u64) -> BigNum {
        BigNum::one().shl(bits).add(&BigNum::from_u64(plus))
    }

    fn is_internal(err: &TlsError) -> bool {
        err.is_internal()
    }

    #[test]
    fn test_cke_srp_encode() {
        let cke = ClientKeyExchange::new(CipherSuite::TLS_SRP_SHA_WITH_AES_128_CBC_SHA, None)
            .create_srp(big(128, 3));
        let expected = hex(&format!("10 000013 0011 01 {} 03", "00".repeat(15)));
        assert_eq!(cke.encode().unwrap(), expected);
    }

    #[test]
    fn test_cke_rsa_encode_tls12() {
        let cke = ClientKeyExchange::new(
            CipherSuite::TLS_RSA_WITH_AES_128_CBC_SHA,
            Some(ProtocolVersion::TLS1_2),
        )
        .create_rsa(&[0u8; 12]);
        let expected = hex(&format!("10 00000e 000c {}", "00".repeat(12)));
        assert_eq!(cke.encode().unwrap(), expected);
    }

    #[test]
    fn test_cke_rsa_encode_ssl3() {
        let cke = ClientKeyExchange::new(
            CipherSuite::TLS_RSA_WITH_AES_128_CBC_SHA,
            Some(ProtocolVersion::SSL3),
        )
        .create_rsa(&[0u8; 12]);
        let expected = hex(&format!("10 00000c {}", "00".repeat(12)));
        assert_eq!(cke.encode().unwrap(), expected);

        let mut p = Parser::new(&expected[1..]);
        let parsed = ClientKeyExchange::decode(
            &mut p,
            CipherSuite::TLS_RSA_WITH_AES_128_CBC_SHA,
            Some(ProtocolVersion::SSL3),
        )
        .unwrap();
        assert_eq!(parsed, cke);
    }

    #[test]
    fn test_cke_rsa_without_version() {
        let cke = ClientKeyExchange::new(CipherSuite::TLS_RSA_WITH_AES_128_CBC_SHA, None)
            .create_rsa(&[1, 2]);
        let err = cke.encode().unwrap_err();
        assert!(matches!(err, TlsError::Internal(InternalError::MissingVersion)));

        let data = hex("000004 0002 0102");
        let err = ClientKeyExchange::decode(
            &mut Parser::new(&data),
            CipherSuite::TLS_RSA_WITH_AES_128_CBC_SHA,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, TlsError::Internal(InternalError::MissingVersion)));
    }

    #[test]
    fn test_cke_dh_encode() {
        let cke = ClientKeyExchange::new(
            CipherSuite::TLS_DHE_RSA_WITH_AES_128_CBC_SHA,
            Some(ProtocolVersion::TLS1_2),
        )
        .create_dh(big(64, 3));
        let expected = hex(&format!("10 00000b 0009 01 {} 03", "00".repeat(7)));
        assert_eq!(cke.encode().unwrap(), expected);
    }

    #[test]
    fn test_cke_ecdh_round_trip() {
        let cke = ClientKeyExchange::new(
            CipherSuite::TLS_ECDHE_RSA_WITH_AES_128_CBC_SHA,
            Some(ProtocolVersion::TLS1_2),
        )
        .create_ecdh(&[0x04, 0xFF, 0xAB]);
        let bytes = cke.encode().unwrap();
        assert_eq!(bytes, hex("10 000004 03 04ffab"));
        let parsed = ClientKeyExchange::decode(
            &mut Parser::new(&bytes[1..]),
            CipherSuite::TLS_ECDHE_RSA_WITH_AES_128_CBC_SHA,
            Some(ProtocolVersion::TLS1_2),
        )
        .unwrap();
        assert_eq!(parsed, cke);
    }

    #[test]
    fn test_cke_parse_srp() {
        let data = hex(&format!("00000a 0008 {} ff", "00".repeat(7)));
        let cke = ClientKeyExchange::decode(
            &mut Parser::new(&data),
            CipherSuite::TLS_SRP_SHA_WITH_AES_128_CBC_SHA,
            Some(ProtocolVersion::TLS1_1),
        )
        .unwrap();
        assert_eq!(
            cke.params,
            Some(ClientKeyParams::Srp {
                a: BigNum::from_u64(255)
            })
        );
    }

    #[test]
    fn test_cke_unknown_suite() {
        let data = hex("000000");
        let err = ClientKeyExchange::decode(
            &mut Parser::new(&data),
            CipherSuite::TLS_NULL_WITH_NULL_NULL,
            Some(ProtocolVersion::TLS1_2),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            TlsError::Internal(InternalError::UnknownCipherSuite(0))
        ));

        let cke = ClientKeyExchange::new(CipherSuite::TLS_NULL_WITH_NULL_NULL, None);
        assert!(is_internal(&cke.encode().unwrap_err()));
    }

    #[test]
    fn test_cke_params_mismatch() {
        let cke = ClientKeyExchange::new(
            CipherSuite::TLS_DHE_RSA_WITH_AES_128_CBC_SHA,
            Some(ProtocolVersion::TLS1_2),
        )
        .create_srp(BigNum::from_u64(5));
        assert!(matches!(
            cke.encode().unwrap_err(),
            TlsError::Internal(InternalError::KeyExchangeMismatch(0x0033))
        ));
        let empty = ClientKeyExchange::new(
            CipherSuite::TLS_DHE_RSA_WITH_AES_128_CBC_SHA,
            Some(ProtocolVersion::TLS1_2),
        );
        assert!(is_internal(&empty.encode().unwrap_err()));
    }

    fn srp_ske(version: ProtocolVersion, suite: CipherSuite) -> ServerKeyExchange {
        ServerKeyExchange::new(suite, version).create_srp(
            BigNum::from_u64(1),
            BigNum::from_u64(2),
            &[0, 0, 0],
            BigNum::from_u64(4),
        )
    }

    #[test]
    fn test_ske_srp_unsigned() {
        let ske = srp_ske(
            ProtocolVersion::TLS1_2,
            CipherSuite::TLS_SRP_SHA_WITH_AES_128_CBC_SHA,
        );
        let bytes = ske.encode().unwrap();
        assert_eq!(bytes, hex("0c 00000d 0001 01 0001 02 03 000000 0001 04"));
        let parsed = ServerKeyExchange::decode(
            &mut Parser::new(&bytes[1..]),
            CipherSuite::TLS_SRP_SHA_WITH_AES_128_CBC_SHA,
            ProtocolVersion::TLS1_2,
        )
        .unwrap();
        assert_eq!(parsed, ske);
    }

    #[test]
    fn test_ske_srp_signed_tls10() {
        let ske = srp_ske(
            ProtocolVersion::TLS1_0,
            CipherSuite::TLS_SRP_SHA_RSA_WITH_AES_128_CBC_SHA,
        )
        .with_signature(SignatureScheme::default(), &[0xC0, 0xFF, 0xEE]);
        assert_eq!(
            ske.encode().unwrap(),
            hex("0c 000012 0001 01 0001 02 03 000000 0001 04 0003 c0ffee")
        );
    }

    #[test]
    fn test_ske_srp_signed_tls12() {
        let ske = srp_ske(
            ProtocolVersion::TLS1_2,
            CipherSuite::TLS_SRP_SHA_RSA_WITH_AES_128_CBC_SHA,
        )
        .with_signature(SignatureScheme::RSA_PKCS1_SHA512, &[0xC0, 0xFF, 0xEE]);
        let bytes = ske.encode().unwrap();
        assert_eq!(
            bytes,
            hex("0c 000014 0001 01 0001 02 03 000000 0001 04 0601 0003 c0ffee")
        );
        let parsed = ServerKeyExchange::decode(
            &mut Parser::new(&bytes[1..]),
            CipherSuite::TLS_SRP_SHA_RSA_WITH_AES_128_CBC_SHA,
            ProtocolVersion::TLS1_2,
        )
        .unwrap();
        assert_eq!(parsed.signature_algorithm, SignatureScheme::RSA_PKCS1_SHA512);
        assert_eq!(parsed.signature, vec![0xC0, 0xFF, 0xEE]);
    }

    #[test]
    fn test_ske_dh_anon() {
        let ske = ServerKeyExchange::new(
            CipherSuite::TLS_DH_ANON_WITH_AES_128_CBC_SHA,
            ProtocolVersion::TLS1_1,
        )
        .create_dh(
            BigNum::from_u64(31),
            BigNum::from_u64(2),
            BigNum::from_u64(16),
        );
        let bytes = ske.encode().unwrap();
        assert_eq!(bytes, hex("0c 000009 0001 1f 0001 02 0001 10"));
        let parsed = ServerKeyExchange::decode(
            &mut Parser::new(&bytes[1..]),
            CipherSuite::TLS_DH_ANON_WITH_AES_128_CBC_SHA,
            ProtocolVersion::TLS1_1,
        )
        .unwrap();
        assert_eq!(parsed, ske);
    }

    #[test]
    fn test_ske_ecdhe_named_curve() {
        let data = hex(&format!(
            "00001d 03 0017 05 040a0a0b0b 0201 0010 {}",
            "ff".repeat(16)
        ));
        let ske = ServerKeyExchange::decode(
            &mut Parser::new(&data),
            CipherSuite::TLS_ECDHE_RSA_WITH_AES_128_CBC_SHA,
            ProtocolVersion::TLS1_2,
        )
        .unwrap();
        assert_eq!(
            ske.params,
            Some(ServerKeyParams::Ecdh {
                curve: EcParameters::NamedCurve(NamedGroup::SECP256R1),
                point: hex("040a0a0b0b"),
            })
        );
        assert_eq!(ske.signature_algorithm, SignatureScheme::RSA_PKCS1_SHA1);
        assert_eq!(ske.signature, vec![0xFF; 16]);
        let mut expected = vec![0x0C];
        expected.extend_from_slice(&data);
        assert_eq!(ske.encode().unwrap(), expected);
    }

    #[test]
    fn test_ec_parameters_explicit() {
        let prime = EcParameters::ExplicitPrime {
            prime: vec![0x17],
            a: vec![1],
            b: vec![2],
            base: vec![4, 5, 6],
            order: vec![0x13],
            cofactor: vec![1],
        };
        let char2 = EcParameters::ExplicitChar2 {
            m: 163,
            basis: EcBasis::Pentanomial {
                k1: vec![3],
                k2: vec![6],
                k3: vec![7],
            },
            a: vec![1],
            b: vec![1],
            base: vec![4],
            order: vec![5],
            cofactor: vec![2],
        };
        for params in [prime, char2] {
            let mut w = Writer::new();
            params.encode(&mut w).unwrap();
            let bytes = w.finish();
            let mut p = Parser::new(&bytes);
            assert_eq!(EcParameters::decode(&mut p).unwrap(), params);
            assert!(p.is_empty());
        }
    }

    #[test]
    fn test_ec_parameters_unknown_type() {
        let data = [0x04, 0x00, 0x17];
        assert!(matches!(
            EcParameters::decode(&mut Parser::new(&data)),
            Err(TlsError::IllegalValue(_))
        ));
        let data = [0x02, 0x00, 0xA3, 0x03];
        assert!(matches!(
            EcParameters::decode(&mut Parser::new(&data)),
            Err(TlsError::IllegalValue(_))
        ));
    }

    #[test]
    fn test_ske_signature_past_end() {
        let data = hex("000013 0001 01 0001 02 03 000000 0001 04 0006 ffffffff");
        let result = ServerKeyExchange::decode(
            &mut Parser::new(&data),
            CipherSuite::TLS_SRP_SHA_RSA_WITH_AES_128_CBC_SHA,
            ProtocolVersion::TLS1_0,
        );
        assert!(matches!(result, Err(TlsError::LengthMismatch { .. })));
    }

    #[test]
    fn test_ske_rsa_suite_rejected() {
        let data = hex("000000");
        let err = ServerKeyExchange::decode(
            &mut Parser::new(&data),
            CipherSuite::TLS_RSA_WITH_AES_128_CBC_SHA,
            ProtocolVersion::TLS1_2,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            TlsError::Internal(InternalError::KeyExchangeMismatch(0x002F))
        ));
    }

    #[test]
    fn test_ske_hash_legacy() {
        let ske = srp_ske(
            ProtocolVersion::TLS1_0,
            CipherSuite::TLS_SRP_SHA_RSA_WITH_AES_128_CBC_SHA,
        );
        let digest = ske.hash(&[0u8; 32], &[0u8; 32]).unwrap();
        assert_eq!(
            digest,
            hex("cbe6d33d8b24ff976526b2891d41ab3e 8e3f5957cdadc683911d2e66652c17793dc45489")
        );
    }

    #[test]
    fn test_ske_hash_tls12_sha1() {
        let ske = srp_ske(
            ProtocolVersion::TLS1_2,
            CipherSuite::TLS_SRP_SHA_RSA_WITH_AES_128_CBC_SHA,
        )
        .with_signature(
            SignatureScheme::new(HashAlgorithm::SHA1, SignatureAlgorithm::RSA),
            &[],
        );
        let digest = ske.hash(&[0u8; 32], &[0u8; 32]).unwrap();
        assert_eq!(digest, hex("8e3f5957cdadc683911d2e66652c17793dc45489"));
    }

    #[test]
    fn test_ske_hash_dh_params() {
        let dh_ske = |version| {
            ServerKeyExchange::new(CipherSuite::TLS_DHE_RSA_WITH_AES_128_CBC_SHA, version)
                .create_dh(
                    BigNum::from_u64(23),
                    BigNum::from_u64(2),
                    BigNum::from_u64(13),
                )
        };
        assert_eq!(
            dh_ske(ProtocolVersion::TLS1_1).params_bytes().unwrap(),
            hex("0001 17 0001 02 0001 0d")
        );

        let legacy = dh_ske(ProtocolVersion::TLS1_1)
            .hash(&[0u8; 32], &[0u8; 32])
            .unwrap();
        assert_eq!(
            legacy,
            hex("1550568418a758f996541254b743b433 7aea2ea91571c5c116cd2925be28187138ab6abc")
        );

        let sha1 = dh_ske(ProtocolVersion::TLS1_2)
            .with_signature(
                SignatureScheme::new(HashAlgorithm::SHA1, SignatureAlgorithm::RSA),
                &[],
            )
            .hash(&[0u8; 32], &[0u8; 32])
            .unwrap();
        assert_eq!(sha1, legacy[16..]);

        let sha256 = dh_ske(ProtocolVersion::TLS1_2)
            .with_signature(
                SignatureScheme::new(HashAlgorithm::SHA256, SignatureAlgorithm::RSA),
                &[],
            )
            .hash(&[0u8; 32], &[0u8; 32])
            .unwrap();
        assert_eq!(
            sha256,
            hex("4c2e8677917d1719cadb9ce1b5d71f36cbdc7310c8e2ca8e376b3630c433a50e")
        );
    }

    #[test]
    fn test_ske_hash_errors() {
        let ske = ServerKeyExchange::new(CipherSuite::TLS_NULL_WITH_NULL_NULL, ProtocolVersion::TLS1_0);
        assert!(matches!(
            ske.hash(&[0u8; 32], &[0u8; 32]).unwrap_err(),
            TlsError::Internal(InternalError::UnknownCipherSuite(0))
        ));

        let ske = ServerKeyExchange::new(
            CipherSuite::TLS_DHE_RSA_WITH_AES_128_CBC_SHA,
            ProtocolVersion::TLS1_2,
        )
        .create_dh(BigNum::from_u64(1), BigNum::from_u64(2), BigNum::from_u64(3))
        .with_signature(SignatureScheme(0x0701), &[]);
        assert!(matches!(
            ske.hash(&[0u8; 32], &[0u8; 32]).unwrap_err(),
            TlsError::Internal(InternalError::InvalidHashAlgorithm(7))
        ));
    }

    #[test]
    fn test_cert_request_parse_tls10() {
        let data = hex("000004 01 01 0000");
        let cr = CertificateRequest::decode(&mut Parser::new(&data), ProtocolVersion::TLS1_0)
            .unwrap();
        assert_eq!(cr.certificate_types, vec![ClientCertificateType::RSA_SIGN]);
        assert!(cr.supported_signature_algs.is_empty());
        assert!(cr.certificate_authorities.is_empty());
    }

    #[test]
    fn test_cert_request_parse_tls12() {
        let data = hex(&format!(
            "00001a 01 01 000a 0601 0501 0401 0301 0201 000a {}",
            "00".repeat(10)
        ));
        let cr = CertificateRequest::decode(&mut Parser::new(&data), ProtocolVersion::TLS1_2)
            .unwrap();
        assert_eq!(
            cr.supported_signature_algs,
            vec![
                SignatureScheme::RSA_PKCS1_SHA512,
                SignatureScheme::RSA_PKCS1_SHA384,
                SignatureScheme::RSA_PKCS1_SHA256,
                SignatureScheme::RSA_PKCS1_SHA224,
                SignatureScheme::RSA_PKCS1_SHA1,
            ]
        );
        assert_eq!(cr.certificate_authorities, vec![Vec::<u8>::new(); 5]);
    }

    #[test]
    fn test_cert_request_encode() {
        let cr = CertificateRequest::new(ProtocolVersion::TLS1_0).create(
            &[ClientCertificateType::RSA_SIGN],
            &[vec![0xFF, 0xFF]],
            &[],
        );
        assert_eq!(cr.encode().unwrap(), hex("0d 000008 01 01 0004 0002 ffff"));

        let cr = CertificateRequest::new(ProtocolVersion::TLS1_2).create(
            &[ClientCertificateType::RSA_SIGN],
            &[],
            &[
                SignatureScheme::RSA_PKCS1_SHA512,
                SignatureScheme::RSA_PKCS1_SHA256,
                SignatureScheme::RSA_PKCS1_SHA1,
            ],
        );
        assert_eq!(
            cr.encode().unwrap(),
            hex("0d 00000c 01 01 0006 0601 0401 0201 0000")
        );
    }

    #[test]
    fn test_cert_verify_tls10() {
        let cv = CertificateVerify::new(ProtocolVersion::TLS1_0).create(&[0xF0, 0x0F], None);
        let bytes = cv.encode().unwrap();
        assert_eq!(bytes, hex("0f 000004 0002 f00f"));
        let parsed =
            CertificateVerify::decode(&mut Parser::new(&bytes[1..]), ProtocolVersion::TLS1_0)
                .unwrap();
        assert_eq!(parsed, cv);
    }

    #[test]
    fn test_cert_verify_tls12() {
        let data = hex("000006 0201 0002 abcd");
        let cv = CertificateVerify::decode(&mut Parser::new(&data), ProtocolVersion::TLS1_2)
            .unwrap();
        assert_eq!(cv.signature_algorithm, Some(SignatureScheme::RSA_PKCS1_SHA1));
        assert_eq!(cv.signature, vec![0xAB, 0xCD]);

        let cv = CertificateVerify::new(ProtocolVersion::TLS1_2)
            .create(&[0xFF, 0xBA], Some(SignatureScheme::RSA_PKCS1_SHA512));
        assert_eq!(cv.encode().unwrap(), hex("0f 000006 0601 0002 ffba"));
    }

    #[test]
    fn test_cert_verify_missing_algorithm() {
        let cv = CertificateVerify::new(ProtocolVersion::TLS1_2).create(&[1], None);
        assert!(matches!(
            cv.encode().unwrap_err(),
            TlsError::Internal(InternalError::MissingSignatureAlgorithm)
        ));
    }
}
