//! Integration tests for tlswire.
//! Whole handshake flights pushed through record framing and back.

#[cfg(test)]
mod tests {
    use tlswire_bignum::BigNum;
    use tlswire_proto::alert::{Alert, AlertDescription, AlertLevel};
    use tlswire_proto::config::HandshakeSettings;
    use tlswire_proto::crypt::{md5_sha1, NamedGroup, SignatureScheme};
    use tlswire_proto::extensions::{
        Extension, ExtensionContext, ExtensionPayload, ExtensionRegistry, ExtensionType,
    };
    use tlswire_proto::handshake::{
        verify_server_hello, Certificate, ClientHello, ClientKeyExchange, ClientMasterKey,
        DecodeContext, EcParameters, Finished, HandshakeMessage, HandshakeType, ServerFinished,
        ServerHello, ServerHello2, ServerHelloDone, ServerHelloVerifier, ServerKeyExchange,
        ServerKeyParams, Ssl2Message,
    };
    use tlswire_proto::record::{ChangeCipherSpec, ContentType, RecordHeader2, RecordHeader3};
    use tlswire_proto::{CertificateType, CipherSuite};
    use tlswire_types::{ProtocolVersion, Rejection, TlsError};
    use tlswire_utils::codec::Parser;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    /// Wrap `payload` into SSLv3+ records of at most `max_fragment` bytes.
    fn to_records(
        content_type: ContentType,
        version: ProtocolVersion,
        payload: &[u8],
        max_fragment: usize,
    ) -> Vec<u8> {
        let mut out = Vec::new();
        for chunk in payload.chunks(max_fragment) {
            let header = RecordHeader3::new(content_type, version, chunk.len());
            out.extend(header.encode().unwrap());
            out.extend_from_slice(chunk);
        }
        out
    }

    /// Reassemble the payload of consecutive records of one content type.
    fn from_records(bytes: &[u8]) -> (ContentType, Vec<u8>) {
        let mut p = Parser::new(bytes);
        let mut content_type = None;
        let mut payload = Vec::new();
        while !p.is_empty() {
            let header = RecordHeader3::decode(&mut p).unwrap();
            let ct = ContentType::from_u8(header.content_type).unwrap();
            assert_eq!(*content_type.get_or_insert(ct), ct);
            payload.extend_from_slice(p.read_fixed(header.length).unwrap());
        }
        (content_type.unwrap(), payload)
    }

    fn decode_flight(bytes: &[u8], ctx: &DecodeContext<'_>) -> Vec<HandshakeMessage> {
        let mut p = Parser::new(bytes);
        let mut messages = Vec::new();
        while !p.is_empty() {
            messages.push(HandshakeMessage::decode_from(&mut p, ctx).unwrap());
        }
        messages
    }

    fn offered_client_hello() -> ClientHello {
        let mut ch = ClientHello::create(
            ProtocolVersion::TLS1_2,
            [0x11; 32],
            &[],
            &[
                CipherSuite::TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256,
                CipherSuite::TLS_DHE_RSA_WITH_AES_128_CBC_SHA,
                CipherSuite::TLS_SRP_SHA_RSA_WITH_AES_128_CBC_SHA,
                CipherSuite::TLS_RSA_WITH_AES_128_CBC_SHA,
                CipherSuite::TLS_EMPTY_RENEGOTIATION_INFO_SCSV,
            ],
        );
        ch.set_server_name(b"example.com");
        ch.set_certificate_types(&[CertificateType::OPENPGP, CertificateType::X509]);
        ch.set_supports_npn(true);
        ch.set_srp_username(Some(b"alice"));
        ch
    }

    // -------------------------------------------------------
    // 1. ECDHE_RSA full flight over records
    // -------------------------------------------------------
    #[test]
    fn test_ecdhe_rsa_full_flight() {
        init_logging();
        let version = ProtocolVersion::TLS1_2;
        let suite = CipherSuite::TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256;

        let ch = offered_client_hello();
        let ch_bytes = ch.encode().unwrap();
        let records = to_records(ContentType::Handshake, ProtocolVersion::TLS1_0, &ch_bytes, 64);
        let (ct, payload) = from_records(&records);
        assert_eq!(ct, ContentType::Handshake);
        let ctx = DecodeContext::new(version);
        let HandshakeMessage::ClientHello(received_ch) =
            HandshakeMessage::decode(&payload, &ctx).unwrap()
        else {
            panic!("expected ClientHello");
        };
        assert_eq!(received_ch, ch);
        assert_eq!(received_ch.server_name(), b"example.com");
        assert_eq!(received_ch.srp_username(), Some(&b"alice"[..]));
        assert!(received_ch.supports_npn());

        let mut sh = ServerHello::create(version, [0x22; 32], &[0xAA; 32], suite)
            .with_extensions(vec![Extension::opaque(ExtensionType::RENEGOTIATION_INFO, vec![0])]);
        sh.set_next_protos(Some(vec![b"http/1.1".to_vec(), b"spdy/3".to_vec()]));
        let ske = ServerKeyExchange::new(suite, version)
            .create_ecdh(EcParameters::NamedCurve(NamedGroup::SECP256R1), &[0x04; 65])
            .with_signature(SignatureScheme::RSA_PKCS1_SHA256, &[0x5A; 128]);
        let server_flight: Vec<HandshakeMessage> = vec![
            HandshakeMessage::ServerHello(sh.clone()),
            HandshakeMessage::Certificate(Certificate::new(vec![vec![0x30, 0x82, 0x01], vec![0x30, 0x00]])),
            HandshakeMessage::ServerKeyExchange(ske.clone()),
            HandshakeMessage::ServerHelloDone(ServerHelloDone),
        ];
        let mut flight_bytes = Vec::new();
        for msg in &server_flight {
            flight_bytes.extend(msg.encode().unwrap());
        }
        let records = to_records(ContentType::Handshake, version, &flight_bytes, 100);
        let (_, payload) = from_records(&records);

        let ctx = DecodeContext::new(version).with_cipher_suite(suite);
        let decoded = decode_flight(&payload, &ctx);
        assert_eq!(decoded, server_flight);
        let HandshakeMessage::ServerHello(received_sh) = &decoded[0] else {
            panic!("expected ServerHello");
        };
        verify_server_hello(&ch, received_sh, &HandshakeSettings::default()).unwrap();
        assert_eq!(
            received_sh.next_protos(),
            Some(&[b"http/1.1".to_vec(), b"spdy/3".to_vec()][..])
        );

        let HandshakeMessage::ServerKeyExchange(received_ske) = &decoded[2] else {
            panic!("expected ServerKeyExchange");
        };
        let digest = received_ske.hash(&ch.random, &sh.random).unwrap();
        assert_eq!(digest.len(), 32);
        assert_eq!(digest, ske.hash(&ch.random, &sh.random).unwrap());

        let cke = ClientKeyExchange::new(suite, Some(version)).create_ecdh(&[0x04; 65]);
        let finished = Finished::new(vec![0x3C; 12]);
        let mut client_flight = cke.encode().unwrap();
        let ccs = ChangeCipherSpec.encode();
        client_flight.extend(finished.encode().unwrap());
        let decoded = decode_flight(&client_flight, &ctx);
        assert_eq!(
            decoded,
            vec![
                HandshakeMessage::ClientKeyExchange(cke),
                HandshakeMessage::Finished(finished.clone()),
            ]
        );
        assert_eq!(
            ChangeCipherSpec::decode(&mut Parser::new(&ccs)).unwrap(),
            ChangeCipherSpec
        );
        assert!(finished.verify(&[0x3C; 12]));
        assert!(!finished.verify(&[0x3D; 12]));
    }

    // -------------------------------------------------------
    // 2. DHE and SRP key exchanges with legacy signatures
    // -------------------------------------------------------
    #[test]
    fn test_dhe_rsa_tls10_flight() {
        init_logging();
        let version = ProtocolVersion::TLS1_0;
        let suite = CipherSuite::TLS_DHE_RSA_WITH_AES_128_CBC_SHA;
        let p = BigNum::from_bytes_be(&[0xFF; 128]);
        let ys = BigNum::from_bytes_be(&[0x42; 128]);
        let ske = ServerKeyExchange::new(suite, version)
            .create_dh(p.clone(), BigNum::from_u64(2), ys)
            .with_signature(SignatureScheme::default(), &[0x99; 64]);
        let bytes = ske.encode().unwrap();
        let ctx = DecodeContext::new(version).with_cipher_suite(suite);
        let HandshakeMessage::ServerKeyExchange(decoded) =
            HandshakeMessage::decode(&bytes, &ctx).unwrap()
        else {
            panic!("expected ServerKeyExchange");
        };
        assert_eq!(decoded, ske);

        let client_random = [0x01; 32];
        let server_random = [0x02; 32];
        let mut signed = client_random.to_vec();
        signed.extend_from_slice(&server_random);
        signed.extend(decoded.params_bytes().unwrap());
        assert_eq!(
            decoded.hash(&client_random, &server_random).unwrap(),
            md5_sha1(&signed).unwrap()
        );

        let yc = BigNum::from_bytes_be(&[0x07; 128]);
        let cke = ClientKeyExchange::new(suite, Some(version)).create_dh(yc);
        let cke_bytes = cke.encode().unwrap();
        assert_eq!(
            HandshakeMessage::decode(&cke_bytes, &ctx).unwrap(),
            HandshakeMessage::ClientKeyExchange(cke)
        );
        let Some(ServerKeyParams::Dh { p: decoded_p, .. }) = decoded.params else {
            panic!("expected DH parameters");
        };
        assert_eq!(decoded_p, p);
    }

    #[test]
    fn test_dh_anon_generated_group() {
        let version = ProtocolVersion::TLS1_1;
        let suite = CipherSuite::TLS_DH_ANON_WITH_AES_128_CBC_SHA;
        let p = BigNum::generate_safe_prime(64).unwrap();
        let g = BigNum::from_u64(2);
        let x = BigNum::random_range(&p).unwrap();
        let ys = g.mod_exp(&x, &p).unwrap();

        let ske = ServerKeyExchange::new(suite, version).create_dh(p.clone(), g, ys);
        let bytes = ske.encode().unwrap();
        let ctx = DecodeContext::new(version).with_cipher_suite(suite);
        let HandshakeMessage::ServerKeyExchange(decoded) =
            HandshakeMessage::decode(&bytes, &ctx).unwrap()
        else {
            panic!("expected ServerKeyExchange");
        };
        // Anonymous suites carry no signature.
        assert!(decoded.signature.is_empty());
        let Some(ServerKeyParams::Dh { p: wire_p, ys: wire_ys, .. }) = decoded.params else {
            panic!("expected DH parameters");
        };
        assert!(wire_p.is_probably_prime(20).unwrap());
        assert_eq!(wire_p, p);
        assert!(wire_ys < p);
    }

    #[test]
    fn test_srp_flight() {
        init_logging();
        let version = ProtocolVersion::TLS1_2;
        let suite = CipherSuite::TLS_SRP_SHA_RSA_WITH_AES_128_CBC_SHA;
        let ch = offered_client_hello();
        let sh = ServerHello::create(version, [0x33; 32], &[], suite);
        verify_server_hello(&ch, &sh, &HandshakeSettings::default()).unwrap();

        let ske = ServerKeyExchange::new(suite, version)
            .create_srp(
                BigNum::from_bytes_be(&[0xEE; 256]),
                BigNum::from_u64(5),
                &[0x10; 16],
                BigNum::from_bytes_be(&[0x0B; 256]),
            )
            .with_signature(SignatureScheme::RSA_PKCS1_SHA1, &[0x77; 256]);
        let ctx = DecodeContext::new(version).with_cipher_suite(suite);
        let bytes = ske.encode().unwrap();
        assert_eq!(
            HandshakeMessage::decode(&bytes, &ctx).unwrap(),
            HandshakeMessage::ServerKeyExchange(ske.clone())
        );
        assert_eq!(ske.hash(&ch.random, &sh.random).unwrap().len(), 20);

        let cke = ClientKeyExchange::new(suite, None).create_srp(BigNum::from_bytes_be(&[0x0A; 256]));
        let cke_bytes = cke.encode().unwrap();
        let decoded = HandshakeMessage::decode(&cke_bytes, &ctx).unwrap();
        let HandshakeMessage::ClientKeyExchange(decoded) = decoded else {
            panic!("expected ClientKeyExchange");
        };
        assert_eq!(decoded.params, cke.params);
    }

    // -------------------------------------------------------
    // 3. SSLv3 RSA key exchange and Finished
    // -------------------------------------------------------
    #[test]
    fn test_ssl3_rsa_flight() {
        let version = ProtocolVersion::SSL3;
        let suite = CipherSuite::TLS_RSA_WITH_3DES_EDE_CBC_SHA;
        let cke = ClientKeyExchange::new(suite, Some(version)).create_rsa(&[0xC3; 64]);
        let bytes = cke.encode().unwrap();
        assert_eq!(&bytes[..4], &[0x10, 0x00, 0x00, 0x40]);

        let finished = Finished::new(vec![0xF1; 36]);
        let mut flight = bytes.clone();
        flight.extend(finished.encode().unwrap());
        let ctx = DecodeContext::new(version).with_cipher_suite(suite);
        let decoded = decode_flight(&flight, &ctx);
        assert_eq!(
            decoded,
            vec![
                HandshakeMessage::ClientKeyExchange(cke),
                HandshakeMessage::Finished(finished),
            ]
        );

        // A TLS-sized Finished does not fit the SSLv3 layout.
        let short = Finished::new(vec![0xF1; 12]).encode().unwrap();
        assert!(HandshakeMessage::decode(&short, &ctx).is_err());
    }

    // -------------------------------------------------------
    // 4. Verifier over decoded hellos
    // -------------------------------------------------------
    #[test]
    fn test_verifier_over_wire() {
        init_logging();
        let ch = offered_client_hello();
        let ch_bytes = ch.encode().unwrap();
        let ctx = DecodeContext::new(ProtocolVersion::TLS1_2);
        let HandshakeMessage::ClientHello(ch) = HandshakeMessage::decode(&ch_bytes, &ctx).unwrap()
        else {
            panic!("expected ClientHello");
        };
        let verifier = ServerHelloVerifier::new(&ch);

        let mut sh = ServerHello::create(
            ProtocolVersion::TLS1_2,
            [0u8; 32],
            &[],
            CipherSuite::TLS_RSA_WITH_AES_128_CBC_SHA,
        );
        sh.set_certificate_type(Some(CertificateType::OPENPGP));
        let sh_bytes = sh.encode().unwrap();
        let HandshakeMessage::ServerHello(sh) = HandshakeMessage::decode(&sh_bytes, &ctx).unwrap()
        else {
            panic!("expected ServerHello");
        };
        verifier.verify(&sh).unwrap();

        // Duplicate renegotiation_info survives decoding and is rejected.
        let dup = sh.clone().with_extensions(vec![
            Extension::opaque(ExtensionType::RENEGOTIATION_INFO, vec![0]),
            Extension::opaque(ExtensionType::RENEGOTIATION_INFO, vec![0]),
        ]);
        let dup_bytes = dup.encode().unwrap();
        let dup = match HandshakeMessage::decode(&dup_bytes, &ctx).unwrap() {
            HandshakeMessage::ServerHello(sh) => sh,
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(
            verifier.verify(&dup).unwrap_err(),
            TlsError::IllegalParameter(Rejection::DuplicateExtension(0xFF01))
        );

        let mut newer = sh.clone();
        newer.server_version = ProtocolVersion::TLS1_3;
        let err = verifier.verify(&newer).unwrap_err();
        assert!(matches!(
            err,
            TlsError::ProtocolVersion(Rejection::VersionNewerThanOffered { .. })
        ));

        let strict = HandshakeSettings::builder()
            .min_version(ProtocolVersion::TLS1_2)
            .max_version(ProtocolVersion::TLS1_2)
            .build()
            .unwrap();
        let mut old = sh.clone();
        old.server_version = ProtocolVersion::TLS1_1;
        assert!(matches!(
            verify_server_hello(&ch, &old, &strict).unwrap_err(),
            TlsError::ProtocolVersion(Rejection::VersionOutOfPolicy { .. })
        ));
    }

    // -------------------------------------------------------
    // 5. Custom extension registry
    // -------------------------------------------------------
    #[test]
    fn test_custom_registry_flight() {
        let registry = ExtensionRegistry::builder()
            .register(
                ExtensionType::RENEGOTIATION_INFO,
                ExtensionContext::SERVER_HELLO,
                |p: &mut Parser<'_>| Ok(ExtensionPayload::Opaque(p.read_var_bytes(1)?.to_vec())),
            )
            .build();
        let sh = ServerHello::create(
            ProtocolVersion::TLS1_2,
            [0u8; 32],
            &[],
            CipherSuite::TLS_RSA_WITH_AES_128_CBC_SHA,
        )
        .with_extensions(vec![
            Extension::opaque(ExtensionType::RENEGOTIATION_INFO, vec![0x02, 0xAB, 0xCD]),
            Extension::opaque(ExtensionType::CERT_TYPE, vec![0x01]),
        ]);
        let bytes = sh.encode().unwrap();
        let ctx = DecodeContext::new(ProtocolVersion::TLS1_2).with_registry(&registry);
        let HandshakeMessage::ServerHello(decoded) = HandshakeMessage::decode(&bytes, &ctx).unwrap()
        else {
            panic!("expected ServerHello");
        };
        let exts = decoded.extensions.as_ref().unwrap();
        assert_eq!(exts[0].payload, ExtensionPayload::Opaque(vec![0xAB, 0xCD]));
        // cert_type has no decoder in this registry and stays raw.
        assert_eq!(exts[1].payload, ExtensionPayload::Opaque(vec![0x01]));
        assert_eq!(decoded.certificate_type().unwrap(), CertificateType::OPENPGP);
    }

    // -------------------------------------------------------
    // 6. SSLv2 handshake over SSLv2 records
    // -------------------------------------------------------
    #[test]
    fn test_ssl2_flight() {
        init_logging();
        let ch = ClientHello::create_ssl2(
            ProtocolVersion::SSL2,
            &[0x5C; 16],
            &[],
            &[
                CipherSuite::SSL_CK_RC4_128_WITH_MD5,
                CipherSuite::SSL_CK_DES_192_EDE3_CBC_WITH_MD5,
            ],
        );
        let messages = vec![
            Ssl2Message::ClientHello(ch),
            Ssl2Message::ServerHello(ServerHello2::create(
                0,
                1,
                ProtocolVersion::SSL2,
                &[0x30, 0x03, 0x02, 0x01, 0x00],
                &[CipherSuite::SSL_CK_RC4_128_WITH_MD5],
                &[0xC1; 16],
            )),
            Ssl2Message::ClientMasterKey(ClientMasterKey::create(
                CipherSuite::SSL_CK_RC4_128_WITH_MD5,
                &[],
                &[0xE0; 128],
                &[],
            )),
            Ssl2Message::ServerFinished(ServerFinished::new(&[0xAA; 16])),
        ];

        for (i, msg) in messages.iter().enumerate() {
            let body = msg.encode().unwrap();
            let header = if i % 2 == 0 {
                RecordHeader2::new(body.len(), 0, false)
            } else {
                RecordHeader2::new(body.len(), 3, false)
            };
            let mut record = header.encode().unwrap();
            record.extend_from_slice(&body);

            let mut p = Parser::new(&record);
            let decoded_header = RecordHeader2::decode(&mut p).unwrap();
            assert_eq!(decoded_header, header);
            assert_eq!(decoded_header.content_type(), ContentType::Handshake);
            let payload = p.read_fixed(decoded_header.length).unwrap();
            assert_eq!(&Ssl2Message::decode(payload).unwrap(), msg);
        }
    }

    #[test]
    fn test_ssl2_hello_type_byte() {
        let ch = ClientHello::create_ssl2(
            ProtocolVersion::TLS1_0,
            &[0x01; 32],
            &[],
            &[CipherSuite::TLS_RSA_WITH_AES_128_CBC_SHA],
        );
        let body = ch.encode_ssl2().unwrap();
        assert_eq!(body[0], 1);
        assert_eq!(HandshakeType::ClientHello as u8, body[0]);
    }

    // -------------------------------------------------------
    // 7. Alerts
    // -------------------------------------------------------
    #[test]
    fn test_alert_record() {
        let alert = Alert::with_level(AlertDescription::IllegalParameter, AlertLevel::Fatal);
        let records = to_records(ContentType::Alert, ProtocolVersion::TLS1_2, &alert.encode(), 16);
        let (ct, payload) = from_records(&records);
        assert_eq!(ct, ContentType::Alert);
        let decoded = Alert::decode(&mut Parser::new(&payload)).unwrap();
        assert_eq!(decoded, alert);
        assert_eq!(decoded.level_name(), "fatal");
        assert_eq!(decoded.description_name(), "illegal_parameter");
    }

    // -------------------------------------------------------
    // 8. Malformed input
    // -------------------------------------------------------
    #[test]
    fn test_truncated_flight_rejected() {
        let ch = offered_client_hello();
        let bytes = ch.encode().unwrap();
        let ctx = DecodeContext::new(ProtocolVersion::TLS1_2);
        for cut in [1, 4, bytes.len() / 2, bytes.len() - 1] {
            let err = HandshakeMessage::decode(&bytes[..cut], &ctx).unwrap_err();
            assert!(!err.is_internal(), "cut {cut}: {err:?}");
        }

        let mut trailing = bytes.clone();
        trailing.push(0);
        assert!(matches!(
            HandshakeMessage::decode(&trailing, &ctx),
            Err(TlsError::IllegalValue(_))
        ));
    }
}
