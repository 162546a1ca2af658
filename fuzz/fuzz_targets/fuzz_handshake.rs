#![no_main]
use libfuzzer_sys::fuzz_target;
use tlswire_proto::handshake::{DecodeContext, HandshakeMessage};
use tlswire_proto::{CipherSuite, ProtocolVersion};

fuzz_target!(|data: &[u8]| {
    // First two bytes pick the version and key exchange layout
    if data.len() < 2 {
        return;
    }
    let version = ProtocolVersion::new(3, data[0] % 4);
    let suite = match data[1] % 5 {
        0 => CipherSuite::TLS_RSA_WITH_AES_128_CBC_SHA,
        1 => CipherSuite::TLS_DHE_RSA_WITH_AES_128_CBC_SHA,
        2 => CipherSuite::TLS_SRP_SHA_RSA_WITH_AES_128_CBC_SHA,
        3 => CipherSuite::TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256,
        _ => CipherSuite::TLS_DH_ANON_WITH_AES_128_CBC_SHA,
    };
    let ctx = DecodeContext::new(version).with_cipher_suite(suite);
    if let Ok(msg) = HandshakeMessage::decode(&data[2..], &ctx) {
        // Anything that decodes must encode back
        let _ = msg.encode();
    }
});
