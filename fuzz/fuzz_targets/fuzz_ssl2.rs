#![no_main]
use libfuzzer_sys::fuzz_target;
use tlswire_proto::handshake::Ssl2Message;

fuzz_target!(|data: &[u8]| {
    if let Ok(msg) = Ssl2Message::decode(data) {
        let _ = msg.encode();
    }
});
