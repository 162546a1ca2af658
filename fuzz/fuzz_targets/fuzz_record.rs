#![no_main]
use libfuzzer_sys::fuzz_target;
use tlswire_proto::alert::Alert;
use tlswire_proto::record::{RecordHeader2, RecordHeader3};
use tlswire_utils::codec::Parser;

fuzz_target!(|data: &[u8]| {
    let _ = RecordHeader3::decode(&mut Parser::new(data));
    if let Ok(header) = RecordHeader2::decode(&mut Parser::new(data)) {
        let _ = header.encode();
    }
    if let Ok(alert) = Alert::decode(&mut Parser::new(data)) {
        let _ = alert.to_string();
    }
});
