#![no_main]

use libfuzzer_sys::fuzz_target;
use kamailio_binrpc::Packet;

fuzz_target!(|data: &[u8]| {
    // Packet parsing and record decoding must never panic
    if let Ok(packet) = Packet::from_bytes(data) {
        let _ = packet.value();
    }
});
