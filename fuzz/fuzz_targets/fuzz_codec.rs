#![no_main]

use bytes::BytesMut;
use kamailio_binrpc::core::codec::BinRpcCodec;
use libfuzzer_sys::fuzz_target;
use tokio_util::codec::Decoder;

fuzz_target!(|data: &[u8]| {
    // Splitting arbitrary streams must terminate without panicking
    let mut codec = BinRpcCodec::new().with_max_payload(64 * 1024);
    let mut buf = BytesMut::from(data);
    while let Ok(Some(packet)) = codec.decode(&mut buf) {
        let _ = packet.value();
    }
});
