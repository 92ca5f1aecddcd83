//! Byte-exact checks of the binrpc request layout.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use bytes::BytesMut;
use kamailio_binrpc::core::header::{Header, COOKIE_WIDTH, MAGIC_VERSION};
use kamailio_binrpc::core::payload::build_payload;
use kamailio_binrpc::{FixedCookie, PacketAssembler, Value};

fn record(value: &Value) -> Vec<u8> {
    let mut out = BytesMut::new();
    build_payload(value, &mut out).expect("encodable value");
    out.to_vec()
}

#[test]
fn test_dispatcher_list_request() {
    let assembler = PacketAssembler::with_cookie_source(FixedCookie(0x7F00_0001));
    let packet = assembler
        .assemble(&Value::from("dispatcher.list"))
        .expect("assemble");

    let mut expected = vec![0xA1, 0x03, 18, 0x7F, 0x00, 0x00, 0x01, 0x91, 16];
    expected.extend_from_slice(b"dispatcher.list\0");
    assert_eq!(packet.as_bytes(), &expected[..]);

    let bytes = packet.as_bytes();
    // LL = 0, CL = 3
    assert_eq!((bytes[1] >> 2) & 0x03, 0);
    assert_eq!(bytes[1] & 0x03, 3);
    // record type string, explicit 1-byte length
    assert_eq!(bytes[7] & 0x0F, 1);
    assert_eq!(bytes[7] >> 7, 1);
    assert_eq!((bytes[7] >> 4) & 0x07, 1);
    assert_eq!(bytes[8], 16);
}

#[test]
fn test_empty_string_size_is_one() {
    assert_eq!(record(&Value::from("")), vec![0x11, 0x00]);
}

#[test]
fn test_nine_byte_string_uses_length_field() {
    let bytes = record(&Value::from("123456789"));
    assert_eq!(bytes[0] >> 7, 1, "size flag set");
    assert_eq!((bytes[0] >> 4) & 0x07, 1, "one length byte");
    assert_eq!(bytes[1], 10, "nine chars plus NUL");
    assert_eq!(bytes.len(), 2 + 10);
}

#[test]
fn test_seven_char_string_stays_inline() {
    let bytes = record(&Value::from("1234567"));
    assert_eq!(bytes[0], 0x81);
    assert_eq!(&bytes[1..], b"1234567\0");
}

#[test]
fn test_short_strings_inline_size() {
    for len in 0..=6 {
        let text = "s".repeat(len);
        let bytes = record(&Value::Str(text.clone()));
        assert_eq!(bytes[0] >> 7, 0);
        assert_eq!(((bytes[0] >> 4) & 0x07) as usize, len + 1);
        assert_eq!(bytes[0] & 0x0F, 1);
        assert_eq!(&bytes[1..1 + len], text.as_bytes());
        assert_eq!(*bytes.last().unwrap(), 0);
    }
}

#[test]
fn test_int_record_layout() {
    assert_eq!(record(&Value::Int(0)), vec![0x40, 0, 0, 0, 0]);
    assert_eq!(
        record(&Value::Int(i32::MAX)),
        vec![0x40, 0x7F, 0xFF, 0xFF, 0xFF]
    );
    assert_eq!(record(&Value::Int(i32::MIN)), vec![0x40, 0x80, 0, 0, 0]);
}

#[test]
fn test_header_declares_single_length_byte_below_256() {
    for payload_len in 0..=255usize {
        let mut out = BytesMut::new();
        Header::new(payload_len, 0xAABB_CCDD)
            .encode(&mut out)
            .expect("encode header");
        assert_eq!(out[0], MAGIC_VERSION);
        assert_eq!(out[1], 0x03);
        assert_eq!(out[2] as usize, payload_len);
        assert_eq!(&out[3..], &[0xAA, 0xBB, 0xCC, 0xDD]);
        assert_eq!(out.len(), 3 + COOKIE_WIDTH);
    }
}

#[test]
fn test_long_method_gets_wide_length_fields() {
    let method = "x".repeat(299);
    let assembler = PacketAssembler::with_cookie_source(FixedCookie(0));
    let packet = assembler.assemble(&Value::Str(method)).expect("assemble");

    // record: 1 prefix byte + 2 length bytes + 300 value bytes
    let payload_len = 303usize;
    let bytes = packet.as_bytes();
    assert_eq!(bytes[1], 0x01 << 2 | 0x03);
    assert_eq!(&bytes[2..4], &(payload_len as u16).to_be_bytes());
    assert_eq!(packet.payload().len(), payload_len);
    assert_eq!(packet.payload()[0], 0x80 | 0x20 | 0x01);
    assert_eq!(&packet.payload()[1..3], &300u16.to_be_bytes());
}
