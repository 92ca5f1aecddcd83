//! Tokio codec for binrpc packets.
//!
//! Encoding turns one [`Value`] into one complete packet. Decoding splits
//! complete packets off a byte buffer without interpreting their records.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::config::DEFAULT_MAX_DECODE_PAYLOAD;
use crate::core::cookie::{CookieSource, ThreadRngCookies};
use crate::core::header::Header;
use crate::core::packet::{Packet, PacketAssembler};
use crate::core::value::Value;
use crate::error::{BinRpcError, Result};

#[derive(Debug, Clone)]
pub struct BinRpcCodec<C = ThreadRngCookies> {
    assembler: PacketAssembler<C>,
    max_payload: usize,
}

impl Default for BinRpcCodec<ThreadRngCookies> {
    fn default() -> Self {
        Self::new()
    }
}

impl BinRpcCodec<ThreadRngCookies> {
    pub fn new() -> Self {
        Self::with_cookie_source(ThreadRngCookies)
    }
}

impl<C: CookieSource> BinRpcCodec<C> {
    pub fn with_cookie_source(cookies: C) -> Self {
        Self {
            assembler: PacketAssembler::with_cookie_source(cookies),
            max_payload: DEFAULT_MAX_DECODE_PAYLOAD,
        }
    }

    /// Reject decoded packets declaring more than `max_payload` bytes
    pub fn with_max_payload(mut self, max_payload: usize) -> Self {
        self.max_payload = max_payload;
        self
    }
}

impl<C: CookieSource> Encoder<Value> for BinRpcCodec<C> {
    type Error = BinRpcError;

    fn encode(&mut self, item: Value, dst: &mut BytesMut) -> Result<()> {
        self.assembler.assemble_into(&item, dst)?;
        Ok(())
    }
}

impl<C> Decoder for BinRpcCodec<C> {
    type Item = Packet;
    type Error = BinRpcError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Packet>> {
        if src.len() < 2 {
            return Ok(None);
        }

        let len_width = ((src[1] >> 2) & 0x03) as usize + 1;
        let cookie_width = (src[1] & 0x03) as usize + 1;
        if src.len() < 2 + len_width + cookie_width {
            return Ok(None);
        }

        let (header, header_len) = Header::decode(&src[..])?;
        if header.payload_len > self.max_payload {
            return Err(BinRpcError::OversizedPayload(header.payload_len));
        }

        // payload_len <= max_payload here, so the reservation is bounded
        let total = header_len + header.payload_len;
        if src.len() < total {
            src.reserve(total - src.len());
            return Ok(None);
        }

        let bytes = src.split_to(total).freeze();
        Ok(Some(Packet::from_parts(header, header_len, bytes)))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::cookie::FixedCookie;

    #[test]
    fn test_encode_then_split() {
        let mut codec = BinRpcCodec::with_cookie_source(FixedCookie(9));
        let mut buf = BytesMut::new();
        codec.encode(Value::from("tm.stats"), &mut buf).unwrap();
        codec.encode(Value::Int(3), &mut buf).unwrap();

        let first = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(first.value().unwrap(), Value::from("tm.stats"));
        assert_eq!(first.cookie(), 9);

        let second = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(second.value().unwrap(), Value::Int(3));
        assert!(buf.is_empty());
        assert!(codec.decode(&mut buf).unwrap().is_none());
    }

    #[test]
    fn test_partial_buffer_is_kept() {
        let mut codec = BinRpcCodec::with_cookie_source(FixedCookie(1));
        let mut full = BytesMut::new();
        codec.encode(Value::from("core.version"), &mut full).unwrap();

        for cut in 0..full.len() {
            let mut partial = BytesMut::from(&full[..cut]);
            assert!(codec.decode(&mut partial).unwrap().is_none());
            assert_eq!(partial.len(), cut);
        }
    }

    #[test]
    fn test_oversized_declaration_rejected() {
        let mut codec = BinRpcCodec::new().with_max_payload(16);
        let mut buf = BytesMut::from(&[0xA1, 0x03, 200, 0, 0, 0, 0][..]);
        assert!(matches!(
            codec.decode(&mut buf),
            Err(BinRpcError::OversizedPayload(200))
        ));
    }

    #[test]
    fn test_default_limit_rejects_huge_declaration() {
        let mut codec = BinRpcCodec::new();
        let mut buf = BytesMut::from(&[0xA1, 0x0F, 0xFF, 0xFF, 0xFF, 0xFF, 0, 0, 0, 0][..]);
        let capacity = buf.capacity();
        assert!(matches!(
            codec.decode(&mut buf),
            Err(BinRpcError::OversizedPayload(0xFFFF_FFFF))
        ));
        assert_eq!(buf.capacity(), capacity);
    }

    #[test]
    fn test_partial_packet_reserves_at_most_limit() {
        let mut codec = BinRpcCodec::new();
        let declared = DEFAULT_MAX_DECODE_PAYLOAD;
        let mut header = BytesMut::new();
        Header::new(declared, 7).encode(&mut header).unwrap();

        let mut buf = header.clone();
        assert!(codec.decode(&mut buf).unwrap().is_none());
        assert!(buf.capacity() >= header.len() + declared);
        assert!(buf.capacity() <= 2 * (header.len() + declared));

        let mut over = BytesMut::new();
        Header::new(declared + 1, 7).encode(&mut over).unwrap();
        assert!(matches!(
            codec.decode(&mut over),
            Err(BinRpcError::OversizedPayload(_))
        ));
    }

    #[test]
    fn test_bad_magic_rejected() {
        let mut codec = BinRpcCodec::new();
        let mut buf = BytesMut::from(&[0x4E, 0x03, 1, 0, 0, 0, 0, 0][..]);
        assert!(matches!(
            codec.decode(&mut buf),
            Err(BinRpcError::InvalidHeader)
        ));
    }
}
