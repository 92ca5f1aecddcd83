//! # Packet Assembly
//!
//! A packet is one header followed by one record. The payload is always built
//! first, because the header has to declare its exact byte count.

use bytes::{Bytes, BytesMut};
use tracing::debug;

use crate::core::cookie::{CookieSource, ThreadRngCookies};
use crate::core::header::Header;
use crate::core::payload::{build_payload, decode_record};
use crate::core::value::Value;
use crate::error::{BinRpcError, Result};

/// A finished binrpc datagram
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    header: Header,
    header_len: usize,
    bytes: Bytes,
}

impl Packet {
    #[inline]
    pub fn cookie(&self) -> u32 {
        self.header.cookie
    }

    #[inline]
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Full datagram, header then payload
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.bytes[self.header_len..]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }

    pub(crate) fn from_parts(header: Header, header_len: usize, bytes: Bytes) -> Self {
        Self {
            header,
            header_len,
            bytes,
        }
    }

    /// Parse a complete datagram.
    ///
    /// The declared payload length must match the bytes that follow the
    /// header exactly.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let (header, header_len) = Header::decode(data)?;
        let actual = data.len() - header_len;
        if header.payload_len != actual {
            return Err(BinRpcError::LengthMismatch {
                declared: header.payload_len,
                actual,
            });
        }
        Ok(Self {
            header,
            header_len,
            bytes: Bytes::copy_from_slice(data),
        })
    }

    /// Decode the single scalar record carried by this packet
    pub fn value(&self) -> Result<Value> {
        let payload = self.payload();
        let (value, consumed) = decode_record(payload)?;
        if consumed != payload.len() {
            return Err(BinRpcError::LengthMismatch {
                declared: payload.len(),
                actual: consumed,
            });
        }
        Ok(value)
    }
}

/// Builds packets, drawing one cookie per packet from `C`
#[derive(Debug, Clone, Default)]
pub struct PacketAssembler<C = ThreadRngCookies> {
    cookies: C,
}

impl PacketAssembler<ThreadRngCookies> {
    pub fn new() -> Self {
        Self {
            cookies: ThreadRngCookies,
        }
    }
}

impl<C: CookieSource> PacketAssembler<C> {
    pub fn with_cookie_source(cookies: C) -> Self {
        Self { cookies }
    }

    /// Assemble `value` into a standalone packet
    pub fn assemble(&self, value: &Value) -> Result<Packet> {
        let mut out = BytesMut::new();
        let header = self.assemble_into(value, &mut out)?;
        let header_len = header.encoded_len();
        Ok(Packet {
            header,
            header_len,
            bytes: out.freeze(),
        })
    }

    /// Append the packet for `value` to `out` and return its header.
    ///
    /// Nothing is appended when encoding fails.
    pub fn assemble_into(&self, value: &Value, out: &mut BytesMut) -> Result<Header> {
        let mut payload = BytesMut::new();
        let payload_len = build_payload(value, &mut payload)?;

        let header = Header::new(payload_len, self.cookies.next_cookie());
        let mut head = BytesMut::with_capacity(header.encoded_len());
        header.encode(&mut head)?;

        out.reserve(head.len() + payload.len());
        out.extend_from_slice(&head);
        out.extend_from_slice(&payload);

        debug!(
            record_type = value.type_tag().name(),
            payload_len,
            cookie = header.cookie,
            "Assembled binrpc packet"
        );
        Ok(header)
    }
}
