//! # Packet Header
//!
//! ```text
//! |  4 bits  |  4 bits  | 4 bits | 2b | 2b | LL+1 bytes     | CL+1 bytes |
//! | magic(A) | vers.(1) | flags  | LL | CL | payload length | cookie     |
//! ```
//!
//! `LL`/`CL` store the byte width of the following field minus one. The
//! payload length is written over exactly the width declared in `LL`, so
//! lengths of 256 bytes and more are carried intact. Below 256 the field is a
//! single byte.

use bytes::{Buf, BufMut, BytesMut};

use crate::config::{BINRPC_MAGIC, BINRPC_VERSION, MAX_PAYLOAD_SIZE};
use crate::core::payload::byte_width;
use crate::error::{BinRpcError, Result};

/// Magic and version packed into the first header byte
pub const MAGIC_VERSION: u8 = BINRPC_MAGIC << 4 | BINRPC_VERSION;

/// Byte width of the cookie field
pub const COOKIE_WIDTH: usize = std::mem::size_of::<u32>();

/// Widest payload length field `LL` can describe
const MAX_LENGTH_WIDTH: usize = 4;

/// Header of one binrpc packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Reserved flag nibble, always 0 on requests
    pub flags: u8,
    /// Byte count of the payload that follows the header
    pub payload_len: usize,
    pub cookie: u32,
}

impl Header {
    /// Header for an already-built payload of `payload_len` bytes
    pub fn new(payload_len: usize, cookie: u32) -> Self {
        Self {
            flags: 0,
            payload_len,
            cookie,
        }
    }

    /// Width of the payload length field (1..=4)
    #[inline]
    pub fn length_width(&self) -> usize {
        byte_width(self.payload_len as u64)
    }

    /// Total encoded header size in bytes
    #[inline]
    pub fn encoded_len(&self) -> usize {
        2 + self.length_width() + COOKIE_WIDTH
    }

    /// Append the header bytes to `out`
    pub fn encode(&self, out: &mut BytesMut) -> Result<()> {
        if self.payload_len > MAX_PAYLOAD_SIZE {
            return Err(BinRpcError::OversizedPayload(self.payload_len));
        }
        let len_width = self.length_width();
        debug_assert!(len_width <= MAX_LENGTH_WIDTH);

        out.reserve(self.encoded_len());
        out.put_u8(MAGIC_VERSION);
        out.put_u8(
            (self.flags & 0x0F) << 4 | ((len_width - 1) as u8) << 2 | (COOKIE_WIDTH - 1) as u8,
        );
        out.put_uint(self.payload_len as u64, len_width);
        out.put_u32(self.cookie);
        Ok(())
    }

    /// Parse a header from the front of `data`.
    ///
    /// Returns the header and its encoded size.
    pub fn decode(data: &[u8]) -> Result<(Self, usize)> {
        let mut buf = data;
        if buf.remaining() < 2 {
            return Err(BinRpcError::Truncated);
        }

        let magic_version = buf.get_u8();
        if magic_version >> 4 != BINRPC_MAGIC {
            return Err(BinRpcError::InvalidHeader);
        }
        let version = magic_version & 0x0F;
        if version != BINRPC_VERSION {
            return Err(BinRpcError::UnsupportedVersion(version));
        }

        let flags_byte = buf.get_u8();
        let len_width = ((flags_byte >> 2) & 0x03) as usize + 1;
        let cookie_width = (flags_byte & 0x03) as usize + 1;

        if buf.remaining() < len_width + cookie_width {
            return Err(BinRpcError::Truncated);
        }
        let payload_len = buf.get_uint(len_width) as usize;
        let cookie = buf.get_uint(cookie_width) as u32;

        Ok((
            Self {
                flags: flags_byte >> 4,
                payload_len,
                cookie,
            },
            2 + len_width + cookie_width,
        ))
    }
}
