//! # Payload Records
//!
//! Frames a single value into a self-describing binrpc record.
//!
//! ## Record Layout
//! ```text
//! | 1 bit     | 3 bits | 4 bits | 0..7 bytes            | L bytes |
//! | size flag | size   | type   | optional value length | value   |
//! ```
//!
//! - `size flag = 0`: `size` is the value length L itself (L <= 8)
//! - `size flag = 1`: `size` is the width S of the explicit big-endian length
//!   field that follows (L > 8)
//!
//! An 8-byte value is still sized inline. `8 << 4` spills into the flag bit,
//! so it travels as flag=1/size=0, which the decoder reads back as L = 8.

use bytes::{Buf, BufMut, BytesMut};

use crate::core::value::{TypeTag, Value, DOUBLE_SCALE};
use crate::error::{constants, BinRpcError, Result};

/// Largest value length carried inline in the 3-bit size subfield
pub const INLINE_SIZE_LIMIT: usize = 8;

/// Widest explicit length field the 3-bit size subfield can describe
const MAX_LENGTH_WIDTH: usize = 7;

/// Minimal number of big-endian bytes needed to hold `n` (at least 1)
#[inline]
pub(crate) fn byte_width(n: u64) -> usize {
    let bits = (u64::BITS - n.leading_zeros()) as usize;
    bits.div_ceil(8).max(1)
}

/// Append one record carrying `value` to `out`.
///
/// Returns the number of bytes appended, which is what the header must
/// declare for a single-record payload.
pub fn build_payload(value: &Value, out: &mut BytesMut) -> Result<usize> {
    let bytes = value.wire_bytes()?;
    frame_raw(value.type_tag(), &bytes, out)
}

/// Append a record for already-serialized scalar bytes under `tag`.
pub fn frame_raw(tag: TypeTag, value: &[u8], out: &mut BytesMut) -> Result<usize> {
    if matches!(
        tag,
        TypeTag::Struct | TypeTag::Array | TypeTag::Avp | TypeTag::All
    ) {
        return Err(BinRpcError::Encoding(format!(
            "cannot frame {} record from scalar bytes",
            tag.name()
        )));
    }

    let len = value.len();
    let start = out.len();

    if len > INLINE_SIZE_LIMIT {
        let width = byte_width(len as u64);
        if width > MAX_LENGTH_WIDTH {
            return Err(BinRpcError::Encoding(format!(
                "{}: {len} bytes",
                constants::ERR_LENGTH_WIDTH
            )));
        }
        out.reserve(1 + width + len);
        out.put_u8(0x80 | (width as u8) << 4 | tag.nibble());
        out.put_uint(len as u64, width);
    } else {
        out.reserve(1 + len);
        // len == 8 spills into the size flag (size 0), byte-compatible with
        // existing binrpc clients; Kamailio reads it as flag=1/size=0
        out.put_u8((len as u8) << 4 | tag.nibble());
    }
    out.put_slice(value);

    Ok(out.len() - start)
}

/// Parse one scalar record from the front of `data`.
///
/// Returns the value and the number of bytes consumed. Composite and
/// wildcard records are reported as unsupported.
pub fn decode_record(data: &[u8]) -> Result<(Value, usize)> {
    let mut buf = data;
    if !buf.has_remaining() {
        return Err(BinRpcError::Truncated);
    }
    let first = buf.get_u8();
    let size_flag = first >> 7;
    let size = ((first >> 4) & 0x07) as usize;
    let tag = TypeTag::from_nibble(first).ok_or_else(|| {
        BinRpcError::Unsupported(format!("unknown record type 0x{:X}", first & 0x0F))
    })?;

    let len = match (size_flag, size) {
        (0, n) => n,
        (_, 0) => INLINE_SIZE_LIMIT,
        (_, width) => {
            if buf.remaining() < width {
                return Err(BinRpcError::Truncated);
            }
            buf.get_uint(width) as usize
        }
    };

    if buf.remaining() < len {
        return Err(BinRpcError::Truncated);
    }
    let consumed = data.len() - buf.remaining() + len;
    let raw = &buf[..len];

    let value = match tag {
        TypeTag::Int => Value::Int(signed_be(raw)?),
        TypeTag::Double => Value::Double(f64::from(signed_be(raw)?) / DOUBLE_SCALE),
        TypeTag::Str => {
            let text = match raw.split_last() {
                Some((&0x0, text)) => text,
                _ => {
                    return Err(BinRpcError::Encoding(
                        "string record is not NUL-terminated".to_string(),
                    ))
                }
            };
            let text = std::str::from_utf8(text)
                .map_err(|e| BinRpcError::Encoding(format!("string record is not UTF-8: {e}")))?;
            Value::Str(text.to_string())
        }
        TypeTag::Bytes => Value::Bytes(raw.to_vec()),
        other => {
            return Err(BinRpcError::Unsupported(format!(
                "decoding {} records",
                other.name()
            )))
        }
    };

    Ok((value, consumed))
}

/// Sign-extend a big-endian integer of 0 to 4 bytes
fn signed_be(raw: &[u8]) -> Result<i32> {
    if raw.len() > 4 {
        return Err(BinRpcError::Encoding(format!(
            "integer record too wide: {} bytes",
            raw.len()
        )));
    }
    let Some(&first) = raw.first() else {
        return Ok(0);
    };
    let fill = if first & 0x80 != 0 { 0xFF } else { 0x00 };
    let mut be = [fill; 4];
    be[4 - raw.len()..].copy_from_slice(raw);
    Ok(i32::from_be_bytes(be))
}
