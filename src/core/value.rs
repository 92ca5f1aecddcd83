//! # Values
//!
//! The scalar argument types binrpc can carry and their 4-bit wire tags.
//!
//! Every variant knows its own serialized big-endian bytes, so callers of the
//! payload builder never deal with widths directly. Adding a variant means
//! adding a `match` arm here and nowhere else.

use crate::error::{constants, BinRpcError, Result};

/// Record type nibble as carried in the low 4 bits of a record's first byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TypeTag {
    Int = 0x0,
    /// NUL-terminated string
    Str = 0x1,
    Double = 0x2,
    Struct = 0x3,
    Array = 0x4,
    Avp = 0x5,
    /// Byte array without terminator
    Bytes = 0x6,
    /// Wildcard, matches any record
    All = 0xF,
}

impl TypeTag {
    /// Wire nibble for this tag
    #[inline]
    pub fn nibble(self) -> u8 {
        self as u8
    }

    /// Parse a tag from the low 4 bits of a record byte
    pub fn from_nibble(nibble: u8) -> Option<Self> {
        match nibble & 0x0F {
            0x0 => Some(TypeTag::Int),
            0x1 => Some(TypeTag::Str),
            0x2 => Some(TypeTag::Double),
            0x3 => Some(TypeTag::Struct),
            0x4 => Some(TypeTag::Array),
            0x5 => Some(TypeTag::Avp),
            0x6 => Some(TypeTag::Bytes),
            0xF => Some(TypeTag::All),
            _ => None,
        }
    }

    /// Human-readable name
    pub fn name(self) -> &'static str {
        match self {
            TypeTag::Int => "int",
            TypeTag::Str => "string",
            TypeTag::Double => "double",
            TypeTag::Struct => "struct",
            TypeTag::Array => "array",
            TypeTag::Avp => "avp",
            TypeTag::Bytes => "bytes",
            TypeTag::All => "all",
        }
    }
}

/// Scale applied to doubles, which travel as fixed-point integers
pub const DOUBLE_SCALE: f64 = 1000.0;

/// A single encodable RPC argument
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i32),
    Str(String),
    Double(f64),
    Bytes(Vec<u8>),
}

impl Value {
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Value::Int(_) => TypeTag::Int,
            Value::Str(_) => TypeTag::Str,
            Value::Double(_) => TypeTag::Double,
            Value::Bytes(_) => TypeTag::Bytes,
        }
    }

    /// Serialized big-endian value bytes, excluding the record prefix.
    ///
    /// Strings get their NUL terminator here, so the length measured by the
    /// payload builder always counts it.
    pub fn wire_bytes(&self) -> Result<Vec<u8>> {
        match self {
            Value::Int(i) => Ok(i.to_be_bytes().to_vec()),
            Value::Str(s) => {
                let mut bytes = Vec::with_capacity(s.len() + 1);
                bytes.extend_from_slice(s.as_bytes());
                bytes.push(0x0);
                Ok(bytes)
            }
            Value::Double(d) => Ok(double_to_fixed(*d)?.to_be_bytes().to_vec()),
            Value::Bytes(b) => Ok(b.clone()),
        }
    }
}

fn double_to_fixed(d: f64) -> Result<i32> {
    if !d.is_finite() {
        return Err(BinRpcError::Encoding(
            constants::ERR_NON_FINITE_DOUBLE.to_string(),
        ));
    }
    let scaled = (d * DOUBLE_SCALE).trunc();
    if scaled < i32::MIN as f64 || scaled > i32::MAX as f64 {
        return Err(BinRpcError::Encoding(format!(
            "{}: {d}",
            constants::ERR_DOUBLE_RANGE
        )));
    }
    Ok(scaled as i32)
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<f64> for Value {
    fn from(d: f64) -> Self {
        Value::Double(d)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::expect_used)]
    fn test_tag_nibble_roundtrip() {
        for tag in [
            TypeTag::Int,
            TypeTag::Str,
            TypeTag::Double,
            TypeTag::Struct,
            TypeTag::Array,
            TypeTag::Avp,
            TypeTag::Bytes,
            TypeTag::All,
        ] {
            let recovered = TypeTag::from_nibble(tag.nibble()).expect("valid nibble");
            assert_eq!(tag, recovered);
        }
    }

    #[test]
    fn test_unknown_nibbles_rejected() {
        for nibble in 0x7..=0xE {
            assert!(TypeTag::from_nibble(nibble).is_none());
        }
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_string_gets_terminator() {
        assert_eq!(Value::from("ab").wire_bytes().unwrap(), b"ab\0".to_vec());
        assert_eq!(Value::from("").wire_bytes().unwrap(), vec![0x0]);
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_int_is_four_bytes_big_endian() {
        assert_eq!(
            Value::Int(0x0102_0304).wire_bytes().unwrap(),
            vec![0x01, 0x02, 0x03, 0x04]
        );
        assert_eq!(Value::Int(-1).wire_bytes().unwrap(), vec![0xFF; 4]);
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_double_fixed_point() {
        assert_eq!(
            Value::Double(1.5).wire_bytes().unwrap(),
            1500_i32.to_be_bytes().to_vec()
        );
        assert_eq!(
            Value::Double(-0.0019).wire_bytes().unwrap(),
            (-1_i32).to_be_bytes().to_vec()
        );
    }

    #[test]
    fn test_double_rejects_nan_and_overflow() {
        assert!(matches!(
            Value::Double(f64::NAN).wire_bytes(),
            Err(BinRpcError::Encoding(_))
        ));
        assert!(matches!(
            Value::Double(3.0e7).wire_bytes(),
            Err(BinRpcError::Encoding(_))
        ));
    }

    #[test]
    fn test_value_tags() {
        assert_eq!(Value::Int(1).type_tag(), TypeTag::Int);
        assert_eq!(Value::from("x").type_tag(), TypeTag::Str);
        assert_eq!(Value::Double(0.0).type_tag(), TypeTag::Double);
        assert_eq!(Value::Bytes(vec![]).type_tag(), TypeTag::Bytes);
    }
}
