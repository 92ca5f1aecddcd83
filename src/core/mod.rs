//! # Core Protocol Components
//!
//! Bit-level binrpc encoding: values, records, headers and packets.
//!
//! ## Components
//! - **Value**: scalar RPC arguments and their 4-bit type tags
//! - **Payload**: record framing with inline or explicit value lengths
//! - **Header**: magic/version byte, field widths, payload length, cookie
//! - **Packet**: payload-then-header assembly with an injected cookie source
//! - **Codec**: Tokio codec for framing packets into and out of byte buffers
//!
//! ## Wire Format
//! ```text
//! [0xA1] [flags|LL|CL] [payload length (LL+1)] [cookie (CL+1)] [record]
//! record = [sflag|size|type] [value length (size, if sflag)] [value]
//! ```

pub mod codec;
pub mod cookie;
pub mod header;
pub mod packet;
pub mod payload;
pub mod value;
