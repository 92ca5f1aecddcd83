//! # kamailio-binrpc
//!
//! Encoder and UDP client for Kamailio's binrpc control protocol.
//!
//! A request is one datagram: a variable-width header carrying the payload
//! length and a random cookie, followed by a single type-tagged record with
//! the RPC method name.
//!
//! ## Quick start
//! ```rust,no_run
//! # async fn run() -> kamailio_binrpc::error::Result<()> {
//! kamailio_binrpc::invoke("dispatcher.reload", "127.0.0.1", "2049").await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//! - [`core`]: values, records, headers, packet assembly and the Tokio codec
//! - [`client`]: request codec, configured client, `invoke`
//! - [`transport`]: connected UDP socket as a duplex stream
//! - [`config`]: TOML/environment configuration and protocol constants
//! - [`utils`]: logging setup, metrics, timeouts

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod client;
pub mod config;
pub mod core;
pub mod error;
pub mod transport;
pub mod utils;

pub use client::{invoke, Client, ClientCodec};
pub use crate::core::cookie::{CookieSource, FixedCookie, SeededCookies, ThreadRngCookies};
pub use crate::core::packet::{Packet, PacketAssembler};
pub use crate::core::value::{TypeTag, Value};
pub use error::{BinRpcError, Result};
