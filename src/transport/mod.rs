//! # Transport Layer
//!
//! Datagram transport for binrpc requests.
//!
//! Kamailio's ctl module accepts binrpc over UDP, one packet per datagram.
//! [`udp::UdpTransport`] adapts a connected `tokio` UDP socket to
//! `AsyncRead`/`AsyncWrite`, so the request codec can run over it or over any
//! in-memory duplex stream in tests.

pub mod udp;

pub use udp::UdpTransport;
