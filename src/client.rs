//! # Request Codec and Client
//!
//! Sends a binrpc request naming an RPC method to Kamailio.
//!
//! [`ClientCodec`] writes requests over any duplex stream the caller already
//! owns. [`Client`] and [`invoke`] add the UDP dial, optional timeouts and
//! metrics on top. Replies are never read: Kamailio answers, but decoding
//! replies is not supported and [`ClientCodec::read_response`] says so.
//!
//! ## Example
//! ```rust,no_run
//! use kamailio_binrpc::client::Client;
//! use kamailio_binrpc::config::ClientConfig;
//!
//! # async fn run() -> kamailio_binrpc::error::Result<()> {
//! let client = Client::new(ClientConfig::default());
//! let cookie = client.invoke("dispatcher.reload").await?;
//! println!("sent request {cookie:08x}");
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tracing::{debug, instrument, warn};

use crate::config::{BinRpcConfig, ClientConfig};
use crate::core::cookie::{CookieSource, ThreadRngCookies};
use crate::core::packet::{Packet, PacketAssembler};
use crate::core::value::Value;
use crate::error::{constants, BinRpcError, Result};
use crate::transport::UdpTransport;
use crate::utils::metrics::{Metrics, Timer};
use crate::utils::timeout::with_timeout_opt;

/// Writes binrpc requests to a caller-owned duplex stream
#[derive(Debug)]
pub struct ClientCodec<T, C = ThreadRngCookies> {
    io: T,
    assembler: PacketAssembler<C>,
}

impl<T> ClientCodec<T, ThreadRngCookies> {
    pub fn new(io: T) -> Self {
        Self {
            io,
            assembler: PacketAssembler::new(),
        }
    }
}

impl<T, C> ClientCodec<T, C>
where
    T: AsyncRead + AsyncWrite + Unpin,
    C: CookieSource,
{
    pub fn with_cookie_source(io: T, cookies: C) -> Self {
        Self {
            io,
            assembler: PacketAssembler::with_cookie_source(cookies),
        }
    }

    /// Encode `method` as a string value and write it as one packet.
    ///
    /// The packet goes out in a single write; a transport that accepts only
    /// part of it is reported as a connection error. Returns the cookie the
    /// request was sent with.
    pub async fn write_request(&mut self, method: &str) -> Result<u32> {
        let packet = self.write_value(&Value::Str(method.to_string())).await?;
        Ok(packet.cookie())
    }

    async fn write_value(&mut self, value: &Value) -> Result<Packet> {
        let packet = self.assembler.assemble(value)?;

        let written = self
            .io
            .write(packet.as_bytes())
            .await
            .map_err(|e| BinRpcError::Connection(format!("failed to invoke RPC method: {e}")))?;
        if written != packet.len() {
            return Err(BinRpcError::Connection(format!(
                "{}: {written} of {} bytes",
                constants::ERR_SHORT_WRITE,
                packet.len()
            )));
        }
        self.io
            .flush()
            .await
            .map_err(|e| BinRpcError::Connection(format!("failed to invoke RPC method: {e}")))?;

        debug!(cookie = packet.cookie(), bytes = written, "Wrote binrpc request");
        Ok(packet)
    }

    /// Reply decoding is not supported; this always fails.
    pub async fn read_response(&mut self) -> Result<Value> {
        Err(BinRpcError::Unsupported(
            constants::ERR_RESPONSE_UNSUPPORTED.to_string(),
        ))
    }
}

/// UDP binrpc client bound to one Kamailio target
#[derive(Debug)]
pub struct Client<C = ThreadRngCookies> {
    config: ClientConfig,
    cookies: C,
    metrics: Arc<Metrics>,
}

impl Client<ThreadRngCookies> {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_cookie_source(config, ThreadRngCookies)
    }

    pub fn from_config(config: &BinRpcConfig) -> Self {
        Self::new(config.client.clone())
    }
}

impl<C: CookieSource> Client<C> {
    pub fn with_cookie_source(config: ClientConfig, cookies: C) -> Self {
        Self {
            config,
            cookies,
            metrics: Arc::new(Metrics::new()),
        }
    }

    /// Share a metrics collector with other clients
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    /// Dial the target, send one request for `method` and release the socket.
    ///
    /// Succeeds as soon as the datagram is written. Nothing is retried.
    #[instrument(skip(self), fields(target = %self.config.target()))]
    pub async fn invoke(&self, method: &str) -> Result<u32> {
        let _timer = Timer::start("binrpc_invoke");

        match self.send(method).await {
            Ok((cookie, bytes)) => {
                self.metrics.request_sent(bytes as u64);
                Ok(cookie)
            }
            Err(e) => {
                warn!(error = %e, "binrpc invoke failed");
                self.metrics.request_failed(&e);
                Err(e)
            }
        }
    }

    async fn send(&self, method: &str) -> Result<(u32, usize)> {
        let target = self.config.target();
        let transport =
            with_timeout_opt(self.config.connect_timeout, UdpTransport::connect(&target)).await?;

        // The socket is owned by the codec and dropped on every exit path
        let mut codec = ClientCodec::with_cookie_source(transport, &self.cookies);
        let packet = with_timeout_opt(
            self.config.write_timeout,
            codec.write_value(&Value::Str(method.to_string())),
        )
        .await?;

        Ok((packet.cookie(), packet.len()))
    }
}

/// Send `method` to Kamailio at `host:port` over UDP.
///
/// Returns once the request datagram is written; the reply is not awaited.
#[instrument]
pub async fn invoke(method: &str, host: &str, port: &str) -> Result<()> {
    let port = port
        .parse::<u16>()
        .map_err(|e| BinRpcError::Connection(format!("invalid port '{port}': {e}")))?;

    let config = ClientConfig {
        host: host.to_string(),
        port,
        ..ClientConfig::default()
    };
    Client::new(config).invoke(method).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::cookie::FixedCookie;
    use tokio::io::AsyncReadExt;

    #[tokio::test]
    async fn test_write_request_over_duplex() {
        let (client_end, mut server_end) = tokio::io::duplex(1024);
        let mut codec = ClientCodec::with_cookie_source(client_end, FixedCookie(0x1122_3344));

        let cookie = codec.write_request("core.uptime").await.unwrap();
        assert_eq!(cookie, 0x1122_3344);
        drop(codec);

        let mut captured = Vec::new();
        server_end.read_to_end(&mut captured).await.unwrap();

        let packet = Packet::from_bytes(&captured).unwrap();
        assert_eq!(packet.cookie(), 0x1122_3344);
        assert_eq!(packet.value().unwrap(), Value::from("core.uptime"));
    }

    #[tokio::test]
    async fn test_read_response_is_unsupported() {
        let (client_end, _server_end) = tokio::io::duplex(64);
        let mut codec = ClientCodec::new(client_end);
        assert!(matches!(
            codec.read_response().await,
            Err(BinRpcError::Unsupported(_))
        ));
    }

    #[tokio::test]
    async fn test_short_write_is_connection_error() {
        // Duplex buffer smaller than the packet forces a partial write
        let (client_end, _server_end) = tokio::io::duplex(4);
        let mut codec = ClientCodec::new(client_end);
        assert!(matches!(
            codec.write_request("dispatcher.list").await,
            Err(BinRpcError::Connection(_))
        ));
    }

    #[tokio::test]
    async fn test_invoke_rejects_bad_port() {
        assert!(matches!(
            invoke("core.uptime", "127.0.0.1", "not-a-port").await,
            Err(BinRpcError::Connection(_))
        ));
    }
}
