//! Connected UDP socket exposed as a duplex byte stream.
//!
//! Every `write` becomes exactly one datagram and every `read` consumes
//! exactly one datagram, so a packet handed over in a single write is never
//! split on the wire.

use std::io;
use std::net::SocketAddr;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::net::{lookup_host, UdpSocket};
use tracing::{debug, instrument};

use crate::error::{constants, BinRpcError, Result};

#[derive(Debug)]
pub struct UdpTransport {
    socket: UdpSocket,
}

impl UdpTransport {
    /// Resolve `target` (`host:port`) and connect an ephemeral socket to the
    /// first address that accepts it.
    #[instrument]
    pub async fn connect(target: &str) -> Result<Self> {
        let addrs = lookup_host(target)
            .await
            .map_err(|e| BinRpcError::Connection(format!("failed to resolve {target}: {e}")))?;

        let mut last_err = None;
        for addr in addrs {
            match Self::connect_addr(addr).await {
                Ok(transport) => return Ok(transport),
                Err(e) => {
                    debug!(%addr, error = %e, "UDP connect attempt failed");
                    last_err = Some(e);
                }
            }
        }

        Err(match last_err {
            Some(e) => BinRpcError::Connection(format!(
                "failed to connect to kamailio RPC server at {target}: {e}"
            )),
            None => BinRpcError::Connection(format!(
                "{}: {target}",
                constants::ERR_NO_ADDRESS
            )),
        })
    }

    /// Bind an ephemeral socket of the address's family and connect it
    pub async fn connect_addr(addr: SocketAddr) -> io::Result<Self> {
        let local: SocketAddr = if addr.is_ipv4() {
            ([0, 0, 0, 0], 0).into()
        } else {
            ([0u16; 8], 0).into()
        };
        let socket = UdpSocket::bind(local).await?;
        socket.connect(addr).await?;
        Ok(Self { socket })
    }

    pub fn peer_addr(&self) -> io::Result<SocketAddr> {
        self.socket.peer_addr()
    }
}

impl AsyncWrite for UdpTransport {
    fn poll_write(self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &[u8]) -> Poll<io::Result<usize>> {
        self.socket.poll_send(cx, buf)
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

impl AsyncRead for UdpTransport {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        self.socket.poll_recv(cx, buf)
    }
}
