//! # Error Types
//!
//! Error handling for binrpc encoding and transmission.
//!
//! ## Error Categories
//! - **Encoding Errors**: a value or one of its length fields cannot be sized
//! - **Framing Errors**: malformed headers or records seen by the decoder side
//! - **Connection Errors**: resolve, dial and write failures, timeouts
//! - **Configuration Errors**: unreadable or invalid settings
//!
//! Errors are never retried internally. They bubble up to the caller with a
//! context string attached.
//!
//! ## Example Usage
//! ```rust,no_run
//! use kamailio_binrpc::error::{BinRpcError, Result};
//! use tracing::error;
//!
//! async fn reload() -> Result<()> {
//!     kamailio_binrpc::invoke("dispatcher.reload", "127.0.0.1", "2049").await
//! }
//!
//! # async fn run() {
//! if let Err(e @ BinRpcError::Connection(_)) = reload().await {
//!     error!(error = %e, "Kamailio is unreachable");
//! }
//! # }
//! ```

use std::io;
use thiserror::Error;

/// Error message constants to avoid allocating on common error paths.
pub mod constants {
    pub const ERR_SHORT_WRITE: &str = "Transport accepted only part of the packet";
    pub const ERR_RESPONSE_UNSUPPORTED: &str = "binrpc response decoding is not supported";
    pub const ERR_NO_ADDRESS: &str = "Host resolved to no usable address";
    pub const ERR_LENGTH_WIDTH: &str = "Failed to determine byte width of value length";
    pub const ERR_NON_FINITE_DOUBLE: &str = "Double value is not finite";
    pub const ERR_DOUBLE_RANGE: &str = "Double value out of fixed-point range";
}

/// Primary error type for all binrpc operations
#[derive(Error, Debug)]
pub enum BinRpcError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Operation timed out")]
    Timeout,

    #[error("Invalid binrpc header")]
    InvalidHeader,

    #[error("Unsupported binrpc version: {0}")]
    UnsupportedVersion(u8),

    #[error("Truncated binrpc data")]
    Truncated,

    #[error("Payload too large: {0} bytes")]
    OversizedPayload(usize),

    #[error("Declared payload length {declared} does not match actual length {actual}")]
    LengthMismatch { declared: usize, actual: usize },

    #[error("Unsupported: {0}")]
    Unsupported(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Type alias for Results using BinRpcError
pub type Result<T> = std::result::Result<T, BinRpcError>;
