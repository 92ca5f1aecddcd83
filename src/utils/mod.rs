//! # Utility Modules
//!
//! Supporting utilities used by the client.
//!
//! ## Components
//! - **Logging**: tracing subscriber setup from configuration
//! - **Metrics**: thread-safe send counters
//! - **Timeout**: optional async timeout wrapper

pub mod logging;
pub mod metrics;
pub mod timeout;
