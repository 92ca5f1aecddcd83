//! Send-side metrics
//!
//! Atomic counters for binrpc requests, shareable across tasks.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, info};

use crate::error::BinRpcError;

#[derive(Debug)]
pub struct Metrics {
    /// Requests handed to the transport successfully
    pub requests_sent: AtomicU64,
    /// Datagram bytes written, headers included
    pub bytes_sent: AtomicU64,
    /// Values that could not be encoded
    pub encoding_errors: AtomicU64,
    /// Resolve, dial and write failures
    pub connection_errors: AtomicU64,
    /// Configured timeouts that elapsed
    pub timeouts: AtomicU64,
    start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            requests_sent: AtomicU64::new(0),
            bytes_sent: AtomicU64::new(0),
            encoding_errors: AtomicU64::new(0),
            connection_errors: AtomicU64::new(0),
            timeouts: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record a request datagram of `byte_count` bytes
    pub fn request_sent(&self, byte_count: u64) {
        self.requests_sent.fetch_add(1, Ordering::Relaxed);
        self.bytes_sent.fetch_add(byte_count, Ordering::Relaxed);
    }

    /// Count a failed request under the matching error counter
    pub fn request_failed(&self, error: &BinRpcError) {
        let counter = match error {
            BinRpcError::Encoding(_) | BinRpcError::OversizedPayload(_) => &self.encoding_errors,
            BinRpcError::Timeout => &self.timeouts,
            _ => &self.connection_errors,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests_sent: self.requests_sent.load(Ordering::Relaxed),
            bytes_sent: self.bytes_sent.load(Ordering::Relaxed),
            encoding_errors: self.encoding_errors.load(Ordering::Relaxed),
            connection_errors: self.connection_errors.load(Ordering::Relaxed),
            timeouts: self.timeouts.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    pub fn log_metrics(&self) {
        let snapshot = self.snapshot();
        info!(
            requests_sent = snapshot.requests_sent,
            bytes_sent = snapshot.bytes_sent,
            encoding_errors = snapshot.encoding_errors,
            connection_errors = snapshot.connection_errors,
            timeouts = snapshot.timeouts,
            uptime_seconds = snapshot.uptime_seconds,
            "binrpc client metrics snapshot"
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub requests_sent: u64,
    pub bytes_sent: u64,
    pub encoding_errors: u64,
    pub connection_errors: u64,
    pub timeouts: u64,
    pub uptime_seconds: u64,
}

/// Logs how long an operation took when dropped
pub struct Timer {
    start: Instant,
    operation: &'static str,
}

impl Timer {
    pub fn start(operation: &'static str) -> Self {
        Self {
            start: Instant::now(),
            operation,
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        debug!(
            operation = self.operation,
            duration_us = self.start.elapsed().as_micros() as u64,
            "Operation completed"
        );
    }
}
