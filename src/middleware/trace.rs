//! Access logging.

use std::net::SocketAddr;
use std::time::Duration;

use tracing::info;

/// Logs one served request at INFO.
pub fn access(method: &str, path: &str, status: u16, latency: Duration, peer: SocketAddr) {
    info!(
        method,
        path,
        status,
        latency_ms = latency.as_secs_f64() * 1000.0,
        peer = %peer,
        "request served"
    );
}
