//! Cross-cutting request concerns.
//!
//! - [`trace`]: one access-log line per request (method, path, status,
//!   latency, peer).
//! - [`error`]: the HTTP-facing error type, its status mapping, the JSON
//!   error envelope, and the fallback for unknown routes.

pub mod error;
pub mod trace;
