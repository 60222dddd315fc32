//! Unified error type.

use crate::config::ConfigError;
use crate::swapi::SwapiError;

/// Start-up and infrastructure failures: reading configuration, installing
/// the log subscriber, building the upstream client, binding the port.
///
/// Per-request failures are [`ApiError`](crate::ApiError)s and end up as
/// responses, never here.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("logging: {0}")]
    Logging(String),

    #[error(transparent)]
    Swapi(#[from] SwapiError),
}
