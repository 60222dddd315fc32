//! Log subscriber set-up.

use std::fmt;

use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;
use crate::error::Error;

/// How urgently an error log needs a human. Recorded as the `severity` field.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Severity {
    Low,
    Medium,
    Critical,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low      => "low",
            Self::Medium   => "medium",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Installs the global `fmt` subscriber.
///
/// `RUST_LOG` wins over the configured level. An invalid `RUST_LOG` falls
/// back to the configured level with a warning; an invalid configured level
/// is an error. Calling this twice is harmless; the second subscriber is
/// discarded.
pub fn init(config: &LogConfig) -> Result<(), Error> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let (env_filter, rejected) = filter(rust_log.as_deref(), &config.level)?;

    if tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_ansi(config.ansi)
        .with_target(false)
        .try_init()
        .is_err()
    {
        tracing::debug!("global tracing subscriber already initialised, skipping");
    }
    if let Some(reason) = rejected {
        tracing::warn!(level = %config.level, "ignoring invalid RUST_LOG: {reason}");
    }
    Ok(())
}

/// The filter to install, plus why `rust_log` was rejected if it was.
fn filter(rust_log: Option<&str>, level: &str) -> Result<(EnvFilter, Option<String>), Error> {
    let rejected = match rust_log.filter(|directives| !directives.trim().is_empty()) {
        None => None,
        Some(directives) => match EnvFilter::try_new(directives) {
            Ok(filter) => return Ok((filter, None)),
            Err(e) => Some(format!("`{directives}`: {e}")),
        },
    };
    let filter = EnvFilter::try_new(level)
        .map_err(|e| Error::Logging(format!("invalid log level `{level}`: {e}")))?;
    Ok((filter, rejected))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_is_harmless() {
        let config = LogConfig::default();
        assert!(init(&config).is_ok());
        assert!(init(&config).is_ok());
    }

    #[test]
    fn rust_log_overrides_the_configured_level() {
        let (installed, rejected) = filter(Some("holonet=debug"), "info").unwrap();
        assert_eq!(installed.to_string(), "holonet=debug");
        assert!(rejected.is_none());

        let (installed, rejected) = filter(None, "warn").unwrap();
        assert_eq!(installed.to_string(), "warn");
        assert!(rejected.is_none());
    }

    #[test]
    fn invalid_rust_log_is_reported_and_replaced() {
        let (installed, rejected) = filter(Some("holonet=loud"), "info").unwrap();
        assert_eq!(installed.to_string(), "info");
        assert!(rejected.is_some_and(|reason| reason.contains("holonet=loud")));
    }

    #[test]
    fn invalid_configured_level_is_an_error() {
        let err = filter(None, "holonet=loud").unwrap_err();
        assert!(matches!(err, Error::Logging(_)));
    }

    #[test]
    fn severity_renders_lowercase() {
        assert_eq!(Severity::Critical.to_string(), "critical");
        assert_eq!(Severity::Low.as_str(), "low");
    }
}
