//! Service configuration.
//!
//! Loaded once at start-up: built-in defaults, then an optional JSON file,
//! then `HOLONET_*` environment overrides, then validation. The resulting
//! [`Config`] is passed by reference to whatever needs it. The binary logs
//! the effective configuration at DEBUG in the same JSON shape.
//!
//! ```json
//! {
//!   "http":  { "host": "0.0.0.0", "port": 3000 },
//!   "links": { "api_prefix": "", "host_prefix": "/api" },
//!   "swapi": { "host": "https://swapi.dev", "timeout_secs": 30 },
//!   "log":   { "level": "info" }
//! }
//! ```

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid environment variable {var}: {message}")]
    Env { var: &'static str, message: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub http: HttpConfig,
    pub links: LinksConfig,
    pub swapi: SwapiConfig,
    pub log: LogConfig,
}

/// Where the server listens.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_owned(), port: 3000 }
    }
}

impl HttpConfig {
    pub fn socket_addr(&self) -> ConfigResult<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ConfigError::Invalid(format!("http address {}:{}: {e}", self.host, self.port)))
    }
}

/// Path prefixes: `api_prefix` is mounted in front of the public routes,
/// `host_prefix` sits between the upstream host and its resource routes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinksConfig {
    pub api_prefix: String,
    pub host_prefix: String,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self { api_prefix: String::new(), host_prefix: "/api".to_owned() }
    }
}

/// Upstream API client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SwapiConfig {
    pub host: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for SwapiConfig {
    fn default() -> Self {
        Self {
            host: "https://swapi.dev".to_owned(),
            timeout_secs: 30,
            user_agent: concat!("holonet/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// An `EnvFilter` directive, e.g. `info` or `holonet=debug,warn`.
    pub level: String,
    pub ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { level: "info".to_owned(), ansi: true }
    }
}

impl Config {
    /// Defaults, then `path` if given, then the process environment.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|var| std::env::var(var).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parses a JSON file. Missing sections and keys keep their defaults.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_owned(), source })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Applies overrides from `lookup`, normally the process environment.
    ///
    /// `PORT` is honoured as well as `HOLONET_PORT`; the latter wins.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<()> {
        for var in ["PORT", "HOLONET_PORT"] {
            if let Some(port) = lookup(var) {
                self.http.port = port
                    .parse()
                    .map_err(|e| ConfigError::Env { var, message: format!("{e}") })?;
            }
        }
        if let Some(host) = lookup("HOLONET_HOST") {
            self.http.host = host;
        }
        if let Some(host) = lookup("HOLONET_SWAPI_HOST") {
            self.swapi.host = host;
        }
        if let Some(prefix) = lookup("HOLONET_API_PREFIX") {
            self.links.api_prefix = prefix;
        }
        if let Some(level) = lookup("HOLONET_LOG_LEVEL") {
            self.log.level = level;
        }
        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.http.port == 0 {
            return Err(ConfigError::Invalid("http.port must be non-zero".to_owned()));
        }
        self.http.socket_addr()?;

        let url = reqwest::Url::parse(&self.swapi.host)
            .map_err(|e| ConfigError::Invalid(format!("swapi.host `{}`: {e}", self.swapi.host)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid(format!("swapi.host `{}` must be http(s)", self.swapi.host)));
        }
        if self.swapi.timeout_secs == 0 {
            return Err(ConfigError::Invalid("swapi.timeout_secs must be non-zero".to_owned()));
        }

        for (key, prefix) in [("links.api_prefix", &self.links.api_prefix), ("links.host_prefix", &self.links.host_prefix)] {
            if !prefix.is_empty() && (!prefix.starts_with('/') || prefix.ends_with('/')) {
                return Err(ConfigError::Invalid(format!(
                    "{key} `{prefix}` must start with `/` and not end with one"
                )));
            }
        }
        Ok(())
    }
}
