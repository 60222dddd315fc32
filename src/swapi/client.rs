//! HTTP client for the upstream API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::debug;

use super::{Swapi, SwapiError, Target};
use crate::config::Config;

/// [`Swapi`] over HTTP. One connection pool, shared by every request.
#[derive(Debug, Clone)]
pub struct SwapiClient {
    http: Client,
    base: String,
}

impl SwapiClient {
    /// Builds the client from `swapi.*`; routes resolve against
    /// `swapi.host` followed by `links.host_prefix`.
    pub fn from_config(config: &Config) -> Result<Self, SwapiError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.swapi.timeout_secs))
            .user_agent(&config.swapi.user_agent)
            .build()?;
        let base = format!("{}{}", config.swapi.host.trim_end_matches('/'), config.links.host_prefix);
        debug!(%base, timeout_secs = config.swapi.timeout_secs, "swapi client ready");
        Ok(Self { http, base })
    }

    pub fn base(&self) -> &str {
        &self.base
    }
}

#[async_trait]
impl Swapi for SwapiClient {
    async fn get(&self, target: Target<'_>) -> Result<Value, SwapiError> {
        let url = target.resolve(&self.base);
        debug!(%url, "fetching");

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(SwapiError::NotFound { url });
        }
        if !status.is_success() {
            return Err(SwapiError::Status { url, status: status.as_u16() });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|source| SwapiError::Decode { url, source })
    }
}
