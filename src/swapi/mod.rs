//! Upstream Star Wars API.
//!
//! Resource handlers talk to the upstream through the [`Swapi`] trait:
//! [`SwapiClient`] over HTTP in production, [`Fixtures`] from memory for
//! offline runs and tests.

mod client;
mod error;
mod fixtures;

use async_trait::async_trait;
use serde_json::Value;

pub use client::SwapiClient;
pub use error::SwapiError;
pub use fixtures::Fixtures;

/// What to fetch.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Target<'a> {
    /// A route such as `/people/1/`, resolved against the configured base.
    Route(&'a str),
    /// A complete URL, as found in upstream documents, used verbatim.
    Url(&'a str),
}

impl Target<'_> {
    pub fn resolve(self, base: &str) -> String {
        match self {
            Self::Route(route) => format!("{base}{route}"),
            Self::Url(url) => url.to_owned(),
        }
    }
}

/// Fetches one JSON document from the upstream API.
#[async_trait]
pub trait Swapi: Send + Sync {
    async fn get(&self, target: Target<'_>) -> Result<Value, SwapiError>;
}
