/// Upstream fetch failure.
#[derive(Debug, thiserror::Error)]
pub enum SwapiError {
    #[error("swapi has nothing at {url}")]
    NotFound { url: String },

    #[error("swapi answered {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("swapi request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("swapi sent invalid JSON for {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl SwapiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
