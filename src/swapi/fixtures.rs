//! In-memory upstream.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value;

use super::{Swapi, SwapiError, Target};

/// [`Swapi`] answering from a fixed set of documents keyed by full URL.
/// Anything else is [`SwapiError::NotFound`].
#[derive(Debug, Clone, Default)]
pub struct Fixtures {
    base: String,
    documents: HashMap<String, Value>,
    calls: Arc<AtomicUsize>,
}

impl Fixtures {
    /// `base` plays the role of host plus host prefix for [`Target::Route`].
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into(), ..Self::default() }
    }

    pub fn with(mut self, url: impl Into<String>, document: Value) -> Self {
        self.documents.insert(url.into(), document);
        self
    }

    /// Number of fetches served or refused so far, across clones.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Swapi for Fixtures {
    async fn get(&self, target: Target<'_>) -> Result<Value, SwapiError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let url = target.resolve(&self.base);
        self.documents.get(&url).cloned().ok_or(SwapiError::NotFound { url })
    }
}
