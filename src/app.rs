//! Route table and shared state.

use std::sync::Arc;

use crate::config::LinksConfig;
use crate::health;
use crate::middleware::error::not_found;
use crate::resources::{people, planets};
use crate::router::Router;
use crate::swapi::Swapi;

/// State shared by every request.
#[derive(Clone)]
pub struct AppState {
    swapi: Arc<dyn Swapi>,
}

impl AppState {
    pub fn new(swapi: impl Swapi + 'static) -> Self {
        Self { swapi: Arc::new(swapi) }
    }

    pub fn swapi(&self) -> &dyn Swapi {
        self.swapi.as_ref()
    }
}

/// The service's routes, resource paths mounted under `links.api_prefix`.
///
/// | Path | Handler |
/// |---|---|
/// | `{prefix}/people/{id}` | [`people::show`] |
/// | `{prefix}/planets/{id}` | [`planets::show`] |
/// | `/healthz`, `/readyz` | [`health`] |
/// | anything else | [`not_found`] |
pub fn router(state: AppState, links: &LinksConfig) -> Router<AppState> {
    let prefix = links.api_prefix.as_str();
    Router::with_state(state)
        .get(&format!("{prefix}/people/{{id}}"), people::show)
        .get(&format!("{prefix}/planets/{{id}}"), planets::show)
        .get("/healthz", health::liveness::<AppState>)
        .get("/readyz", health::readiness::<AppState>)
        .fallback(not_found::<AppState>)
}
