//! # holonet
//!
//! A small read-through HTTP façade over the Star Wars API.
//!
//! | Route | Answer |
//! |---|---|
//! | `GET /people/{id}` | `{"first_name": "Luke", "last_name": "Skywalker", "species": "Human"}` |
//! | `GET /planets/{id}` | `{"name": "Tatooine", "count": {"Human": 8, "Droid": 2}}` |
//!
//! Upstream documents are reshaped through declarative models ([`model`]):
//! a rule list per entity, hydration from a JSON mapping keyed by wire or
//! storage names, validation against the rules, and projection back out.
//!
//! The HTTP side is deliberately thin:
//!
//! - Radix-tree routing via [`matchit`], shared state per router
//! - hyper 1 on tokio, HTTP/1.1 and HTTP/2
//! - Graceful shutdown on SIGTERM / Ctrl-C
//! - Errors as JSON envelopes, one access-log line per request
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use holonet::{AppState, Config, Server, SwapiClient, app};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), holonet::Error> {
//!     let config = Config::load(None)?;
//!     holonet::logging::init(&config.log)?;
//!
//!     let state = AppState::new(SwapiClient::from_config(&config)?);
//!     let router = app::router(state, &config.links);
//!     Server::bind(config.http.socket_addr()?).serve(router).await
//! }
//! ```

mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod app;
pub mod config;
pub mod health;
pub mod logging;
pub mod middleware;
pub mod model;
pub mod resources;
pub mod swapi;

pub use app::AppState;
pub use config::Config;
pub use error::Error;
pub use handler::Handler;
pub use method::Method;
pub use middleware::error::ApiError;
pub use request::Request;
pub use response::{IntoResponse, Json, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
pub use status::Status;
pub use swapi::SwapiClient;
