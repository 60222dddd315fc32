//! HTTP-facing errors.
//!
//! Handlers return `Result<_, ApiError>`; the error side turns into a status
//! code and a JSON envelope `{"error": true, "message": "..."}`. Client errors
//! carry their specific message and are logged at WARN. Server errors carry a
//! generic message and are logged at ERROR; upstream outages are `medium`
//! severity, our own failures `critical`.

use std::sync::{Arc, LazyLock};

use serde_json::{Value, json};
use tracing::{error, warn};

use crate::logging::Severity;
use crate::method::Method;
use crate::model::{Field, KeySource, Kind, Model, Record, Schema, ValidationError};
use crate::request::Request;
use crate::response::{IntoResponse, Response};
use crate::status::Status;
use crate::swapi::SwapiError;

/// Message sent in place of any server-side failure detail.
pub const TECHNICAL_ERROR: &str = "Technical Error. Please try again later";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Path or query parameters failed their model's rules.
    #[error("invalid request parameters: {0}")]
    InvalidParams(#[source] ValidationError),

    /// The requested resource does not exist upstream.
    #[error("{0}")]
    NotFound(&'static str),

    #[error("no route for {method} {path}")]
    RouteNotFound { method: Method, path: String },

    #[error("upstream failure: {0}")]
    Upstream(#[from] SwapiError),

    /// Upstream data did not fit the response model.
    #[error("invalid response data: {0}")]
    InvalidResponse(#[from] ValidationError),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> Status {
        match self {
            Self::InvalidParams(_) => Status::BadRequest,
            Self::NotFound(_) | Self::RouteNotFound { .. } => Status::NotFound,
            Self::Upstream(_) => Status::BadGateway,
            Self::InvalidResponse(_) | Self::Internal(_) => Status::InternalServerError,
        }
    }

    /// What the client gets to read.
    pub fn public_message(&self) -> String {
        match self {
            Self::InvalidParams(err) => err.message().to_owned(),
            Self::NotFound(message) => (*message).to_owned(),
            Self::RouteNotFound { .. } => "Not Found".to_owned(),
            Self::Upstream(_) | Self::InvalidResponse(_) | Self::Internal(_) => {
                TECHNICAL_ERROR.to_owned()
            }
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::InvalidParams(_) | Self::NotFound(_) | Self::RouteNotFound { .. } => Severity::Low,
            Self::Upstream(_) => Severity::Medium,
            Self::InvalidResponse(_) | Self::Internal(_) => Severity::Critical,
        }
    }

    fn log(&self) {
        let status = self.status().code();
        let severity = self.severity();
        if self.status().is_client_error() {
            warn!(status, severity = %severity, error = %self, "request rejected");
        } else {
            error!(status, severity = %severity, error = %self, "request failed");
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log();
        Response::builder()
            .status(self.status())
            .json(ErrorEnvelope::body(&self.public_message()))
    }
}

// ── Envelope ──────────────────────────────────────────────────────────────────

static ERROR_ENVELOPE: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new("ErrorEnvelope", vec![
        Field::new("error", "error").required().kinds(&[Kind::Boolean]),
        Field::new("message", "message").required().kinds(&[Kind::String]).at_least(1.0),
    ])
});

/// Body of every error response.
#[derive(Debug)]
pub struct ErrorEnvelope(Record);

impl Model for ErrorEnvelope {
    fn schema() -> &'static Schema { &ERROR_ENVELOPE }
    fn from_record(record: Record) -> Self { Self(record) }
    fn record(&self) -> &Record { &self.0 }
}

impl ErrorEnvelope {
    /// Serialised envelope for `message`; an empty message becomes
    /// [`TECHNICAL_ERROR`].
    pub fn body(message: &str) -> Vec<u8> {
        let values = Self::hydrate(Some(&json!({"error": true, "message": message})), KeySource::Wire)
            .map(|envelope| Value::Object(envelope.values()))
            .unwrap_or_else(|_| json!({"error": true, "message": TECHNICAL_ERROR}));
        values.to_string().into_bytes()
    }
}

// ── Fallback ──────────────────────────────────────────────────────────────────

/// Fallback for unknown routes: a JSON envelope when the client takes JSON,
/// plain text otherwise.
pub async fn not_found<S>(req: Request, _state: Arc<S>) -> Response {
    let err = ApiError::RouteNotFound { method: req.method(), path: req.path().to_owned() };
    if req.accepts("application/json") {
        return err.into_response();
    }
    err.log();
    Response::builder().status(Status::NotFound).text("Not found")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(res: &Response) -> Value {
        serde_json::from_slice(res.body()).unwrap()
    }

    #[test]
    fn client_errors_keep_their_message() {
        let res = ApiError::NotFound("No planet exists").into_response();
        assert_eq!(res.status_code(), 404);
        assert_eq!(body(&res), json!({"error": true, "message": "No planet exists"}));
    }

    #[test]
    fn server_errors_hide_details() {
        let res = ApiError::Internal("person 7 has an empty name".into()).into_response();
        assert_eq!(res.status_code(), 500);
        assert_eq!(body(&res), json!({"error": true, "message": TECHNICAL_ERROR}));
    }

    #[test]
    fn empty_message_falls_back_to_technical_error() {
        let bytes = ErrorEnvelope::body("");
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["message"], TECHNICAL_ERROR);
    }

    #[tokio::test]
    async fn unknown_route_negotiates_body() {
        let res = not_found(Request::new(Method::Get, "/vehicles/4"), Arc::new(())).await;
        assert_eq!(res.status_code(), 404);
        assert_eq!(body(&res), json!({"error": true, "message": "Not Found"}));

        let req = Request::new(Method::Get, "/vehicles/4").with_header("accept", "text/html");
        let res = not_found(req, Arc::new(())).await;
        assert_eq!(res.status_code(), 404);
        assert_eq!(res.body(), b"Not found");
    }
}
