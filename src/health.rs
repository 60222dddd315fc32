//! Health-check handlers.
//!
//! | Probe | Path | Question |
//! |---|---|---|
//! | **Liveness** | `/healthz` | Is the process alive? |
//! | **Readiness** | `/readyz` | Can it serve traffic? |
//!
//! Readiness does not probe the upstream API; upstream failures surface as
//! `502`s on the resource routes.

use std::sync::Arc;

use crate::{Request, Response};

/// Always `200 OK` with body `"ok"`.
pub async fn liveness<S>(_req: Request, _state: Arc<S>) -> Response {
    Response::text("ok")
}

/// `200 OK` with body `"ready"`.
pub async fn readiness<S>(_req: Request, _state: Arc<S>) -> Response {
    Response::text("ready")
}
