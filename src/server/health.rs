//! Liveness endpoints.

use axum::Json;
use serde::Serialize;

/// Plain-text banner at the root path, the first thing a deploy check hits.
pub async fn liveness() -> &'static str {
    "Doctors portal server is running"
}

/// Health report body.
#[derive(Debug, Serialize)]
pub struct Health {
    /// Always "ok" while the process is serving requests
    pub status: &'static str,
    /// Package name, to tell services apart on a shared host
    pub service: &'static str,
    /// Package version
    pub version: &'static str,
}

/// Process-level health report.
///
/// Says nothing about the database or the payment provider; those surface
/// their own failures at request time.
pub async fn health_check() -> Json<Health> {
    Json(Health {
        status: "ok",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}
