//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: shared, read-only state built once at startup (serializer registries)
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request extraction and negotiated response mapping
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use records_core::ConfigError;
use tower::ServiceBuilder;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs` and the black-box tests).
///
/// Fails when a resource's serializer registry is misconfigured, so a server that
/// could not answer every request never starts.
pub fn build_app() -> Result<Router, ConfigError> {
    let services = Arc::new(services::build_services()?);

    Ok(Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(Extension(services))
        .layer(ServiceBuilder::new().layer(axum::middleware::from_fn(middleware::trace_requests))))
}
