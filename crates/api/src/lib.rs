//! HTTP API: configuration, request context, middleware, and the axum application.

pub mod app;
pub mod config;
pub mod context;
pub mod middleware;
