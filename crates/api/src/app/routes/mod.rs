use axum::{routing::get, Router};

pub mod records;
pub mod system;

/// Router for the resource endpoints.
///
/// `/records/` is the collection; `/records` redirects there like a strict-slash router.
pub fn router() -> Router {
    Router::new()
        .route("/records/", get(records::list_records))
        .route("/records", get(records::redirect_to_collection))
}
