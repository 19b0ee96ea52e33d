use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use records_core::{AcceptPreferences, Rendered};

// -------------------------
// Request DTOs
// -------------------------

/// Query string of the records list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Search expression. Accepted for compatibility; the list is not filtered.
    pub q: Option<String>,
    /// Query alias (`json`, `xml`) overriding `Accept`.
    pub format: Option<String>,
}

/// All `Accept` header lines joined; non-ASCII lines are dropped.
pub fn accept_preferences(headers: &HeaderMap) -> AcceptPreferences {
    let joined = headers
        .get_all(header::ACCEPT)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect::<Vec<_>>()
        .join(",");
    AcceptPreferences::parse(&joined)
}

// -------------------------
// Response mapping
// -------------------------

/// 200 with the negotiated body; `Content-Type` is the selected media type.
pub fn rendered_to_response(rendered: Rendered) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, rendered.media_type.to_string()),
            (header::VARY, "Accept".to_string()),
        ],
        rendered.body,
    )
        .into_response()
}
