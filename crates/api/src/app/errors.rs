use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use records_core::{DispatchError, NegotiationError};

pub fn dispatch_error_to_response(err: DispatchError) -> axum::response::Response {
    match err {
        DispatchError::Negotiation(NegotiationError::MethodNotRegistered(method)) => json_error(
            StatusCode::METHOD_NOT_ALLOWED,
            "method_not_allowed",
            format!("method {method} is not supported by this resource"),
        ),
        DispatchError::Serialize(e) => {
            tracing::error!("serializer failed: {e}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "serialize_error", e.to_string())
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
