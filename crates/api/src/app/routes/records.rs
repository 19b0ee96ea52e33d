use std::sync::Arc;

use axum::{
    extract::{Extension, Query, RawQuery},
    http::{HeaderMap, Method},
    response::{Redirect, Response},
};
use serde_json::Value;

use records_core::Payload;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::RequestContext;

/// The records list. A stub: always the same single object.
pub fn list_payload() -> Payload {
    let mut payload = Payload::new();
    payload.insert("title".to_string(), Value::from("Test"));
    payload
}

pub async fn list_records(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<RequestContext>,
    method: Method,
    headers: HeaderMap,
    Query(query): Query<dto::ListQuery>,
) -> Response {
    // HEAD is answered by the GET handler and negotiates like GET.
    let method = if method == Method::HEAD { Method::GET } else { method };
    let accept = dto::accept_preferences(&headers);

    let negotiated = match services
        .records()
        .negotiate(method.as_str(), &accept, query.format.as_deref())
    {
        Ok(n) => n,
        Err(e) => return errors::dispatch_error_to_response(e.into()),
    };

    tracing::debug!(
        request_id = %ctx.request_id(),
        q = query.q.as_deref().unwrap_or_default(),
        media_type = %negotiated.media_type(),
        selection = negotiated.selection().as_str(),
        "negotiated records representation"
    );

    match negotiated.render(&list_payload()) {
        Ok(rendered) => dto::rendered_to_response(rendered),
        Err(e) => errors::dispatch_error_to_response(e.into()),
    }
}

/// `/records` → `/records/`, keeping the query string.
pub async fn redirect_to_collection(RawQuery(query): RawQuery) -> Redirect {
    match query {
        Some(q) if !q.is_empty() => Redirect::permanent(&format!("/records/?{q}")),
        _ => Redirect::permanent("/records/"),
    }
}
