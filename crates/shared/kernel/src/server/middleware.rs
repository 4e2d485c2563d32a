use super::request::{DEFAULT_BODY_LIMIT, HttpRequest, HttpRequestRejection};
use crate::request::CurrentRequest;
use axum::body::{Body, to_bytes};
use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

/// Installs a snapshot of the request as the current request for the rest of the chain.
///
/// The body is buffered and handed on unchanged; the snapshot is also stored in the request
/// extensions, where [`HttpRequest`]'s extractor picks it up.
///
/// ```rust,ignore
/// let app = Router::new()
///     .route("/users", post(create_user))
///     .layer(axum::middleware::from_fn(capture_current_request));
/// ```
pub async fn capture_current_request(request: Request, next: Next) -> Response {
    let (mut parts, body) = request.into_parts();
    let bytes = match to_bytes(body, DEFAULT_BODY_LIMIT).await {
        Ok(bytes) => bytes,
        Err(source) => {
            return HttpRequestRejection::Body {
                source,
                context: Some("Capturing current request".into()),
            }
            .into_response();
        }
    };

    let snapshot = match HttpRequest::from_parts(&mut parts, &bytes).await {
        Ok(snapshot) => Arc::new(snapshot),
        Err(rejection) => return rejection.into_response(),
    };

    parts.extensions.insert(Arc::clone(&snapshot));
    let request = Request::from_parts(parts, Body::from(bytes));
    CurrentRequest::scope(snapshot, next.run(request)).await
}
