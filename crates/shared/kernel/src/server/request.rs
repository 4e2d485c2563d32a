use crate::error::format_context;
use crate::source::{Request as SourceRequest, SourceMap, Value, coerce};
use axum::Json;
use axum::body::to_bytes;
use axum::extract::{FromRequest, FromRequestParts, RawPathParams, Request};
use axum::http::request::Parts;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::borrow::Cow;
use std::sync::Arc;
use tracing::debug;
use url::form_urlencoded;

/// Largest body [`HttpRequest`] buffers.
pub const DEFAULT_BODY_LIMIT: usize = 2 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum HttpRequestRejection {
    #[error("Failed to read request body{}: {source}", format_context(.context))]
    Body { source: axum::Error, context: Option<Cow<'static, str>> },

    #[error("Malformed JSON body{}: {source}", format_context(.context))]
    MalformedJson { source: serde_json::Error, context: Option<Cow<'static, str>> },
}

impl IntoResponse for HttpRequestRejection {
    fn into_response(self) -> Response {
        let body = json!({ "error": { "code": "BAD_REQUEST", "message": self.to_string() } });
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

/// A buffered snapshot of an HTTP request's fields.
///
/// `all_fields` merges the body, then the query string, then path parameters; a key already
/// present keeps its earlier value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HttpRequest {
    method: Method,
    uri: Uri,
    body: SourceMap,
    query: SourceMap,
    path: SourceMap,
}

impl HttpRequest {
    /// A request with no fields; use the `with_*` builders to fill it.
    #[must_use]
    pub fn new(method: Method, uri: Uri) -> Self {
        let query = uri.query().map(|q| parse_form(q.as_bytes())).unwrap_or_default();
        Self { method, uri, query, ..Self::default() }
    }

    #[must_use]
    pub fn with_body(mut self, body: SourceMap) -> Self {
        self.body = body;
        self
    }

    #[must_use]
    pub fn with_path_params<K, V, I>(mut self, params: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.path = params.into_iter().map(|(k, v)| (k.into(), Value::String(v.into()))).collect();
        self
    }

    /// Builds a snapshot from request parts and the already buffered body.
    ///
    /// # Errors
    /// Returns [`HttpRequestRejection::MalformedJson`] for a JSON body that does not parse.
    pub async fn from_parts(parts: &mut Parts, bytes: &[u8]) -> Result<Self, HttpRequestRejection> {
        let body = parse_body(&parts.headers, bytes)?;
        let path: SourceMap = RawPathParams::from_request_parts(parts, &())
            .await
            .map(|params| {
                params.iter().map(|(k, v)| (k.to_owned(), Value::String(v.to_owned()))).collect()
            })
            .unwrap_or_default();

        let mut request = Self::new(parts.method.clone(), parts.uri.clone()).with_body(body);
        request.path = path;
        Ok(request)
    }

    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub const fn uri(&self) -> &Uri {
        &self.uri
    }

    #[must_use]
    pub const fn body(&self) -> &SourceMap {
        &self.body
    }

    #[must_use]
    pub const fn query(&self) -> &SourceMap {
        &self.query
    }

    #[must_use]
    pub const fn path_params(&self) -> &SourceMap {
        &self.path
    }
}

impl SourceRequest for HttpRequest {
    fn all_fields(&self) -> SourceMap {
        let mut fields = self.body.clone();
        for (key, value) in self.query.iter().chain(&self.path) {
            if !fields.contains_key(key) {
                fields.insert(key.clone(), value.clone());
            }
        }
        fields
    }
}

crate::request_source!(HttpRequest);

impl<S> FromRequest<S> for HttpRequest
where
    S: Send + Sync,
{
    type Rejection = HttpRequestRejection;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(snapshot) = req.extensions().get::<Arc<Self>>() {
            return Ok(Self::clone(snapshot));
        }

        let (mut parts, body) = req.into_parts();
        let bytes = to_bytes(body, DEFAULT_BODY_LIMIT).await.map_err(|source| {
            HttpRequestRejection::Body { source, context: Some("Buffering request".into()) }
        })?;
        Self::from_parts(&mut parts, &bytes).await
    }
}

fn parse_body(headers: &HeaderMap, bytes: &[u8]) -> Result<SourceMap, HttpRequestRejection> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    let mime = content_type.split(';').next().unwrap_or_default().trim();

    if mime == "application/x-www-form-urlencoded" {
        return Ok(parse_form(bytes));
    }

    if mime == "application/json" || mime.ends_with("+json") {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(SourceMap::new());
        }
        let value = serde_json::from_slice::<Value>(bytes).map_err(|source| {
            HttpRequestRejection::MalformedJson {
                source,
                context: Some("Parsing request body".into()),
            }
        })?;
        return Ok(coerce(value));
    }

    if !bytes.is_empty() {
        debug!(content_type, len = bytes.len(), "Ignoring request body without form fields");
    }
    Ok(SourceMap::new())
}

/// Parses urlencoded fields in order; `key[]` repetitions collect into an array under `key`.
fn parse_form(input: &[u8]) -> SourceMap {
    let mut fields = SourceMap::new();
    for (key, value) in form_urlencoded::parse(input) {
        let value = Value::String(value.into_owned());
        match key.strip_suffix("[]") {
            Some(list) => {
                let entry =
                    fields.entry(list.to_owned()).or_insert_with(|| Value::Array(Vec::new()));
                match entry {
                    Value::Array(items) => items.push(value),
                    other => *other = Value::Array(vec![other.take(), value]),
                }
            }
            None => {
                fields.insert(key.into_owned(), value);
            }
        }
    }
    fields
}
