use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use axum::routing::post;
use axum::{Json, middleware};
use porter::kernel::server::{HttpRequest, Hydrated, capture_current_request};
use porter::prelude::*;
use serde_json::json;
use tower::ServiceExt;

/// Echoes the fields and flags it was built with.
#[derive(Debug)]
struct Echo {
    flags: Flags,
    source: SourceMap,
}

impl Dto for Echo {
    fn construct(source: SourceMap, hydration: &Hydration) -> Result<Self, HydrationError> {
        if let Some(name) = source.get("name")
            && !name.is_string()
        {
            return Err(HydrationError::cast("name", "string"));
        }
        Ok(Self { flags: hydration.flags(), source })
    }
}

impl Echo {
    fn into_json(self) -> Json<Value> {
        Json(json!({ "flags": self.flags.bits(), "source": self.source }))
    }
}

async fn hydrated(Hydrated(echo): Hydrated<Echo>) -> Json<Value> {
    echo.into_json()
}

async fn current() -> Result<Json<Value>, StatusCode> {
    Echo::from_current_request(Flags::MUTABLE)
        .map(Echo::into_json)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

async fn snapshot(request: HttpRequest) -> Json<Value> {
    Json(json!({ "query": request.query(), "path": request.path_params() }))
}

fn app() -> Router {
    Router::new()
        .route("/users/{id}", post(hydrated))
        .route("/current/{id}", post(current).layer(middleware::from_fn(capture_current_request)))
        .route("/snapshot/{id}", post(snapshot))
}

async fn send(uri: &str, content_type: &str, body: &'static str) -> Response {
    let request = Request::post(uri)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body))
        .unwrap();
    app().oneshot(request).await.unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn hydrates_from_body_query_and_path() {
    let response =
        send("/users/7?page=2&name=query", "application/json", r#"{"name":"foo"}"#).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["flags"], json!((Flags::PARTIAL | Flags::IGNORE_UNKNOWN_PROPERTIES).bits()));
    assert_eq!(body["source"], json!({ "name": "foo", "page": "2", "id": "7" }));
}

#[tokio::test]
async fn form_bodies_collect_list_fields() {
    let response =
        send("/users/1", "application/x-www-form-urlencoded", "name=foo&tags[]=a&tags[]=b").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["source"]["tags"], json!(["a", "b"]));
    assert_eq!(body["source"]["name"], json!("foo"));
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let response = send("/users/1", "application/json", "{\"name\":").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"]["code"], json!("BAD_REQUEST"));
}

#[tokio::test]
async fn hydration_failure_is_unprocessable() {
    let response = send("/users/1", "application/json", r#"{"name":5}"#).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], json!("UNPROCESSABLE_ENTITY"));
    assert!(body["error"]["message"].as_str().unwrap().contains("name"));
}

#[tokio::test]
async fn middleware_installs_current_request() {
    let response = send("/current/3?page=1", "application/json", r#"{"name":"foo"}"#).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let expected = Flags::PARTIAL | Flags::IGNORE_UNKNOWN_PROPERTIES | Flags::MUTABLE;
    assert_eq!(body["flags"], json!(expected.bits()));
    assert_eq!(body["source"], json!({ "name": "foo", "page": "1", "id": "3" }));
}

#[tokio::test]
async fn handlers_can_take_the_snapshot_directly() {
    let response = send("/snapshot/9?q=x", "text/plain", "ignored").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body, json!({ "query": { "q": "x" }, "path": { "id": "9" } }));
}
