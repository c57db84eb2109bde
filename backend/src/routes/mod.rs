//! Route definitions for the Postboard API
//!
//! Each endpoint is a [`Handler`] wrapped in a composed middleware chain and
//! then mounted on the axum router. Transport concerns (compression,
//! timeouts, body limits, CORS, request ids, tracing) are tower layers on the
//! router.

use crate::auth::with_auth;
use crate::error::{ApiError, ApiResult};
use crate::middleware::{
    compose, with_error_handler, Handler, HandlerFuture, Middleware, RequestContext,
};
use crate::state::AppState;
use axum::{
    body::Bytes,
    error_handling::HandleErrorLayer,
    extract::{DefaultBodyLimit, FromRequest, Request},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    BoxError, Json, Router,
};
use postboard_shared::validation::Payload;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

mod auth;
mod health;
mod posts;
mod users;


const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Middleware chains shared by the API routes
struct Chains {
    public: Middleware,
    protected: Middleware,
}

impl Chains {
    fn new(state: &AppState) -> Self {
        let errors = Middleware::new(with_error_handler);
        Self {
            public: compose([errors.clone()]),
            protected: compose([errors, with_auth(state.jwt().clone())]),
        }
    }
}

/// Create the main application router with all middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(health::health_routes(state.clone()))
        .nest("/api", api_routes(&state))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CompressionLayer::new())
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_timeout))
                .timeout(REQUEST_TIMEOUT),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
}

fn api_routes(state: &AppState) -> Router {
    let chains = Chains::new(state);
    let public = |handler: Handler| endpoint(chains.public.wrap(handler));
    let protected = |handler: Handler| endpoint(chains.protected.wrap(handler));

    Router::new()
        .route(
            "/auth/signup",
            post(public(auth::signup(state.clone()))).fallback(not_found),
        )
        .route(
            "/auth/login",
            post(public(auth::login(state.clone()))).fallback(not_found),
        )
        .route(
            "/posts",
            get(public(posts::list_all(state.clone())))
                .post(protected(posts::create(state.clone())))
                .fallback(not_found),
        )
        .route(
            "/posts/me",
            get(protected(posts::list_mine(state.clone()))).fallback(not_found),
        )
        .route(
            "/users",
            get(public(users::list(state.clone())))
                .post(public(users::create(state.clone())))
                .fallback(not_found),
        )
}

/// Mount a wrapped handler on axum, starting from an empty context
fn endpoint(
    handler: Handler,
) -> impl Fn(Request) -> HandlerFuture + Clone + Send + Sync + 'static {
    move |request: Request| handler.call(request, RequestContext::new())
}

/// 404 for unknown paths and for unsupported methods on known paths
async fn not_found() -> Response {
    ApiError::NotFound("Not found".to_string()).into_response()
}

/// JSON 408 when a request outlives [`REQUEST_TIMEOUT`]
async fn handle_timeout(err: BoxError) -> Response {
    if err.is::<tower::timeout::error::Elapsed>() {
        ApiError::RequestTimeout("Request timed out".to_string()).into_response()
    } else {
        tracing::error!(error = %err, "Unhandled transport error");
        ApiError::Internal(anyhow::anyhow!("{err}")).into_response()
    }
}

/// Read the request body as a JSON object.
///
/// Bodies over the router's [`DefaultBodyLimit`] are rejected with 413.
/// Malformed JSON is rejected; valid JSON that is not an object reads as an
/// empty payload and fails validation downstream.
pub(crate) async fn read_json(request: Request) -> ApiResult<Payload> {
    let bytes = Bytes::from_request(request, &()).await.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge("Request body too large".to_string())
        } else {
            ApiError::BadRequest(format!(
                "Failed to read request body: {}",
                rejection.body_text()
            ))
        }
    })?;

    match serde_json::from_slice::<Value>(&bytes).map_err(ApiError::InvalidJson)? {
        Value::Object(payload) => Ok(payload),
        _ => Ok(Payload::new()),
    }
}

/// Convert a validated payload into its typed request
pub(crate) fn parse_payload<T: DeserializeOwned>(payload: Payload) -> ApiResult<T> {
    serde_json::from_value(Value::Object(payload))
        .map_err(|e| ApiError::BadRequest(format!("Invalid request body: {e}")))
}

/// Render a JSON body with the given status
pub(crate) fn json_response<T: serde::Serialize>(status: StatusCode, body: T) -> Response {
    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde_json::json;

    fn request_with(body: &str) -> Request {
        axum::http::Request::builder()
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_read_json_object() {
        let payload = read_json(request_with(r#"{"title":"Hi"}"#)).await.unwrap();
        assert_eq!(payload.get("title"), Some(&json!("Hi")));
    }

    #[tokio::test]
    async fn test_read_json_rejects_malformed_body() {
        for body in ["{ invalid json }", ""] {
            let err = read_json(request_with(body)).await.unwrap_err();
            assert!(matches!(err, ApiError::InvalidJson(_)));
            assert_eq!(err.to_string(), "Invalid JSON format");
        }
    }

    #[tokio::test]
    async fn test_read_json_non_object_is_empty() {
        for body in ["[1, 2]", "\"text\"", "null"] {
            assert!(read_json(request_with(body)).await.unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn test_read_json_rejects_oversized_body() {
        let body = format!(r#"{{"title":"{}"}}"#, "x".repeat(MAX_BODY_BYTES));
        let err = read_json(request_with(&body)).await.unwrap_err();
        assert!(matches!(err, ApiError::PayloadTooLarge(_)));
        assert_eq!(err.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_read_json_accepts_body_under_limit() {
        let body = format!(r#"{{"title":"{}"}}"#, "x".repeat(64 * 1024));
        let payload = read_json(request_with(&body)).await.unwrap();
        assert_eq!(payload["title"].as_str().map(str::len), Some(64 * 1024));
    }

    #[tokio::test]
    async fn test_timeout_renders_json_408() {
        let response = handle_timeout(Box::new(tower::timeout::error::Elapsed::new())).await;
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, json!({"error": "Request timed out"}));
    }

    #[tokio::test]
    async fn test_other_transport_errors_are_500() {
        let response = handle_timeout("connection reset".into()).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_parse_payload_wrong_type_is_bad_request() {
        let payload = match json!({"title": 5}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        let result: ApiResult<postboard_shared::CreatePostRequest> = parse_payload(payload);
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }
}
