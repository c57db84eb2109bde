//! Authentication middleware
//!
//! Verifies the bearer token on a request and hands the resulting
//! [`Identity`] to the wrapped handler through its
//! [`RequestContext`](crate::middleware::RequestContext).
//! Handlers never read identity from anywhere else.

use super::{Identity, JwtService};
use crate::error::{ApiError, ApiResult};
use crate::middleware::{Handler, HandlerFuture, Middleware};
use axum::{
    http::{header::AUTHORIZATION, HeaderMap},
    response::Response,
};

const BEARER_PREFIX: &str = "Bearer ";

/// Resolve the caller's identity from the `Authorization` header
pub fn authenticate(jwt: &JwtService, headers: &HeaderMap) -> ApiResult<Identity> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .ok_or_else(|| ApiError::Unauthorized("Authorization header required".to_string()))?;

    jwt.verify(token)
        .map_err(|_| ApiError::Unauthorized("Invalid or expired token".to_string()))
}

/// Middleware that rejects unauthenticated requests with 401 and passes
/// the verified identity on to the wrapped handler
pub fn with_auth(jwt: JwtService) -> Middleware {
    Middleware::new(move |handler: Handler| {
        let jwt = jwt.clone();
        Handler::with_context(move |request, ctx| -> HandlerFuture {
            match authenticate(&jwt, request.headers()) {
                Ok(identity) => handler.call(request, ctx.with_identity(identity)),
                Err(err) => {
                    let rejected: ApiResult<Response> = Err(err);
                    Box::pin(std::future::ready(rejected))
                }
            }
        })
    })
}
