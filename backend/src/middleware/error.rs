//! Outermost error-catching wrap
//!
//! Every handler failure is logged here and rendered as a JSON error body,
//! so nothing escapes the chain as a bare error.

use super::{Handler, HandlerFuture};
use crate::error::ApiResult;
use axum::{
    http::Method,
    response::{IntoResponse, Response},
};
use tracing::{error, warn};

/// Catch, log and render any error returned by the wrapped handler
pub fn with_error_handler(handler: Handler) -> Handler {
    Handler::with_context(move |request, ctx| {
        let method = request.method().clone();
        let path = request.uri().path().to_string();
        render(handler.call(request, ctx), method, path)
    })
}

async fn render(response: HandlerFuture, method: Method, path: String) -> ApiResult<Response> {
    let err = match response.await {
        Ok(response) => return Ok(response),
        Err(err) => err,
    };

    let status = err.status();
    if status.is_server_error() {
        error!(%method, %path, status = status.as_u16(), error = ?err, "Error in handler");
    } else {
        warn!(%method, %path, status = status.as_u16(), "Request rejected: {}", err);
    }
    Ok(err.into_response())
}
