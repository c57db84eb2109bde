//! Post routes
//!
//! Creating a post and listing one's own posts require a bearer token;
//! the full list is public.

use super::{json_response, parse_payload, read_json};
use crate::error::ApiResult;
use crate::middleware::{Handler, RequestContext};
use crate::services::PostService;
use crate::state::AppState;
use axum::{extract::Request, http::StatusCode, response::Response};
use postboard_shared::validation::validate_title;
use postboard_shared::CreatePostRequest;

pub fn create(state: AppState) -> Handler {
    Handler::with_context(move |request, ctx| create_handler(state.clone(), request, ctx))
}

pub fn list_mine(state: AppState) -> Handler {
    Handler::with_context(move |_request, ctx| list_mine_handler(state.clone(), ctx))
}

pub fn list_all(state: AppState) -> Handler {
    Handler::no_context(move || list_all_handler(state.clone()))
}

async fn create_handler(
    state: AppState,
    request: Request,
    ctx: RequestContext,
) -> ApiResult<Response> {
    let identity = ctx.require_identity()?;
    let payload = read_json(request).await?;
    validate_title(payload.get("title"))?;
    let req: CreatePostRequest = parse_payload(payload)?;

    let post = PostService::create(state.store(), identity.user_id(), req).await?;
    Ok(json_response(StatusCode::CREATED, post))
}

async fn list_mine_handler(state: AppState, ctx: RequestContext) -> ApiResult<Response> {
    let identity = ctx.require_identity()?;
    let posts = PostService::list_for_user(state.store(), identity.user_id()).await?;
    Ok(json_response(StatusCode::OK, posts))
}

async fn list_all_handler(state: AppState) -> ApiResult<Response> {
    let posts = PostService::list_all(state.store()).await?;
    Ok(json_response(StatusCode::OK, posts))
}
