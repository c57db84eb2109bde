//! User resource routes
//!
//! `GET /api/users` lists accounts without credentials. `POST /api/users`
//! creates one with the same rules as signup.

use super::{json_response, parse_payload, read_json};
use crate::error::ApiResult;
use crate::middleware::Handler;
use crate::services::UserService;
use crate::state::AppState;
use axum::{extract::Request, http::StatusCode, response::Response};
use postboard_shared::validation::validate_user_data;
use postboard_shared::SignupRequest;

pub fn list(state: AppState) -> Handler {
    Handler::no_context(move || list_handler(state.clone()))
}

pub fn create(state: AppState) -> Handler {
    Handler::with_context(move |request, _ctx| create_handler(state.clone(), request))
}

async fn list_handler(state: AppState) -> ApiResult<Response> {
    let users = UserService::list_users(state.store()).await?;
    Ok(json_response(StatusCode::OK, users))
}

async fn create_handler(state: AppState, request: Request) -> ApiResult<Response> {
    let payload = read_json(request).await?;
    validate_user_data(&payload)?;
    let req: SignupRequest = parse_payload(payload)?;

    let user = UserService::create_user(state.store(), req).await?;
    Ok(json_response(StatusCode::CREATED, user))
}
