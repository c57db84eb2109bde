//! Authentication routes
//!
//! - `POST /api/auth/signup` creates an account and returns it with 201
//! - `POST /api/auth/login` exchanges credentials for a bearer token

use super::{json_response, parse_payload, read_json};
use crate::error::ApiResult;
use crate::middleware::Handler;
use crate::services::UserService;
use crate::state::AppState;
use axum::{extract::Request, http::StatusCode, response::Response};
use postboard_shared::validation::{validate_login_data, validate_signup_data};
use postboard_shared::{LoginRequest, SignupRequest};

pub fn signup(state: AppState) -> Handler {
    Handler::with_context(move |request, _ctx| signup_handler(state.clone(), request))
}

pub fn login(state: AppState) -> Handler {
    Handler::with_context(move |request, _ctx| login_handler(state.clone(), request))
}

async fn signup_handler(state: AppState, request: Request) -> ApiResult<Response> {
    let payload = read_json(request).await?;
    validate_signup_data(&payload)?;
    let req: SignupRequest = parse_payload(payload)?;

    let user = UserService::signup(state.store(), req).await?;
    Ok(json_response(StatusCode::CREATED, user))
}

async fn login_handler(state: AppState, request: Request) -> ApiResult<Response> {
    let payload = read_json(request).await?;
    validate_login_data(&payload)?;
    let req: LoginRequest = parse_payload(payload)?;

    let response = UserService::login(state.store(), state.jwt(), req).await?;
    Ok(json_response(StatusCode::OK, response))
}
