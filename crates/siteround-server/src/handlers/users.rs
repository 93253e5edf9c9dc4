//! Account and directory handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::request::Parts;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::json;
use siteround_auth::{LoginInput, SignupInput};
use siteround_core::SiteroundError;
use siteround_core::models::user::{UpdateUser, UserSummary};
use uuid::Uuid;

use crate::error::ApiError;
use crate::extract::{Actor, session_cookie};
use crate::state::{AppState, SESSION_COOKIE};

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
}

fn client_meta(headers: &HeaderMap) -> (Option<String>, Option<String>) {
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    // Behind the usual reverse proxy the client address arrives here.
    let ip_address = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .map(|raw| raw.split(',').next().unwrap_or(raw).trim().to_string());
    (ip_address, user_agent)
}

fn set_session_cookie(token: &str, max_age_secs: u64) -> (header::HeaderName, String) {
    (
        header::SET_COOKIE,
        format!("{SESSION_COOKIE}={token}; HttpOnly; SameSite=Lax; Path=/; Max-Age={max_age_secs}"),
    )
}

fn clear_session_cookie() -> (header::HeaderName, String) {
    (
        header::SET_COOKIE,
        format!("{SESSION_COOKIE}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0"),
    )
}

pub async fn signup(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<SignupRequest>,
) -> Result<Response, ApiError> {
    let (ip_address, user_agent) = client_meta(&headers);
    let out = state
        .auth
        .signup(SignupInput {
            name: body.name,
            email: body.email,
            password: body.password,
            ip_address,
            user_agent,
        })
        .await?;

    let profile = UserSummary::from(out.user.clone());
    let cookie = set_session_cookie(&out.session_token, state.session_lifetime_secs);
    Ok((
        StatusCode::CREATED,
        [cookie],
        Json(json!({
            "message": format!("Welcome, {}!", profile.name),
            "user": profile,
            "token": out.access_token,
        })),
    )
        .into_response())
}

pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    let (ip_address, user_agent) = client_meta(&headers);
    let out = state
        .auth
        .login(LoginInput {
            email: body.email,
            password: body.password,
            ip_address,
            user_agent,
        })
        .await?;

    let profile = UserSummary::from(out.user.clone());
    let cookie = set_session_cookie(&out.session_token, state.session_lifetime_secs);
    Ok((
        [cookie],
        Json(json!({
            "message": "Logged in successfully!",
            "user": profile,
            "token": out.access_token,
        })),
    )
        .into_response())
}

pub async fn logout(State(state): State<AppState>, parts: Parts) -> Result<Response, ApiError> {
    if let Some(token) = session_cookie(&parts) {
        state.auth.logout(token).await?;
    }
    Ok((
        [clear_session_cookie()],
        Json(json!({ "message": "Logged out." })),
    )
        .into_response())
}

pub async fn me(State(state): State<AppState>, Actor(actor): Actor) -> Result<Response, ApiError> {
    let profile = state.directory.profile(actor).await?;
    Ok(Json(json!({ "message": "Here is your profile.", "user": profile })).into_response())
}

pub async fn update_me(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Response, ApiError> {
    let profile = state
        .directory
        .update_profile(
            actor,
            UpdateUser {
                name: body.name,
                email: body.email,
                password: body.password,
            },
        )
        .await?;
    Ok(Json(json!({ "message": "Profile updated.", "user": profile })).into_response())
}

pub async fn delete_me(
    State(state): State<AppState>,
    Actor(actor): Actor,
) -> Result<Response, ApiError> {
    state.directory.delete_profile(actor).await?;
    Ok((
        [clear_session_cookie()],
        Json(json!({ "message": "Account deleted." })),
    )
        .into_response())
}

pub async fn list(State(state): State<AppState>, _actor: Actor) -> Result<Response, ApiError> {
    let users = state.directory.list().await?;
    Ok(Json(json!({ "message": "All registered users.", "users": users })).into_response())
}

pub async fn search(
    State(state): State<AppState>,
    _actor: Actor,
    Query(params): Query<SearchParams>,
) -> Result<Response, ApiError> {
    let query = params.query.ok_or_else(|| SiteroundError::InvalidInput {
        message: "search query is required".into(),
    })?;
    let users = state.directory.search(&query).await?;
    Ok(Json(json!({ "message": "Search results.", "users": users })).into_response())
}

pub async fn get(
    State(state): State<AppState>,
    _actor: Actor,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let user = state.directory.get(id).await?;
    Ok(Json(json!({ "message": "User details.", "user": user })).into_response())
}
