//! Group handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::json;
use siteround_core::models::group::GroupIdentifier;
use uuid::Uuid;

use crate::error::ApiError;
use crate::extract::Actor;
use crate::state::AppState;
use crate::views::{group_view, group_views};

#[derive(Debug, Deserialize)]
pub struct CreateGroupRequest {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct RenameGroupRequest {
    pub name: Option<String>,
}

pub async fn create(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Json(body): Json<CreateGroupRequest>,
) -> Result<Response, ApiError> {
    let group = state.groups.create(actor, &body.name).await?;
    let view = group_view(&state, &group).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": format!("Group \"{}\" created!", group.name),
            "group": view,
        })),
    )
        .into_response())
}

pub async fn list(
    State(state): State<AppState>,
    Actor(actor): Actor,
) -> Result<Response, ApiError> {
    let groups = state.groups.list_for_actor(actor).await?;
    let views = group_views(&state, &groups).await?;
    Ok(Json(json!({ "message": "Here are your groups.", "groups": views })).into_response())
}

pub async fn get(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(identifier): Path<String>,
) -> Result<Response, ApiError> {
    let identifier = GroupIdentifier::parse(&identifier)?;
    let group = state.groups.get(&identifier, actor).await?;
    let view = group_view(&state, &group).await?;
    Ok(Json(json!({ "message": "Group details.", "group": view })).into_response())
}

pub async fn rename(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(identifier): Path<String>,
    Json(body): Json<RenameGroupRequest>,
) -> Result<Response, ApiError> {
    let identifier = GroupIdentifier::parse(&identifier)?;
    let group = state
        .groups
        .rename(&identifier, actor, body.name.as_deref())
        .await?;
    let view = group_view(&state, &group).await?;
    Ok(Json(json!({ "message": "Group updated.", "group": view })).into_response())
}

pub async fn delete(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(identifier): Path<String>,
) -> Result<Response, ApiError> {
    let identifier = GroupIdentifier::parse(&identifier)?;
    state.groups.delete(&identifier, actor).await?;
    Ok(Json(json!({ "message": "Group deleted." })).into_response())
}

pub async fn join(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(identifier): Path<String>,
) -> Result<Response, ApiError> {
    let identifier = GroupIdentifier::parse(&identifier)?;
    let group = state.groups.request_join(&identifier, actor).await?;
    let view = group_view(&state, &group).await?;
    Ok(Json(json!({
        "message": format!("Join request sent to \"{}\".", group.name),
        "group": view,
    }))
    .into_response())
}

pub async fn approve(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path((group_id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<Response, ApiError> {
    let group = state.groups.approve_join(group_id, actor, user_id).await?;
    let view = group_view(&state, &group).await?;
    Ok(Json(json!({ "message": "Join request approved.", "group": view })).into_response())
}

pub async fn reject(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path((group_id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<Response, ApiError> {
    let group = state.groups.reject_join(group_id, actor, user_id).await?;
    let view = group_view(&state, &group).await?;
    Ok(Json(json!({ "message": "Join request rejected.", "group": view })).into_response())
}

pub async fn leave(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(identifier): Path<String>,
) -> Result<Response, ApiError> {
    let identifier = GroupIdentifier::parse(&identifier)?;
    let group = state.groups.leave(&identifier, actor).await?;
    Ok(Json(json!({
        "message": format!("You have left \"{}\".", group.name),
    }))
    .into_response())
}
