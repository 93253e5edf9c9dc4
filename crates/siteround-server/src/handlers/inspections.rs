//! Inspection handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::json;
use siteround_core::SiteroundError;
use siteround_core::models::group::GroupIdentifier;
use uuid::Uuid;

use crate::error::ApiError;
use crate::extract::Actor;
use crate::state::AppState;
use crate::views::{inspection_view, inspection_views, rating_view};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInspectionRequest {
    #[serde(default)]
    pub group_identifier: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub date: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateInspectionRequest {
    pub address: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignParams {
    pub user_email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RateRequest {
    #[serde(default)]
    pub score: u8,
    pub comment: Option<String>,
}

pub async fn create(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Json(body): Json<CreateInspectionRequest>,
) -> Result<Response, ApiError> {
    if body.group_identifier.is_empty() {
        return Err(SiteroundError::InvalidInput {
            message: "group identifier is required".into(),
        }
        .into());
    }
    let identifier = GroupIdentifier::parse(&body.group_identifier)?;
    let inspection = state
        .inspections
        .create(actor, &identifier, &body.address, &body.date)
        .await?;
    let view = inspection_view(&state, &inspection).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": format!("Inspection at {} scheduled successfully!", inspection.address),
            "inspection": view,
        })),
    )
        .into_response())
}

pub async fn list_for_group(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(identifier): Path<String>,
) -> Result<Response, ApiError> {
    let identifier = GroupIdentifier::parse(&identifier)?;
    let inspections = state.inspections.list_for_group(&identifier, actor).await?;
    let views = inspection_views(&state, &inspections).await?;
    Ok(Json(json!({
        "message": "Here are the group's inspections!",
        "inspections": views,
    }))
    .into_response())
}

pub async fn get(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let inspection = state.inspections.get(id, actor).await?;
    let view = inspection_view(&state, &inspection).await?;
    Ok(Json(json!({
        "message": "Inspection details retrieved successfully!",
        "inspection": view,
    }))
    .into_response())
}

pub async fn update(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateInspectionRequest>,
) -> Result<Response, ApiError> {
    let inspection = state
        .inspections
        .update(id, actor, body.address.as_deref(), body.date.as_deref())
        .await?;
    let view = inspection_view(&state, &inspection).await?;
    Ok(Json(json!({
        "message": format!("Inspection at {} updated successfully!", inspection.address),
        "inspection": view,
    }))
    .into_response())
}

pub async fn delete(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let inspection = state.inspections.delete(id, actor).await?;
    Ok(Json(json!({
        "message": format!("Inspection at {} has been cancelled.", inspection.address),
    }))
    .into_response())
}

pub async fn assign(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
    Query(params): Query<AssignParams>,
) -> Result<Response, ApiError> {
    let email = params.user_email.ok_or_else(|| SiteroundError::InvalidInput {
        message: "user email is required".into(),
    })?;
    let inspection = state.inspections.assign(id, actor, &email).await?;
    let view = inspection_view(&state, &inspection).await?;
    Ok(Json(json!({
        "message": format!("{} has been assigned to the inspection at {}!", email, inspection.address),
        "inspection": view,
    }))
    .into_response())
}

pub async fn attend(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let inspection = state.inspections.attend(id, actor).await?;
    let view = inspection_view(&state, &inspection).await?;
    Ok(Json(json!({
        "message": format!("You're now attending the inspection at {}!", inspection.address),
        "inspection": view,
    }))
    .into_response())
}

pub async fn rate(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
    Json(body): Json<RateRequest>,
) -> Result<Response, ApiError> {
    let rating = state.ratings.rate(id, actor, body.score, body.comment).await?;
    let view = rating_view(&state, &rating).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Thanks for your rating!", "rating": view })),
    )
        .into_response())
}

pub async fn list_ratings(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let ratings = state.ratings.list(id, actor).await?;
    let mut views = Vec::with_capacity(ratings.len());
    for rating in &ratings {
        views.push(rating_view(&state, rating).await?);
    }
    Ok(Json(json!({ "message": "Inspection ratings.", "ratings": views })).into_response())
}
