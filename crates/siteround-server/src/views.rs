//! Response-shaped views.
//!
//! Aggregates store bare user ids; responses carry resolved name/email
//! summaries instead. Resolution tolerates dangling references: ids of
//! deleted accounts are omitted, and a deleted creator renders as null.

use chrono::{DateTime, Utc};
use serde::Serialize;
use siteround_core::models::group::Group;
use siteround_core::models::inspection::Inspection;
use siteround_core::models::rating::Rating;
use siteround_core::models::user::UserSummary;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct GroupView {
    pub id: Uuid,
    pub name: String,
    pub creator: Option<UserSummary>,
    pub members: Vec<UserSummary>,
    pub join_requests: Vec<UserSummary>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct InspectionView {
    pub id: Uuid,
    pub group_id: Uuid,
    pub address: String,
    pub scheduled_at: DateTime<Utc>,
    pub creator: Option<UserSummary>,
    pub assigned_to: Vec<UserSummary>,
    pub attendees: Vec<UserSummary>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct RatingView {
    pub id: Uuid,
    pub user: Option<UserSummary>,
    pub score: u8,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

async fn one_summary(state: &AppState, id: Uuid) -> Result<Option<UserSummary>, ApiError> {
    let mut found = state.directory.summaries(&[id]).await?;
    Ok(found.pop())
}

pub async fn group_view(state: &AppState, group: &Group) -> Result<GroupView, ApiError> {
    Ok(GroupView {
        id: group.id,
        name: group.name.clone(),
        creator: one_summary(state, group.created_by).await?,
        members: state.directory.summaries(&group.members).await?,
        join_requests: state.directory.summaries(&group.join_requests).await?,
        created_at: group.created_at,
    })
}

pub async fn group_views(state: &AppState, groups: &[Group]) -> Result<Vec<GroupView>, ApiError> {
    let mut views = Vec::with_capacity(groups.len());
    for group in groups {
        views.push(group_view(state, group).await?);
    }
    Ok(views)
}

pub async fn inspection_view(
    state: &AppState,
    inspection: &Inspection,
) -> Result<InspectionView, ApiError> {
    Ok(InspectionView {
        id: inspection.id,
        group_id: inspection.group_id,
        address: inspection.address.clone(),
        scheduled_at: inspection.scheduled_at,
        creator: one_summary(state, inspection.created_by).await?,
        assigned_to: state.directory.summaries(&inspection.assigned_to).await?,
        attendees: state.directory.summaries(&inspection.attendees).await?,
        created_at: inspection.created_at,
    })
}

pub async fn inspection_views(
    state: &AppState,
    inspections: &[Inspection],
) -> Result<Vec<InspectionView>, ApiError> {
    let mut views = Vec::with_capacity(inspections.len());
    for inspection in inspections {
        views.push(inspection_view(state, inspection).await?);
    }
    Ok(views)
}

pub async fn rating_view(state: &AppState, rating: &Rating) -> Result<RatingView, ApiError> {
    Ok(RatingView {
        id: rating.id,
        user: one_summary(state, rating.user_id).await?,
        score: rating.score,
        comment: rating.comment.clone(),
        created_at: rating.created_at,
    })
}
