//! Rating domain model.
//!
//! A member's 1–5 score for an inspection, with an optional comment.
//! Each user rates a given inspection at most once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rating {
    pub id: Uuid,
    pub inspection_id: Uuid,
    pub user_id: Uuid,
    pub score: u8,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRating {
    pub inspection_id: Uuid,
    pub user_id: Uuid,
    pub score: u8,
    pub comment: Option<String>,
}
