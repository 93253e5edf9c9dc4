//! Inspection aggregate.
//!
//! One scheduled inspection event tied to exactly one group. The group
//! link is weak: deleting the group neither deletes nor blocks its
//! inspections. Assignment and attendance lists are sets; membership of
//! their entries in the owning group is enforced at insertion time only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{SiteroundError, SiteroundResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inspection {
    pub id: Uuid,
    /// Immutable, non-owning reference to the group.
    pub group_id: Uuid,
    pub address: String,
    pub scheduled_at: DateTime<Utc>,
    /// Immutable after creation.
    pub created_by: Uuid,
    pub assigned_to: Vec<Uuid>,
    pub attendees: Vec<Uuid>,
    /// Monotonic document version for optimistic concurrency control.
    pub revision: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateInspection {
    pub group_id: Uuid,
    pub address: String,
    pub scheduled_at: DateTime<Utc>,
    pub created_by: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateInspection {
    pub address: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
}

impl Inspection {
    /// Designate `user_id` as responsible for this inspection.
    pub fn assign(&mut self, user_id: Uuid) -> SiteroundResult<()> {
        if self.assigned_to.contains(&user_id) {
            return Err(SiteroundError::Conflict {
                message: "user is already assigned to this inspection".into(),
            });
        }
        self.assigned_to.push(user_id);
        Ok(())
    }

    /// Record `user_id` as attending this inspection.
    pub fn attend(&mut self, user_id: Uuid) -> SiteroundResult<()> {
        if self.attendees.contains(&user_id) {
            return Err(SiteroundError::Conflict {
                message: "user is already marked as attending this inspection".into(),
            });
        }
        self.attendees.push(user_id);
        Ok(())
    }
}
