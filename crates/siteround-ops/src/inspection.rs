//! Inspection lifecycle service.

use chrono::{DateTime, Utc};
use siteround_core::error::{SiteroundError, SiteroundResult};
use siteround_core::models::group::{Group, GroupIdentifier};
use siteround_core::models::inspection::{CreateInspection, Inspection};
use siteround_core::policy;
use siteround_core::repository::{
    GroupRepository, InspectionRepository, SaveOutcome, UserRepository,
};
use tracing::debug;
use uuid::Uuid;

use crate::group::resolve_group;
use crate::{MAX_SAVE_ATTEMPTS, contention_error};

fn parse_date(raw: &str) -> SiteroundResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| SiteroundError::InvalidInput {
            message: "date must be an RFC 3339 timestamp".into(),
        })
}

/// Inspection scheduling, assignment, and attendance transitions.
pub struct InspectionService<I, G, U>
where
    I: InspectionRepository,
    G: GroupRepository,
    U: UserRepository,
{
    inspections: I,
    groups: G,
    users: U,
}

impl<I, G, U> InspectionService<I, G, U>
where
    I: InspectionRepository,
    G: GroupRepository,
    U: UserRepository,
{
    pub fn new(inspections: I, groups: G, users: U) -> Self {
        Self {
            inspections,
            groups,
            users,
        }
    }

    /// Membership gate against the owning group, re-resolved at call time.
    ///
    /// A deleted group has no members, so every membership-gated read on
    /// its inspections degrades to `Forbidden` rather than crashing on
    /// the dangling reference.
    async fn member_group(&self, actor: Uuid, group_id: Uuid) -> SiteroundResult<Group> {
        let group = match self.groups.get_by_id(group_id).await {
            Ok(group) => group,
            Err(SiteroundError::NotFound { .. }) => {
                return Err(SiteroundError::Forbidden {
                    reason: "you must be a member of the inspection's group".into(),
                });
            }
            Err(e) => return Err(e),
        };
        if !policy::is_member(actor, &group) {
            return Err(SiteroundError::Forbidden {
                reason: "you must be a member of the inspection's group".into(),
            });
        }
        Ok(group)
    }

    /// Schedule an inspection; group members only.
    pub async fn create(
        &self,
        actor: Uuid,
        identifier: &GroupIdentifier,
        address: &str,
        date: &str,
    ) -> SiteroundResult<Inspection> {
        let address = address.trim();
        if address.is_empty() || date.trim().is_empty() {
            return Err(SiteroundError::InvalidInput {
                message: "address and date are required".into(),
            });
        }
        let scheduled_at = parse_date(date)?;

        let group = resolve_group(&self.groups, &self.users, identifier).await?;
        if !policy::is_member(actor, &group) {
            return Err(SiteroundError::Forbidden {
                reason: "you must be a group member to schedule an inspection".into(),
            });
        }

        let inspection = self
            .inspections
            .create(CreateInspection {
                group_id: group.id,
                address: address.to_string(),
                scheduled_at,
                created_by: actor,
            })
            .await?;

        debug!(inspection_id = %inspection.id, group_id = %group.id, "inspection scheduled");
        Ok(inspection)
    }

    /// All inspections for a group; members only.
    pub async fn list_for_group(
        &self,
        identifier: &GroupIdentifier,
        actor: Uuid,
    ) -> SiteroundResult<Vec<Inspection>> {
        let group = resolve_group(&self.groups, &self.users, identifier).await?;
        if !policy::is_member(actor, &group) {
            return Err(SiteroundError::Forbidden {
                reason: "you must be a group member to view inspections".into(),
            });
        }
        self.inspections.list_for_group(group.id).await
    }

    /// Fetch one inspection. Membership in the owning group is re-checked
    /// on every read.
    pub async fn get(&self, id: Uuid, actor: Uuid) -> SiteroundResult<Inspection> {
        let inspection = self.inspections.get_by_id(id).await?;
        self.member_group(actor, inspection.group_id).await?;
        Ok(inspection)
    }

    /// Reschedule or re-address an inspection; creator only. Absent
    /// fields are left unchanged.
    pub async fn update(
        &self,
        id: Uuid,
        actor: Uuid,
        address: Option<&str>,
        date: Option<&str>,
    ) -> SiteroundResult<Inspection> {
        let mut attempts = 0;
        loop {
            let mut inspection = self.inspections.get_by_id(id).await?;
            if !policy::is_creator(actor, &inspection) {
                return Err(SiteroundError::Forbidden {
                    reason: "only the inspection creator can update it".into(),
                });
            }

            if let Some(address) = address.map(str::trim).filter(|a| !a.is_empty()) {
                inspection.address = address.to_string();
            }
            if let Some(date) = date.map(str::trim).filter(|d| !d.is_empty()) {
                inspection.scheduled_at = parse_date(date)?;
            }

            match self.inspections.save(&inspection).await? {
                SaveOutcome::Saved(inspection) => return Ok(inspection),
                SaveOutcome::Stale => {
                    attempts += 1;
                    if attempts >= MAX_SAVE_ATTEMPTS {
                        return Err(contention_error());
                    }
                }
            }
        }
    }

    /// Cancel an inspection; creator only. Does not consult the owning
    /// group, so the creator can still clean up after the group itself
    /// was deleted. Returns the deleted inspection.
    pub async fn delete(&self, id: Uuid, actor: Uuid) -> SiteroundResult<Inspection> {
        let inspection = self.inspections.get_by_id(id).await?;
        if !policy::is_creator(actor, &inspection) {
            return Err(SiteroundError::Forbidden {
                reason: "only the inspection creator can delete it".into(),
            });
        }
        self.inspections.delete(inspection.id).await?;
        Ok(inspection)
    }

    /// Assign a user (looked up by email) to the inspection; creator
    /// only, and the target must currently be a member of the owning
    /// group.
    pub async fn assign(
        &self,
        id: Uuid,
        actor: Uuid,
        target_email: &str,
    ) -> SiteroundResult<Inspection> {
        if target_email.trim().is_empty() {
            return Err(SiteroundError::InvalidInput {
                message: "user email is required".into(),
            });
        }

        let mut attempts = 0;
        loop {
            let mut inspection = self.inspections.get_by_id(id).await?;
            if !policy::is_creator(actor, &inspection) {
                return Err(SiteroundError::Forbidden {
                    reason: "only the inspection creator can assign users".into(),
                });
            }

            let group = self.groups.get_by_id(inspection.group_id).await?;
            let target = self.users.get_by_email(target_email).await?;

            if !policy::is_member(target.id, &group) {
                return Err(SiteroundError::InvalidState {
                    message: "user must be a group member to be assigned".into(),
                });
            }
            inspection.assign(target.id)?;

            match self.inspections.save(&inspection).await? {
                SaveOutcome::Saved(inspection) => {
                    debug!(inspection_id = %inspection.id, user = %target.id, "user assigned");
                    return Ok(inspection);
                }
                SaveOutcome::Stale => {
                    attempts += 1;
                    if attempts >= MAX_SAVE_ATTEMPTS {
                        return Err(contention_error());
                    }
                }
            }
        }
    }

    /// Mark the actor as attending; members of the owning group only.
    pub async fn attend(&self, id: Uuid, actor: Uuid) -> SiteroundResult<Inspection> {
        let mut attempts = 0;
        loop {
            let mut inspection = self.inspections.get_by_id(id).await?;
            self.member_group(actor, inspection.group_id).await?;
            inspection.attend(actor)?;

            match self.inspections.save(&inspection).await? {
                SaveOutcome::Saved(inspection) => return Ok(inspection),
                SaveOutcome::Stale => {
                    attempts += 1;
                    if attempts >= MAX_SAVE_ATTEMPTS {
                        return Err(contention_error());
                    }
                }
            }
        }
    }
}
