//! Group membership service.

use siteround_core::error::{SiteroundError, SiteroundResult};
use siteround_core::models::group::{CreateGroup, Group, GroupIdentifier};
use siteround_core::policy;
use siteround_core::repository::{GroupRepository, SaveOutcome, UserRepository};
use tracing::debug;
use uuid::Uuid;

use crate::{MAX_SAVE_ATTEMPTS, contention_error};

/// Resolve a [`GroupIdentifier`] to its group document.
///
/// A creator-email key resolves the user first, then the oldest group
/// that user created; both misses surface as `NotFound`.
pub(crate) async fn resolve_group<G: GroupRepository, U: UserRepository>(
    groups: &G,
    users: &U,
    identifier: &GroupIdentifier,
) -> SiteroundResult<Group> {
    match identifier {
        GroupIdentifier::Id(id) => groups.get_by_id(*id).await,
        GroupIdentifier::CreatorEmail(email) => {
            let creator = users.get_by_email(email).await.map_err(|e| match e {
                SiteroundError::NotFound { .. } => SiteroundError::NotFound {
                    entity: "group creator".into(),
                    id: email.clone(),
                },
                other => other,
            })?;
            groups.get_by_creator(creator.id).await
        }
    }
}

/// Group membership and lifecycle transitions.
pub struct GroupService<G: GroupRepository, U: UserRepository> {
    groups: G,
    users: U,
}

impl<G: GroupRepository, U: UserRepository> GroupService<G, U> {
    pub fn new(groups: G, users: U) -> Self {
        Self { groups, users }
    }

    /// Create a group with the actor as creator and sole member.
    pub async fn create(&self, actor: Uuid, name: &str) -> SiteroundResult<Group> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SiteroundError::InvalidInput {
                message: "group name is required".into(),
            });
        }

        let group = self
            .groups
            .create(CreateGroup {
                name: name.to_string(),
                created_by: actor,
            })
            .await?;

        debug!(group_id = %group.id, creator = %actor, "group created");
        Ok(group)
    }

    /// Fetch a group; members only.
    pub async fn get(&self, identifier: &GroupIdentifier, actor: Uuid) -> SiteroundResult<Group> {
        let group = resolve_group(&self.groups, &self.users, identifier).await?;
        if !policy::is_member(actor, &group) {
            return Err(SiteroundError::Forbidden {
                reason: "you must be a group member to view this group".into(),
            });
        }
        Ok(group)
    }

    /// All groups the actor is a member of.
    pub async fn list_for_actor(&self, actor: Uuid) -> SiteroundResult<Vec<Group>> {
        self.groups.list_for_member(actor).await
    }

    /// Rename a group; creator only. A missing or empty new name means
    /// "no change requested" and returns the group untouched.
    pub async fn rename(
        &self,
        identifier: &GroupIdentifier,
        actor: Uuid,
        new_name: Option<&str>,
    ) -> SiteroundResult<Group> {
        let mut attempts = 0;
        loop {
            let mut group = resolve_group(&self.groups, &self.users, identifier).await?;
            if !policy::is_creator(actor, &group) {
                return Err(SiteroundError::Forbidden {
                    reason: "only the group creator can rename it".into(),
                });
            }

            let Some(name) = new_name.map(str::trim).filter(|n| !n.is_empty()) else {
                return Ok(group);
            };

            group.name = name.to_string();
            match self.groups.save(&group).await? {
                SaveOutcome::Saved(group) => return Ok(group),
                SaveOutcome::Stale => {
                    attempts += 1;
                    if attempts >= MAX_SAVE_ATTEMPTS {
                        return Err(contention_error());
                    }
                }
            }
        }
    }

    /// Delete a group; creator only. The group's inspections are left in
    /// place with a dangling group reference.
    pub async fn delete(&self, identifier: &GroupIdentifier, actor: Uuid) -> SiteroundResult<()> {
        let group = resolve_group(&self.groups, &self.users, identifier).await?;
        if !policy::is_creator(actor, &group) {
            return Err(SiteroundError::Forbidden {
                reason: "only the group creator can delete it".into(),
            });
        }
        self.groups.delete(group.id).await
    }

    /// File a join request for the actor.
    pub async fn request_join(
        &self,
        identifier: &GroupIdentifier,
        actor: Uuid,
    ) -> SiteroundResult<Group> {
        let mut attempts = 0;
        loop {
            let mut group = resolve_group(&self.groups, &self.users, identifier).await?;
            group.request_join(actor)?;

            match self.groups.save(&group).await? {
                SaveOutcome::Saved(group) => return Ok(group),
                SaveOutcome::Stale => {
                    attempts += 1;
                    if attempts >= MAX_SAVE_ATTEMPTS {
                        return Err(contention_error());
                    }
                }
            }
        }
    }

    /// Approve a pending join request; creator only.
    pub async fn approve_join(
        &self,
        group_id: Uuid,
        actor: Uuid,
        target: Uuid,
    ) -> SiteroundResult<Group> {
        let mut attempts = 0;
        loop {
            let mut group = self.groups.get_by_id(group_id).await?;
            if !policy::is_creator(actor, &group) {
                return Err(SiteroundError::Forbidden {
                    reason: "only the group creator can approve join requests".into(),
                });
            }
            group.approve_join(target)?;

            match self.groups.save(&group).await? {
                SaveOutcome::Saved(group) => {
                    debug!(group_id = %group.id, user = %target, "join request approved");
                    return Ok(group);
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

    /// Reject a pending join request; creator only.
    pub async fn reject_join(
        &self,
        group_id: Uuid,
        actor: Uuid,
        target: Uuid,
    ) -> SiteroundResult<Group> {
        let mut attempts = 0;
        loop {
            let mut group = self.groups.get_by_id(group_id).await?;
            if !policy::is_creator(actor, &group) {
                return Err(SiteroundError::Forbidden {
                    reason: "only the group creator can reject join requests".into(),
                });
            }
            group.reject_join(target)?;

            match self.groups.save(&group).await? {
                SaveOutcome::Saved(group) => return Ok(group),
                SaveOutcome::Stale => {
                    attempts += 1;
                    if attempts >= MAX_SAVE_ATTEMPTS {
                        return Err(contention_error());
                    }
                }
            }
        }
    }

    /// Leave a group. The creator can never leave — deleting the group is
    /// the only exit for them.
    pub async fn leave(&self, identifier: &GroupIdentifier, actor: Uuid) -> SiteroundResult<Group> {
        let mut attempts = 0;
        loop {
            let mut group = resolve_group(&self.groups, &self.users, identifier).await?;
            if policy::is_creator(actor, &group) {
                return Err(SiteroundError::Forbidden {
                    reason: "the group creator cannot leave; delete the group instead".into(),
                });
            }
            group.remove_member(actor)?;

            match self.groups.save(&group).await? {
                SaveOutcome::Saved(group) => return Ok(group),
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
