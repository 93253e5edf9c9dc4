//! Group aggregate.
//!
//! A group owns its membership list and pending join requests and is
//! persisted and mutated as one atomic unit. Both lists are sets with
//! insertion order preserved for display. Two invariants hold after every
//! transition: the creator is always a member, and no user appears in both
//! `members` and `join_requests` at once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{SiteroundError, SiteroundResult};
use crate::policy;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    /// Immutable after creation.
    pub created_by: Uuid,
    pub members: Vec<Uuid>,
    pub join_requests: Vec<Uuid>,
    /// Monotonic document version; incremented on every save and used for
    /// optimistic concurrency control.
    pub revision: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGroup {
    pub name: String,
    /// Becomes creator and sole initial member.
    pub created_by: Uuid,
}

impl Group {
    /// Record a pending join request for `user_id`.
    pub fn request_join(&mut self, user_id: Uuid) -> SiteroundResult<()> {
        if policy::is_member(user_id, self) {
            return Err(SiteroundError::Conflict {
                message: "user is already a member of this group".into(),
            });
        }
        if policy::is_pending(user_id, self) {
            return Err(SiteroundError::Conflict {
                message: "a join request is already pending for this user".into(),
            });
        }
        self.join_requests.push(user_id);
        Ok(())
    }

    /// Move `user_id` from the pending list into the membership list.
    ///
    /// The move is a single transition — the user is never observable in
    /// both lists.
    pub fn approve_join(&mut self, user_id: Uuid) -> SiteroundResult<()> {
        if !policy::is_pending(user_id, self) {
            return Err(SiteroundError::InvalidState {
                message: "no pending join request for this user".into(),
            });
        }
        self.join_requests.retain(|id| *id != user_id);
        self.members.push(user_id);
        Ok(())
    }

    /// Discard the pending join request for `user_id`.
    pub fn reject_join(&mut self, user_id: Uuid) -> SiteroundResult<()> {
        if !policy::is_pending(user_id, self) {
            return Err(SiteroundError::InvalidState {
                message: "no pending join request for this user".into(),
            });
        }
        self.join_requests.retain(|id| *id != user_id);
        Ok(())
    }

    /// Remove `user_id` from the membership list.
    ///
    /// The creator check (a creator deletes the group rather than leaving
    /// it) is an authorization rule and is enforced by the caller via the
    /// policy module, before this transition runs.
    pub fn remove_member(&mut self, user_id: Uuid) -> SiteroundResult<()> {
        if !policy::is_member(user_id, self) {
            return Err(SiteroundError::InvalidState {
                message: "user is not a member of this group".into(),
            });
        }
        self.members.retain(|id| *id != user_id);
        Ok(())
    }
}

/// A group lookup key: either a group id or the email address of the
/// group's creator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupIdentifier {
    Id(Uuid),
    CreatorEmail(String),
}

impl GroupIdentifier {
    /// Parse a raw path segment. Anything containing `@` is treated as a
    /// creator email; everything else must be a valid UUID.
    pub fn parse(raw: &str) -> SiteroundResult<Self> {
        if raw.contains('@') {
            return Ok(Self::CreatorEmail(raw.to_string()));
        }
        Uuid::parse_str(raw)
            .map(Self::Id)
            .map_err(|_| SiteroundError::InvalidInput {
                message: "invalid group identifier".into(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group_with(creator: Uuid) -> Group {
        Group {
            id: Uuid::new_v4(),
            name: "Maple St Team".into(),
            created_by: creator,
            members: vec![creator],
            join_requests: Vec::new(),
            revision: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn approve_moves_user_between_lists() {
        let creator = Uuid::new_v4();
        let joiner = Uuid::new_v4();
        let mut group = group_with(creator);

        group.request_join(joiner).unwrap();
        assert!(group.join_requests.contains(&joiner));
        assert!(!group.members.contains(&joiner));

        group.approve_join(joiner).unwrap();
        assert!(group.members.contains(&joiner));
        assert!(!group.join_requests.contains(&joiner));
    }

    #[test]
    fn duplicate_join_request_conflicts() {
        let creator = Uuid::new_v4();
        let joiner = Uuid::new_v4();
        let mut group = group_with(creator);

        group.request_join(joiner).unwrap();
        assert!(matches!(
            group.request_join(joiner),
            Err(SiteroundError::Conflict { .. })
        ));
    }

    #[test]
    fn member_cannot_request_join() {
        let creator = Uuid::new_v4();
        let mut group = group_with(creator);
        assert!(matches!(
            group.request_join(creator),
            Err(SiteroundError::Conflict { .. })
        ));
    }

    #[test]
    fn reject_discards_request_without_adding_member() {
        let creator = Uuid::new_v4();
        let joiner = Uuid::new_v4();
        let mut group = group_with(creator);

        group.request_join(joiner).unwrap();
        group.reject_join(joiner).unwrap();
        assert!(!group.join_requests.contains(&joiner));
        assert!(!group.members.contains(&joiner));
    }

    #[test]
    fn approve_without_request_is_invalid_state() {
        let creator = Uuid::new_v4();
        let mut group = group_with(creator);
        assert!(matches!(
            group.approve_join(Uuid::new_v4()),
            Err(SiteroundError::InvalidState { .. })
        ));
    }

    #[test]
    fn remove_nonmember_is_invalid_state() {
        let creator = Uuid::new_v4();
        let mut group = group_with(creator);
        assert!(matches!(
            group.remove_member(Uuid::new_v4()),
            Err(SiteroundError::InvalidState { .. })
        ));
    }

    #[test]
    fn identifier_parsing() {
        let id = Uuid::new_v4();
        assert_eq!(
            GroupIdentifier::parse(&id.to_string()).unwrap(),
            GroupIdentifier::Id(id)
        );
        assert_eq!(
            GroupIdentifier::parse("alice@example.com").unwrap(),
            GroupIdentifier::CreatorEmail("alice@example.com".into())
        );
        assert!(GroupIdentifier::parse("not-a-uuid").is_err());
    }
}
