//! Authorization policy.
//!
//! Pure predicates over aggregate snapshots. These are the single source
//! of truth for permission decisions: every mutating operation in the
//! service layer invokes exactly one combination of them before mutating,
//! and no permission logic is re-derived per endpoint.

use uuid::Uuid;

use crate::models::group::Group;
use crate::models::inspection::Inspection;

/// Aggregates that record the user who created them.
pub trait CreatedBy {
    fn created_by(&self) -> Uuid;
}

impl CreatedBy for Group {
    fn created_by(&self) -> Uuid {
        self.created_by
    }
}

impl CreatedBy for Inspection {
    fn created_by(&self) -> Uuid {
        self.created_by
    }
}

/// Is `actor` in the group's membership list?
pub fn is_member(actor: Uuid, group: &Group) -> bool {
    group.members.contains(&actor)
}

/// Did `actor` create this aggregate?
pub fn is_creator<A: CreatedBy>(actor: Uuid, aggregate: &A) -> bool {
    aggregate.created_by() == actor
}

/// Does `user` have a pending join request for the group?
pub fn is_pending(user: Uuid, group: &Group) -> bool {
    group.join_requests.contains(&user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn group(creator: Uuid, members: Vec<Uuid>, pending: Vec<Uuid>) -> Group {
        Group {
            id: Uuid::new_v4(),
            name: "Test".into(),
            created_by: creator,
            members,
            join_requests: pending,
            revision: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn member_and_pending_are_disjoint_views() {
        let creator = Uuid::new_v4();
        let applicant = Uuid::new_v4();
        let g = group(creator, vec![creator], vec![applicant]);

        assert!(is_member(creator, &g));
        assert!(!is_member(applicant, &g));
        assert!(is_pending(applicant, &g));
        assert!(!is_pending(creator, &g));
    }

    #[test]
    fn creator_predicate_works_for_both_aggregates() {
        let creator = Uuid::new_v4();
        let other = Uuid::new_v4();
        let g = group(creator, vec![creator], vec![]);

        assert!(is_creator(creator, &g));
        assert!(!is_creator(other, &g));

        let insp = Inspection {
            id: Uuid::new_v4(),
            group_id: g.id,
            address: "12 Oak Ave".into(),
            scheduled_at: Utc::now(),
            created_by: creator,
            assigned_to: Vec::new(),
            attendees: Vec::new(),
            revision: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(is_creator(creator, &insp));
        assert!(!is_creator(other, &insp));
    }
}
