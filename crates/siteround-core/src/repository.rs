//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Aggregates (groups, inspections)
//! are read and replaced as whole documents; `save` carries the revision
//! the caller loaded and fails with [`SaveOutcome::Stale`] when the stored
//! document has moved on, so callers can re-read and retry.

use uuid::Uuid;

use crate::error::SiteroundResult;
use crate::models::{
    group::{CreateGroup, Group},
    inspection::{CreateInspection, Inspection},
    rating::{CreateRating, Rating},
    session::{CreateSession, Session},
    user::{CreateUser, UpdateUser, User, UserSummary},
};

/// Outcome of a revision-checked aggregate save.
#[derive(Debug)]
pub enum SaveOutcome<T> {
    /// The document was replaced atomically; contains the stored state.
    Saved(T),
    /// The stored revision no longer matches the one the caller loaded.
    /// Re-read the aggregate and retry the whole transition.
    Stale,
}

pub trait UserRepository: Send + Sync {
    fn create(&self, input: CreateUser) -> impl Future<Output = SiteroundResult<User>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = SiteroundResult<User>> + Send;
    fn get_by_email(&self, email: &str) -> impl Future<Output = SiteroundResult<User>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateUser,
    ) -> impl Future<Output = SiteroundResult<User>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = SiteroundResult<()>> + Send;
    fn list(&self) -> impl Future<Output = SiteroundResult<Vec<UserSummary>>> + Send;
    /// Case-insensitive substring search over name and email.
    fn search(&self, query: &str) -> impl Future<Output = SiteroundResult<Vec<UserSummary>>> + Send;
}

pub trait GroupRepository: Send + Sync {
    /// Create a group with the creator as its sole member.
    fn create(&self, input: CreateGroup) -> impl Future<Output = SiteroundResult<Group>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = SiteroundResult<Group>> + Send;
    /// The oldest group created by `creator_id` (creator-email lookups).
    fn get_by_creator(
        &self,
        creator_id: Uuid,
    ) -> impl Future<Output = SiteroundResult<Group>> + Send;
    fn list_for_member(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = SiteroundResult<Vec<Group>>> + Send;
    /// Replace the stored document if its revision still equals
    /// `group.revision`; the stored copy gets `revision + 1`.
    fn save(
        &self,
        group: &Group,
    ) -> impl Future<Output = SiteroundResult<SaveOutcome<Group>>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = SiteroundResult<()>> + Send;
}

pub trait InspectionRepository: Send + Sync {
    fn create(
        &self,
        input: CreateInspection,
    ) -> impl Future<Output = SiteroundResult<Inspection>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = SiteroundResult<Inspection>> + Send;
    fn list_for_group(
        &self,
        group_id: Uuid,
    ) -> impl Future<Output = SiteroundResult<Vec<Inspection>>> + Send;
    /// Revision-checked whole-document replace, as for groups.
    fn save(
        &self,
        inspection: &Inspection,
    ) -> impl Future<Output = SiteroundResult<SaveOutcome<Inspection>>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = SiteroundResult<()>> + Send;
}

pub trait SessionRepository: Send + Sync {
    fn create(
        &self,
        input: CreateSession,
    ) -> impl Future<Output = SiteroundResult<Session>> + Send;
    fn get_by_token_hash(
        &self,
        token_hash: &str,
    ) -> impl Future<Output = SiteroundResult<Session>> + Send;
    /// Invalidate a single session (logout).
    fn invalidate(&self, id: Uuid) -> impl Future<Output = SiteroundResult<()>> + Send;
    /// Invalidate all sessions for a user (account deletion, password change).
    fn invalidate_user_sessions(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = SiteroundResult<()>> + Send;
    /// Remove all expired sessions; returns how many were dropped.
    fn cleanup_expired(&self) -> impl Future<Output = SiteroundResult<u64>> + Send;
}

pub trait RatingRepository: Send + Sync {
    fn create(&self, input: CreateRating) -> impl Future<Output = SiteroundResult<Rating>> + Send;
    fn get_by_inspection_and_user(
        &self,
        inspection_id: Uuid,
        user_id: Uuid,
    ) -> impl Future<Output = SiteroundResult<Rating>> + Send;
    fn list_for_inspection(
        &self,
        inspection_id: Uuid,
    ) -> impl Future<Output = SiteroundResult<Vec<Rating>>> + Send;
}
