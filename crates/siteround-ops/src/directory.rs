//! User directory and self-service profile operations.

use siteround_core::error::{SiteroundError, SiteroundResult};
use siteround_core::models::user::{UpdateUser, UserSummary};
use siteround_core::repository::{SessionRepository, UserRepository};
use tracing::debug;
use uuid::Uuid;

/// Profile management and user lookups.
pub struct DirectoryService<U: UserRepository, S: SessionRepository> {
    users: U,
    sessions: S,
}

impl<U: UserRepository, S: SessionRepository> DirectoryService<U, S> {
    pub fn new(users: U, sessions: S) -> Self {
        Self { users, sessions }
    }

    /// The actor's own profile.
    pub async fn profile(&self, actor: Uuid) -> SiteroundResult<UserSummary> {
        self.users.get_by_id(actor).await.map(Into::into)
    }

    /// Update the actor's profile. Each field is optional; an email
    /// change re-checks uniqueness against every other account first.
    pub async fn update_profile(
        &self,
        actor: Uuid,
        input: UpdateUser,
    ) -> SiteroundResult<UserSummary> {
        if let Some(email) = input.email.as_deref() {
            match self.users.get_by_email(email).await {
                Ok(existing) if existing.id != actor => {
                    return Err(SiteroundError::Conflict {
                        message: "email already in use".into(),
                    });
                }
                Ok(_) | Err(SiteroundError::NotFound { .. }) => {}
                Err(e) => return Err(e),
            }
        }

        let changed_password = input.password.is_some();
        let user = self.users.update(actor, input).await?;

        // A password change orphans every live session for the account.
        if changed_password {
            self.sessions.invalidate_user_sessions(actor).await?;
        }

        Ok(user.into())
    }

    /// Delete the actor's account and all of its sessions.
    ///
    /// References to the account left behind in group membership lists
    /// and inspection assignment/attendance lists are NOT cleaned up;
    /// readers omit them when resolving summaries.
    pub async fn delete_profile(&self, actor: Uuid) -> SiteroundResult<()> {
        self.users.delete(actor).await?;
        self.sessions.invalidate_user_sessions(actor).await?;
        debug!(user = %actor, "account deleted");
        Ok(())
    }

    /// Every registered user, oldest first.
    pub async fn list(&self) -> SiteroundResult<Vec<UserSummary>> {
        self.users.list().await
    }

    /// Case-insensitive substring search over names and emails.
    pub async fn search(&self, query: &str) -> SiteroundResult<Vec<UserSummary>> {
        if query.trim().is_empty() {
            return Err(SiteroundError::InvalidInput {
                message: "search query is required".into(),
            });
        }
        self.users.search(query).await
    }

    /// Look up one user by id.
    pub async fn get(&self, id: Uuid) -> SiteroundResult<UserSummary> {
        self.users.get_by_id(id).await.map(Into::into)
    }

    /// Resolve a list of user ids to summaries, in order.
    ///
    /// Ids that no longer resolve (the user deleted their account) are
    /// omitted rather than failing the whole read; membership and
    /// attendance lists may hold dangling references.
    pub async fn summaries(&self, ids: &[Uuid]) -> SiteroundResult<Vec<UserSummary>> {
        let mut out = Vec::with_capacity(ids.len());
        for id in ids {
            match self.users.get_by_id(*id).await {
                Ok(user) => out.push(user.into()),
                Err(SiteroundError::NotFound { .. }) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(out)
    }
}
