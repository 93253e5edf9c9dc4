//! Shared application state for axum handlers.

use std::sync::Arc;

use siteround_auth::{AuthConfig, AuthService};
use siteround_db::DbManager;
use siteround_db::repository::{
    SurrealGroupRepository, SurrealInspectionRepository, SurrealRatingRepository,
    SurrealSessionRepository, SurrealUserRepository,
};
use siteround_ops::{DirectoryService, GroupService, InspectionService, RatingService};

/// Connection type of the production SurrealDB client.
pub type Db = surrealdb::engine::remote::ws::Client;

/// Name of the HTTP-only session cookie.
pub const SESSION_COOKIE: &str = "siteround_session";

/// Shared server state: one handle per service.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService<SurrealUserRepository<Db>, SurrealSessionRepository<Db>>>,
    pub groups: Arc<GroupService<SurrealGroupRepository<Db>, SurrealUserRepository<Db>>>,
    pub inspections: Arc<
        InspectionService<
            SurrealInspectionRepository<Db>,
            SurrealGroupRepository<Db>,
            SurrealUserRepository<Db>,
        >,
    >,
    pub ratings: Arc<
        RatingService<
            SurrealRatingRepository<Db>,
            SurrealInspectionRepository<Db>,
            SurrealGroupRepository<Db>,
        >,
    >,
    pub directory: Arc<DirectoryService<SurrealUserRepository<Db>, SurrealSessionRepository<Db>>>,
    /// Cookie Max-Age, mirrored from the auth configuration.
    pub session_lifetime_secs: u64,
}

impl AppState {
    /// Wire every repository and service onto one database connection.
    pub fn new(manager: &DbManager, auth_config: AuthConfig) -> Self {
        let db = manager.client().clone();

        let users = match auth_config.pepper.clone() {
            Some(pepper) => SurrealUserRepository::with_pepper(db.clone(), pepper),
            None => SurrealUserRepository::new(db.clone()),
        };
        let sessions = SurrealSessionRepository::new(db.clone());
        let groups = SurrealGroupRepository::new(db.clone());
        let inspections = SurrealInspectionRepository::new(db.clone());
        let ratings = SurrealRatingRepository::new(db.clone());

        let session_lifetime_secs = auth_config.session_lifetime_secs;

        Self {
            auth: Arc::new(AuthService::new(
                users.clone(),
                sessions.clone(),
                auth_config,
            )),
            groups: Arc::new(GroupService::new(groups.clone(), users.clone())),
            inspections: Arc::new(InspectionService::new(
                inspections.clone(),
                groups.clone(),
                users.clone(),
            )),
            ratings: Arc::new(RatingService::new(ratings, inspections, groups)),
            directory: Arc::new(DirectoryService::new(users, sessions)),
            session_lifetime_secs,
        }
    }
}
