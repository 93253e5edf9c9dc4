//! Integration tests for the directory and rating services using
//! in-memory SurrealDB.

use chrono::{Duration, Utc};
use siteround_core::error::SiteroundError;
use siteround_core::models::group::GroupIdentifier;
use siteround_core::models::session::CreateSession;
use siteround_core::models::user::{CreateUser, UpdateUser};
use siteround_core::repository::{SessionRepository, UserRepository};
use siteround_db::repository::{
    SurrealGroupRepository, SurrealInspectionRepository, SurrealRatingRepository,
    SurrealSessionRepository, SurrealUserRepository,
};
use siteround_ops::{DirectoryService, GroupService, InspectionService, RatingService};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

type MemDb = surrealdb::engine::local::Db;

async fn setup() -> (Surreal<MemDb>, Uuid, Uuid) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    siteround_db::run_migrations(&db).await.unwrap();

    let users = SurrealUserRepository::new(db.clone());
    let alice = users
        .create(CreateUser {
            name: "Alice".into(),
            email: "alice@example.com".into(),
            password: "pass-123456".into(),
        })
        .await
        .unwrap();
    let bob = users
        .create(CreateUser {
            name: "Bob".into(),
            email: "bob@example.com".into(),
            password: "pass-123456".into(),
        })
        .await
        .unwrap();

    (db, alice.id, bob.id)
}

fn directory(
    db: &Surreal<MemDb>,
) -> DirectoryService<SurrealUserRepository<MemDb>, SurrealSessionRepository<MemDb>> {
    DirectoryService::new(
        SurrealUserRepository::new(db.clone()),
        SurrealSessionRepository::new(db.clone()),
    )
}

#[tokio::test]
async fn profile_update_rechecks_email_uniqueness() {
    let (db, alice, _) = setup().await;
    let dir = directory(&db);

    // Taking Bob's email is a conflict.
    let result = dir
        .update_profile(
            alice,
            UpdateUser {
                email: Some("bob@example.com".into()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(SiteroundError::Conflict { .. })));

    // Re-submitting your own email is fine.
    let profile = dir
        .update_profile(
            alice,
            UpdateUser {
                email: Some("alice@example.com".into()),
                name: Some("Alice Cooper".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(profile.name, "Alice Cooper");
}

#[tokio::test]
async fn password_change_revokes_sessions() {
    let (db, alice, _) = setup().await;
    let dir = directory(&db);
    let sessions = SurrealSessionRepository::new(db.clone());

    sessions
        .create(CreateSession {
            user_id: alice,
            token_hash: "hash-of-alice-token".into(),
            ip_address: None,
            user_agent: None,
            expires_at: Utc::now() + Duration::days(30),
        })
        .await
        .unwrap();

    dir.update_profile(
        alice,
        UpdateUser {
            password: Some("brand-new-password".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert!(matches!(
        sessions.get_by_token_hash("hash-of-alice-token").await,
        Err(SiteroundError::NotFound { .. })
    ));
}

#[tokio::test]
async fn account_deletion_leaves_dangling_references_that_reads_omit() {
    let (db, alice, bob) = setup().await;
    let dir = directory(&db);
    let users = SurrealUserRepository::new(db.clone());
    let groups = GroupService::new(SurrealGroupRepository::new(db.clone()), users.clone());

    let group = groups.create(alice, "Team").await.unwrap();
    let id = GroupIdentifier::Id(group.id);
    groups.request_join(&id, bob).await.unwrap();
    groups.approve_join(group.id, alice, bob).await.unwrap();

    // Bob deletes his account; the membership list still holds his id.
    dir.delete_profile(bob).await.unwrap();
    let group = groups.get(&id, alice).await.unwrap();
    assert!(group.members.contains(&bob));

    // Summary resolution silently omits the dangling reference.
    let summaries = dir.summaries(&group.members).await.unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].id, alice);
}

#[tokio::test]
async fn search_and_listing() {
    let (db, _, _) = setup().await;
    let dir = directory(&db);

    assert!(matches!(
        dir.search("   ").await,
        Err(SiteroundError::InvalidInput { .. })
    ));

    let hits = dir.search("BOB").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].email, "bob@example.com");

    let all = dir.list().await.unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn ratings_are_member_only_validated_and_unique() {
    let (db, alice, bob) = setup().await;
    let users = SurrealUserRepository::new(db.clone());
    let groups = GroupService::new(SurrealGroupRepository::new(db.clone()), users.clone());
    let inspections = InspectionService::new(
        SurrealInspectionRepository::new(db.clone()),
        SurrealGroupRepository::new(db.clone()),
        users.clone(),
    );
    let ratings = RatingService::new(
        SurrealRatingRepository::new(db.clone()),
        SurrealInspectionRepository::new(db.clone()),
        SurrealGroupRepository::new(db.clone()),
    );

    let group = groups.create(alice, "Team").await.unwrap();
    let id = GroupIdentifier::Id(group.id);
    let insp = inspections
        .create(alice, &id, "12 Oak Ave", "2024-05-01T09:00:00Z")
        .await
        .unwrap();

    // Score bounds are validated before anything is written.
    assert!(matches!(
        ratings.rate(insp.id, alice, 0, None).await,
        Err(SiteroundError::InvalidInput { .. })
    ));
    assert!(matches!(
        ratings.rate(insp.id, alice, 6, None).await,
        Err(SiteroundError::InvalidInput { .. })
    ));

    // Non-members can neither rate nor read ratings.
    assert!(matches!(
        ratings.rate(insp.id, bob, 4, None).await,
        Err(SiteroundError::Forbidden { .. })
    ));
    assert!(matches!(
        ratings.list(insp.id, bob).await,
        Err(SiteroundError::Forbidden { .. })
    ));

    let rating = ratings
        .rate(insp.id, alice, 4, Some("solid roof".into()))
        .await
        .unwrap();
    assert_eq!(rating.score, 4);

    // One rating per user per inspection.
    assert!(matches!(
        ratings.rate(insp.id, alice, 5, None).await,
        Err(SiteroundError::Conflict { .. })
    ));

    let all = ratings.list(insp.id, alice).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].comment.as_deref(), Some("solid roof"));
}
