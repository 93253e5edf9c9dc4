//! Integration tests for the User repository using in-memory SurrealDB.

use siteround_core::error::SiteroundError;
use siteround_core::models::user::{CreateUser, UpdateUser};
use siteround_core::repository::UserRepository;
use siteround_db::repository::SurrealUserRepository;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

/// Helper: spin up in-memory DB and run migrations.
async fn setup() -> Surreal<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    siteround_db::run_migrations(&db).await.unwrap();
    db
}

fn alice() -> CreateUser {
    CreateUser {
        name: "Alice".into(),
        email: "alice@example.com".into(),
        password: "correct-horse-battery".into(),
    }
}

#[tokio::test]
async fn create_and_get_user() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo.create(alice()).await.unwrap();
    assert_eq!(user.name, "Alice");
    assert_eq!(user.email, "alice@example.com");
    // Stored as an Argon2id PHC hash, never the raw password.
    assert!(user.password_hash.starts_with("$argon2id$"));

    let fetched = repo.get_by_id(user.id).await.unwrap();
    assert_eq!(fetched.id, user.id);

    let by_email = repo.get_by_email("alice@example.com").await.unwrap();
    assert_eq!(by_email.id, user.id);
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    repo.create(alice()).await.unwrap();
    let result = repo
        .create(CreateUser {
            name: "Other Alice".into(),
            email: "alice@example.com".into(),
            password: "another-password".into(),
        })
        .await;

    assert!(matches!(result, Err(SiteroundError::Conflict { .. })));
}

#[tokio::test]
async fn email_uniqueness_is_case_sensitive() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    repo.create(alice()).await.unwrap();
    // Different case is a different email.
    repo.create(CreateUser {
        name: "Shouty Alice".into(),
        email: "ALICE@example.com".into(),
        password: "another-password".into(),
    })
    .await
    .unwrap();

    assert!(matches!(
        repo.get_by_email("Alice@example.com").await,
        Err(SiteroundError::NotFound { .. })
    ));
}

#[tokio::test]
async fn update_changes_only_provided_fields() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo.create(alice()).await.unwrap();
    let updated = repo
        .update(
            user.id,
            UpdateUser {
                name: Some("Alice Cooper".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Alice Cooper");
    assert_eq!(updated.email, "alice@example.com"); // unchanged
    assert_eq!(updated.password_hash, user.password_hash); // unchanged
}

#[tokio::test]
async fn password_update_rehashes() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo.create(alice()).await.unwrap();
    let updated = repo
        .update(
            user.id,
            UpdateUser {
                password: Some("new-password-123".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_ne!(updated.password_hash, user.password_hash);
    assert!(updated.password_hash.starts_with("$argon2id$"));
}

#[tokio::test]
async fn delete_is_hard_and_not_repeatable() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo.create(alice()).await.unwrap();
    repo.delete(user.id).await.unwrap();

    assert!(matches!(
        repo.get_by_id(user.id).await,
        Err(SiteroundError::NotFound { .. })
    ));
    assert!(matches!(
        repo.delete(user.id).await,
        Err(SiteroundError::NotFound { .. })
    ));
}

#[tokio::test]
async fn list_and_search() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    repo.create(alice()).await.unwrap();
    repo.create(CreateUser {
        name: "Bob".into(),
        email: "bob@example.com".into(),
        password: "bobs-password-1".into(),
    })
    .await
    .unwrap();

    let all = repo.list().await.unwrap();
    assert_eq!(all.len(), 2);
    // Insertion order preserved.
    assert_eq!(all[0].name, "Alice");
    assert_eq!(all[1].name, "Bob");

    // Search is case-insensitive over name and email.
    let hits = repo.search("ALICE").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].email, "alice@example.com");

    let hits = repo.search("example.com").await.unwrap();
    assert_eq!(hits.len(), 2);
}
