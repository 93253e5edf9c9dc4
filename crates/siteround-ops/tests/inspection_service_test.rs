//! Integration tests for the inspection lifecycle service using
//! in-memory SurrealDB.

use siteround_core::error::SiteroundError;
use siteround_core::models::group::GroupIdentifier;
use siteround_core::models::user::CreateUser;
use siteround_core::repository::UserRepository;
use siteround_db::repository::{
    SurrealGroupRepository, SurrealInspectionRepository, SurrealUserRepository,
};
use siteround_ops::{GroupService, InspectionService};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

type MemDb = surrealdb::engine::local::Db;
type Groups = GroupService<SurrealGroupRepository<MemDb>, SurrealUserRepository<MemDb>>;
type Inspections = InspectionService<
    SurrealInspectionRepository<MemDb>,
    SurrealGroupRepository<MemDb>,
    SurrealUserRepository<MemDb>,
>;

const DATE: &str = "2024-05-01T09:00:00Z";

/// Spin up in-memory DB, run migrations, create two users and Alice's
/// group.
async fn setup() -> (Groups, Inspections, Uuid, Uuid, Uuid) {
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

    let groups = GroupService::new(SurrealGroupRepository::new(db.clone()), users.clone());
    let inspections = InspectionService::new(
        SurrealInspectionRepository::new(db.clone()),
        SurrealGroupRepository::new(db.clone()),
        users,
    );

    let group = groups.create(alice.id, "Maple St Team").await.unwrap();
    (groups, inspections, alice.id, bob.id, group.id)
}

#[tokio::test]
async fn create_validates_input_and_membership() {
    let (_, inspections, alice, bob, group_id) = setup().await;
    let id = GroupIdentifier::Id(group_id);

    assert!(matches!(
        inspections.create(alice, &id, "", DATE).await,
        Err(SiteroundError::InvalidInput { .. })
    ));
    assert!(matches!(
        inspections.create(alice, &id, "12 Oak Ave", "not-a-date").await,
        Err(SiteroundError::InvalidInput { .. })
    ));
    // Bob is not a member yet.
    assert!(matches!(
        inspections.create(bob, &id, "12 Oak Ave", DATE).await,
        Err(SiteroundError::Forbidden { .. })
    ));

    let insp = inspections
        .create(alice, &id, "12 Oak Ave", DATE)
        .await
        .unwrap();
    assert_eq!(insp.group_id, group_id);
    assert_eq!(insp.created_by, alice);
    assert!(insp.assigned_to.is_empty());
    assert!(insp.attendees.is_empty());
}

#[tokio::test]
async fn attendance_requires_membership() {
    let (groups, inspections, alice, bob, group_id) = setup().await;
    let id = GroupIdentifier::Id(group_id);

    let insp = inspections
        .create(alice, &id, "12 Oak Ave", DATE)
        .await
        .unwrap();

    // Bob is not a member: attending is forbidden.
    assert!(matches!(
        inspections.attend(insp.id, bob).await,
        Err(SiteroundError::Forbidden { .. })
    ));

    // Bob joins via request + approval, then attends.
    groups.request_join(&id, bob).await.unwrap();
    groups.approve_join(group_id, alice, bob).await.unwrap();

    let insp = inspections.attend(insp.id, bob).await.unwrap();
    assert_eq!(insp.attendees, vec![bob]);

    // Attending twice: success then Conflict, with exactly one entry.
    let result = inspections.attend(insp.id, bob).await;
    assert!(matches!(result, Err(SiteroundError::Conflict { .. })));

    let fetched = inspections.get(insp.id, bob).await.unwrap();
    assert_eq!(
        fetched.attendees.iter().filter(|id| **id == bob).count(),
        1
    );
}

#[tokio::test]
async fn assignment_rules() {
    let (groups, inspections, alice, bob, group_id) = setup().await;
    let id = GroupIdentifier::Id(group_id);

    let insp = inspections
        .create(alice, &id, "12 Oak Ave", DATE)
        .await
        .unwrap();

    // Only the creator can assign.
    assert!(matches!(
        inspections.assign(insp.id, bob, "alice@example.com").await,
        Err(SiteroundError::Forbidden { .. })
    ));

    // Unknown email: the referenced user does not exist.
    assert!(matches!(
        inspections
            .assign(insp.id, alice, "nobody@example.com")
            .await,
        Err(SiteroundError::NotFound { .. })
    ));

    // Bob is a valid user but not a group member.
    assert!(matches!(
        inspections.assign(insp.id, alice, "bob@example.com").await,
        Err(SiteroundError::InvalidState { .. })
    ));

    groups.request_join(&id, bob).await.unwrap();
    groups.approve_join(group_id, alice, bob).await.unwrap();

    let insp = inspections
        .assign(insp.id, alice, "bob@example.com")
        .await
        .unwrap();
    let bob_id = insp.assigned_to[0];
    assert_eq!(insp.assigned_to.len(), 1);

    // Assigning the same user again conflicts.
    assert!(matches!(
        inspections.assign(insp.id, alice, "bob@example.com").await,
        Err(SiteroundError::Conflict { .. })
    ));
    let fetched = inspections.get(insp.id, alice).await.unwrap();
    assert_eq!(fetched.assigned_to, vec![bob_id]);
}

#[tokio::test]
async fn get_rechecks_membership_on_every_read() {
    let (groups, inspections, alice, bob, group_id) = setup().await;
    let id = GroupIdentifier::Id(group_id);

    let insp = inspections
        .create(alice, &id, "12 Oak Ave", DATE)
        .await
        .unwrap();

    assert!(matches!(
        inspections.get(insp.id, bob).await,
        Err(SiteroundError::Forbidden { .. })
    ));

    groups.request_join(&id, bob).await.unwrap();
    groups.approve_join(group_id, alice, bob).await.unwrap();
    inspections.get(insp.id, bob).await.unwrap();

    // Once Bob leaves again, the same read is forbidden again.
    groups.leave(&id, bob).await.unwrap();
    assert!(matches!(
        inspections.get(insp.id, bob).await,
        Err(SiteroundError::Forbidden { .. })
    ));
}

#[tokio::test]
async fn update_is_creator_only_and_partial() {
    let (_, inspections, alice, bob, group_id) = setup().await;
    let id = GroupIdentifier::Id(group_id);

    let insp = inspections
        .create(alice, &id, "12 Oak Ave", DATE)
        .await
        .unwrap();

    assert!(matches!(
        inspections.update(insp.id, bob, Some("7 Elm St"), None).await,
        Err(SiteroundError::Forbidden { .. })
    ));

    let updated = inspections
        .update(insp.id, alice, Some("7 Elm St"), None)
        .await
        .unwrap();
    assert_eq!(updated.address, "7 Elm St");
    assert_eq!(updated.scheduled_at, insp.scheduled_at); // unchanged

    let rescheduled = inspections
        .update(insp.id, alice, None, Some("2024-06-01T10:00:00Z"))
        .await
        .unwrap();
    assert_eq!(rescheduled.address, "7 Elm St"); // unchanged
    assert_ne!(rescheduled.scheduled_at, insp.scheduled_at);

    assert!(matches!(
        inspections.update(insp.id, alice, None, Some("soon")).await,
        Err(SiteroundError::InvalidInput { .. })
    ));
}

#[tokio::test]
async fn list_for_group_is_member_only() {
    let (_, inspections, alice, bob, group_id) = setup().await;
    let id = GroupIdentifier::Id(group_id);

    inspections
        .create(alice, &id, "12 Oak Ave", DATE)
        .await
        .unwrap();
    inspections
        .create(alice, &id, "99 Pine Rd", "2024-06-01T10:00:00Z")
        .await
        .unwrap();

    let list = inspections.list_for_group(&id, alice).await.unwrap();
    assert_eq!(list.len(), 2);

    assert!(matches!(
        inspections.list_for_group(&id, bob).await,
        Err(SiteroundError::Forbidden { .. })
    ));

    // The creator-email identifier resolves to the same group.
    let by_email = GroupIdentifier::parse("alice@example.com").unwrap();
    let list = inspections.list_for_group(&by_email, alice).await.unwrap();
    assert_eq!(list.len(), 2);
}

#[tokio::test]
async fn deleting_the_group_leaves_inspections_dangling() {
    let (groups, inspections, alice, _, group_id) = setup().await;
    let id = GroupIdentifier::Id(group_id);

    let insp = inspections
        .create(alice, &id, "12 Oak Ave", DATE)
        .await
        .unwrap();

    groups.delete(&id, alice).await.unwrap();

    // Nobody is a member of a deleted group, so membership-gated reads
    // degrade to Forbidden rather than crashing.
    assert!(matches!(
        inspections.get(insp.id, alice).await,
        Err(SiteroundError::Forbidden { .. })
    ));
    assert!(matches!(
        inspections.attend(insp.id, alice).await,
        Err(SiteroundError::Forbidden { .. })
    ));

    // The creator can still clean up the orphaned inspection.
    let deleted = inspections.delete(insp.id, alice).await.unwrap();
    assert_eq!(deleted.id, insp.id);
    assert!(matches!(
        inspections.delete(insp.id, alice).await,
        Err(SiteroundError::NotFound { .. })
    ));
}

#[tokio::test]
async fn delete_is_creator_only() {
    let (groups, inspections, alice, bob, group_id) = setup().await;
    let id = GroupIdentifier::Id(group_id);

    let insp = inspections
        .create(alice, &id, "12 Oak Ave", DATE)
        .await
        .unwrap();

    groups.request_join(&id, bob).await.unwrap();
    groups.approve_join(group_id, alice, bob).await.unwrap();

    // Even a member cannot delete someone else's inspection.
    assert!(matches!(
        inspections.delete(insp.id, bob).await,
        Err(SiteroundError::Forbidden { .. })
    ));

    inspections.delete(insp.id, alice).await.unwrap();
    assert!(matches!(
        inspections.get(insp.id, alice).await,
        Err(SiteroundError::NotFound { .. })
    ));
}

#[tokio::test]
async fn unknown_inspection_is_not_found() {
    let (_, inspections, alice, _, _) = setup().await;
    assert!(matches!(
        inspections.get(Uuid::new_v4(), alice).await,
        Err(SiteroundError::NotFound { .. })
    ));
}
