//! Integration tests for schema initialization using in-memory SurrealDB.

use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use surrealdb_types::SurrealValue;

#[tokio::test]
async fn schema_migration_applies_successfully() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    siteround_db::run_migrations(&db).await.unwrap();

    // Verify that key tables exist by querying INFO FOR DB.
    let mut result = db.query("INFO FOR DB").await.unwrap();
    let info: Option<surrealdb_types::Value> = result.take(0).unwrap();
    let info = info.expect("INFO FOR DB should return a value");
    let info_str = format!("{:?}", info);

    assert!(info_str.contains("user"), "missing user table");
    assert!(info_str.contains("group"), "missing group table");
    assert!(info_str.contains("inspection"), "missing inspection table");
    assert!(info_str.contains("rating"), "missing rating table");
    assert!(info_str.contains("session"), "missing session table");
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    siteround_db::run_migrations(&db).await.unwrap();
    // Running again must not fail or re-apply.
    siteround_db::run_migrations(&db).await.unwrap();

    let mut result = db
        .query("SELECT count() AS total FROM _migration GROUP ALL")
        .await
        .unwrap();
    #[derive(Debug, surrealdb_types::SurrealValue)]
    struct CountRow {
        total: u64,
    }
    let rows: Vec<CountRow> = result.take(0).unwrap();
    assert_eq!(rows.first().map(|r| r.total), Some(1));
}

#[tokio::test]
async fn schema_v1_is_exposed() {
    assert!(siteround_db::schema_v1().contains("DEFINE TABLE group"));
}
