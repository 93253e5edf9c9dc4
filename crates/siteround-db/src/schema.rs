//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. Aggregate documents embed their
//! member/request lists as string arrays so each aggregate can be
//! replaced atomically as one record.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Users
-- =======================================================================
DEFINE TABLE user SCHEMAFULL;
DEFINE FIELD name ON TABLE user TYPE string;
DEFINE FIELD email ON TABLE user TYPE string;
DEFINE FIELD password_hash ON TABLE user TYPE string;
DEFINE FIELD created_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_user_email ON TABLE user COLUMNS email UNIQUE;

-- =======================================================================
-- Groups (single-document aggregate)
-- =======================================================================
DEFINE TABLE group SCHEMAFULL;
DEFINE FIELD name ON TABLE group TYPE string;
DEFINE FIELD created_by ON TABLE group TYPE string;
DEFINE FIELD members ON TABLE group TYPE array;
DEFINE FIELD members.* ON TABLE group TYPE string;
DEFINE FIELD join_requests ON TABLE group TYPE array;
DEFINE FIELD join_requests.* ON TABLE group TYPE string;
DEFINE FIELD revision ON TABLE group TYPE int DEFAULT 0;
DEFINE FIELD created_at ON TABLE group TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE group TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_group_creator ON TABLE group COLUMNS created_by;

-- =======================================================================
-- Inspections (single-document aggregate, weak link to group)
-- =======================================================================
DEFINE TABLE inspection SCHEMAFULL;
DEFINE FIELD group_id ON TABLE inspection TYPE string;
DEFINE FIELD address ON TABLE inspection TYPE string;
DEFINE FIELD scheduled_at ON TABLE inspection TYPE datetime;
DEFINE FIELD created_by ON TABLE inspection TYPE string;
DEFINE FIELD assigned_to ON TABLE inspection TYPE array;
DEFINE FIELD assigned_to.* ON TABLE inspection TYPE string;
DEFINE FIELD attendees ON TABLE inspection TYPE array;
DEFINE FIELD attendees.* ON TABLE inspection TYPE string;
DEFINE FIELD revision ON TABLE inspection TYPE int DEFAULT 0;
DEFINE FIELD created_at ON TABLE inspection TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE inspection TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_inspection_group ON TABLE inspection COLUMNS group_id;

-- =======================================================================
-- Ratings (one per user per inspection)
-- =======================================================================
DEFINE TABLE rating SCHEMAFULL;
DEFINE FIELD inspection_id ON TABLE rating TYPE string;
DEFINE FIELD user_id ON TABLE rating TYPE string;
DEFINE FIELD score ON TABLE rating TYPE int \
    ASSERT $value >= 1 AND $value <= 5;
DEFINE FIELD comment ON TABLE rating TYPE option<string>;
DEFINE FIELD created_at ON TABLE rating TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_rating_inspection_user ON TABLE rating \
    COLUMNS inspection_id, user_id UNIQUE;

-- =======================================================================
-- Sessions
-- =======================================================================
DEFINE TABLE session SCHEMAFULL;
DEFINE FIELD user_id ON TABLE session TYPE string;
DEFINE FIELD token_hash ON TABLE session TYPE string;
DEFINE FIELD ip_address ON TABLE session TYPE option<string>;
DEFINE FIELD user_agent ON TABLE session TYPE option<string>;
DEFINE FIELD expires_at ON TABLE session TYPE datetime;
DEFINE FIELD created_at ON TABLE session TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_session_token ON TABLE session \
    COLUMNS token_hash UNIQUE;
DEFINE INDEX idx_session_user ON TABLE session COLUMNS user_id;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
/// All DEFINE statements are idempotent so re-running is safe.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            // Record the applied migration.
            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}

/// Returns the raw schema DDL for version 1.
///
/// Exposed for testing with in-memory SurrealDB instances that
/// bypass the migration runner.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}
