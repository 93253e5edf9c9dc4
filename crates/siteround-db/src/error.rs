//! Database-specific error types and conversions.

use siteround_core::error::SiteroundError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Malformed record: {0}")]
    Decode(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Duplicate record: {entity}")]
    Duplicate { entity: String },
}

impl From<DbError> for SiteroundError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => SiteroundError::NotFound { entity, id },
            DbError::Duplicate { entity } => SiteroundError::Conflict {
                message: format!("{entity} already exists"),
            },
            other => SiteroundError::Storage(other.to_string()),
        }
    }
}

/// Classify a statement-level failure surfaced by `Response::check`.
///
/// Unique index violations are the only constraint failure the schema can
/// produce; everything else is an opaque query error.
pub(crate) fn classify_check_error(entity: &str, err: surrealdb::Error) -> DbError {
    let msg = err.to_string();
    if msg.contains("already contains") {
        DbError::Duplicate {
            entity: entity.to_string(),
        }
    } else {
        DbError::Query(msg)
    }
}
