//! Siteround Database — SurrealDB connection management, schema
//! migrations, and repository implementations.
//!
//! Aggregates (groups, inspections) are stored as single documents that
//! embed their member/request/assignee/attendee id lists, and are replaced
//! as a whole with a revision-checked `UPDATE`. That conditional replace is
//! what makes each read-check-mutate-save sequence atomic with respect to
//! concurrent requests for the same aggregate id.

mod connection;
mod error;
mod schema;

pub mod repository;

pub use connection::{DbConfig, DbManager};
pub use error::DbError;
pub use schema::{run_migrations, schema_v1};
