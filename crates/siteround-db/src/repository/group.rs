//! SurrealDB implementation of [`GroupRepository`].
//!
//! A group is one document embedding its member and join-request id
//! arrays. `save` replaces the whole document with a revision guard:
//! the conditional `UPDATE ... WHERE revision = $expected` runs as a
//! single atomic statement, so of two racing writers exactly one
//! observes a match and the other gets [`SaveOutcome::Stale`].

use chrono::{DateTime, Utc};
use siteround_core::error::SiteroundResult;
use siteround_core::models::group::{CreateGroup, Group};
use siteround_core::repository::{GroupRepository, SaveOutcome};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::{DbError, classify_check_error};

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct GroupRow {
    name: String,
    created_by: String,
    members: Vec<String>,
    join_requests: Vec<String>,
    revision: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct GroupRowWithId {
    record_id: String,
    name: String,
    created_by: String,
    members: Vec<String>,
    join_requests: Vec<String>,
    revision: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

fn parse_ids(raw: Vec<String>) -> Result<Vec<Uuid>, DbError> {
    raw.iter()
        .map(|s| {
            Uuid::parse_str(s).map_err(|e| DbError::Decode(format!("invalid member UUID: {e}")))
        })
        .collect()
}

impl GroupRow {
    fn try_into_group(self, id: Uuid) -> Result<Group, DbError> {
        let created_by = Uuid::parse_str(&self.created_by)
            .map_err(|e| DbError::Decode(format!("invalid creator UUID: {e}")))?;
        Ok(Group {
            id,
            name: self.name,
            created_by,
            members: parse_ids(self.members)?,
            join_requests: parse_ids(self.join_requests)?,
            revision: self.revision,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl GroupRowWithId {
    fn try_into_group(self) -> Result<Group, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))?;
        let created_by = Uuid::parse_str(&self.created_by)
            .map_err(|e| DbError::Decode(format!("invalid creator UUID: {e}")))?;
        Ok(Group {
            id,
            name: self.name,
            created_by,
            members: parse_ids(self.members)?,
            join_requests: parse_ids(self.join_requests)?,
            revision: self.revision,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the Group repository.
#[derive(Clone)]
pub struct SurrealGroupRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealGroupRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> GroupRepository for SurrealGroupRepository<C> {
    async fn create(&self, input: CreateGroup) -> SiteroundResult<Group> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let creator_str = input.created_by.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('group', $id) SET \
                 name = $name, created_by = $created_by, \
                 members = $members, join_requests = [], \
                 revision = 0",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("created_by", creator_str.clone()))
            .bind(("members", vec![creator_str]))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| classify_check_error("group", e))?;

        let rows: Vec<GroupRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "group".into(),
            id: id_str,
        })?;

        Ok(row.try_into_group(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> SiteroundResult<Group> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('group', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<GroupRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "group".into(),
            id: id_str,
        })?;

        Ok(row.try_into_group(id)?)
    }

    async fn get_by_creator(&self, creator_id: Uuid) -> SiteroundResult<Group> {
        let creator_str = creator_id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM group \
                 WHERE created_by = $created_by \
                 ORDER BY created_at ASC LIMIT 1",
            )
            .bind(("created_by", creator_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<GroupRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "group".into(),
            id: format!("created_by={creator_str}"),
        })?;

        Ok(row.try_into_group()?)
    }

    async fn list_for_member(&self, user_id: Uuid) -> SiteroundResult<Vec<Group>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM group \
                 WHERE members CONTAINS $user_id \
                 ORDER BY created_at ASC",
            )
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<GroupRowWithId> = result.take(0).map_err(DbError::from)?;

        let groups = rows
            .into_iter()
            .map(|row| row.try_into_group())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(groups)
    }

    async fn save(&self, group: &Group) -> SiteroundResult<SaveOutcome<Group>> {
        let id_str = group.id.to_string();
        let members: Vec<String> = group.members.iter().map(Uuid::to_string).collect();
        let join_requests: Vec<String> = group.join_requests.iter().map(Uuid::to_string).collect();

        let result = self
            .db
            .query(
                "UPDATE type::record('group', $id) SET \
                 name = $name, members = $members, \
                 join_requests = $join_requests, \
                 revision = $next, updated_at = time::now() \
                 WHERE revision = $expected",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", group.name.clone()))
            .bind(("members", members))
            .bind(("join_requests", join_requests))
            .bind(("next", group.revision + 1))
            .bind(("expected", group.revision))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| classify_check_error("group", e))?;

        let rows: Vec<GroupRow> = result.take(0).map_err(DbError::from)?;
        if let Some(row) = rows.into_iter().next() {
            return Ok(SaveOutcome::Saved(row.try_into_group(group.id)?));
        }

        // No row matched: the record is gone, or its revision moved on.
        let mut check = self
            .db
            .query(
                "SELECT count() AS total FROM type::record('group', $id) \
                 GROUP ALL",
            )
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;
        let counts: Vec<CountRow> = check.take(0).map_err(DbError::from)?;

        if counts.first().map(|r| r.total).unwrap_or(0) == 0 {
            return Err(DbError::NotFound {
                entity: "group".into(),
                id: id_str,
            }
            .into());
        }

        Ok(SaveOutcome::Stale)
    }

    async fn delete(&self, id: Uuid) -> SiteroundResult<()> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("DELETE type::record('group', $id) RETURN BEFORE")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<GroupRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::NotFound {
                entity: "group".into(),
                id: id_str,
            }
            .into());
        }

        Ok(())
    }
}
