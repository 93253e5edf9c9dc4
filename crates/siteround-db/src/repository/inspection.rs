//! SurrealDB implementation of [`InspectionRepository`].
//!
//! Same single-document aggregate shape and revision-guarded save as the
//! group repository. The `group_id` field is a plain string reference —
//! deleting a group leaves its inspections untouched.

use chrono::{DateTime, Utc};
use siteround_core::error::SiteroundResult;
use siteround_core::models::inspection::{CreateInspection, Inspection};
use siteround_core::repository::{InspectionRepository, SaveOutcome};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::{DbError, classify_check_error};

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct InspectionRow {
    group_id: String,
    address: String,
    scheduled_at: DateTime<Utc>,
    created_by: String,
    assigned_to: Vec<String>,
    attendees: Vec<String>,
    revision: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct InspectionRowWithId {
    record_id: String,
    group_id: String,
    address: String,
    scheduled_at: DateTime<Utc>,
    created_by: String,
    assigned_to: Vec<String>,
    attendees: Vec<String>,
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
        .map(|s| Uuid::parse_str(s).map_err(|e| DbError::Decode(format!("invalid user UUID: {e}"))))
        .collect()
}

impl InspectionRow {
    fn try_into_inspection(self, id: Uuid) -> Result<Inspection, DbError> {
        let group_id = Uuid::parse_str(&self.group_id)
            .map_err(|e| DbError::Decode(format!("invalid group UUID: {e}")))?;
        let created_by = Uuid::parse_str(&self.created_by)
            .map_err(|e| DbError::Decode(format!("invalid creator UUID: {e}")))?;
        Ok(Inspection {
            id,
            group_id,
            address: self.address,
            scheduled_at: self.scheduled_at,
            created_by,
            assigned_to: parse_ids(self.assigned_to)?,
            attendees: parse_ids(self.attendees)?,
            revision: self.revision,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl InspectionRowWithId {
    fn try_into_inspection(self) -> Result<Inspection, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))?;
        let group_id = Uuid::parse_str(&self.group_id)
            .map_err(|e| DbError::Decode(format!("invalid group UUID: {e}")))?;
        let created_by = Uuid::parse_str(&self.created_by)
            .map_err(|e| DbError::Decode(format!("invalid creator UUID: {e}")))?;
        Ok(Inspection {
            id,
            group_id,
            address: self.address,
            scheduled_at: self.scheduled_at,
            created_by,
            assigned_to: parse_ids(self.assigned_to)?,
            attendees: parse_ids(self.attendees)?,
            revision: self.revision,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the Inspection repository.
#[derive(Clone)]
pub struct SurrealInspectionRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealInspectionRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> InspectionRepository for SurrealInspectionRepository<C> {
    async fn create(&self, input: CreateInspection) -> SiteroundResult<Inspection> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('inspection', $id) SET \
                 group_id = $group_id, address = $address, \
                 scheduled_at = $scheduled_at, created_by = $created_by, \
                 assigned_to = [], attendees = [], revision = 0",
            )
            .bind(("id", id_str.clone()))
            .bind(("group_id", input.group_id.to_string()))
            .bind(("address", input.address))
            .bind(("scheduled_at", input.scheduled_at))
            .bind(("created_by", input.created_by.to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| classify_check_error("inspection", e))?;

        let rows: Vec<InspectionRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "inspection".into(),
            id: id_str,
        })?;

        Ok(row.try_into_inspection(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> SiteroundResult<Inspection> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('inspection', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<InspectionRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "inspection".into(),
            id: id_str,
        })?;

        Ok(row.try_into_inspection(id)?)
    }

    async fn list_for_group(&self, group_id: Uuid) -> SiteroundResult<Vec<Inspection>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM inspection \
                 WHERE group_id = $group_id \
                 ORDER BY scheduled_at ASC",
            )
            .bind(("group_id", group_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<InspectionRowWithId> = result.take(0).map_err(DbError::from)?;

        let inspections = rows
            .into_iter()
            .map(|row| row.try_into_inspection())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(inspections)
    }

    async fn save(&self, inspection: &Inspection) -> SiteroundResult<SaveOutcome<Inspection>> {
        let id_str = inspection.id.to_string();
        let assigned_to: Vec<String> = inspection.assigned_to.iter().map(Uuid::to_string).collect();
        let attendees: Vec<String> = inspection.attendees.iter().map(Uuid::to_string).collect();

        let result = self
            .db
            .query(
                "UPDATE type::record('inspection', $id) SET \
                 address = $address, scheduled_at = $scheduled_at, \
                 assigned_to = $assigned_to, attendees = $attendees, \
                 revision = $next, updated_at = time::now() \
                 WHERE revision = $expected",
            )
            .bind(("id", id_str.clone()))
            .bind(("address", inspection.address.clone()))
            .bind(("scheduled_at", inspection.scheduled_at))
            .bind(("assigned_to", assigned_to))
            .bind(("attendees", attendees))
            .bind(("next", inspection.revision + 1))
            .bind(("expected", inspection.revision))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| classify_check_error("inspection", e))?;

        let rows: Vec<InspectionRow> = result.take(0).map_err(DbError::from)?;
        if let Some(row) = rows.into_iter().next() {
            return Ok(SaveOutcome::Saved(row.try_into_inspection(inspection.id)?));
        }

        // No row matched: the record is gone, or its revision moved on.
        let mut check = self
            .db
            .query(
                "SELECT count() AS total FROM type::record('inspection', $id) \
                 GROUP ALL",
            )
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;
        let counts: Vec<CountRow> = check.take(0).map_err(DbError::from)?;

        if counts.first().map(|r| r.total).unwrap_or(0) == 0 {
            return Err(DbError::NotFound {
                entity: "inspection".into(),
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
            .query("DELETE type::record('inspection', $id) RETURN BEFORE")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<InspectionRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::NotFound {
                entity: "inspection".into(),
                id: id_str,
            }
            .into());
        }

        Ok(())
    }
}
