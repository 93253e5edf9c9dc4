//! SurrealDB implementation of [`RatingRepository`].
//!
//! The unique `(inspection_id, user_id)` index is the backstop for the
//! one-rating-per-user rule; the service layer checks first so the usual
//! path never hits it.

use chrono::{DateTime, Utc};
use siteround_core::error::SiteroundResult;
use siteround_core::models::rating::{CreateRating, Rating};
use siteround_core::repository::RatingRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::{DbError, classify_check_error};

#[derive(Debug, SurrealValue)]
struct RatingRow {
    inspection_id: String,
    user_id: String,
    score: u32,
    comment: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct RatingRowWithId {
    record_id: String,
    inspection_id: String,
    user_id: String,
    score: u32,
    comment: Option<String>,
    created_at: DateTime<Utc>,
}

fn row_to_rating(
    id: Uuid,
    inspection_id: String,
    user_id: String,
    score: u32,
    comment: Option<String>,
    created_at: DateTime<Utc>,
) -> Result<Rating, DbError> {
    let inspection_id = Uuid::parse_str(&inspection_id)
        .map_err(|e| DbError::Decode(format!("invalid inspection UUID: {e}")))?;
    let user_id = Uuid::parse_str(&user_id)
        .map_err(|e| DbError::Decode(format!("invalid user UUID: {e}")))?;
    let score =
        u8::try_from(score).map_err(|_| DbError::Decode("rating score out of range".into()))?;
    Ok(Rating {
        id,
        inspection_id,
        user_id,
        score,
        comment,
        created_at,
    })
}

impl RatingRow {
    fn try_into_rating(self, id: Uuid) -> Result<Rating, DbError> {
        row_to_rating(
            id,
            self.inspection_id,
            self.user_id,
            self.score,
            self.comment,
            self.created_at,
        )
    }
}

impl RatingRowWithId {
    fn try_into_rating(self) -> Result<Rating, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))?;
        row_to_rating(
            id,
            self.inspection_id,
            self.user_id,
            self.score,
            self.comment,
            self.created_at,
        )
    }
}

/// SurrealDB implementation of the Rating repository.
#[derive(Clone)]
pub struct SurrealRatingRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealRatingRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> RatingRepository for SurrealRatingRepository<C> {
    async fn create(&self, input: CreateRating) -> SiteroundResult<Rating> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('rating', $id) SET \
                 inspection_id = $inspection_id, user_id = $user_id, \
                 score = $score, comment = $comment",
            )
            .bind(("id", id_str.clone()))
            .bind(("inspection_id", input.inspection_id.to_string()))
            .bind(("user_id", input.user_id.to_string()))
            .bind(("score", u32::from(input.score)))
            .bind(("comment", input.comment))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| classify_check_error("rating", e))?;

        let rows: Vec<RatingRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "rating".into(),
            id: id_str,
        })?;

        Ok(row.try_into_rating(id)?)
    }

    async fn get_by_inspection_and_user(
        &self,
        inspection_id: Uuid,
        user_id: Uuid,
    ) -> SiteroundResult<Rating> {
        let inspection_str = inspection_id.to_string();
        let user_str = user_id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM rating \
                 WHERE inspection_id = $inspection_id AND user_id = $user_id",
            )
            .bind(("inspection_id", inspection_str.clone()))
            .bind(("user_id", user_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RatingRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "rating".into(),
            id: format!("inspection={inspection_str} user={user_str}"),
        })?;

        Ok(row.try_into_rating()?)
    }

    async fn list_for_inspection(&self, inspection_id: Uuid) -> SiteroundResult<Vec<Rating>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM rating \
                 WHERE inspection_id = $inspection_id \
                 ORDER BY created_at ASC",
            )
            .bind(("inspection_id", inspection_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RatingRowWithId> = result.take(0).map_err(DbError::from)?;

        let ratings = rows
            .into_iter()
            .map(|row| row.try_into_rating())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(ratings)
    }
}
