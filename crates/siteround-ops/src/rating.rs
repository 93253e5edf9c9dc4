//! Inspection rating service.

use siteround_core::error::{SiteroundError, SiteroundResult};
use siteround_core::models::rating::{CreateRating, Rating};
use siteround_core::policy;
use siteround_core::repository::{GroupRepository, InspectionRepository, RatingRepository};
use uuid::Uuid;

/// Ratings of completed inspections by group members.
pub struct RatingService<R, I, G>
where
    R: RatingRepository,
    I: InspectionRepository,
    G: GroupRepository,
{
    ratings: R,
    inspections: I,
    groups: G,
}

impl<R, I, G> RatingService<R, I, G>
where
    R: RatingRepository,
    I: InspectionRepository,
    G: GroupRepository,
{
    pub fn new(ratings: R, inspections: I, groups: G) -> Self {
        Self {
            ratings,
            inspections,
            groups,
        }
    }

    async fn check_membership(&self, actor: Uuid, group_id: Uuid) -> SiteroundResult<()> {
        let group = match self.groups.get_by_id(group_id).await {
            Ok(group) => group,
            Err(SiteroundError::NotFound { .. }) => {
                return Err(SiteroundError::Forbidden {
                    reason: "you must be a member of the inspection's group".into(),
                });
            }
            Err(e) => return Err(e),
        };
        if !policy::is_member(actor, &group) {
            return Err(SiteroundError::Forbidden {
                reason: "you must be a member of the inspection's group".into(),
            });
        }
        Ok(())
    }

    /// Rate an inspection 1–5, once per user.
    pub async fn rate(
        &self,
        inspection_id: Uuid,
        actor: Uuid,
        score: u8,
        comment: Option<String>,
    ) -> SiteroundResult<Rating> {
        if !(1..=5).contains(&score) {
            return Err(SiteroundError::InvalidInput {
                message: "score must be between 1 and 5".into(),
            });
        }

        let inspection = self.inspections.get_by_id(inspection_id).await?;
        self.check_membership(actor, inspection.group_id).await?;

        match self
            .ratings
            .get_by_inspection_and_user(inspection.id, actor)
            .await
        {
            Ok(_) => {
                return Err(SiteroundError::Conflict {
                    message: "you have already rated this inspection".into(),
                });
            }
            Err(SiteroundError::NotFound { .. }) => {}
            Err(e) => return Err(e),
        }

        self.ratings
            .create(CreateRating {
                inspection_id: inspection.id,
                user_id: actor,
                score,
                comment,
            })
            .await
    }

    /// All ratings for an inspection, oldest first; members only.
    pub async fn list(&self, inspection_id: Uuid, actor: Uuid) -> SiteroundResult<Vec<Rating>> {
        let inspection = self.inspections.get_by_id(inspection_id).await?;
        self.check_membership(actor, inspection.group_id).await?;
        self.ratings.list_for_inspection(inspection.id).await
    }
}
