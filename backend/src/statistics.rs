use shared::models::{EntityKind, Statistics};
use shared::scorecard::best_lecturer;
use tracing::{debug, error};
use crate::store::{EntityStore, StoreError};

pub struct StatisticsAggregator;

impl StatisticsAggregator {
    pub async fn compute_statistics(store: &dyn EntityStore) -> Result<Statistics, StoreError> {
        let lecturer_count = store.count(EntityKind::Lecturer).await?;
        let courses_count = store.count(EntityKind::Course).await?;
        let courses_votes_mean = store.average_votes().await?;

        let means = store.average_votes_by_lecturer().await?;
        let (lecturer_best, lecturer_best_votes_mean) = match best_lecturer(&means) {
            Some(best) => {
                let lecturer = store.lecturer(best.lecturer_id).await?.ok_or_else(|| {
                    error!("Lecturer {} owns courses but does not exist", best.lecturer_id);
                    StoreError::NotFound
                })?;
                (Some(lecturer), Some(best.votes_mean))
            }
            None => {
                debug!("No courses to rank lecturers by");
                (None, None)
            }
        };

        Ok(Statistics {
            lecturer_count,
            courses_count,
            courses_votes_mean,
            lecturer_best,
            lecturer_best_votes_mean,
        })
    }
}
