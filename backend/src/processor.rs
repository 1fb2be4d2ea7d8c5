use shared::models::Course;
use shared::scorecard::update_vote;
use tracing::{debug, info};
use crate::store::{EntityStore, StoreError};

pub struct VoteProcessor;

impl VoteProcessor {
    /// Applies `delta` to the course and persists it.
    ///
    /// Returns `Ok(false)` without touching the store when the delta is not
    /// +1 or -1. The read-modify-write is not atomic: two concurrent votes on
    /// the same course can lose one update.
    pub async fn apply_vote(
        store: &dyn EntityStore,
        course: &mut Course,
        delta: i32,
    ) -> Result<bool, StoreError> {
        let mut updated = course.clone();
        if !update_vote(&mut updated, delta) {
            debug!("Rejected vote of {} for course {}", delta, course.id);
            return Ok(false);
        }

        store.save_course(&updated).await?;
        *course = updated;
        info!("✓ Counted vote of {} for course {} (now {})", delta, course.id, course.votes);
        Ok(true)
    }
}
