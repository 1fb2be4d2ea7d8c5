use std::collections::BTreeMap;

use crate::models::{Course, LecturerId};

pub const GREAT_COURSE_THRESHOLD: i32 = 100;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestLecturer {
    pub lecturer_id: LecturerId,
    pub votes_mean: f64,
}

/// Applies an up- or down-vote to the course tally.
///
/// Only deltas of magnitude one are accepted. Anything else, including a
/// delta that would overflow the counter, leaves the course untouched and
/// yields `false`.
pub fn update_vote(course: &mut Course, delta: i32) -> bool {
    if delta.unsigned_abs() != 1 {
        return false;
    }

    match course.votes.checked_add(delta) {
        Some(votes) => {
            course.votes = votes;
            true
        }
        None => false,
    }
}

/// Picks the lecturer with the strictly greatest mean from per-lecturer vote
/// means. Ties keep the lecturer seen first in iteration order, which for a
/// `BTreeMap` is ascending lecturer id. An empty map has no best lecturer.
pub fn best_lecturer(means: &BTreeMap<LecturerId, f64>) -> Option<BestLecturer> {
    means.iter().fold(None, |best, (&lecturer_id, &votes_mean)| match best {
        Some(BestLecturer { votes_mean: current, .. }) if votes_mean <= current => best,
        _ => Some(BestLecturer { lecturer_id, votes_mean }),
    })
}
