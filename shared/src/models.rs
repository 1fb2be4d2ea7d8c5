use serde::{Serialize, Deserialize};
use std::fmt;

use crate::scorecard::GREAT_COURSE_THRESHOLD;

pub type LecturerId = i64;
pub type CourseId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    Lecturer,
    Course,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "backend", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Lecturer {
    pub id: LecturerId,
    pub first_name: String,
    pub last_name: String,
}

impl fmt::Display for Lecturer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.first_name, self.last_name)
    }
}

/// A course and its running vote tally. Every course belongs to exactly one
/// lecturer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "backend", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: CourseId,
    pub course_title: String,
    pub votes: i32,
    pub lecturer_id: LecturerId,
}

impl Course {
    /// Great courses have strictly more than 100 votes.
    pub fn is_great_course(&self) -> bool {
        self.votes > GREAT_COURSE_THRESHOLD
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.course_title)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewLecturer {
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewCourse {
    pub course_title: String,
    #[serde(default)]
    pub votes: i32,
    pub lecturer_id: LecturerId,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CourseDetails {
    pub course: Course,
    pub lecturer: Lecturer,
    pub great_course: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum VoteOutcome {
    Counted,
    AlreadyVoted,
    Rejected,
}

impl VoteOutcome {
    pub fn message(self) -> &'static str {
        match self {
            VoteOutcome::Counted => "Your vote was counted.",
            VoteOutcome::AlreadyVoted => "You have already voted.",
            VoteOutcome::Rejected => "Vote not successful. A vote must be either 1 or -1.",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VoteResponse {
    pub outcome: VoteOutcome,
    pub message: String,
    pub course_id: CourseId,
    pub votes: i32,
}

impl VoteResponse {
    pub fn new(outcome: VoteOutcome, course: &Course) -> Self {
        Self {
            outcome,
            message: outcome.message().into(),
            course_id: course.id,
            votes: course.votes,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    pub has_voted: bool,
}

/// Aggregate figures for the statistics page. `None` means the figure is
/// unavailable because there is nothing to aggregate, which is distinct from
/// a mean of zero.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub lecturer_count: i64,
    pub courses_count: i64,
    pub courses_votes_mean: Option<f64>,
    pub lecturer_best: Option<Lecturer>,
    pub lecturer_best_votes_mean: Option<f64>,
}
