pub mod error;
pub mod models;
pub mod validation;
pub mod scorecard;

pub use error::{Error, ErrorCode, ErrorResponse};
pub use models::*;
pub use validation::*;
pub use scorecard::{best_lecturer, update_vote, BestLecturer, GREAT_COURSE_THRESHOLD};
