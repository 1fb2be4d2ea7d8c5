use std::num::IntErrorKind;
use crate::error::ApiError;

pub fn parse_id(id: &str) -> Result<i64, ApiError> {
    id.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or(ApiError::InvalidId)
}

/// Integers beyond the `i32` range saturate; they are rejected as votes like
/// any other magnitude but one.
pub fn parse_vote_delta(vote: &str) -> Result<i32, ApiError> {
    vote.parse::<i32>().or_else(|e| match e.kind() {
        IntErrorKind::PosOverflow => Ok(i32::MAX),
        IntErrorKind::NegOverflow => Ok(i32::MIN),
        _ => Err(ApiError::InvalidInput(format!("Vote must be an integer, got {:?}", vote))),
    })
}
