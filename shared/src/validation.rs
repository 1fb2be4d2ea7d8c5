use crate::models::{NewCourse, NewLecturer};

pub const MAX_NAME_LENGTH: usize = 200;
pub const MAX_TITLE_LENGTH: usize = 200;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
    #[error("{0} exceeds maximum length of {MAX_NAME_LENGTH}")]
    NameTooLong(&'static str),
    #[error("Course title exceeds maximum length of {MAX_TITLE_LENGTH}")]
    TitleTooLong,
}

fn validate_name(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() { return Err(ValidationError::EmptyField(field)); }
    if value.chars().count() > MAX_NAME_LENGTH { return Err(ValidationError::NameTooLong(field)); }
    Ok(())
}

pub fn validate_lecturer(request: &NewLecturer) -> Result<(), ValidationError> {
    validate_name("First name", &request.first_name)?;
    validate_name("Last name", &request.last_name)
}

pub fn validate_course(request: &NewCourse) -> Result<(), ValidationError> {
    if request.course_title.trim().is_empty() { return Err(ValidationError::EmptyField("Course title")); }
    if request.course_title.chars().count() > MAX_TITLE_LENGTH { return Err(ValidationError::TitleTooLong); }
    Ok(())
}
