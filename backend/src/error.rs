use rocket::http::Status;
use rocket::response::Responder;
use rocket::serde::json::Json;
use serde::Serialize;
use shared::error::{Error, ErrorCode};
use shared::validation::ValidationError;
use thiserror::Error;
use tracing::error;
use crate::store::StoreError;

#[derive(Error, Debug, Serialize)]
pub enum ApiError {
    #[error("Resource not found")]
    NotFound,
    #[error("Invalid id")]
    InvalidId,
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    Validation(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn code(&self) -> ErrorCode {
        match self {
            ApiError::NotFound => ErrorCode::NotFound,
            ApiError::InvalidId | ApiError::InvalidInput(_) => ErrorCode::InvalidInput,
            ApiError::Validation(_) => ErrorCode::ValidationFailed,
            ApiError::Internal(_) => ErrorCode::SystemError,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound => ApiError::NotFound,
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        ApiError::Validation(e.to_string())
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for ApiError {
    fn respond_to(self, req: &'r rocket::Request<'_>) -> rocket::response::Result<'o> {
        let code = self.code();
        let body = match self {
            ApiError::Internal(details) => {
                error!("Request to {} failed: {}", req.uri(), details);
                Error::new(code, "An internal server error occurred.")
            }
            other => Error::new(code, other.to_string()),
        };

        rocket::Response::build_from(Json(body).respond_to(req)?)
            .status(Status::new(code.status()))
            .ok()
    }
}
