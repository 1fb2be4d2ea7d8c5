use rocket::{Request, catch, serde::json::Json};
use shared::error::ErrorResponse;

fn error_response(error: &str, status: u16) -> Json<ErrorResponse> {
    Json(ErrorResponse {
        error: error.into(),
        status,
    })
}

#[catch(403)]
pub fn forbidden(_req: &Request) -> Json<ErrorResponse> {
    error_response("Access forbidden.", 403)
}

#[catch(400)]
pub fn bad_request(_req: &Request) -> Json<ErrorResponse> {
    error_response("Invalid request parameters.", 400)
}

#[catch(422)]
pub fn unprocessable_entity(_req: &Request) -> Json<ErrorResponse> {
    error_response("The request body could not be understood.", 422)
}

#[catch(500)]
pub fn internal_error(_req: &Request) -> Json<ErrorResponse> {
    error_response("An internal server error occurred.", 500)
}

#[catch(404)]
pub fn not_found(_req: &Request) -> Json<ErrorResponse> {
    error_response("The requested resource was not found.", 404)
}
