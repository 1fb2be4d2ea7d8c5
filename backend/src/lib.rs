pub mod processor;
pub mod statistics;
pub mod routes;
pub mod session;
pub mod store;
pub mod cors;
pub mod config;
pub mod error;
pub mod utils;
pub mod catchers;
pub use shared::{models::*, error::*};

use rocket::{Build, Rocket, routes, catchers};
use crate::{
    catchers::{bad_request, forbidden, internal_error, not_found, unprocessable_entity},
    config::Config,
    cors::CORS,
    routes::AppState,
};

/// Assembles the API around an already-constructed application state.
pub fn build_rocket(state: AppState, config: &Config) -> Rocket<Build> {
    rocket::build()
        .attach(CORS::new(config.allowed_origins.clone()))
        .manage(state)
        .mount(
            "/api",
            routes![
                routes::all_options,
                routes::list_courses,
                routes::course_details,
                routes::vote,
                routes::session_status,
                routes::vote_again,
                routes::statistics,
                routes::list_lecturers,
                routes::get_lecturer,
                routes::create_lecturer,
                routes::update_lecturer,
                routes::delete_lecturer,
                routes::create_course,
                routes::delete_course
            ],
        )
        .register(
            "/",
            catchers![
                forbidden,
                bad_request,
                unprocessable_entity,
                internal_error,
                not_found
            ],
        )
}
