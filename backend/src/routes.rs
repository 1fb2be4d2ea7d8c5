use rocket::{State, get, post, put, delete, http::Status, serde::json::Json};
use tracing::{info, debug, instrument};
use shared::models::*;
use shared::validation::{validate_course, validate_lecturer};
use crate::{
    error::ApiError,
    processor::VoteProcessor,
    session::{ClientSession, SessionStore, SessionVoteGuard},
    statistics::StatisticsAggregator,
    store::EntityStore,
    utils::{parse_id, parse_vote_delta},
};

pub struct AppState {
    pub store: Box<dyn EntityStore>,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(store: impl EntityStore + 'static, sessions: SessionStore) -> Self {
        Self {
            store: Box::new(store),
            sessions,
        }
    }

    fn store(&self) -> &dyn EntityStore {
        self.store.as_ref()
    }
}

async fn fetch_course(state: &AppState, id: &str) -> Result<Course, ApiError> {
    let id = parse_id(id)?;
    state.store().course(id).await?.ok_or(ApiError::NotFound)
}

async fn fetch_lecturer(state: &AppState, id: &str) -> Result<Lecturer, ApiError> {
    let id = parse_id(id)?;
    state.store().lecturer(id).await?.ok_or(ApiError::NotFound)
}

#[rocket::options("/<_..>")]
pub async fn all_options() -> Status {
    Status::Ok
}

#[get("/courses")]
pub async fn list_courses(state: &State<AppState>) -> Result<Json<Vec<Course>>, ApiError> {
    let courses = state.store().courses_by_votes().await?;
    Ok(Json(courses))
}

#[instrument(skip(state), fields(course_id = %id))]
#[get("/courses/<id>")]
pub async fn course_details(state: &State<AppState>, id: &str) -> Result<Json<CourseDetails>, ApiError> {
    let course = fetch_course(state, id).await?;
    let lecturer = state.store().lecturer(course.lecturer_id).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(CourseDetails {
        great_course: course.is_great_course(),
        course,
        lecturer,
    }))
}

#[instrument(skip(state, session), fields(course_id = %id))]
#[post("/courses/<id>/vote/<vote>")]
pub async fn vote(
    state: &State<AppState>,
    id: &str,
    vote: &str,
    session: ClientSession,
) -> Result<(Status, Json<VoteResponse>), ApiError> {
    let mut course = fetch_course(state, id).await?;
    let delta = parse_vote_delta(vote)?;

    if SessionVoteGuard::has_voted(&state.sessions, session.id) {
        debug!("Session {} already voted", session.id);
        return Ok((Status::Forbidden, Json(VoteResponse::new(VoteOutcome::AlreadyVoted, &course))));
    }

    if VoteProcessor::apply_vote(state.store(), &mut course, delta).await? {
        SessionVoteGuard::set_voted(&state.sessions, session.id, true);
        Ok((Status::Ok, Json(VoteResponse::new(VoteOutcome::Counted, &course))))
    } else {
        Ok((Status::BadRequest, Json(VoteResponse::new(VoteOutcome::Rejected, &course))))
    }
}

#[get("/session")]
pub async fn session_status(state: &State<AppState>, session: ClientSession) -> Json<SessionStatus> {
    Json(SessionStatus {
        has_voted: SessionVoteGuard::has_voted(&state.sessions, session.id),
    })
}

#[post("/session/vote-again")]
pub async fn vote_again(state: &State<AppState>, session: ClientSession) -> Json<SessionStatus> {
    SessionVoteGuard::set_voted(&state.sessions, session.id, false);
    Json(SessionStatus { has_voted: false })
}

#[get("/statistics")]
pub async fn statistics(state: &State<AppState>) -> Result<Json<Statistics>, ApiError> {
    let stats = StatisticsAggregator::compute_statistics(state.store()).await?;
    Ok(Json(stats))
}

#[get("/lecturers")]
pub async fn list_lecturers(state: &State<AppState>) -> Result<Json<Vec<Lecturer>>, ApiError> {
    Ok(Json(state.store().lecturers().await?))
}

#[get("/lecturers/<id>")]
pub async fn get_lecturer(state: &State<AppState>, id: &str) -> Result<Json<Lecturer>, ApiError> {
    fetch_lecturer(state, id).await.map(Json)
}

#[post("/lecturers", format = "json", data = "<request>")]
pub async fn create_lecturer(
    state: &State<AppState>,
    request: Json<NewLecturer>,
) -> Result<(Status, Json<Lecturer>), ApiError> {
    let request = request.into_inner();
    validate_lecturer(&request)?;
    let lecturer = state.store().create_lecturer(&request).await?;
    info!("Created lecturer {} ({})", lecturer.id, lecturer);
    Ok((Status::Created, Json(lecturer)))
}

#[instrument(skip(state, request), fields(lecturer_id = %id))]
#[put("/lecturers/<id>", format = "json", data = "<request>")]
pub async fn update_lecturer(
    state: &State<AppState>,
    id: &str,
    request: Json<NewLecturer>,
) -> Result<Json<Lecturer>, ApiError> {
    let request = request.into_inner();
    validate_lecturer(&request)?;
    let mut lecturer = fetch_lecturer(state, id).await?;
    lecturer.first_name = request.first_name;
    lecturer.last_name = request.last_name;
    state.store().save_lecturer(&lecturer).await?;
    Ok(Json(lecturer))
}

#[instrument(skip(state), fields(lecturer_id = %id))]
#[delete("/lecturers/<id>")]
pub async fn delete_lecturer(state: &State<AppState>, id: &str) -> Result<Status, ApiError> {
    let id = parse_id(id)?;
    if state.store().delete_lecturer(id).await? {
        info!("Deleted lecturer {} and their courses", id);
        Ok(Status::NoContent)
    } else {
        Err(ApiError::NotFound)
    }
}

#[post("/courses", format = "json", data = "<request>")]
pub async fn create_course(
    state: &State<AppState>,
    request: Json<NewCourse>,
) -> Result<(Status, Json<Course>), ApiError> {
    let request = request.into_inner();
    validate_course(&request)?;
    let course = state.store().create_course(&request).await?;
    info!("Created course {} ({})", course.id, course);
    Ok((Status::Created, Json(course)))
}

#[instrument(skip(state), fields(course_id = %id))]
#[delete("/courses/<id>")]
pub async fn delete_course(state: &State<AppState>, id: &str) -> Result<Status, ApiError> {
    let id = parse_id(id)?;
    if state.store().delete_course(id).await? {
        info!("Deleted course {}", id);
        Ok(Status::NoContent)
    } else {
        Err(ApiError::NotFound)
    }
}
