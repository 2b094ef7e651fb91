//! HTTP routes under `/api`.
//!
//! Handlers validate the body, call the repository and serialize the result.
//! Failures are [`ApiError`]s and render as a status code with a plain-text body.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    routing::{get, post, put},
};
use serde_json::Value;
use tower_http::trace::TraceLayer;

use crate::{
    enrollment::Enrollment,
    error::{ApiError, ApiResult},
    model::{CourseResponse, CourseView, EnrollmentResponse, StudentResponse, StudentView},
    repository::Repository,
    validation::{validate_course, validate_student},
};

pub const HEALTH_MESSAGE: &str = "¡API funcionando!";
pub const ENROLLED_MESSAGE: &str = "Estudiante inscrito";
pub const REMOVED_MESSAGE: &str = "Estudiante removido del curso";

#[derive(Debug, Clone)]
pub struct AppState {
    pub repository: Arc<Repository>,
}

impl AppState {
    pub fn new(repository: Arc<Repository>) -> Self {
        Self { repository }
    }
}

/// Builds the service router with request tracing.
///
/// The liveness check answers on both `/api` and `/api/`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/", get(health_handler))
        .nest("/api", api_routes(state))
        .layer(TraceLayer::new_for_http())
}

fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(health_handler))
        // Students
        .route("/estudiantes", get(list_students_handler).post(create_student_handler))
        .route("/estudiantes/{id}", put(update_student_handler).delete(delete_student_handler))
        // Courses
        .route("/cursos", get(list_courses_handler).post(create_course_handler))
        .route("/cursos/{id}", put(update_course_handler).delete(delete_course_handler))
        // Enrollment
        .route("/cursos/{id}/inscribir/{estudiante_id}", post(enroll_handler))
        .route("/cursos/{id}/remover/{estudiante_id}", post(remove_handler))
        .with_state(state)
}

/// Unwraps a JSON body, turning a parse failure into a 400.
fn body(payload: Result<Json<Value>, JsonRejection>) -> ApiResult<Value> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::MalformedBody(rejection.body_text()))
}

fn enrollment_response(message: &str, enrollment: Enrollment) -> EnrollmentResponse {
    EnrollmentResponse {
        message: message.to_string(),
        course: CourseResponse::from(&enrollment.course),
        student: StudentResponse::from(&enrollment.student),
    }
}

async fn health_handler() -> &'static str {
    HEALTH_MESSAGE
}

// ==================
// Student Handlers
// ==================

async fn create_student_handler(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<StudentResponse>)> {
    let input = validate_student(&body(payload)?).map_err(ApiError::Validation)?;
    let student = state.repository.create_student(input).await?;

    Ok((StatusCode::CREATED, Json(StudentResponse::from(&student))))
}

async fn list_students_handler(State(state): State<AppState>) -> ApiResult<Json<Vec<StudentView>>> {
    Ok(Json(state.repository.list_students().await?))
}

async fn update_student_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<StudentResponse>> {
    let input = validate_student(&body(payload)?).map_err(ApiError::Validation)?;
    let student = state.repository.update_student(&id, input).await?;

    Ok(Json(StudentResponse::from(&student)))
}

async fn delete_student_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<StudentResponse>> {
    let student = state.repository.delete_student(&id).await?;

    Ok(Json(StudentResponse::from(&student)))
}

// ==================
// Course Handlers
// ==================

async fn create_course_handler(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CourseResponse>)> {
    let input = validate_course(&body(payload)?).map_err(ApiError::Validation)?;
    let course = state.repository.create_course(input).await?;

    Ok((StatusCode::CREATED, Json(CourseResponse::from(&course))))
}

async fn list_courses_handler(State(state): State<AppState>) -> ApiResult<Json<Vec<CourseView>>> {
    Ok(Json(state.repository.list_courses().await?))
}

async fn update_course_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<CourseResponse>> {
    let input = validate_course(&body(payload)?).map_err(ApiError::Validation)?;
    let course = state.repository.update_course(&id, input).await?;

    Ok(Json(CourseResponse::from(&course)))
}

async fn delete_course_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<CourseResponse>> {
    let course = state.repository.delete_course(&id).await?;

    Ok(Json(CourseResponse::from(&course)))
}

// ==================
// Enrollment Handlers
// ==================

async fn enroll_handler(
    State(state): State<AppState>,
    Path((course_id, student_id)): Path<(String, String)>,
) -> ApiResult<Json<EnrollmentResponse>> {
    let enrollment = state.repository.enroll(&course_id, &student_id).await?;

    Ok(Json(enrollment_response(ENROLLED_MESSAGE, enrollment)))
}

async fn remove_handler(
    State(state): State<AppState>,
    Path((course_id, student_id)): Path<(String, String)>,
) -> ApiResult<Json<EnrollmentResponse>> {
    let enrollment = state.repository.remove(&course_id, &student_id).await?;

    Ok(Json(enrollment_response(REMOVED_MESSAGE, enrollment)))
}
