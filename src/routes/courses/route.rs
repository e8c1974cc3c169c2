use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
};
use axum_extra::extract::WithRejection;
use uuid::Uuid;

use super::dto::{
    ApplyToLevelsRequest, ApplyToLevelsResponse, CourseResponse, CreateCourseRequest,
    LevelCoursesResponse, UpdateCourseRequest,
};
use crate::entities::sea_orm_active_enums::Level;
use crate::error::{AppError, ErrorResponse};
use crate::extractor::PrincipalClaims;
use crate::services::course_allocation::ApplyOutcome;
use crate::state::AppState;

pub fn create_route() -> Router<AppState> {
    Router::new()
        .route("/api/v1/courses", post(create_course))
        .route("/api/v1/courses/apply-to-levels", post(apply_to_levels))
        .route(
            "/api/v1/courses/{course_id}",
            put(update_course).delete(delete_course),
        )
        .route("/api/v1/levels/{level}/courses", get(get_level_courses))
}

/// Give a subject a weekly-hour quota on one level
#[utoipa::path(
    post,
    path = "/api/v1/courses",
    request_body = CreateCourseRequest,
    responses(
        (status = 201, description = "Course created", body = CourseResponse),
        (status = 400, description = "Invalid hours or level", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Subject not found", body = ErrorResponse),
        (status = 409, description = "Subject already has a quota for this level", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
pub async fn create_course(
    PrincipalClaims(_claims): PrincipalClaims,
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<CreateCourseRequest>, AppError>,
) -> Result<(StatusCode, Json<CourseResponse>), AppError> {
    let course = state
        .courses
        .create_course(payload.level, payload.subject_id, payload.hours_per_week)
        .await?;
    Ok((StatusCode::CREATED, Json(course.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/courses/{course_id}",
    params(("course_id" = Uuid, Path, description = "Course id")),
    request_body = UpdateCourseRequest,
    responses(
        (status = 200, description = "Hours updated", body = CourseResponse),
        (status = 400, description = "Invalid hours", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
pub async fn update_course(
    PrincipalClaims(_claims): PrincipalClaims,
    State(state): State<AppState>,
    WithRejection(Path(course_id), _): WithRejection<Path<Uuid>, AppError>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateCourseRequest>, AppError>,
) -> Result<(StatusCode, Json<CourseResponse>), AppError> {
    let course = state
        .courses
        .update_hours(course_id, payload.hours_per_week)
        .await?;
    Ok((StatusCode::OK, Json(course.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/courses/{course_id}",
    params(("course_id" = Uuid, Path, description = "Course id")),
    responses(
        (status = 204, description = "Course deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
pub async fn delete_course(
    PrincipalClaims(_claims): PrincipalClaims,
    State(state): State<AppState>,
    WithRejection(Path(course_id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<StatusCode, AppError> {
    state.courses.delete_course(course_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Copy one subject quota to several levels
///
/// Each level is applied independently. The response is 200 when every
/// level succeeded and 207 when at least one failed.
#[utoipa::path(
    post,
    path = "/api/v1/courses/apply-to-levels",
    request_body = ApplyToLevelsRequest,
    responses(
        (status = 200, description = "Applied to every level", body = ApplyToLevelsResponse),
        (status = 207, description = "Some or all levels failed", body = ApplyToLevelsResponse),
        (status = 400, description = "Invalid hours or empty level list", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Subject not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
pub async fn apply_to_levels(
    PrincipalClaims(_claims): PrincipalClaims,
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<ApplyToLevelsRequest>, AppError>,
) -> Result<(StatusCode, Json<ApplyToLevelsResponse>), AppError> {
    let report = state
        .courses
        .apply_to_levels(
            payload.subject_id,
            payload.hours_per_week,
            payload.target_levels,
        )
        .await?;

    let status = match report.outcome {
        ApplyOutcome::Complete => StatusCode::OK,
        ApplyOutcome::Partial | ApplyOutcome::Failed => StatusCode::MULTI_STATUS,
    };
    Ok((status, Json(report.into())))
}

/// Courses of one level and the subjects it does not teach yet
#[utoipa::path(
    get,
    path = "/api/v1/levels/{level}/courses",
    params(("level" = String, Path, description = "Level name, e.g. SIXIEME")),
    responses(
        (status = 200, description = "Level sheet", body = LevelCoursesResponse),
        (status = 400, description = "Unknown level", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
pub async fn get_level_courses(
    PrincipalClaims(_claims): PrincipalClaims,
    State(state): State<AppState>,
    WithRejection(Path(level), _): WithRejection<Path<String>, AppError>,
) -> Result<(StatusCode, Json<LevelCoursesResponse>), AppError> {
    let level = Level::parse(&level)
        .ok_or_else(|| AppError::bad_request(format!("Unknown level: {level}")))?;
    let sheet = state.courses.level_courses(level).await?;
    Ok((StatusCode::OK, Json(sheet.into())))
}
