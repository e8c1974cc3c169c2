use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, put},
};
use axum_extra::extract::WithRejection;
use uuid::Uuid;

use super::dto::{CreateUserRequest, UpdateUserRequest, UserResponse};
use crate::error::{AppError, ErrorResponse};
use crate::extractor::PrincipalClaims;
use crate::routes::subjects::dto::{SetSubjectsRequest, SubjectResponse};
use crate::state::AppState;

pub fn create_route() -> Router<AppState> {
    Router::new()
        .route("/api/v1/users", get(list_teachers).post(create_teacher))
        .route("/api/v1/users/{user_id}", patch(update_teacher))
        .route("/api/v1/users/{user_id}/subjects", put(set_user_subjects))
}

/// List teachers, newest first
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "Teachers", body = Vec<UserResponse>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn list_teachers(
    PrincipalClaims(_claims): PrincipalClaims,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Vec<UserResponse>>), AppError> {
    let teachers = state.teachers.list_teachers().await?;
    Ok((
        StatusCode::OK,
        Json(teachers.into_iter().map(UserResponse::from).collect()),
    ))
}

/// Create a teacher account with the default password
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Teacher created", body = UserResponse),
        (status = 400, description = "Missing names or subjects", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 409, description = "E-mail already used", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn create_teacher(
    PrincipalClaims(_claims): PrincipalClaims,
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<CreateUserRequest>, AppError>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let teacher = state.teachers.create_teacher(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(teacher.into())))
}

#[utoipa::path(
    patch,
    path = "/api/v1/users/{user_id}",
    params(("user_id" = Uuid, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Teacher updated", body = UserResponse),
        (status = 400, description = "Missing names or subjects", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn update_teacher(
    PrincipalClaims(_claims): PrincipalClaims,
    State(state): State<AppState>,
    WithRejection(Path(user_id), _): WithRejection<Path<Uuid>, AppError>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateUserRequest>, AppError>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let teacher = state
        .teachers
        .update_teacher(user_id, payload.into())
        .await?;
    Ok((StatusCode::OK, Json(teacher.into())))
}

/// Replace the subjects of a user, creating unknown subjects
#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}/subjects",
    params(("user_id" = Uuid, Path, description = "User id")),
    request_body = SetSubjectsRequest,
    responses(
        (status = 200, description = "New subject set", body = Vec<SubjectResponse>),
        (status = 400, description = "No subject given", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn set_user_subjects(
    PrincipalClaims(_claims): PrincipalClaims,
    State(state): State<AppState>,
    WithRejection(Path(user_id), _): WithRejection<Path<Uuid>, AppError>,
    WithRejection(Json(payload), _): WithRejection<Json<SetSubjectsRequest>, AppError>,
) -> Result<(StatusCode, Json<Vec<SubjectResponse>>), AppError> {
    let subjects = state
        .subjects
        .set_user_subjects(user_id, payload.subjects)
        .await?;
    Ok((
        StatusCode::OK,
        Json(subjects.into_iter().map(SubjectResponse::from).collect()),
    ))
}
